//! Safety Module
//!
//! The recompressor deletes originals, so it refuses to walk system
//! directories or a bare home directory.

use std::path::Path;

use crate::errors::{ImgError, Result};

const DANGEROUS_DIRS: &[&str] = &[
    "/",
    "/System",
    "/usr",
    "/bin",
    "/sbin",
    "/etc",
    "/var",
    "/private",
    "/Library",
    "/Applications",
    "/Users",
    "/home",
    "/root",
    "/boot",
    "/dev",
    "/proc",
    "/sys",
    "/tmp",
    "/opt",
];

pub fn check_dangerous_directory(path: &Path) -> Result<()> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    for candidate in [path, canonical.as_path()] {
        let path_str = candidate.to_string_lossy();
        if let Some(dangerous) = DANGEROUS_DIRS.iter().find(|d| path_str == **d) {
            return Err(ImgError::UnsafeDirectory {
                path: path.to_path_buf(),
                reason: format!("'{}' is a protected system directory", dangerous),
            });
        }
    }

    // /home/<user> or /Users/<user> itself: everything personal lives below.
    let components = canonical.components().count();
    let path_str = canonical.to_string_lossy();
    if components <= 3 && (path_str.starts_with("/Users/") || path_str.starts_with("/home/")) {
        return Err(ImgError::UnsafeDirectory {
            path: path.to_path_buf(),
            reason: "too close to a home directory root; pick a subdirectory".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dangerous_directories() {
        assert!(check_dangerous_directory(Path::new("/")).is_err());
        assert!(check_dangerous_directory(Path::new("/usr")).is_err());
        assert!(check_dangerous_directory(Path::new("/etc")).is_err());
    }

    #[test]
    fn test_home_root_blocked() {
        assert!(check_dangerous_directory(Path::new("/home/someone")).is_err());
        assert!(check_dangerous_directory(Path::new("/Users/someone")).is_err());
    }

    #[test]
    fn test_safe_directories() {
        assert!(check_dangerous_directory(Path::new("/Users/test/Documents/photos")).is_ok());
        let temp = tempfile::TempDir::new().unwrap();
        assert!(check_dangerous_directory(temp.path()).is_ok());
    }
}
