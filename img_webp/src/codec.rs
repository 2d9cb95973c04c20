//! Codec Seam
//!
//! Decode of the source formats and encode of the target format sit behind
//! [`ImageCodec`] so the search and decision logic can be driven by a
//! scripted codec in tests. [`WebpCodec`] is the production implementation:
//! `image` for decoding, libwebp (via the `webp` crate) for encoding.

use image::{DynamicImage, GenericImageView};
use shared_utils::{ImgError, Quality, Result};

/// Quality used for the lossless path; libwebp reads it as compression effort.
pub const LOSSLESS_EFFORT: f32 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    Lossy(Quality),
    Lossless,
}

impl std::fmt::Display for EncodeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeMode::Lossy(q) => write!(f, "lossy {}", q),
            EncodeMode::Lossless => f.write_str("lossless"),
        }
    }
}

pub trait ImageCodec: Send + Sync {
    /// Decode any supported encoded image (source or target format).
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage>;

    /// Encode into the target format.
    fn encode(&self, image: &DynamicImage, mode: EncodeMode) -> Result<Vec<u8>>;

    /// Extension (without dot) of files produced by [`ImageCodec::encode`].
    fn target_extension(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WebpCodec;

impl ImageCodec for WebpCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| ImgError::DecodeError(e.to_string()))
    }

    fn encode(&self, image: &DynamicImage, mode: EncodeMode) -> Result<Vec<u8>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ImgError::EncodeError("zero-sized image".to_string()));
        }

        let encoded = match mode {
            EncodeMode::Lossy(quality) => {
                let rgb = image.to_rgb8();
                let encoder = webp::Encoder::from_rgb(rgb.as_raw(), width, height);
                let memory = encoder
                    .encode_simple(false, quality.as_f32())
                    .map_err(|e| encode_error(mode, e))?;
                memory.to_vec()
            }
            EncodeMode::Lossless => {
                let rgba = image.to_rgba8();
                let config = lossless_config().map_err(|e| encode_error(mode, e))?;
                let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);
                let memory = encoder
                    .encode_advanced(&config)
                    .map_err(|e| encode_error(mode, e))?;
                memory.to_vec()
            }
        };

        Ok(encoded)
    }

    fn target_extension(&self) -> &'static str {
        "webp"
    }
}

/// Lossless settings that keep RGB under fully transparent pixels.
fn lossless_config() -> std::result::Result<webp::WebPConfig, ()> {
    let mut config = webp::WebPConfig::new()?;
    config.lossless = 1;
    config.quality = LOSSLESS_EFFORT;
    config.exact = 1;
    Ok(config)
}

fn encode_error(mode: EncodeMode, detail: impl std::fmt::Debug) -> ImgError {
    ImgError::EncodeError(format!("libwebp {} encode failed: {:?}", mode, detail))
}
