//! Scripted codec for unit tests.
//!
//! Encodes return placeholder byte strings of a chosen length; decoding one
//! of those yields the candidate image scripted for that mode. Any other
//! bytes decode to `source` (if set) or through `image`.

use crate::codec::{EncodeMode, ImageCodec};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use shared_utils::{ImgError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const MAGIC: &[u8] = b"SCRIPTED";
const LOSSLESS_TAG: u8 = 255;

pub(crate) struct ScriptedCodec {
    source: Option<DynamicImage>,
    outputs: HashMap<u8, (usize, Option<DynamicImage>)>,
    fail_encode: bool,
    candidate_decodes: AtomicUsize,
    encodes: Mutex<Vec<EncodeMode>>,
}

fn tag(mode: EncodeMode) -> u8 {
    match mode {
        EncodeMode::Lossy(q) => q.value(),
        EncodeMode::Lossless => LOSSLESS_TAG,
    }
}

impl ScriptedCodec {
    pub(crate) fn new() -> Self {
        Self {
            source: None,
            outputs: HashMap::new(),
            fail_encode: false,
            candidate_decodes: AtomicUsize::new(0),
            encodes: Mutex::new(Vec::new()),
        }
    }

    /// Image returned when decoding a non-scripted (original) file.
    pub(crate) fn with_source(mut self, image: DynamicImage) -> Self {
        self.source = Some(image);
        self
    }

    /// `mode` encodes to `size` bytes that decode back to `decoded`.
    pub(crate) fn with_output(mut self, mode: EncodeMode, size: usize, decoded: DynamicImage) -> Self {
        assert!(size > MAGIC.len(), "scripted size too small");
        self.outputs.insert(tag(mode), (size, Some(decoded)));
        self
    }

    /// `mode` encodes to `size` bytes that fail to decode.
    pub(crate) fn with_undecodable_output(mut self, mode: EncodeMode, size: usize) -> Self {
        assert!(size > MAGIC.len(), "scripted size too small");
        self.outputs.insert(tag(mode), (size, None));
        self
    }

    pub(crate) fn failing_encode(mut self) -> Self {
        self.fail_encode = true;
        self
    }

    pub(crate) fn candidate_decodes(&self) -> usize {
        self.candidate_decodes.load(Ordering::SeqCst)
    }

    pub(crate) fn encodes(&self) -> Vec<EncodeMode> {
        self.encodes.lock().unwrap().clone()
    }
}

impl ImageCodec for ScriptedCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        if bytes.len() > MAGIC.len() && bytes.starts_with(MAGIC) {
            self.candidate_decodes.fetch_add(1, Ordering::SeqCst);
            let key = bytes[MAGIC.len()];
            return self
                .outputs
                .get(&key)
                .and_then(|(_, img)| img.clone())
                .ok_or_else(|| ImgError::DecodeError(format!("no scripted image for tag {}", key)));
        }
        match &self.source {
            Some(img) => Ok(img.clone()),
            None => image::load_from_memory(bytes).map_err(|e| ImgError::DecodeError(e.to_string())),
        }
    }

    fn encode(&self, _image: &DynamicImage, mode: EncodeMode) -> Result<Vec<u8>> {
        self.encodes.lock().unwrap().push(mode);
        if self.fail_encode {
            return Err(ImgError::EncodeError("scripted encoder failure".to_string()));
        }
        let key = tag(mode);
        let (size, _) = self
            .outputs
            .get(&key)
            .ok_or_else(|| ImgError::EncodeError(format!("no scripted output for {}", mode)))?;
        let mut bytes = MAGIC.to_vec();
        bytes.push(key);
        bytes.resize(*size, 0xEE);
        Ok(bytes)
    }

    fn target_extension(&self) -> &'static str {
        "webp"
    }
}

pub(crate) fn solid_rgb(w: u32, h: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([value, value, value])))
}

pub(crate) fn solid_rgba(w: u32, h: u32, value: u8, alpha: u8) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([value, value, value, alpha])))
}
