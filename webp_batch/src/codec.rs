//! Codec adapter.
//!
//! The orchestrator only talks to the `ImageCodec` trait; the default
//! implementation decodes through the `image` crate and encodes through
//! libwebp. The `image` crate's own WebP encoder is lossless-only, which is
//! why encoding goes through the `webp` bindings instead.

use crate::errors::TaskError;
use image::DynamicImage;
use std::path::Path;

/// One decode and one encode call per task. Failure is reported per call and
/// never aborts anything beyond the task that made it.
pub trait ImageCodec: Sync {
    fn decode(&self, source: &Path) -> Result<DynamicImage, TaskError>;

    fn encode(
        &self,
        image: &DynamicImage,
        quality: u8,
        lossless: bool,
    ) -> Result<Vec<u8>, TaskError>;
}

/// Default codec: `image` for decoding, libwebp for encoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebpCodec;

impl ImageCodec for WebpCodec {
    fn decode(&self, source: &Path) -> Result<DynamicImage, TaskError> {
        image::open(source).map_err(TaskError::Decode)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        quality: u8,
        lossless: bool,
    ) -> Result<Vec<u8>, TaskError> {
        // libwebp only takes RGB8/RGBA8 input; normalize everything to RGBA8.
        let rgba = image.to_rgba8();
        let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
        let encoded = encoder
            .encode_simple(lossless, f32::from(quality))
            .map_err(|e| TaskError::Encode(format!("{e:?}")))?;
        Ok(encoded.to_vec())
    }
}
