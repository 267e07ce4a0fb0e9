//! Conversion options for one batch run.
//!
//! An options value is created once by the caller and is read-only for the
//! duration of the run. The overwrite flag uses a single polarity
//! (`overwrite_existing`); front ends exposing an inverted switch translate
//! at their own boundary.

use crate::errors::{BatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extensions eligible for directory discovery, compared case-insensitively.
/// A single-file input bypasses this list entirely.
pub const INPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "bmp"];

/// Extension appended to every destination file.
pub const OUTPUT_EXTENSION: &str = "webp";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Lossy compression strength, 0-100. Ignored when `lossless` is set.
    pub quality: u8,
    /// Encode pixel data exactly; `quality` is not consulted.
    pub lossless: bool,
    /// Walk the whole input subtree instead of direct children only.
    pub recursive: bool,
    /// When false, an existing destination file is preserved untouched and
    /// the task is counted as skipped.
    pub overwrite_existing: bool,
    /// Destination root. Absent means "write beside each source file".
    pub output_root: Option<PathBuf>,
    /// Worker count: 1 runs tasks strictly in discovery order on the calling
    /// thread, 0 means one worker per CPU core, anything else a bounded pool.
    pub jobs: usize,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            quality: 80,
            lossless: false,
            recursive: false,
            overwrite_existing: true,
            output_root: None,
            jobs: 1,
        }
    }
}

impl ConversionOptions {
    /// Rejects out-of-range quality before any discovery happens. Negative
    /// values cannot be represented by the type, so only the upper bound is
    /// checked here.
    pub fn validate(&self) -> Result<()> {
        if self.quality > 100 {
            return Err(BatchError::InvalidQuality(self.quality));
        }
        Ok(())
    }
}
