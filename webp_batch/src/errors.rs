use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole run before any task executes.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("quality must be between 0 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

/// Discovery-time failures. Both are reported to the caller through a single
/// terminal progress event with `total = 0`; neither raises out of the run.
#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("input path is neither a file nor a directory: {0}")]
    InvalidInputPath(PathBuf),

    #[error("no eligible image files found under {0}")]
    NoEligibleFiles(PathBuf),
}

/// Per-task failures. These never abort the batch: they surface through the
/// task outcome, the `failed` counter and the per-task progress message.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("could not create destination directory: {0}")]
    DirectoryCreation(#[source] std::io::Error),

    #[error("could not decode source image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("webp encoding failed: {0}")]
    Encode(String),

    #[error("could not write destination file: {0}")]
    Write(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BatchError>;
