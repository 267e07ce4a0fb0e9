//! Batch image to WebP conversion core.
//!
//! This crate holds everything the front ends share:
//! - input discovery (single file or directory, optionally recursive)
//! - destination mapping with relative subdirectory mirroring
//! - overwrite/skip policy and per-task error isolation
//! - progress events and aggregate counting
//! - optional bounded parallelism and cooperative cancellation
//!
//! Front ends stay thin: they translate their own flags into
//! [`ConversionOptions`], supply a [`ProgressSink`], and call
//! [`orchestrator::run`].

pub mod codec;
pub mod discover;
pub mod errors;
pub mod logging;
pub mod mapper;
pub mod options;
pub mod orchestrator;
pub mod progress;
pub mod task;

pub use codec::{ImageCodec, WebpCodec};
pub use discover::{resolve_input, DiscoveredInput};
pub use errors::{BatchError, DiscoverError, Result, TaskError};
pub use mapper::destination_for;
pub use options::{ConversionOptions, INPUT_EXTENSIONS, OUTPUT_EXTENSION};
pub use orchestrator::{run, run_with, BatchResult};
pub use progress::{CancelToken, FnSink, NullSink, ProgressEvent, ProgressSink};
pub use task::{run_task, ConversionTask, TaskOutcome};
