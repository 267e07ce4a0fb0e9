//! One unit of work: a source file, its computed destination, and the
//! terminal outcome of processing it.

use crate::codec::ImageCodec;
use crate::errors::TaskError;
use crate::options::ConversionOptions;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Terminal state of a task. A task enters exactly one of the three terminal
/// variants; nothing is left `Pending` once the run completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    Pending,
    Converted,
    Skipped(String),
    Failed(String),
}

impl TaskOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskOutcome::Pending)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionTask {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub outcome: TaskOutcome,
}

impl ConversionTask {
    pub fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            outcome: TaskOutcome::Pending,
        }
    }
}

fn ensure_destination_dir(destination: &Path) -> Result<(), TaskError> {
    if let Some(parent) = destination.parent() {
        // create_dir_all is idempotent, so two tasks racing into the same
        // mirrored subdirectory both succeed.
        fs::create_dir_all(parent).map_err(TaskError::DirectoryCreation)?;
    }
    Ok(())
}

fn convert(
    codec: &dyn ImageCodec,
    task: &ConversionTask,
    options: &ConversionOptions,
) -> Result<(), TaskError> {
    let decoded = codec.decode(&task.source)?;
    let bytes = codec.encode(&decoded, options.quality, options.lossless)?;
    fs::write(&task.destination, bytes).map_err(TaskError::Write)
}

/// Runs one task to its terminal outcome. Never propagates an error: any
/// failure is folded into `TaskOutcome::Failed` so the batch moves on.
pub fn run_task(
    codec: &dyn ImageCodec,
    task: &ConversionTask,
    options: &ConversionOptions,
) -> TaskOutcome {
    if let Err(e) = ensure_destination_dir(&task.destination) {
        warn!(source = %task.source.display(), error = %e, "task failed");
        return TaskOutcome::Failed(e.to_string());
    }

    if !options.overwrite_existing && task.destination.exists() {
        debug!(destination = %task.destination.display(), "destination exists, skipping");
        return TaskOutcome::Skipped("already exists".to_string());
    }

    match convert(codec, task, options) {
        Ok(()) => {
            debug!(
                source = %task.source.display(),
                destination = %task.destination.display(),
                "converted"
            );
            TaskOutcome::Converted
        }
        Err(e) => {
            warn!(source = %task.source.display(), error = %e, "task failed");
            TaskOutcome::Failed(e.to_string())
        }
    }
}
