//! Batch orchestration.
//!
//! One `run` drives a whole batch: validate options, discover inputs, map
//! destinations, execute tasks (sequentially or across a bounded rayon
//! pool), and push progress events to the caller's sink. Per-task failures
//! never abort the batch; only out-of-range quality aborts the call itself.

use crate::codec::{ImageCodec, WebpCodec};
use crate::discover::{resolve_input, DiscoveredInput};
use crate::errors::{BatchError, Result};
use crate::mapper::destination_for;
use crate::options::ConversionOptions;
use crate::progress::{CancelToken, ProgressEvent, ProgressSink};
use crate::task::{run_task, ConversionTask, TaskOutcome};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::{info, warn};

/// Aggregate counts for one run, produced once and handed to the caller.
/// At normal completion `converted + skipped + failed == total`; after a
/// cancellation the counts reflect only completed work.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchResult {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    fn record(&mut self, source: &Path, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Converted => self.converted += 1,
            TaskOutcome::Skipped(_) => self.skipped += 1,
            TaskOutcome::Failed(reason) => {
                self.failed += 1;
                self.errors.push((source.to_path_buf(), reason.clone()));
            }
            TaskOutcome::Pending => {}
        }
    }

    pub fn processed(&self) -> usize {
        self.converted + self.skipped + self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.processed() == self.total
    }
}

/// Runs a batch with the default WebP codec and no cancellation.
pub fn run(
    input: &Path,
    options: &ConversionOptions,
    sink: &mut dyn ProgressSink,
) -> Result<BatchResult> {
    run_with(&WebpCodec, input, options, sink, &CancelToken::new())
}

/// Runs a batch against an injected codec and cancellation token.
pub fn run_with(
    codec: &dyn ImageCodec,
    input: &Path,
    options: &ConversionOptions,
    sink: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> Result<BatchResult> {
    options.validate()?;

    let discovered = match resolve_input(input, options.recursive) {
        Ok(discovered) => discovered,
        Err(e) => {
            warn!(input = %input.display(), "{e}");
            sink.notify(&ProgressEvent::new(0, 0, e.to_string()));
            return Ok(BatchResult::default());
        }
    };

    let mut tasks = plan(&discovered, options);
    let total = tasks.len();
    info!(total, input = %input.display(), "starting batch");

    let mut result = BatchResult::new(total);
    let workers = effective_jobs(options.jobs);

    if workers <= 1 {
        run_sequential(codec, &mut tasks, options, sink, cancel, &mut result);
    } else {
        let outcomes = run_parallel(codec, &tasks, options, sink, cancel, &mut result, workers)?;
        for (task, outcome) in tasks.iter_mut().zip(outcomes) {
            if let Some(outcome) = outcome {
                task.outcome = outcome;
            }
        }
    }

    if result.cancelled {
        let message = format!(
            "Cancelled after {} of {} tasks",
            result.processed(),
            total
        );
        info!("{message}");
        sink.notify(&ProgressEvent::new(result.processed(), total, message));
    } else {
        let message = format!(
            "Complete: {} converted, {} skipped, {} failed",
            result.converted, result.skipped, result.failed
        );
        info!("{message}");
        sink.notify(&ProgressEvent::new(total, total, message));
    }

    Ok(result)
}

/// Builds the task list, computing every destination up front. Overlapping
/// destinations (e.g. `a.png` and `a.jpg` side by side) are allowed with
/// last-writer-wins semantics, but each collision is logged.
fn plan(discovered: &DiscoveredInput, options: &ConversionOptions) -> Vec<ConversionTask> {
    let mut seen = HashSet::new();
    discovered
        .files
        .iter()
        .map(|source| {
            let destination = destination_for(source, &discovered.base_root, options);
            if !seen.insert(destination.clone()) {
                warn!(
                    destination = %destination.display(),
                    source = %source.display(),
                    "duplicate destination, last writer wins"
                );
            }
            ConversionTask::new(source.clone(), destination)
        })
        .collect()
}

fn effective_jobs(jobs: usize) -> usize {
    if jobs == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        jobs
    }
}

fn describe(task: &ConversionTask, outcome: &TaskOutcome) -> String {
    let name = task
        .source
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();
    match outcome {
        TaskOutcome::Converted => format!("Converted: {name}"),
        TaskOutcome::Skipped(reason) => format!("Skipped {name} ({reason})"),
        TaskOutcome::Failed(reason) => format!("Failed {name}: {reason}"),
        TaskOutcome::Pending => format!("Pending: {name}"),
    }
}

fn run_sequential(
    codec: &dyn ImageCodec,
    tasks: &mut [ConversionTask],
    options: &ConversionOptions,
    sink: &mut dyn ProgressSink,
    cancel: &CancelToken,
    result: &mut BatchResult,
) {
    let total = tasks.len();
    for (i, task) in tasks.iter_mut().enumerate() {
        if cancel.is_cancelled() {
            result.cancelled = true;
            return;
        }
        let outcome = run_task(codec, task, options);
        result.record(&task.source, &outcome);
        sink.notify(&ProgressEvent::new(i + 1, total, describe(task, &outcome)));
        task.outcome = outcome;
    }
}

/// Parallel execution: workers push `(index, outcome)` pairs through a
/// channel and only the calling thread touches the sink and counters, so
/// event emission stays serialized even though task order is not the
/// discovery order.
fn run_parallel(
    codec: &dyn ImageCodec,
    tasks: &[ConversionTask],
    options: &ConversionOptions,
    sink: &mut dyn ProgressSink,
    cancel: &CancelToken,
    result: &mut BatchResult,
    workers: usize,
) -> Result<Vec<Option<TaskOutcome>>> {
    let total = tasks.len();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| BatchError::WorkerPool(e.to_string()))?;

    let (tx, rx) = mpsc::channel::<(usize, TaskOutcome)>();
    let mut outcomes: Vec<Option<TaskOutcome>> = vec![None; total];
    let worker_cancel = cancel.clone();

    pool.in_place_scope(|scope| {
        scope.spawn(move |_| {
            tasks
                .par_iter()
                .enumerate()
                .for_each_with(tx, |tx, (idx, task)| {
                    if worker_cancel.is_cancelled() {
                        return;
                    }
                    let outcome = run_task(codec, task, options);
                    let _ = tx.send((idx, outcome));
                });
        });

        let mut processed = 0;
        for (idx, outcome) in rx {
            processed += 1;
            result.record(&tasks[idx].source, &outcome);
            sink.notify(&ProgressEvent::new(
                processed,
                total,
                describe(&tasks[idx], &outcome),
            ));
            outcomes[idx] = Some(outcome);
        }
    });

    if result.processed() < total && cancel.is_cancelled() {
        result.cancelled = true;
    }

    Ok(outcomes)
}
