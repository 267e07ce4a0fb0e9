//! Destination path computation.
//!
//! Pure path arithmetic: no directory is created here. The task runner owns
//! filesystem side effects so that a creation failure stays local to one
//! task.

use crate::options::{ConversionOptions, OUTPUT_EXTENSION};
use std::path::{Path, PathBuf};

/// Computes the destination path for one source file.
///
/// Without an output root the destination sits next to the source. With an
/// output root, the source's subdirectory relative to `base_root` is
/// mirrored under it when the run is recursive; non-recursive runs and files
/// directly inside `base_root` land flat in the root itself.
pub fn destination_for(
    source: &Path,
    base_root: &Path,
    options: &ConversionOptions,
) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let file_name = format!("{}.{}", stem, OUTPUT_EXTENSION);

    match &options.output_root {
        None => source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(file_name),
        Some(root) => {
            let dir = if options.recursive {
                let relative = source
                    .parent()
                    .and_then(|p| p.strip_prefix(base_root).ok())
                    .unwrap_or_else(|| Path::new(""));
                root.join(relative)
            } else {
                root.clone()
            };
            dir.join(file_name)
        }
    }
}
