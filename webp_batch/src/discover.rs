//! Input discovery.
//!
//! Classifies the input path and produces the ordered task sources plus the
//! base directory later used for relative mirroring. Ordering is sorted by
//! path so a given filesystem snapshot always yields the same sequence.

use crate::errors::DiscoverError;
use crate::options::INPUT_EXTENSIONS;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of resolving an input path: the files to convert and the root
/// against which mirrored subdirectories are computed.
#[derive(Debug, Clone)]
pub struct DiscoveredInput {
    pub base_root: PathBuf,
    pub files: Vec<PathBuf>,
}

pub fn extension_lowercase(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

pub fn is_eligible(path: &Path) -> bool {
    let ext = extension_lowercase(path);
    INPUT_EXTENSIONS.contains(&ext.as_str())
}

/// Resolves an input path into the files to process.
///
/// A regular file is accepted as-is, whatever its extension; its parent is
/// the base root. A directory is enumerated (direct children, or the whole
/// subtree when `recursive`) through the extension allow-list. Anything else
/// fails with `InvalidInputPath`; an enumeration that matches nothing fails
/// with `NoEligibleFiles`.
pub fn resolve_input(input: &Path, recursive: bool) -> Result<DiscoveredInput, DiscoverError> {
    if input.is_file() {
        let base_root = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok(DiscoveredInput {
            base_root,
            files: vec![input.to_path_buf()],
        });
    }

    if !input.is_dir() {
        return Err(DiscoverError::InvalidInputPath(input.to_path_buf()));
    }

    let walker = if recursive {
        WalkDir::new(input).follow_links(true)
    } else {
        WalkDir::new(input).max_depth(1)
    };

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_eligible(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();

    if files.is_empty() {
        return Err(DiscoverError::NoEligibleFiles(input.to_path_buf()));
    }

    files.sort();

    Ok(DiscoveredInput {
        base_root: input.to_path_buf(),
        files,
    })
}
