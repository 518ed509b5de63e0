//! Enumeration of the regular files under the input paths.

use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What happened while enumerating the inputs
#[derive(Debug, Default)]
pub struct WalkSummary {
    /// Distinct files handed to the visitor
    pub files: usize,
    /// Top-level inputs that could not be accessed
    pub missing_inputs: Vec<PathBuf>,
    /// The visitor asked to stop before enumeration finished
    pub stopped: bool,
}

/// Walk every input and hand each distinct regular file to `visit`, in discovery order.
/// Directories are walked recursively; a file input is yielded as-is. An input that
/// cannot be accessed is reported and skipped. Enumeration stops as soon as `visit`
/// returns false.
pub fn walk_files<F>(inputs: &[PathBuf], mut visit: F) -> WalkSummary
where
    F: FnMut(PathBuf) -> bool,
{
    let mut summary = WalkSummary::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    'inputs: for input in inputs {
        if let Err(err) = fs::metadata(input) {
            if err.kind() == ErrorKind::NotFound {
                warn!("Path: {} not found", input.display());
            } else {
                warn!("Path: {} not accessible: {}", input.display(), err);
            }
            summary.missing_inputs.push(input.clone());
            continue;
        }

        debug!("Enumerating {}", input.display());

        let walker = WalkBuilder::new(input)
            .hidden(false)
            // Every file is a candidate, ignore files included
            .git_ignore(false)
            .ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Failed to access entry in {}: {}", input.display(), err);
                    continue;
                }
            };

            let path = entry.path();
            if !is_regular_file(path) || !seen.insert(path.to_path_buf()) {
                continue;
            }

            summary.files += 1;
            if !visit(path.to_path_buf()) {
                summary.stopped = true;
                break 'inputs;
            }
        }
    }

    summary
}

/// Collect the files [`walk_files`] would visit
pub fn collect_files(inputs: &[PathBuf]) -> (Vec<PathBuf>, WalkSummary) {
    let mut files = Vec::new();
    let summary = walk_files(inputs, |path| {
        files.push(path);
        true
    });
    (files, summary)
}

/// Regular file, following symlinks to their target
fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}
