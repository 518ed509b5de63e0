//! Concurrent extraction over a fixed pool of workers.
//!
//! A producer thread enumerates the inputs and streams file paths into a bounded
//! channel. A rayon pool of exactly `threads` workers pulls from that channel, each
//! worker classifying one whole file at a time. Dropping the sender when enumeration
//! ends closes the queue; `scan` returns once every worker has drained it and the
//! producer has been joined.

use crate::classifier::{Classifier, Findings};
use crate::config::{ReadErrorPolicy, ScanConfig};
use crate::emitter::Emitter;
use crate::error::ScanError;
use crate::patterns::{ArtifactType, PatternSet};
use crate::store::AssetStore;
use crate::walk::walk_files;

use crossbeam_channel::bounded;
use rayon::prelude::*;
use std::path::PathBuf;
use std::thread;
use tracing::{debug, info, warn};

/// Result of processing one file
#[derive(Debug)]
pub enum FileOutcome {
    Scanned { path: PathBuf, findings: Findings },
    Failed { path: PathBuf, error: ScanError },
}

/// Aggregated result of a run
#[derive(Debug, Default)]
pub struct ScanSummary {
    pub files_scanned: usize,
    /// Files that could not be read and were skipped
    pub failed: Vec<ScanError>,
    /// Inputs that did not exist or could not be accessed
    pub missing_inputs: Vec<PathBuf>,
    pub findings: Findings,
}

impl ScanSummary {
    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Scanned { findings, .. } => {
                self.files_scanned += 1;
                self.findings.merge(&findings);
            }
            FileOutcome::Failed { error, .. } => self.failed.push(error),
        }
    }

    fn log(&self) {
        info!(
            "Scanned {} files ({} unreadable, {} missing inputs)",
            self.files_scanned,
            self.failed.len(),
            self.missing_inputs.len()
        );
        for artifact_type in ArtifactType::ALL {
            let count = self.findings.new_values(artifact_type);
            if count > 0 {
                info!("  {}: {} unique", artifact_type, count);
            }
        }
        if self.findings.suppressed_domains > 0 {
            info!(
                "  {} domains outside the company domain not printed",
                self.findings.suppressed_domains
            );
        }
    }
}

/// Extract artifacts from every file under `config.paths`, printing each new value
/// through `emitter` as soon as `store` accepts it.
///
/// With [`ReadErrorPolicy::Skip`] unreadable files are listed in the summary. With
/// [`ReadErrorPolicy::Abort`] the first unreadable file stops the pool, enumeration is
/// cut short and the error is returned; files already being classified finish first.
pub fn scan(
    config: &ScanConfig,
    patterns: &PatternSet,
    store: &AssetStore,
    emitter: &dyn Emitter,
) -> Result<ScanSummary, ScanError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .thread_name(|index| format!("assetgrep-worker-{}", index))
        .build()?;

    debug!(
        "Scanning {} inputs for {:?} with {} workers",
        config.paths.len(),
        config.asset_type,
        config.threads
    );

    // Bounded so the producer waits for the workers instead of buffering the whole tree
    let (sender, receiver) = bounded::<PathBuf>(config.threads * 2);

    let inputs = config.paths.clone();
    let producer_handle = thread::spawn(move || {
        // A failed send means the workers stopped early; stop enumerating too
        walk_files(&inputs, |path| sender.send(path).is_ok())
    });

    let classifier = Classifier::new(config, patterns, store, emitter);

    let outcomes: Result<Vec<FileOutcome>, ScanError> = pool.install(|| {
        receiver
            .into_iter()
            .par_bridge()
            .map(|path| process_file(&classifier, path, config.read_errors))
            .collect()
    });

    // The receiver is gone by now, so a producer cut short by an abort cannot block here
    let walk = producer_handle
        .join()
        .map_err(|_| ScanError::ProducerPanicked)?;

    let mut summary = ScanSummary {
        missing_inputs: walk.missing_inputs,
        ..ScanSummary::default()
    };
    for outcome in outcomes? {
        summary.record(outcome);
    }

    summary.log();
    Ok(summary)
}

fn process_file(
    classifier: &Classifier<'_>,
    path: PathBuf,
    policy: ReadErrorPolicy,
) -> Result<FileOutcome, ScanError> {
    debug!("Reading {}", path.display());

    match classifier.classify_file(&path) {
        Ok(findings) => {
            debug!("{}: {} new values", path.display(), findings.total());
            Ok(FileOutcome::Scanned { path, findings })
        }
        Err(error) => match policy {
            ReadErrorPolicy::Abort => Err(error),
            ReadErrorPolicy::Skip => {
                warn!("{}. Skipping.", error);
                Ok(FileOutcome::Failed { path, error })
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::MemoryEmitter;
    use crate::patterns::AssetType;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_unreadable_file_is_skipped_by_default() {
        let config = ScanConfig::new(vec![], AssetType::All);
        let patterns = PatternSet::load().unwrap();
        let store = AssetStore::new();
        let emitter = MemoryEmitter::new();
        let classifier = Classifier::new(&config, &patterns, &store, &emitter);

        let outcome = process_file(
            &classifier,
            PathBuf::from("/definitely/not/here.txt"),
            ReadErrorPolicy::Skip,
        )
        .unwrap();
        assert!(matches!(outcome, FileOutcome::Failed { .. }));
    }

    #[test]
    fn test_unreadable_file_aborts_in_strict_mode() {
        let config = ScanConfig::new(vec![], AssetType::All);
        let patterns = PatternSet::load().unwrap();
        let store = AssetStore::new();
        let emitter = MemoryEmitter::new();
        let classifier = Classifier::new(&config, &patterns, &store, &emitter);

        let result = process_file(
            &classifier,
            PathBuf::from("/definitely/not/here.txt"),
            ReadErrorPolicy::Abort,
        );
        assert!(matches!(result, Err(ScanError::Read { .. })));
    }

    #[test]
    fn test_summary_counts_files_and_values() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a@b.com 1.1.1.1").unwrap();
        fs::write(dir.path().join("b.txt"), "a@b.com 2.2.2.2").unwrap();

        let mut config = ScanConfig::new(
            vec![dir.path().to_path_buf(), dir.path().join("missing")],
            AssetType::Ip,
        );
        config.threads = 2;
        let patterns = PatternSet::load().unwrap();
        let store = AssetStore::new();
        let emitter = MemoryEmitter::new();

        let summary = scan(&config, &patterns, &store, &emitter).unwrap();

        assert_eq!(summary.files_scanned, 2);
        assert!(summary.failed.is_empty());
        assert_eq!(summary.missing_inputs, vec![dir.path().join("missing")]);
        assert_eq!(summary.findings.new_values(ArtifactType::Ip), 2);
        assert_eq!(summary.findings.total(), 2);
    }

    #[test]
    fn test_empty_input_set_finishes() {
        let dir = tempdir().unwrap();
        let config = ScanConfig::new(vec![dir.path().to_path_buf()], AssetType::All);
        let patterns = PatternSet::load().unwrap();
        let store = AssetStore::new();
        let emitter = MemoryEmitter::new();

        let summary = scan(&config, &patterns, &store, &emitter).unwrap();
        assert_eq!(summary.files_scanned, 0);
        assert!(emitter.emitted().is_empty());
    }
}
