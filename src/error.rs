//! Error types for assetgrep
//!
//! Configuration problems are caught before any file is read. Scan errors cover the
//! worker pool and unreadable files; whether an unreadable file ends the run is decided
//! by [`crate::config::ReadErrorPolicy`].

use std::path::PathBuf;
use thiserror::Error;

/// Invalid command-line configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No usable entries in --paths
    #[error("Files for assets to parse must be provided")]
    NoPaths,

    /// companydomain mode without --cd
    #[error("Company domain must be specified to get subdomains")]
    MissingCompanyDomain,

    /// Zero workers
    #[error("Invalid thread count {0}: must be at least 1")]
    InvalidThreadCount(usize),
}

/// Errors raised while scanning files
#[derive(Error, Debug)]
pub enum ScanError {
    /// A file could not be read after it was enumerated
    #[error("Cannot read file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker pool could not be created
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The path enumeration thread panicked
    #[error("Path enumeration thread panicked")]
    ProducerPanicked,
}
