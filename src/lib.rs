//! assetgrep - Extract security-relevant artifacts from files
//!
//! Emails, IPv4 literals, domains, URL paths and company subdomains are pulled out of
//! arbitrary files with fixed patterns. Files are classified by a fixed pool of
//! workers, every distinct value is printed exactly once per run, and IP literals are
//! never reported as domains.
//!
//! ## Layout
//!
//! - [`walk`] enumerates regular files under the inputs
//! - [`scanner`] fans the files out to the worker pool and aggregates per-file outcomes
//! - [`classifier`] applies the patterns to one file's content
//! - [`store`] holds one lock-protected unique set per artifact type
//! - [`emitter`] prints values the moment they are first seen

pub mod classifier;
pub mod config;
pub mod emitter;
pub mod error;
pub mod patterns;
pub mod scanner;
pub mod store;
pub mod walk;

// Re-export commonly used items
pub use classifier::{Classifier, CompanyDomain, Findings};
pub use config::{CliArgs, ReadErrorPolicy, ScanConfig, DEFAULT_THREADS};
pub use emitter::{Emitter, MemoryEmitter, StdoutEmitter};
pub use error::{ConfigError, ScanError};
pub use patterns::{ArtifactType, AssetType, PatternSet};
pub use scanner::{scan, FileOutcome, ScanSummary};
pub use store::{AssetStore, UniqueSet};
pub use walk::{collect_files, walk_files, WalkSummary};
