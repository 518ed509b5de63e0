//! Output of newly unique artifacts.

use crate::patterns::ArtifactType;
use parking_lot::Mutex;
use std::io::{self, Write};
use tracing::debug;

/// Receives each artifact value the moment it is confirmed newly unique
pub trait Emitter: Send + Sync {
    fn emit(&self, artifact_type: ArtifactType, value: &str);
}

/// Prints one unprefixed value per line on standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutEmitter;

impl Emitter for StdoutEmitter {
    fn emit(&self, artifact_type: ArtifactType, value: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}", value) {
            // Usually a closed pipe; there is nobody left to report the value to
            debug!("Failed to write {} {}: {}", artifact_type, value, err);
        }
    }
}

/// Keeps emitted values in memory, in emission order
#[derive(Debug, Default)]
pub struct MemoryEmitter {
    emitted: Mutex<Vec<(ArtifactType, String)>>,
}

impl MemoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> Vec<(ArtifactType, String)> {
        self.emitted.lock().clone()
    }

    /// Values emitted for one artifact type, in emission order
    pub fn values(&self, artifact_type: ArtifactType) -> Vec<String> {
        self.emitted
            .lock()
            .iter()
            .filter(|(kind, _)| *kind == artifact_type)
            .map(|(_, value)| value.clone())
            .collect()
    }
}

impl Emitter for MemoryEmitter {
    fn emit(&self, artifact_type: ArtifactType, value: &str) {
        self.emitted.lock().push((artifact_type, value.to_string()));
    }
}
