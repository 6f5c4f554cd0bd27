//! Error types for the I/O boundary.
//!
//! The search itself never fails; only reading and writing snapshots and
//! parsing user-supplied labels can.

use std::path::PathBuf;

/// Failure to read or write a snapshot or config file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid bincode snapshot: {0}")]
    Bincode(#[from] bincode::Error),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Unknown stage label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage {0:?} (expected Fortify, Battle or \"AI Turn\")")]
pub struct StageError(pub String);
