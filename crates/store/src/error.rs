//! Store failure types.

use std::path::PathBuf;

/// Errors from the character store.
///
/// `Write` is fatal to a run's persistence step; the previously
/// persisted snapshot is always left intact.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store file exists but could not be read.
    #[error("Failed to read store file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but does not decode as a store document.
    #[error("Store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Writing the new snapshot (temp write or rename) failed.
    #[error("Failed to write store file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory store contents could not be serialized.
    #[error("Failed to serialize store contents: {0}")]
    Serialize(#[from] serde_json::Error),
}
