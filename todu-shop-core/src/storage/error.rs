use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error reading or writing a file.
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document on disk could not be parsed.
    #[error("Failed to load document {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },

    /// An Automerge operation failed.
    #[error("Automerge error: {0}")]
    Automerge(String),
}
