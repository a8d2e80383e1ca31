//! Typed errors for the library layers. The UI and binary wrap these in
//! `anyhow` and only surface the innermost message.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing the persisted collection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to encode books: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Book not found")]
    NotFound(String),
}

/// Rejected form submits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in title, author and year.")]
    MissingRequired,
}

/// Failures while turning a cover file into an embedded image.
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("no cover file given")]
    EmptyPath,
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
