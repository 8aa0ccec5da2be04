//! Report store errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::report::ReportKind;
use crate::worker::WorkerError;

/// Result type for report store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a [`ReportStore`](super::ReportStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store has no report with this id.
    #[error("report not found: {0}")]
    NotFound(String),

    /// The store returned a page whose shape does not match the report kind.
    #[error("report {report_id} returned a page that is not a {expected} page")]
    ShapeMismatch {
        report_id: String,
        expected: ReportKind,
    },

    /// A native page ordinal past the end of the paged run.
    #[error("native page {index} out of range (run has {page_count} pages)")]
    PageOutOfRange { index: usize, page_count: usize },

    /// The paged run handle is unknown or expired.
    #[error("unknown paged run: {0}")]
    UnknownRun(String),

    /// Failed to read a fixtures file.
    #[error("failed to read fixtures {path}: {source}")]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to parse a fixtures file.
    #[error("failed to parse fixtures {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store is reachable but refused or failed the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store bridge process failed.
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

impl StoreError {
    /// Whether this error means the report id could not be resolved.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
