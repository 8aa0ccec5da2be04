//! Query errors and the error response shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::request::{PARAM_PAGES_TO_LOAD, PARAM_PAGE_INDEX, PARAM_REPORT_ID};
use crate::flatten::FlattenError;
use crate::source::StoreError;

/// Every way a query can fail.
#[derive(Error, Debug)]
pub enum QueryError {
    /// A required request parameter is absent or blank.
    #[error("The {0} parameter is required")]
    MissingParameter(&'static str),

    /// A request parameter is present but unusable.
    #[error("The {name} parameter must be {expected}, got '{value}'")]
    InvalidParameter {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    /// The report id matches neither the dataset nor the search convention.
    #[error("The dataset/saved search id is invalid: {0}")]
    InvalidReportId(String),

    /// The store could not resolve the report id.
    #[error("Report not found: {0}")]
    ReportNotFound(String),

    /// The requested output page does not exist.
    #[error("Page index {page_index} is out of range; the report has {total_pages} page(s)")]
    PageIndexOutOfRange {
        page_index: usize,
        total_pages: usize,
    },

    /// Column keys could not be built under the configured collision policy.
    #[error(transparent)]
    Flatten(#[from] FlattenError),

    /// Any store failure while counting or fetching pages.
    #[error("Failed to fetch report data: {0}")]
    StoreFetch(#[source] StoreError),
}

impl QueryError {
    /// Stable wire code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter(PARAM_REPORT_ID) => "MISSING_REPORTID",
            Self::MissingParameter(PARAM_PAGE_INDEX) => "MISSING_PAGEINDEX",
            Self::MissingParameter(PARAM_PAGES_TO_LOAD) => "MISSING_PAGESTOLOAD",
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::InvalidReportId(_) => "INVALID_REPORTID",
            Self::ReportNotFound(_) => "REPORT_NOT_FOUND",
            Self::PageIndexOutOfRange { .. } => "PAGE_INDEX_OUT_OF_RANGE",
            Self::Flatten(FlattenError::DuplicateColumnKey { .. }) => "DUPLICATE_COLUMN_KEY",
            Self::StoreFetch(_) => "STORE_FETCH_FAILURE",
        }
    }

    /// Whether the caller's request was at fault.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_)
                | Self::InvalidParameter { .. }
                | Self::InvalidReportId(_)
                | Self::PageIndexOutOfRange { .. }
        )
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::ReportNotFound(id),
            other => Self::StoreFetch(other),
        }
    }
}

/// The single failure shape returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&QueryError> for ErrorResponse {
    fn from(err: &QueryError) -> Self {
        err.to_response()
    }
}
