//! Protocol types for store bridge communication.
//!
//! One JSON object per line in each direction. Every request carries an id
//! that its response echoes.

use serde::{Deserialize, Serialize};

use crate::report::ReportKind;

// ============================================================================
// Request/Response Envelope
// ============================================================================

/// Request envelope sent to the worker.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    /// Unique request ID for correlation.
    pub id: String,
    /// Method name (e.g., "report.load").
    pub method: String,
    /// Method-specific parameters.
    pub params: serde_json::Value,
}

/// Response envelope received from the worker.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Request ID this response corresponds to.
    pub id: String,
    /// Whether the request succeeded.
    pub success: bool,
    /// Result data (present if success = true).
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Error information (present if success = false).
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

/// Error information in a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorInfo {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

// ============================================================================
// Method names and error codes
// ============================================================================

pub mod methods {
    pub const LOAD_REPORT: &str = "report.load";
    pub const RUN_PAGED: &str = "report.run_paged";
    pub const FETCH_PAGE: &str = "report.fetch_page";
}

pub mod codes {
    pub const REPORT_NOT_FOUND: &str = "REPORT_NOT_FOUND";
    pub const PAGE_OUT_OF_RANGE: &str = "PAGE_OUT_OF_RANGE";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";
    pub const WORKER_EXITED: &str = "WORKER_EXITED";
}

// ============================================================================
// Request Parameters
// ============================================================================

/// Parameters for `report.load`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReportParams {
    /// Report id as supplied by the caller.
    pub id: String,
    /// Shape inferred from the id.
    pub kind: ReportKind,
}

/// Parameters for `report.run_paged`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPagedParams {
    pub report_id: String,
    pub kind: ReportKind,
    /// Records per native page.
    pub page_size: usize,
}

/// Parameters for `report.fetch_page`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchPageParams {
    /// Handle returned by `report.run_paged`.
    pub run_id: String,
    /// Absolute native page ordinal.
    pub index: usize,
}
