//! Diagnostics sink injected into the query engine.
//!
//! The engine reports a fixed set of lifecycle events. Windowing and
//! flattening never report anything.

use std::sync::Mutex;

use crate::query::QueryOperation;
use crate::report::ReportKind;

/// A lifecycle event emitted while serving one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    RequestStarted {
        operation: QueryOperation,
        report_id: String,
        page_index: Option<usize>,
        pages_to_load: usize,
    },
    VariantResolved {
        report_id: String,
        kind: ReportKind,
    },
    PageCounts {
        report_id: String,
        native_pages: usize,
        total_rows: u64,
        output_pages: usize,
        pages_to_load: usize,
    },
    NativePageFetched {
        report_id: String,
        native_page: usize,
        records: usize,
    },
    RequestFinished {
        operation: QueryOperation,
        report_id: String,
        rows: usize,
    },
    RequestFailed {
        operation: QueryOperation,
        report_id: Option<String>,
        code: &'static str,
        message: String,
    },
}

/// Receives diagnostics. Fire-and-forget: nothing is returned to the engine.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, event: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn record(&self, event: Diagnostic) {
        match event {
            Diagnostic::RequestStarted {
                operation,
                report_id,
                page_index,
                pages_to_load,
            } => tracing::debug!(
                %operation,
                report_id = %report_id,
                page_index = ?page_index,
                pages_to_load,
                "query started"
            ),
            Diagnostic::VariantResolved { report_id, kind } => {
                tracing::debug!(report_id = %report_id, %kind, "report variant resolved")
            }
            Diagnostic::PageCounts {
                report_id,
                native_pages,
                total_rows,
                output_pages,
                pages_to_load,
            } => tracing::debug!(
                report_id = %report_id,
                native_pages,
                total_rows,
                output_pages,
                pages_to_load,
                "page counts computed"
            ),
            Diagnostic::NativePageFetched {
                report_id,
                native_page,
                records,
            } => tracing::trace!(report_id = %report_id, native_page, records, "native page fetched"),
            Diagnostic::RequestFinished {
                operation,
                report_id,
                rows,
            } => tracing::info!(%operation, report_id = %report_id, rows, "query finished"),
            Diagnostic::RequestFailed {
                operation,
                report_id,
                code,
                message,
            } => tracing::error!(
                %operation,
                report_id = ?report_id,
                code,
                message = %message,
                "query failed"
            ),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl DiagnosticsSink for NoopDiagnostics {
    fn record(&self, _event: Diagnostic) {}
}

/// Keeps every event in memory, for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn record(&self, event: Diagnostic) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
