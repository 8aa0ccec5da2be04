//! # reportpage
//!
//! Re-exposes large tabular reports (datasets and saved searches) through a
//! paged request/response API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Transport (CLI, HTTP) ─ RequestParams             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [query]
//! ┌─────────────────────────────────────────────────────────┐
//! │   QueryEngine: validate ─ classify ─ open ─ count        │
//! │                └─ DiagnosticsSink (lifecycle events)     │
//! └─────────────────────────────────────────────────────────┘
//!          │                     │                    │
//!          ▼ [window]            ▼ [source]           ▼ [flatten]
//! ┌────────────────┐   ┌────────────────────┐   ┌──────────────────┐
//! │ PageWindower   │   │ SourceAdapter      │   │ RowFlattener     │
//! │ native ⇄ output│   │ Dataset | Search   │   │ ColumnKey/FlatRow│
//! └────────────────┘   └────────────────────┘   └──────────────────┘
//!                                │
//!                                ▼ [store]
//! ┌─────────────────────────────────────────────────────────┐
//! │   ReportStore: MemoryStore | WorkerReportStore (NDJSON)  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The store pages at a fixed 1000 records ([`window::NATIVE_PAGE_SIZE`]).
//! Callers choose how many native pages make one output page.

pub mod config;
pub mod diagnostics;
pub mod flatten;
pub mod logging;
pub mod query;
pub mod report;
pub mod source;
pub mod store;
pub mod window;
pub mod worker;

#[cfg(feature = "server")]
pub mod web;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::diagnostics::{Diagnostic, DiagnosticsSink, TracingDiagnostics};
    pub use crate::flatten::{ColumnKey, FlatRow, KeyCollision, RowFlattener};
    pub use crate::query::{
        DataRequest, ErrorResponse, MetadataRequest, QueryEngine, QueryError, QueryOptions,
        QueryResponse, QueryResult, RequestParams,
    };
    pub use crate::report::{ColumnDef, ReportDefinition, ReportKind, ReportRef};
    pub use crate::source::{ReportStore, SourceAdapter, StoreError};
    pub use crate::window::{PageWindower, NATIVE_PAGE_SIZE};
}

pub use query::{QueryEngine, QueryError, QueryResult, RequestParams};
pub use report::ReportKind;
