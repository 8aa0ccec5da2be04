//! Source adapters over an external report store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SourceAdapter                            │
//! │  ┌─────────────────────────────┬─────────────────────────────┐  │
//! │  │  Dataset                    │  Search                     │  │
//! │  │  - positional value arrays  │  - text/raw value pairs     │  │
//! │  │  - schema from first page   │  - schema from definition   │  │
//! │  └─────────────────────────────┴─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 ReportStore (load / run_paged / fetch_page)     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is cached: each request opens the report, runs one paged cursor
//! and fetches native pages by absolute ordinal.

mod adapter;
mod error;
mod store;

pub use adapter::{NativePage, NativeRecords, SourceAdapter};
pub use error::{StoreError, StoreResult};
pub use store::{DatasetRecord, PagedRun, RawPage, ReportStore, SearchCell, SearchRow};
