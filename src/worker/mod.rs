//! Communication with an external report store bridge process.
//!
//! The bridge owns authentication and transport to the system of record. This
//! crate spawns it as a child process and talks NDJSON over its stdin/stdout.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     reportpage (Rust + Tokio)                   │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                    WorkerClient (Async)                   │  │
//! │  │  - Spawns the store bridge as a child process             │  │
//! │  │  - NDJSON protocol over stdin/stdout                      │  │
//! │  │  - Request IDs correlate responses                        │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │               stdin (NDJSON) │ stdout (NDJSON)                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │        Store bridge (report.load / run_paged / fetch_page)      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use reportpage::worker::{WorkerClient, protocol::*};
//!
//! let client = WorkerClient::spawn("./reportpage-store").await?;
//! let report: ReportDefinition = client.request(
//!     methods::LOAD_REPORT,
//!     LoadReportParams { id: "custdataset_orders".into(), kind: ReportKind::Dataset },
//! ).await?;
//! ```

mod client;
mod error;
pub mod protocol;

pub use client::{WorkerClient, DEFAULT_TIMEOUT_SECS};
pub use error::{WorkerError, WorkerResult};
