//! Metadata and data queries over a report store.
//!
//! # Request lifecycle
//!
//! ```text
//! params ─▶ parse ─▶ classify id ─▶ open report ─▶ page count
//!                                                     │
//!                         metadata ◀──────────────────┤
//!                                                     ▼
//!                         data ◀── flatten ◀── fetch native pages in window
//! ```
//!
//! Every failure surfaces as a [`QueryError`] and is rendered to callers as
//! an [`ErrorResponse`]. Nothing is retried and no partial result is
//! returned.

mod engine;
mod error;
mod request;
mod result;

pub use engine::{QueryEngine, QueryOptions};
pub use error::{ErrorResponse, QueryError};
pub use request::{
    DataRequest, MetadataRequest, QueryOperation, RequestParams, PARAM_PAGES_TO_LOAD,
    PARAM_PAGE_INDEX, PARAM_REPORT_ID,
};
pub use result::{QueryResponse, QueryResult};
