//! Query results and the response envelope.

use serde::Serialize;

use super::error::{ErrorResponse, QueryError};
use crate::flatten::FlatRow;

/// Aggregate report info, plus one output page of rows for data queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    #[serde(rename = "analyticsname")]
    pub name: String,
    #[serde(rename = "analyticstype")]
    pub report_type: String,
    #[serde(rename = "totalrows")]
    pub total_rows: u64,
    #[serde(rename = "totalpages")]
    pub total_pages: usize,
    #[serde(rename = "pageindexrange")]
    pub page_index_range: String,
    #[serde(rename = "currentpageindex", skip_serializing_if = "Option::is_none")]
    pub current_page_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<FlatRow>>,
}

/// What a transport sends back: a result or an error, never anything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Ok(QueryResult),
    Err(ErrorResponse),
}

impl QueryResponse {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }
}

impl From<Result<QueryResult, QueryError>> for QueryResponse {
    fn from(result: Result<QueryResult, QueryError>) -> Self {
        match result {
            Ok(result) => Self::Ok(result),
            Err(err) => Self::Err(err.to_response()),
        }
    }
}
