//! The report store contract and its wire types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::StoreResult;
use crate::report::{ColumnDef, ReportDefinition, ReportRef};

/// An external store that can load reports and page through their rows.
///
/// Implementations may block on I/O. Callers issue requests strictly one at a
/// time per query and never retry.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Load a report definition by id.
    ///
    /// Fails with [`StoreError::NotFound`](super::StoreError::NotFound) when
    /// the id cannot be resolved.
    async fn load(&self, report: &ReportRef) -> StoreResult<ReportDefinition>;

    /// Open a paged cursor over the report at `page_size` records per page.
    async fn run_paged(&self, report: &ReportDefinition, page_size: usize)
        -> StoreResult<PagedRun>;

    /// Fetch one native page by absolute ordinal.
    async fn fetch_page(&self, run: &PagedRun, index: usize) -> StoreResult<RawPage>;
}

/// A paged cursor opened by [`ReportStore::run_paged`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedRun {
    /// Store-side handle used to fetch pages from this run.
    pub run_id: String,
    /// Number of native pages (the store's page ranges).
    pub page_count: usize,
    /// Total number of records across all pages.
    pub total_rows: u64,
    /// Records per native page the run was opened with.
    pub page_size: usize,
}

/// A native page as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RawPage {
    Dataset {
        /// Column metadata for this page.
        columns: Vec<ColumnDef>,
        results: Vec<DatasetRecord>,
    },
    Search {
        results: Vec<SearchRow>,
    },
}

impl RawPage {
    pub fn len(&self) -> usize {
        match self {
            Self::Dataset { results, .. } => results.len(),
            Self::Search { results } => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One dataset row: values in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

impl DatasetRecord {
    pub fn new(values: Vec<serde_json::Value>) -> Self {
        Self { values }
    }
}

/// One search row: a cell per column, keyed by [`ColumnDef::cell_ref`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRow {
    #[serde(default)]
    pub cells: HashMap<String, SearchCell>,
}

impl SearchRow {
    pub fn with_cell(mut self, column: impl Into<String>, cell: SearchCell) -> Self {
        self.cells.insert(column.into(), cell);
        self
    }

    pub fn cell(&self, column: &ColumnDef) -> Option<&SearchCell> {
        self.cells.get(&column.cell_ref())
    }
}

/// A search cell: the display text and the raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCell {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl SearchCell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            value: None,
        }
    }

    pub fn value(value: impl Into<serde_json::Value>) -> Self {
        Self {
            text: None,
            value: Some(value.into()),
        }
    }

    pub fn with_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}
