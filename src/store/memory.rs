//! In-memory report store for fixtures and tests.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::report::{ColumnDef, ReportDefinition, ReportKind, ReportRef};
use crate::source::{
    DatasetRecord, PagedRun, RawPage, ReportStore, SearchRow, StoreError, StoreResult,
};

/// A fixture report: its definition and pre-paged rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryReport {
    #[serde(flatten)]
    pub definition: ReportDefinition,
    /// Native pages in order.
    #[serde(default)]
    pub pages: Vec<RawPage>,
    /// Reported row count; defaults to the number of records across pages.
    #[serde(default)]
    pub total_rows: Option<u64>,
}

impl MemoryReport {
    /// A dataset whose rows are split into native pages of `page_size`.
    pub fn dataset(
        id: impl Into<String>,
        name: impl Into<String>,
        report_type: impl Into<String>,
        columns: Vec<ColumnDef>,
        rows: Vec<DatasetRecord>,
        page_size: usize,
    ) -> Self {
        let pages = rows
            .chunks(page_size.max(1))
            .map(|chunk| RawPage::Dataset {
                columns: columns.clone(),
                results: chunk.to_vec(),
            })
            .collect();
        Self {
            definition: ReportDefinition {
                id: id.into(),
                kind: ReportKind::Dataset,
                name: name.into(),
                report_type: report_type.into(),
                columns: Vec::new(),
            },
            pages,
            total_rows: None,
        }
    }

    /// A saved search whose rows are split into native pages of `page_size`.
    pub fn search(
        id: impl Into<String>,
        title: impl Into<String>,
        search_type: impl Into<String>,
        columns: Vec<ColumnDef>,
        rows: Vec<SearchRow>,
        page_size: usize,
    ) -> Self {
        let pages = rows
            .chunks(page_size.max(1))
            .map(|chunk| RawPage::Search {
                results: chunk.to_vec(),
            })
            .collect();
        Self {
            definition: ReportDefinition {
                id: id.into(),
                kind: ReportKind::Search,
                name: title.into(),
                report_type: search_type.into(),
                columns,
            },
            pages,
            total_rows: None,
        }
    }

    pub fn with_total_rows(mut self, total_rows: u64) -> Self {
        self.total_rows = Some(total_rows);
        self
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
            .unwrap_or_else(|| self.pages.iter().map(|p| p.len() as u64).sum())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    reports: Vec<MemoryReport>,
}

/// Counts of store operations performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub loads: usize,
    pub runs: usize,
    pub fetches: usize,
}

impl StoreCalls {
    pub fn total(&self) -> usize {
        self.loads + self.runs + self.fetches
    }
}

/// A [`ReportStore`] over fixture reports held in memory.
///
/// Fixture pages are served as-is; the requested native page size is only
/// recorded on the run.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: HashMap<String, MemoryReport>,
    loads: AtomicUsize,
    runs: AtomicUsize,
    fetches: AtomicUsize,
    fetched_pages: Mutex<Vec<usize>>,
    fail_fetch_at: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a JSON file of the form `{"reports": [...]}`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| StoreError::FixtureRead {
            path: path.to_path_buf(),
            source,
        })?;
        let fixtures: FixtureFile =
            serde_json::from_str(&content).map_err(|source| StoreError::FixtureParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut store = Self::new();
        for report in fixtures.reports {
            store.insert(report);
        }
        Ok(store)
    }

    pub fn insert(&mut self, report: MemoryReport) {
        self.reports.insert(report.definition.id.clone(), report);
    }

    pub fn with_report(mut self, report: MemoryReport) -> Self {
        self.insert(report);
        self
    }

    /// Fail every fetch of native page `index`.
    pub fn failing_fetch_at(mut self, index: usize) -> Self {
        self.fail_fetch_at = Some(index);
        self
    }

    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            loads: self.loads.load(Ordering::SeqCst),
            runs: self.runs.load(Ordering::SeqCst),
            fetches: self.fetches.load(Ordering::SeqCst),
        }
    }

    /// Native page ordinals fetched so far, in order.
    pub fn fetched_pages(&self) -> Vec<usize> {
        self.fetched_pages
            .lock()
            .map(|pages| pages.clone())
            .unwrap_or_default()
    }

    fn report(&self, id: &str) -> StoreResult<&MemoryReport> {
        self.reports
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn load(&self, report: &ReportRef) -> StoreResult<ReportDefinition> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let fixture = self.report(&report.id)?;
        if fixture.definition.kind != report.kind {
            return Err(StoreError::NotFound(report.id.clone()));
        }
        Ok(fixture.definition.clone())
    }

    async fn run_paged(
        &self,
        report: &ReportDefinition,
        page_size: usize,
    ) -> StoreResult<PagedRun> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let fixture = self.report(&report.id)?;
        Ok(PagedRun {
            run_id: report.id.clone(),
            page_count: fixture.pages.len(),
            total_rows: fixture.total_rows(),
            page_size,
        })
    }

    async fn fetch_page(&self, run: &PagedRun, index: usize) -> StoreResult<RawPage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut pages) = self.fetched_pages.lock() {
            pages.push(index);
        }

        if self.fail_fetch_at == Some(index) {
            return Err(StoreError::Unavailable(format!(
                "injected failure fetching page {}",
                index
            )));
        }

        let fixture = self
            .reports
            .get(&run.run_id)
            .ok_or_else(|| StoreError::UnknownRun(run.run_id.clone()))?;
        fixture
            .pages
            .get(index)
            .cloned()
            .ok_or(StoreError::PageOutOfRange {
                index,
                page_count: fixture.pages.len(),
            })
    }
}
