//! Dataset and Search adapters behind one interface.

use super::error::{StoreError, StoreResult};
use super::store::{DatasetRecord, PagedRun, RawPage, ReportStore, SearchRow};
use crate::report::{ColumnDef, ReportDefinition, ReportKind, ReportRef};
use crate::window::NATIVE_PAGE_SIZE;

/// A report opened for one request, tagged by shape.
#[derive(Debug, Clone)]
pub enum SourceAdapter {
    Dataset(ReportDefinition),
    Search(ReportDefinition),
}

/// One native page, normalised for flattening.
#[derive(Debug, Clone, PartialEq)]
pub struct NativePage {
    /// Absolute native page ordinal.
    pub index: usize,
    /// Column schema for the records on this page.
    pub columns: Vec<ColumnDef>,
    pub records: NativeRecords,
}

impl NativePage {
    pub fn len(&self) -> usize {
        match &self.records {
            NativeRecords::Positional(rows) => rows.len(),
            NativeRecords::Paired(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Raw records in the shape of their source.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeRecords {
    /// Dataset rows: values indexed by column position.
    Positional(Vec<DatasetRecord>),
    /// Search rows: text/raw pairs addressed by column.
    Paired(Vec<SearchRow>),
}

impl SourceAdapter {
    /// Load the report behind `report` and wrap it in the matching variant.
    pub async fn open<S>(store: &S, report: &ReportRef) -> StoreResult<Self>
    where
        S: ReportStore + ?Sized,
    {
        let definition = store.load(report).await?;
        Ok(match report.kind {
            ReportKind::Dataset => Self::Dataset(definition),
            ReportKind::Search => Self::Search(definition),
        })
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            Self::Dataset(_) => ReportKind::Dataset,
            Self::Search(_) => ReportKind::Search,
        }
    }

    pub fn report(&self) -> &ReportDefinition {
        match self {
            Self::Dataset(report) | Self::Search(report) => report,
        }
    }

    /// Open the store's paged cursor at the native page size.
    ///
    /// The returned run carries both the native page count and the total row
    /// count.
    pub async fn page_count<S>(&self, store: &S) -> StoreResult<PagedRun>
    where
        S: ReportStore + ?Sized,
    {
        store.run_paged(self.report(), NATIVE_PAGE_SIZE).await
    }

    /// Fetch native page `index` from `run`.
    ///
    /// Dataset pages carry their own column metadata; search pages take the
    /// report's static columns.
    pub async fn fetch_native_page<S>(
        &self,
        store: &S,
        run: &PagedRun,
        index: usize,
    ) -> StoreResult<NativePage>
    where
        S: ReportStore + ?Sized,
    {
        let raw = store.fetch_page(run, index).await?;
        match (self, raw) {
            (Self::Dataset(_), RawPage::Dataset { columns, results }) => Ok(NativePage {
                index,
                columns,
                records: NativeRecords::Positional(results),
            }),
            (Self::Search(report), RawPage::Search { results }) => Ok(NativePage {
                index,
                columns: report.columns.clone(),
                records: NativeRecords::Paired(results),
            }),
            (adapter, _) => Err(StoreError::ShapeMismatch {
                report_id: adapter.report().id.clone(),
                expected: adapter.kind(),
            }),
        }
    }
}
