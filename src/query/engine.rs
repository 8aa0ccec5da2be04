//! The query engine: windowing, fetching and flattening for one request.

use std::num::NonZeroUsize;
use std::sync::Arc;

use super::error::QueryError;
use super::request::{
    DataRequest, MetadataRequest, QueryOperation, RequestParams, PARAM_PAGES_TO_LOAD,
};
use super::result::QueryResult;
use crate::diagnostics::{Diagnostic, DiagnosticsSink, TracingDiagnostics};
use crate::flatten::{FlatRow, KeyCollision, RowFlattener};
use crate::report::{ReportDefinition, ReportRef};
use crate::source::{PagedRun, ReportStore, SourceAdapter};
use crate::window::{page_index_range, PageWindower};

/// Default upper bound on `pagestoload`.
pub const DEFAULT_MAX_PAGES_TO_LOAD: usize = 50;

/// Tunables for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Largest accepted output page size, in native pages.
    pub max_pages_to_load: usize,
    /// Render an empty report's page range as `0--1` rather than `""`.
    pub legacy_empty_range: bool,
    /// Policy for column labels that sanitise to the same key.
    pub key_collision: KeyCollision,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_pages_to_load: DEFAULT_MAX_PAGES_TO_LOAD,
            legacy_empty_range: true,
            key_collision: KeyCollision::Overwrite,
        }
    }
}

/// Serves metadata and data queries against a report store.
///
/// The engine holds no per-request state; every call loads the report afresh.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use reportpage::query::{QueryEngine, RequestParams};
/// use reportpage::store::MemoryStore;
///
/// let engine = QueryEngine::new(Arc::new(MemoryStore::from_file("fixtures.json")?));
/// let params = RequestParams::new("custdataset_orders")
///     .with_page_index(0)
///     .with_pages_to_load(2);
/// let page = engine.data_from_params(&params).await?;
/// ```
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn ReportStore>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    options: QueryOptions,
}

/// A report opened and counted, ready for windowing.
struct OpenedReport {
    adapter: SourceAdapter,
    run: PagedRun,
    windower: PageWindower,
}

impl OpenedReport {
    fn definition(&self) -> &ReportDefinition {
        self.adapter.report()
    }
}

impl QueryEngine {
    /// Create an engine that reports diagnostics through `tracing`.
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self {
            store,
            diagnostics: Arc::new(TracingDiagnostics),
            options: QueryOptions::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Parse `params` and run a metadata query.
    pub async fn metadata_from_params(
        &self,
        params: &RequestParams,
    ) -> Result<QueryResult, QueryError> {
        let result = match MetadataRequest::from_params(params) {
            Ok(request) => self.run_metadata(&request).await,
            Err(err) => Err(err),
        };
        self.finish(QueryOperation::Metadata, params.report_id(), result)
    }

    /// Parse `params` and run a data query.
    pub async fn data_from_params(&self, params: &RequestParams) -> Result<QueryResult, QueryError> {
        let result = match DataRequest::from_params(params) {
            Ok(request) => self.run_data(&request).await,
            Err(err) => Err(err),
        };
        self.finish(QueryOperation::Data, params.report_id(), result)
    }

    /// Report name, type and row/page counts, without fetching rows.
    pub async fn metadata(&self, request: &MetadataRequest) -> Result<QueryResult, QueryError> {
        let result = self.run_metadata(request).await;
        self.finish(
            QueryOperation::Metadata,
            Some(request.report_id.clone()),
            result,
        )
    }

    /// One output page of flattened rows, plus the metadata.
    pub async fn data(&self, request: &DataRequest) -> Result<QueryResult, QueryError> {
        let result = self.run_data(request).await;
        self.finish(QueryOperation::Data, Some(request.report_id.clone()), result)
    }

    async fn run_metadata(&self, request: &MetadataRequest) -> Result<QueryResult, QueryError> {
        self.diagnostics.record(Diagnostic::RequestStarted {
            operation: QueryOperation::Metadata,
            report_id: request.report_id.clone(),
            page_index: None,
            pages_to_load: request.pages_to_load.get(),
        });

        let opened = self
            .open(&request.report_id, request.pages_to_load)
            .await?;
        Ok(self.build_result(&opened, None))
    }

    async fn run_data(&self, request: &DataRequest) -> Result<QueryResult, QueryError> {
        self.diagnostics.record(Diagnostic::RequestStarted {
            operation: QueryOperation::Data,
            report_id: request.report_id.clone(),
            page_index: Some(request.page_index),
            pages_to_load: request.pages_to_load.get(),
        });

        let opened = self
            .open(&request.report_id, request.pages_to_load)
            .await?;

        let total_pages = opened.windower.total_output_pages();
        if request.page_index >= total_pages {
            return Err(QueryError::PageIndexOutOfRange {
                page_index: request.page_index,
                total_pages,
            });
        }

        let window = opened.windower.window(request.page_index);
        let store = self.store.as_ref();
        let mut flattener = RowFlattener::new(self.options.key_collision);
        let mut rows = Vec::new();

        for native_index in window.native_pages() {
            let page = opened
                .adapter
                .fetch_native_page(store, &opened.run, native_index)
                .await?;
            self.diagnostics.record(Diagnostic::NativePageFetched {
                report_id: request.report_id.clone(),
                native_page: native_index,
                records: page.len(),
            });
            rows.extend(flattener.flatten_page(&page)?);
        }

        Ok(self.build_result(&opened, Some((request.page_index, rows))))
    }

    /// Validate the page size, classify the id, load the report and count
    /// its pages.
    async fn open(
        &self,
        report_id: &str,
        pages_to_load: NonZeroUsize,
    ) -> Result<OpenedReport, QueryError> {
        if pages_to_load.get() > self.options.max_pages_to_load {
            return Err(QueryError::InvalidParameter {
                name: PARAM_PAGES_TO_LOAD,
                value: pages_to_load.to_string(),
                expected: "at most the configured max_pages_to_load",
            });
        }

        let report = ReportRef::parse(report_id)
            .ok_or_else(|| QueryError::InvalidReportId(report_id.to_string()))?;
        self.diagnostics.record(Diagnostic::VariantResolved {
            report_id: report.id.clone(),
            kind: report.kind,
        });

        let store = self.store.as_ref();
        let adapter = SourceAdapter::open(store, &report).await?;
        let run = adapter.page_count(store).await?;
        let windower = PageWindower::new(run.page_count, pages_to_load);

        self.diagnostics.record(Diagnostic::PageCounts {
            report_id: report.id.clone(),
            native_pages: run.page_count,
            total_rows: run.total_rows,
            output_pages: windower.total_output_pages(),
            pages_to_load: pages_to_load.get(),
        });

        Ok(OpenedReport {
            adapter,
            run,
            windower,
        })
    }

    fn build_result(
        &self,
        opened: &OpenedReport,
        page: Option<(usize, Vec<FlatRow>)>,
    ) -> QueryResult {
        let definition = opened.definition();
        let total_pages = opened.windower.total_output_pages();
        let (current_page_index, data) = match page {
            Some((index, rows)) => (Some(index), Some(rows)),
            None => (None, None),
        };

        QueryResult {
            name: definition.name.clone(),
            report_type: definition.report_type.clone(),
            total_rows: opened.run.total_rows,
            total_pages,
            page_index_range: page_index_range(total_pages, self.options.legacy_empty_range),
            current_page_index,
            data,
        }
    }

    /// Record the terminal diagnostic for a request and pass its result on.
    fn finish(
        &self,
        operation: QueryOperation,
        report_id: Option<String>,
        result: Result<QueryResult, QueryError>,
    ) -> Result<QueryResult, QueryError> {
        match &result {
            Ok(output) => self.diagnostics.record(Diagnostic::RequestFinished {
                operation,
                report_id: report_id.unwrap_or_default(),
                rows: output.data.as_ref().map_or(0, Vec::len),
            }),
            Err(err) => self.diagnostics.record(Diagnostic::RequestFailed {
                operation,
                report_id,
                code: err.code(),
                message: err.to_string(),
            }),
        }
        result
    }
}
