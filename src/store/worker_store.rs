//! ReportStore backed by the NDJSON store bridge.

use std::sync::Arc;

use async_trait::async_trait;

use crate::report::{ReportDefinition, ReportRef};
use crate::source::{PagedRun, RawPage, ReportStore, StoreError, StoreResult};
use crate::worker::protocol::{methods, FetchPageParams, LoadReportParams, RunPagedParams};
use crate::worker::{WorkerClient, WorkerError};

/// ReportStore implementation that uses the WorkerClient.
///
/// # Example
///
/// ```ignore
/// use reportpage::worker::WorkerClient;
/// use reportpage::store::WorkerReportStore;
///
/// let client = WorkerClient::spawn("./reportpage-store").await?;
/// let store = WorkerReportStore::new(Arc::new(client));
/// ```
pub struct WorkerReportStore {
    client: Arc<WorkerClient>,
}

impl WorkerReportStore {
    pub fn new(client: Arc<WorkerClient>) -> Self {
        Self { client }
    }

    /// Convenience constructor that wraps an owned client in an Arc.
    pub fn with_client(client: WorkerClient) -> Self {
        Self::new(Arc::new(client))
    }
}

#[async_trait]
impl ReportStore for WorkerReportStore {
    async fn load(&self, report: &ReportRef) -> StoreResult<ReportDefinition> {
        self.client
            .request(
                methods::LOAD_REPORT,
                LoadReportParams {
                    id: report.id.clone(),
                    kind: report.kind,
                },
            )
            .await
            .map_err(|err| match err {
                WorkerError::ReportNotFound(_) => StoreError::NotFound(report.id.clone()),
                other => StoreError::Worker(other),
            })
    }

    async fn run_paged(
        &self,
        report: &ReportDefinition,
        page_size: usize,
    ) -> StoreResult<PagedRun> {
        let run: PagedRun = self
            .client
            .request(
                methods::RUN_PAGED,
                RunPagedParams {
                    report_id: report.id.clone(),
                    kind: report.kind,
                    page_size,
                },
            )
            .await?;
        Ok(run)
    }

    async fn fetch_page(&self, run: &PagedRun, index: usize) -> StoreResult<RawPage> {
        self.client
            .request(
                methods::FETCH_PAGE,
                FetchPageParams {
                    run_id: run.run_id.clone(),
                    index,
                },
            )
            .await
            .map_err(|err| match err {
                WorkerError::PageOutOfRange(_) => StoreError::PageOutOfRange {
                    index,
                    page_count: run.page_count,
                },
                other => StoreError::Worker(other),
            })
    }
}
