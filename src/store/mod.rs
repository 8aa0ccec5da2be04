//! Concrete [`ReportStore`](crate::source::ReportStore) implementations.
//!
//! - [`MemoryStore`]: fixture reports held in memory, loadable from JSON.
//! - [`WorkerReportStore`]: forwards to an external store bridge process.

use std::sync::Arc;

use crate::config::{StoreBackend, StoreSettings};
use crate::source::{ReportStore, StoreError, StoreResult};
use crate::worker::WorkerClient;

mod memory;
mod worker_store;

pub use memory::{MemoryReport, MemoryStore, StoreCalls};
pub use worker_store::WorkerReportStore;

/// Open the store described by `settings`.
///
/// The worker backend spawns the bridge process; it lives as long as the
/// returned store.
pub async fn open(settings: &StoreSettings) -> StoreResult<Arc<dyn ReportStore>> {
    match settings.backend {
        StoreBackend::Fixtures => {
            let path = settings.fixtures.as_deref().ok_or_else(|| {
                StoreError::Unavailable("no fixtures file configured".to_string())
            })?;
            Ok(Arc::new(MemoryStore::from_file(path)?))
        }
        StoreBackend::Worker => {
            let client = WorkerClient::spawn_with_settings(&settings.worker).await?;
            Ok(Arc::new(WorkerReportStore::with_client(client)))
        }
    }
}
