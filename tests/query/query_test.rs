//! End-to-end metadata and data queries over the in-memory store.

use std::sync::Arc;

use reportpage::diagnostics::{Diagnostic, RecordingDiagnostics};
use reportpage::flatten::KeyCollision;
use reportpage::query::{
    QueryEngine, QueryError, QueryOptions, QueryResponse, RequestParams,
};
use reportpage::report::{ColumnDef, ReportKind};
use reportpage::source::{DatasetRecord, SearchCell, SearchRow};
use reportpage::store::{MemoryReport, MemoryStore};
use serde_json::json;

// ============================================================================
// Fixtures
// ============================================================================

/// Seven orders split over four native pages of two.
fn orders_dataset() -> MemoryReport {
    let rows = (0..7)
        .map(|i| DatasetRecord::new(vec![json!(format!("Customer {}", i)), json!(null), json!(i)]))
        .collect();
    MemoryReport::dataset(
        "custdataset_orders",
        "Orders",
        "transaction",
        vec![
            ColumnDef::labeled("Customer Name"),
            ColumnDef::labeled("Notes"),
            ColumnDef::labeled("Qty"),
        ],
        rows,
        2,
    )
}

fn open_orders_search() -> MemoryReport {
    let rows = vec![
        SearchRow::default()
            .with_cell("status", SearchCell::text("Open").with_value("1"))
            .with_cell("amount", SearchCell::value("5")),
        SearchRow::default().with_cell("status", SearchCell::value("2")),
    ];
    MemoryReport::search(
        "customsearch_open",
        "Open Orders",
        "salesorder",
        vec![
            ColumnDef::named("status").with_label("Status"),
            ColumnDef::named("amount").with_label("Amount"),
        ],
        rows,
        1,
    )
}

fn empty_dataset() -> MemoryReport {
    MemoryReport::dataset(
        "custdataset_empty",
        "Nothing",
        "transaction",
        vec![ColumnDef::labeled("Id")],
        vec![],
        10,
    )
}

fn store() -> Arc<MemoryStore> {
    Arc::new(
        MemoryStore::new()
            .with_report(orders_dataset())
            .with_report(open_orders_search())
            .with_report(empty_dataset()),
    )
}

fn data_params(id: &str, page_index: usize, pages_to_load: usize) -> RequestParams {
    RequestParams::new(id)
        .with_page_index(page_index)
        .with_pages_to_load(pages_to_load)
}

// ============================================================================
// Request validation
// ============================================================================

#[tokio::test]
async fn test_missing_pages_to_load_makes_no_store_call() {
    let store = store();
    let engine = QueryEngine::new(store.clone());

    let err = engine
        .metadata_from_params(&RequestParams::new("custdataset123"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "MISSING_PAGESTOLOAD");
    assert_eq!(store.calls().total(), 0);
}

#[tokio::test]
async fn test_data_checks_page_index_before_pages_to_load() {
    let store = store();
    let engine = QueryEngine::new(store.clone());

    let err = engine
        .data_from_params(&RequestParams::new("custdataset_orders"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "MISSING_PAGEINDEX");
    assert_eq!(store.calls().total(), 0);
}

#[tokio::test]
async fn test_missing_report_id() {
    let engine = QueryEngine::new(store());
    let err = engine
        .metadata_from_params(&RequestParams::default().with_pages_to_load(1))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "MISSING_REPORTID");
}

#[tokio::test]
async fn test_zero_pages_to_load_is_invalid() {
    let store = store();
    let engine = QueryEngine::new(store.clone());
    let err = engine
        .metadata_from_params(&RequestParams::new("custdataset_orders").with_pages_to_load(0))
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::InvalidParameter { .. }));
    assert_eq!(store.calls().total(), 0);
}

#[tokio::test]
async fn test_pages_to_load_above_limit() {
    let store = store();
    let engine = QueryEngine::new(store.clone()).with_options(QueryOptions {
        max_pages_to_load: 3,
        ..QueryOptions::default()
    });
    let err = engine
        .metadata_from_params(&RequestParams::new("custdataset_orders").with_pages_to_load(4))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_PARAMETER");
    assert_eq!(store.calls().total(), 0);
}

#[tokio::test]
async fn test_invalid_report_id() {
    let store = store();
    let engine = QueryEngine::new(store.clone());
    let err = engine
        .metadata_from_params(&RequestParams::new("abc").with_pages_to_load(1))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_REPORTID");
    assert_eq!(
        err.to_string(),
        "The dataset/saved search id is invalid: abc"
    );
    assert_eq!(store.calls().total(), 0);
}

#[tokio::test]
async fn test_string_params_from_query_string() {
    let engine = QueryEngine::new(store());
    let params = RequestParams::from_pairs([
        ("analyticsreportid", "custdataset_orders"),
        ("pageindex", "0"),
        ("pagestoload", " 2 "),
        ("ignored", "x"),
    ]);

    let result = engine.data_from_params(&params).await.unwrap();
    assert_eq!(result.current_page_index, Some(0));
    assert_eq!(result.data.map(|rows| rows.len()), Some(4));
}

// ============================================================================
// Metadata
// ============================================================================

#[tokio::test]
async fn test_metadata_counts() {
    let store = store();
    let engine = QueryEngine::new(store.clone());
    let params = RequestParams::new("custdataset_orders").with_pages_to_load(3);

    let result = engine.metadata_from_params(&params).await.unwrap();

    insta::assert_snapshot!(
        serde_json::to_string_pretty(&QueryResponse::from(Ok(result))).unwrap(),
        @r#"
    {
      "analyticsname": "Orders",
      "analyticstype": "transaction",
      "totalrows": 7,
      "totalpages": 2,
      "pageindexrange": "0-1"
    }
    "#
    );
    assert_eq!(store.calls().fetches, 0);
}

#[tokio::test]
async fn test_metadata_unknown_report() {
    let engine = QueryEngine::new(store());
    let err = engine
        .metadata_from_params(&RequestParams::new("customsearch_gone").with_pages_to_load(1))
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::ReportNotFound(ref id) if id == "customsearch_gone"));
    assert!(!err.is_request_error());
}

#[tokio::test]
async fn test_empty_report_range() {
    let engine = QueryEngine::new(store());
    let params = RequestParams::new("custdataset_empty").with_pages_to_load(2);

    let result = engine.metadata_from_params(&params).await.unwrap();
    assert_eq!(result.total_pages, 0);
    assert_eq!(result.total_rows, 0);
    assert_eq!(result.page_index_range, "0--1");

    let engine = engine.with_options(QueryOptions {
        legacy_empty_range: false,
        ..QueryOptions::default()
    });
    let result = engine.metadata_from_params(&params).await.unwrap();
    assert_eq!(result.page_index_range, "");
}

// ============================================================================
// Data
// ============================================================================

#[tokio::test]
async fn test_dataset_page_zero() {
    let store = store();
    let engine = QueryEngine::new(store.clone());

    let result = engine
        .data_from_params(&data_params("custdataset_orders", 0, 1))
        .await
        .unwrap();
    let rows = result.data.unwrap();

    assert_eq!(result.current_page_index, Some(0));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("customername"), Some("Customer 0"));
    assert_eq!(rows[0].get("notes"), Some(""));
    assert_eq!(rows[1].get("qty"), Some("1"));
    assert_eq!(store.fetched_pages(), vec![0]);
}

#[tokio::test]
async fn test_data_fetches_window_in_order() {
    let store = store();
    let engine = QueryEngine::new(store.clone());

    let result = engine
        .data_from_params(&data_params("custdataset_orders", 1, 3))
        .await
        .unwrap();
    let rows = result.data.unwrap();

    // Native pages 3.. hold the seventh record only.
    assert_eq!(store.fetched_pages(), vec![3]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("qty"), Some("6"));

    engine
        .data_from_params(&data_params("custdataset_orders", 0, 3))
        .await
        .unwrap();
    assert_eq!(store.fetched_pages(), vec![3, 0, 1, 2]);
}

#[tokio::test]
async fn test_search_data() {
    let engine = QueryEngine::new(store());
    let result = engine
        .data_from_params(&data_params("customsearch_open", 0, 2))
        .await
        .unwrap();

    assert_eq!(result.name, "Open Orders");
    assert_eq!(result.report_type, "salesorder");
    let rows = result.data.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("status"), Some("Open"));
    assert_eq!(rows[0].get("amount"), Some("5"));
    assert_eq!(rows[1].get("status"), Some("2"));
    assert_eq!(rows[1].get("amount"), Some(""));
}

#[tokio::test]
async fn test_page_index_out_of_range() {
    let store = store();
    let engine = QueryEngine::new(store.clone());

    let err = engine
        .data_from_params(&data_params("custdataset_orders", 2, 3))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        QueryError::PageIndexOutOfRange { page_index: 2, total_pages: 2 }
    ));
    assert_eq!(store.calls().fetches, 0);
}

#[tokio::test]
async fn test_data_on_empty_report() {
    let engine = QueryEngine::new(store());
    let err = engine
        .data_from_params(&data_params("custdataset_empty", 0, 1))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PAGE_INDEX_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_fetch_failure_aborts_request() {
    let store = Arc::new(
        MemoryStore::new()
            .with_report(orders_dataset())
            .failing_fetch_at(1),
    );
    let engine = QueryEngine::new(store.clone());

    let err = engine
        .data_from_params(&data_params("custdataset_orders", 0, 3))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "STORE_FETCH_FAILURE");
    assert_eq!(store.fetched_pages(), vec![0, 1]);
}

#[tokio::test]
async fn test_reject_colliding_keys() {
    let report = MemoryReport::dataset(
        "custdataset_dupes",
        "Dupes",
        "transaction",
        vec![ColumnDef::labeled("Order Date"), ColumnDef::labeled("orderdate")],
        vec![DatasetRecord::new(vec![json!("a"), json!("b")])],
        10,
    );
    let engine = QueryEngine::new(Arc::new(MemoryStore::new().with_report(report)))
        .with_options(QueryOptions {
            key_collision: KeyCollision::Reject,
            ..QueryOptions::default()
        });

    let err = engine
        .data_from_params(&data_params("custdataset_dupes", 0, 1))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "DUPLICATE_COLUMN_KEY");
}

// ============================================================================
// Diagnostics
// ============================================================================

#[tokio::test]
async fn test_diagnostics_lifecycle() {
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    let engine = QueryEngine::new(store()).with_diagnostics(diagnostics.clone());

    engine
        .data_from_params(&data_params("customsearch_open", 0, 1))
        .await
        .unwrap();

    let events = diagnostics.events();
    assert!(matches!(events.first(), Some(Diagnostic::RequestStarted { .. })));
    assert!(events.contains(&Diagnostic::VariantResolved {
        report_id: "customsearch_open".to_string(),
        kind: ReportKind::Search,
    }));
    assert!(events.iter().any(|e| matches!(
        e,
        Diagnostic::PageCounts { native_pages: 2, output_pages: 2, .. }
    )));
    assert!(matches!(
        events.last(),
        Some(Diagnostic::RequestFinished { rows: 1, .. })
    ));
}

#[tokio::test]
async fn test_diagnostics_on_failure() {
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    let engine = QueryEngine::new(store()).with_diagnostics(diagnostics.clone());

    let _ = engine
        .metadata_from_params(&RequestParams::new("custdataset123"))
        .await;

    let events = diagnostics.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        Diagnostic::RequestFailed { code: "MISSING_PAGESTOLOAD", report_id: Some(id), .. }
            if id == "custdataset123"
    ));
}
