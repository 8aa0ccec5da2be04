//! Axum server exposing the query engine.
//!
//! Routes:
//! - `GET /api/analytics/metadata?analyticsreportid=..&pagestoload=..`
//! - `GET /api/analytics/data?analyticsreportid=..&pageindex=..&pagestoload=..`
//! - `GET /api/health`

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerSettings;
use crate::query::{QueryEngine, QueryError, QueryResponse, QueryResult, RequestParams};

/// Application state shared across handlers.
pub struct AppState {
    pub engine: QueryEngine,
}

/// Build the axum router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/analytics/metadata", get(get_metadata))
        .route("/api/analytics/data", get(get_data))
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn serve(
    engine: QueryEngine,
    settings: &ServerSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState { engine });
    let app = router(state);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "reportpage listening");

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// API Handlers
// ============================================================================

async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let params = params_from_query(&query);
    respond(state.engine.metadata_from_params(&params).await)
}

async fn get_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let params = params_from_query(&query);
    respond(state.engine.data_from_params(&params).await)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn params_from_query(query: &HashMap<String, String>) -> RequestParams {
    RequestParams::from_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

/// HTTP status for a query failure.
fn status_for(err: &QueryError) -> StatusCode {
    if err.is_request_error() {
        StatusCode::BAD_REQUEST
    } else if matches!(err, QueryError::ReportNotFound(_)) {
        StatusCode::NOT_FOUND
    } else if matches!(err, QueryError::Flatten(_)) {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::BAD_GATEWAY
    }
}

fn respond(result: Result<QueryResult, QueryError>) -> (StatusCode, Json<QueryResponse>) {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(err) => status_for(err),
    };
    (status, Json(QueryResponse::from(result)))
}
