//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dashboard page, its CSV export and a JSON mirror of the page model
//! share one router. Every route recomputes its output from the cached
//! `DataContext` and the query string; no route mutates state.

pub mod dashboard;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(dashboard::index))
        .route("/export.csv", get(dashboard::export))
        .route("/api/view", get(dashboard::view_json))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
