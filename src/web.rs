// Listing page over HTTP
// Each request replays its query onto a fresh table; nothing mutable is shared.

use crate::columns::default_table;
use crate::config::Config;
use crate::detainee::dataset;
use crate::html::render_page;
use crate::query::PageQuery;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/detentos - The static dataset
async fn list_detainees() -> impl IntoResponse {
    Json(ApiResponse::ok(dataset()))
}

/// GET / and /detentos - The listing page, state from the query string
async fn listing_page(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let query = PageQuery::from_pairs(pairs);
    let mut table = default_table();
    if let Err(e) = table.set_page_size(state.config.page_size) {
        warn!(error = %e, "configured page size rejected");
    }
    query.apply(&mut table);

    Html(render_page(&table, &query))
}

pub fn router(config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/detentos", get(list_detainees));

    Router::new()
        .route("/", get(listing_page))
        .route("/detentos", get(listing_page))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
