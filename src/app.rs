use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::db::category_repository::CategoryRepository;
use crate::db::news_repository::NewsRepository;
use crate::db::tool_repository::ToolRepository;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub tool_repo: Arc<dyn ToolRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub news_repo: Arc<dyn NewsRepository>,
    /// Client for outbound requests (image proxy).
    pub http_client: reqwest::Client,
    /// Directory receiving temporary spreadsheet uploads.
    pub upload_dir: PathBuf,
}

/// Build the HTTP router with every API route, CORS and request tracing.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(
            "/api/tools",
            post(api::tools::create_tool_handler).get(api::tools::list_tools_handler),
        )
        .route(
            "/api/tools/import",
            post(api::import::import_tools_handler)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/categories", get(api::tools::list_categories_handler))
        .route(
            "/api/categories/sync",
            post(api::tools::sync_categories_handler),
        )
        .route(
            "/api/news",
            post(api::news::create_news_handler).get(api::news::list_news_handler),
        )
        .route("/api/news/{id}", delete(api::news::delete_news_handler))
        .route("/api/proxy", get(api::proxy::proxy_image_handler))
        .route("/ping", get(api::health::ping_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
