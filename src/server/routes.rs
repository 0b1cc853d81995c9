use crate::search::engine::QueryResolver;
use crate::search::handlers::{ENDPOINT_SEARCH, handle_search};
use axum::response::Html;
use axum::routing::get;
use axum::{Extension, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

const INDEX_PAGE: &str = include_str!("index.html");

pub fn build_router(resolver: Arc<QueryResolver>, assets_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route(ENDPOINT_SEARCH, get(handle_search).post(handle_search))
        .route("/health", get(handle_health))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(Extension(resolver))
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn handle_health() -> &'static str {
    "OK"
}
