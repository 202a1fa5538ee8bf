//! Route definitions

use std::sync::Arc;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use super::{handlers, page, state::AppState};

async fn handle_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(page::NOT_FOUND_HTML))
}

async fn handle_405() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, Html(page::METHOD_NOT_ALLOWED_HTML))
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::serve_index).post(handlers::valuate))
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
