// HTTP surface: upload page, health check and document analysis

pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Room for the multipart envelope and the `nivel` field on top of the file.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes().saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(handlers::index))
        .route("/test", get(handlers::health))
        .route("/analizar", post(handlers::analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
