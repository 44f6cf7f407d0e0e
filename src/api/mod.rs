//! HTTP surface over the chunking engine and strategy selector.

mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use handlers::AppState;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/chunk", post(handlers::chunk_document))
        .route("/chunk/text", post(handlers::chunk_text))
        .route("/chunk/batch", post(handlers::chunk_batch))
        .route("/chunk/strategies", get(handlers::list_strategies))
        .route("/strategy/select", post(handlers::select_strategy))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
