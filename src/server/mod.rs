pub mod routes;
pub mod state;

pub use state::AppState;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/hello", get(routes::hello))
        .route("/api/id", get(routes::new_id))
        .route("/api/sample", get(routes::sample_feed))
        .route("/api/crawl", get(routes::crawl))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
