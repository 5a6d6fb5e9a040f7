use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

use crate::pipeline::ErrorPolicy;
use crate::server::AppState;

/// Crawl every configured feed and return once all batches are done.
///
/// Under `best_effort` the answer is always 200; under `collect` the full report
/// is returned, with 207 when anything failed or was skipped. The crawl runs on
/// its own task, so a dropped connection does not stop it.
pub async fn crawl(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let crawler = Arc::clone(&state.crawler);
    let feed_urls = Arc::clone(&state.feed_urls);

    let report = match tokio::spawn(async move { crawler.crawl_all(&feed_urls).await }).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Crawl task did not finish");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16() })),
            );
        }
    };

    match state.crawler.error_policy() {
        ErrorPolicy::BestEffort => (
            StatusCode::OK,
            Json(json!({ "status": StatusCode::OK.as_u16() })),
        ),
        ErrorPolicy::Collect => {
            let status = if report.is_clean() {
                StatusCode::OK
            } else {
                StatusCode::MULTI_STATUS
            };
            (
                status,
                Json(json!({ "status": status.as_u16(), "report": report })),
            )
        }
    }
}

/// Items of the first configured feed, unprocessed
pub async fn sample_feed(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let Some(feed_url) = state.feed_urls.first() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "no feeds configured" })),
        );
    };

    match state.crawler.feeds().fetch(feed_url).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "message": items }))),
        Err(e) => {
            warn!(feed = %feed_url, error = %e, "Sample fetch failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "message": e.to_string() })),
            )
        }
    }
}
