use std::sync::Arc;

use crate::pipeline::Crawler;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub crawler: Arc<Crawler>,
    pub feed_urls: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(crawler: Crawler, feed_urls: Vec<String>) -> Self {
        Self {
            crawler: Arc::new(crawler),
            feed_urls: Arc::new(feed_urls),
        }
    }
}
