use crate::error::Result;
use crate::models::ListingItem;
use async_trait::async_trait;

/// Common trait for listing feed sources
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the ordered listing items published at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<ListingItem>>;

    /// Get the name of the feed source
    fn source_name(&self) -> &'static str;
}
