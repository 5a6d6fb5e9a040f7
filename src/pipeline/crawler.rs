use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::DEFAULT_BATCH_SIZE;
use crate::error::Result;
use crate::extraction::{decode_estates, ExtractionClient, ExtractionRequest};
use crate::feeds::FeedSource;
use crate::models::{ListingItem, ListingType};
use crate::pipeline::batch::batches;
use crate::pipeline::limiter::ConcurrencyLimiter;
use crate::pipeline::materialize::materialize;
use crate::pipeline::orchestrator::Orchestrator;
use crate::pipeline::report::{CrawlReport, ErrorPolicy, FeedRun};
use crate::storage::EstateStore;

/// Feed → batches → extraction → records → store
pub struct Crawler {
    feeds: Arc<dyn FeedSource>,
    extractor: Arc<dyn ExtractionClient>,
    store: Arc<dyn EstateStore>,
    orchestrator: Orchestrator,
    batch_size: usize,
    policy: ErrorPolicy,
}

impl Crawler {
    pub fn new(
        feeds: Arc<dyn FeedSource>,
        extractor: Arc<dyn ExtractionClient>,
        store: Arc<dyn EstateStore>,
        limiter: ConcurrencyLimiter,
    ) -> Self {
        Self {
            feeds,
            extractor,
            store,
            orchestrator: Orchestrator::new(limiter),
            batch_size: DEFAULT_BATCH_SIZE,
            policy: ErrorPolicy::default(),
        }
    }

    /// Panics if `batch_size` is zero.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch size must be greater than zero");
        self.batch_size = batch_size;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn feeds(&self) -> &dyn FeedSource {
        self.feeds.as_ref()
    }

    pub fn store(&self) -> &dyn EstateStore {
        self.store.as_ref()
    }

    /// Crawl each feed in turn. A feed that cannot be fetched is logged and skipped.
    pub async fn crawl_all(&self, feed_urls: &[String]) -> CrawlReport {
        let mut report = CrawlReport::new(self.policy);

        for feed_url in feed_urls {
            match self.crawl_feed(feed_url).await {
                Ok(run) => report.record_run(run),
                Err(e) => {
                    warn!(feed = %feed_url, error = %e, "Error crawling feed");
                    report.record_fetch_failure(feed_url, &e);
                }
            }
        }

        info!(
            feeds = report.feeds.len(),
            records = report.records(),
            clean = report.is_clean(),
            "✅ Crawl finished"
        );
        report
    }

    /// Fetch one feed and run all of its batches; only a failed fetch is an error.
    pub async fn crawl_feed(&self, feed_url: &str) -> Result<FeedRun> {
        let listing_type = ListingType::from_feed_url(feed_url);
        let items = self.feeds.fetch(feed_url).await?;

        info!(
            feed = %feed_url,
            source = self.feeds.source_name(),
            %listing_type,
            items = items.len(),
            "Crawling feed"
        );

        let summary = self
            .orchestrator
            .run(batches(&items, self.batch_size).map(<[ListingItem]>::to_vec), |batch| {
                let extractor = Arc::clone(&self.extractor);
                let store = Arc::clone(&self.store);
                async move {
                    process_batch(extractor.as_ref(), store.as_ref(), listing_type, batch).await
                }
            })
            .await;

        Ok(FeedRun {
            feed_url: feed_url.to_string(),
            listing_type,
            items: items.len(),
            summary,
        })
    }
}

/// Extract, decode, stamp and store one batch; returns the number of records stored
async fn process_batch(
    extractor: &dyn ExtractionClient,
    store: &dyn EstateStore,
    listing_type: ListingType,
    batch: Vec<ListingItem>,
) -> Result<usize> {
    let request = ExtractionRequest::for_batch(&batch, listing_type)?;
    let payload = extractor.extract(&request).await?;
    let estates = materialize(decode_estates(&payload)?, Utc::now());
    store.upsert(&estates).await?;
    Ok(estates.len())
}
