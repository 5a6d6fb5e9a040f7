use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;
use crate::models::ListingType;
use crate::pipeline::orchestrator::RunSummary;

/// What a crawl does with per-batch failures beyond logging them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Log and move on; callers only see counts
    #[default]
    BestEffort,
    /// Also keep every failure in the report
    Collect,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "best_effort" => Ok(ErrorPolicy::BestEffort),
            "collect" | "collect_and_report" => Ok(ErrorPolicy::Collect),
            other => Err(format!(
                "unknown error policy '{}', expected best_effort or collect",
                other
            )),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::BestEffort => f.write_str("best_effort"),
            ErrorPolicy::Collect => f.write_str("collect"),
        }
    }
}

/// One feed that has been fetched and run through the orchestrator
#[derive(Debug)]
pub struct FeedRun {
    pub feed_url: String,
    pub listing_type: ListingType,
    pub items: usize,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedReport {
    pub feed_url: String,
    pub listing_type: ListingType,
    pub fetched: bool,
    pub items: usize,
    pub batches: usize,
    pub completed: usize,
    pub records: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlFailure {
    pub feed_url: String,
    pub batch: Option<usize>,
    pub stage: &'static str,
    pub message: String,
}

impl CrawlFailure {
    fn new(feed_url: &str, batch: Option<usize>, error: &PipelineError) -> Self {
        Self {
            feed_url: feed_url.to_string(),
            batch,
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

/// Result of crawling a list of feeds
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub policy: ErrorPolicy,
    pub feeds: Vec<FeedReport>,
    pub failures: Vec<CrawlFailure>,
}

impl CrawlReport {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            feeds: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record_run(&mut self, run: FeedRun) {
        let summary = &run.summary;

        if self.policy == ErrorPolicy::Collect {
            for failure in &summary.failed {
                self.failures
                    .push(CrawlFailure::new(&run.feed_url, Some(failure.batch), &failure.error));
            }
            for &batch in &summary.skipped {
                self.failures.push(CrawlFailure {
                    feed_url: run.feed_url.clone(),
                    batch: Some(batch),
                    stage: "acquire",
                    message: "batch skipped".to_string(),
                });
            }
        }

        self.feeds.push(FeedReport {
            feed_url: run.feed_url.clone(),
            listing_type: run.listing_type,
            fetched: true,
            items: run.items,
            batches: summary.dispatched + summary.skipped.len(),
            completed: summary.completed,
            records: summary.records,
            failed: summary.failed.len(),
            skipped: summary.skipped.len(),
        });
    }

    pub fn record_fetch_failure(&mut self, feed_url: &str, error: &PipelineError) {
        if self.policy == ErrorPolicy::Collect {
            self.failures.push(CrawlFailure::new(feed_url, None, error));
        }

        self.feeds.push(FeedReport {
            feed_url: feed_url.to_string(),
            listing_type: ListingType::from_feed_url(feed_url),
            fetched: false,
            items: 0,
            batches: 0,
            completed: 0,
            records: 0,
            failed: 0,
            skipped: 0,
        });
    }

    /// True when every feed was fetched and every batch completed
    pub fn is_clean(&self) -> bool {
        self.feeds
            .iter()
            .all(|f| f.fetched && f.failed == 0 && f.skipped == 0)
    }

    pub fn records(&self) -> usize {
        self.feeds.iter().map(|f| f.records).sum()
    }
}
