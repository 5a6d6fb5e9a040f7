//! Bounded-concurrency ingestion: batch a feed, fan extraction out under a
//! limiter, materialize and upsert each batch, and join before returning.

pub mod batch;
pub mod crawler;
pub mod limiter;
pub mod materialize;
pub mod orchestrator;
pub mod report;

pub use batch::batches;
pub use crawler::Crawler;
pub use limiter::ConcurrencyLimiter;
pub use materialize::materialize;
pub use orchestrator::{BatchFailure, Orchestrator, RunSummary};
pub use report::{CrawlFailure, CrawlReport, ErrorPolicy, FeedReport, FeedRun};
