//! Real-estate feed ingestion.
//!
//! Listing feeds are fetched, split into batches and sent to a structured-output
//! extraction service under a concurrency cap; the decoded estates are stamped
//! and upserted by listing URL.

pub mod config;
pub mod error;
pub mod extraction;
pub mod feeds;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod storage;

pub use config::Config;
pub use error::{PipelineError, Result};
