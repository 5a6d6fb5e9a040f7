use crate::error::Result;
use crate::extraction::request::ExtractionRequest;
use async_trait::async_trait;

/// Structured-output extraction service
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Run one request and return the raw JSON payload, undecoded
    async fn extract(&self, request: &ExtractionRequest) -> Result<String>;
}
