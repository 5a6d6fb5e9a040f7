use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::extraction::schema::{estates_schema, JsonSchema};
use crate::models::{ExtractedEstate, ListingItem, ListingType};

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Everything the extraction service needs for one batch
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub messages: Vec<Message>,
    pub schema: JsonSchema,
}

impl ExtractionRequest {
    /// Build the instruction for a batch of listings of one type.
    pub fn for_batch(batch: &[ListingItem], listing_type: ListingType) -> Result<Self> {
        let listings = serde_json::to_string(batch)
            .map_err(|e| PipelineError::Extraction(format!("Failed to serialize batch: {}", e)))?;

        Ok(Self {
            messages: vec![Message::user(instruction(listing_type, &listings))],
            schema: estates_schema(),
        })
    }
}

fn instruction(listing_type: ListingType, listings: &str) -> String {
    format!(
        "次の{}のJSONを解釈してJSONの配列を作成してください{}",
        listing_type, listings
    )
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EstateResponse {
    estates: Vec<ExtractedEstate>,
}

/// Decode an extraction payload into estates.
///
/// Unknown and missing fields are rejected at every level.
pub fn decode_estates(payload: &str) -> Result<Vec<ExtractedEstate>> {
    serde_json::from_str::<EstateResponse>(payload)
        .map(|r| r.estates)
        .map_err(|e| PipelineError::Decode(e.to_string()))
}
