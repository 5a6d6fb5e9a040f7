//! Extraction of structured estates from raw listings.
//!
//! The core builds an [`ExtractionRequest`] per batch (instruction plus the
//! strict [`schema::estates_schema`]), hands it to an [`ExtractionClient`]
//! and decodes the returned payload with [`decode_estates`].

pub mod openai;
pub mod request;
pub mod schema;
pub mod traits;

pub use openai::OpenAiExtractor;
pub use request::{decode_estates, ExtractionRequest, Message};
pub use schema::{estates_schema, JsonSchema};
pub use traits::ExtractionClient;
