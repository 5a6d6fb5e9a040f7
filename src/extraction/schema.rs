//! Structured-output contract the extraction service must satisfy.

use serde::Serialize;
use serde_json::{json, Value};

use crate::models::ListingType;

pub const SCHEMA_NAME: &str = "estate_extraction";
pub const SCHEMA_DESCRIPTION: &str = "Extract structured real estate information from text";

/// Fields every extracted estate must carry, and nothing else
pub const ESTATE_FIELDS: [&str; 9] = [
    "url",
    "address",
    "estate_type",
    "value",
    "railway",
    "land_area",
    "building_area",
    "floor_plan",
    "year_of_construction",
];

/// Named JSON schema in the shape the chat completions API expects
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonSchema {
    pub name: String,
    pub description: String,
    pub strict: bool,
    pub schema: Value,
}

/// The fixed estates schema
pub fn estates_schema() -> JsonSchema {
    let estate_types: Vec<&str> = ListingType::ALL.iter().map(|t| t.as_str()).collect();

    JsonSchema {
        name: SCHEMA_NAME.to_string(),
        description: SCHEMA_DESCRIPTION.to_string(),
        strict: true,
        schema: json!({
            "type": "object",
            "properties": {
                "estates": {
                    "type": "array",
                    "description": "estate information",
                    "items": {
                        "type": "object",
                        "properties": {
                            "url": { "type": "string", "description": "Property listing URL" },
                            "address": { "type": "string", "description": "Property address" },
                            "estate_type": {
                                "type": "string",
                                "enum": estate_types,
                                "description": "Type of real estate property"
                            },
                            "value": { "type": "integer", "description": "Property price in yen" },
                            "railway": { "type": "string", "description": "Nearest railway station" },
                            "land_area": { "type": "number", "description": "Land area in square meters" },
                            "building_area": { "type": "number", "description": "Building area in square meters" },
                            "floor_plan": { "type": "string", "description": "Floor plan description (e.g., 3LDK, 2DK)" },
                            "year_of_construction": { "type": "integer", "description": "Year the property was constructed" }
                        },
                        "required": ESTATE_FIELDS,
                        "additionalProperties": false
                    }
                }
            },
            "required": ["estates"],
            "additionalProperties": false
        }),
    }
}
