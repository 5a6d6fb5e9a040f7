pub mod listing_type;

pub use listing_type::ListingType;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw listing entry as delivered by a feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: Option<DateTime<Utc>>,
}

/// One estate as returned by the extraction service, before bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExtractedEstate {
    pub url: String,
    pub address: String,
    pub estate_type: ListingType,
    /// Price in yen
    pub value: i64,
    /// Nearest railway station
    pub railway: String,
    /// Square meters
    pub land_area: f64,
    /// Square meters
    pub building_area: f64,
    /// e.g. 3LDK, 2DK
    pub floor_plan: String,
    pub year_of_construction: i32,
}

/// Persisted estate record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Estate {
    pub id: Uuid,
    pub url: String,
    pub address: String,
    pub estate_type: ListingType,
    pub value: i64,
    pub railway: String,
    pub land_area: f64,
    pub building_area: f64,
    pub floor_plan: String,
    pub year_of_construction: i32,
    pub first_appeared: DateTime<Utc>,
    pub last_appeared: DateTime<Utc>,
    pub created_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generate a fresh, unguessable record identifier
pub fn new_estate_id() -> Uuid {
    Uuid::new_v4()
}
