use chrono::{DateTime, Utc};

use crate::models::{new_estate_id, Estate, ExtractedEstate};

/// Turn extracted estates into records stamped with a fresh id and `now`.
///
/// All temporal columns get the same instant; the store decides which of them
/// survive a conflict.
pub fn materialize(extracted: Vec<ExtractedEstate>, now: DateTime<Utc>) -> Vec<Estate> {
    extracted
        .into_iter()
        .map(|e| Estate {
            id: new_estate_id(),
            url: e.url,
            address: e.address,
            estate_type: e.estate_type,
            value: e.value,
            railway: e.railway,
            land_area: e.land_area,
            building_area: e.building_area,
            floor_plan: e.floor_plan,
            year_of_construction: e.year_of_construction,
            first_appeared: now,
            last_appeared: now,
            created_date: now,
            created_at: now,
            updated_at: now,
        })
        .collect()
}
