use crate::error::Result;
use crate::models::Estate;
use async_trait::async_trait;

/// Columns overwritten when an incoming estate collides with a stored one.
///
/// Identity, `first_appeared`, `created_date` and `created_at` are never touched.
pub const UPSERT_COLUMNS: [&str; 10] = [
    "address",
    "estate_type",
    "value",
    "railway",
    "land_area",
    "building_area",
    "floor_plan",
    "year_of_construction",
    "last_appeared",
    "updated_at",
];

/// Persistence for estate records, keyed by listing URL
#[async_trait]
pub trait EstateStore: Send + Sync {
    /// Insert new estates, or update [`UPSERT_COLUMNS`] of those whose URL is already stored
    async fn upsert(&self, estates: &[Estate]) -> Result<()>;

    /// Check the store is reachable
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
