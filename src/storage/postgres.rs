use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::error::Result;
use crate::models::Estate;
use crate::storage::traits::EstateStore;

const UPSERT_SQL: &str = r#"
    INSERT INTO estates (
        id, url, address, estate_type, value, railway, land_area, building_area,
        floor_plan, year_of_construction, first_appeared, last_appeared,
        created_date, created_at, updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
    ON CONFLICT (url) DO UPDATE SET
        address = EXCLUDED.address,
        estate_type = EXCLUDED.estate_type,
        value = EXCLUDED.value,
        railway = EXCLUDED.railway,
        land_area = EXCLUDED.land_area,
        building_area = EXCLUDED.building_area,
        floor_plan = EXCLUDED.floor_plan,
        year_of_construction = EXCLUDED.year_of_construction,
        last_appeared = EXCLUDED.last_appeared,
        updated_at = EXCLUDED.updated_at
"#;

/// Postgres-backed estate store
#[derive(Clone)]
pub struct PgEstateStore {
    pool: PgPool,
}

impl PgEstateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EstateStore for PgEstateStore {
    async fn upsert(&self, estates: &[Estate]) -> Result<()> {
        if estates.is_empty() {
            return Ok(());
        }

        // One statement per row: a batch may repeat a URL, which a single
        // multi-row ON CONFLICT statement rejects.
        let mut tx = self.pool.begin().await?;
        for estate in estates {
            sqlx::query(UPSERT_SQL)
                .bind(estate.id)
                .bind(&estate.url)
                .bind(&estate.address)
                .bind(estate.estate_type.as_str())
                .bind(estate.value)
                .bind(&estate.railway)
                .bind(estate.land_area)
                .bind(estate.building_area)
                .bind(&estate.floor_plan)
                .bind(estate.year_of_construction)
                .bind(estate.first_appeared)
                .bind(estate.last_appeared)
                .bind(estate.created_date)
                .bind(estate.created_at)
                .bind(estate.updated_at)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        debug!(count = estates.len(), "Upserted estates");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
