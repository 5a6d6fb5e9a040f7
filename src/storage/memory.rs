use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{PipelineError, Result};
use crate::models::Estate;
use crate::storage::traits::EstateStore;

/// Process-local estate store with the same conflict rules as Postgres
#[derive(Default)]
pub struct InMemoryEstateStore {
    estates: Mutex<HashMap<String, Estate>>,
}

impl InMemoryEstateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Estate> {
        self.estates.lock().ok()?.get(url).cloned()
    }

    pub fn len(&self) -> usize {
        self.estates.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn apply_update(stored: &mut Estate, incoming: &Estate) {
    stored.address = incoming.address.clone();
    stored.estate_type = incoming.estate_type;
    stored.value = incoming.value;
    stored.railway = incoming.railway.clone();
    stored.land_area = incoming.land_area;
    stored.building_area = incoming.building_area;
    stored.floor_plan = incoming.floor_plan.clone();
    stored.year_of_construction = incoming.year_of_construction;
    stored.last_appeared = incoming.last_appeared;
    stored.updated_at = incoming.updated_at;
}

#[async_trait]
impl EstateStore for InMemoryEstateStore {
    async fn upsert(&self, estates: &[Estate]) -> Result<()> {
        let mut stored = self
            .estates
            .lock()
            .map_err(|_| PipelineError::Storage("estate store lock poisoned".into()))?;

        for estate in estates {
            match stored.get_mut(&estate.url) {
                Some(existing) => apply_update(existing, estate),
                None => {
                    stored.insert(estate.url.clone(), estate.clone());
                }
            }
        }
        Ok(())
    }
}
