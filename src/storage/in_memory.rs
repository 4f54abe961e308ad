//! In-memory implementation of RecordStore for testing and development

use crate::core::RecordStore;
use crate::core::entity::{NewOrderRecord, OrderRecordPatch, StoredOrderRecord};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory record store implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same rows.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    records: Arc<RwLock<HashMap<Uuid, StoredOrderRecord>>>,
}

impl InMemoryOrderStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryOrderStore {
    async fn insert(&self, record: NewOrderRecord) -> Result<StoredOrderRecord> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let stored = record.into_stored(Uuid::new_v4(), Utc::now());
        records.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<StoredOrderRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<StoredOrderRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut all: Vec<StoredOrderRecord> = records.values().cloned().collect();
        all.sort_by_key(|record| Reverse(record.created_at));

        Ok(all)
    }

    async fn update(&self, id: &Uuid, patch: OrderRecordPatch) -> Result<StoredOrderRecord> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let record = records
            .get_mut(id)
            .ok_or_else(|| anyhow!("Service order {} not found", id))?;
        record.apply(&patch);

        Ok(record.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.remove(id);

        Ok(())
    }
}
