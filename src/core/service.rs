//! Service traits for the external collaborators of the pipeline

use crate::core::entity::{NewOrderRecord, OrderRecordPatch, StoredOrderRecord};
use crate::core::error::LookupError;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// Row store holding service order records
///
/// Implementations assign `id` and `created_at` on insert. The pipeline is
/// agnostic to the underlying storage mechanism and never issues two writes
/// for the same record concurrently.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record, returning it with its store-assigned identity
    async fn insert(&self, record: NewOrderRecord) -> Result<StoredOrderRecord>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<StoredOrderRecord>>;

    /// List all records, newest `created_at` first
    async fn list(&self) -> Result<Vec<StoredOrderRecord>>;

    /// Update service type and annotations of an existing record
    ///
    /// Fails when no record carries `id`.
    async fn update(&self, id: &Uuid, patch: OrderRecordPatch) -> Result<StoredOrderRecord>;

    /// Delete a record
    async fn delete(&self, id: &Uuid) -> Result<()>;
}

/// External service resolving a sale number to a raw JSON payload
///
/// Implementations do not interpret the payload; that is the normalizer's
/// job.
#[async_trait]
pub trait SaleLookup: Send + Sync {
    async fn fetch(&self, sale_number: i64) -> Result<Value, LookupError>;
}
