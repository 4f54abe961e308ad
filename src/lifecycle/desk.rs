//! Entry point tying a sale lookup and a record store together

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::document::{PrintDocument, materialize};
use crate::core::entity::StoredOrderRecord;
use crate::core::error::{ServiceOrderError, ServiceOrderResult};
use crate::core::query::filter_records;
use crate::core::service::{RecordStore, SaleLookup};
use crate::lifecycle::edit_order::EditOrderSession;
use crate::lifecycle::new_order::NewOrderSession;

#[cfg(feature = "http")]
use crate::config::AppConfig;

/// The service order desk
///
/// Holds the two external dependencies and hands out sessions sharing them.
/// Cloning is cheap.
#[derive(Clone)]
pub struct OrderDesk {
    lookup: Arc<dyn SaleLookup>,
    store: Arc<dyn RecordStore>,
}

impl OrderDesk {
    pub fn new(lookup: Arc<dyn SaleLookup>, store: Arc<dyn RecordStore>) -> Self {
        Self { lookup, store }
    }

    /// Build the HTTP-backed desk from configuration
    ///
    /// Fails with `ConfigurationMissing` before any request is made when a
    /// required value is absent.
    #[cfg(feature = "http")]
    pub fn from_config(config: &AppConfig) -> ServiceOrderResult<Self> {
        use crate::lookup::HttpSaleLookup;
        use crate::storage::RestOrderStore;

        config.validate()?;
        let lookup = HttpSaleLookup::from_config(&config.lookup)?;
        let store = RestOrderStore::from_config(&config.store)?;

        info!(table = %store.table(), "Service order desk configured");
        Ok(Self::new(Arc::new(lookup), Arc::new(store)))
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }

    /// Start a new-order session
    pub fn new_order(&self) -> NewOrderSession {
        NewOrderSession::new(self.lookup.clone(), self.store.clone())
    }

    /// Start editing the record with `id`
    pub async fn open(&self, id: Uuid) -> ServiceOrderResult<EditOrderSession> {
        EditOrderSession::load(self.store.clone(), id).await
    }

    /// Every stored record, newest first
    pub async fn list(&self) -> ServiceOrderResult<Vec<StoredOrderRecord>> {
        let records = self
            .store
            .list()
            .await
            .map_err(|e| ServiceOrderError::store("list", e))?;

        debug!(count = records.len(), "Listed service orders");
        Ok(records)
    }

    /// Stored records matching a free-text query, newest first
    pub async fn search_records(&self, query: &str) -> ServiceOrderResult<Vec<StoredOrderRecord>> {
        let records = self.list().await?;
        Ok(filter_records(&records, query)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Remove a record
    pub async fn delete(&self, id: Uuid) -> ServiceOrderResult<()> {
        self.store
            .delete(&id)
            .await
            .map_err(|e| ServiceOrderError::store("delete", e))?;

        info!(record_id = %id, "Service order deleted");
        Ok(())
    }

    /// Print a stored record as saved
    pub fn print_record(&self, record: &StoredOrderRecord) -> PrintDocument {
        materialize(&record.order, &record.service_type, &record.notes())
    }
}
