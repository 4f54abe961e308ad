//! Editing a previously saved service order
//!
//! Only the service type and the notes can change; the sale data is fixed
//! once stored. A record whose stored service type is not a known value
//! loads with no selection, so it must be picked again before saving.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::annotations::AnnotationPair;
use crate::core::document::{PrintDocument, materialize};
use crate::core::entity::{OrderRecordPatch, StoredOrderRecord};
use crate::core::error::{ServiceOrderError, ServiceOrderResult};
use crate::core::order::ServiceType;
use crate::core::service::RecordStore;
use crate::lifecycle::draft::ServiceDraft;

/// Where an edit session stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOrderState {
    /// The record is loaded; edits may be pending
    Loaded,
    Saving,
    Saved,
    SaveFailed { reason: String },
}

impl EditOrderState {
    pub fn name(&self) -> &'static str {
        match self {
            EditOrderState::Loaded => "loaded",
            EditOrderState::Saving => "saving",
            EditOrderState::Saved => "saved",
            EditOrderState::SaveFailed { .. } => "save failed",
        }
    }
}

/// Edits to one stored record
pub struct EditOrderSession {
    store: Arc<dyn RecordStore>,
    record: StoredOrderRecord,
    draft: ServiceDraft,
    state: EditOrderState,
}

impl EditOrderSession {
    /// Start editing an already fetched record
    pub fn from_record(store: Arc<dyn RecordStore>, record: StoredOrderRecord) -> Self {
        let draft = ServiceDraft {
            service_type: record.service_type_kind(),
            notes: record.notes(),
        };

        Self {
            store,
            record,
            draft,
            state: EditOrderState::Loaded,
        }
    }

    /// Fetch a record by id and start editing it
    pub async fn load(store: Arc<dyn RecordStore>, id: Uuid) -> ServiceOrderResult<Self> {
        let record = store
            .get(&id)
            .await
            .map_err(|e| ServiceOrderError::store("load", e))?
            .ok_or(ServiceOrderError::RecordNotFound { id })?;

        Ok(Self::from_record(store, record))
    }

    pub fn state(&self) -> &EditOrderState {
        &self.state
    }

    /// The record as last loaded or saved
    pub fn record(&self) -> &StoredOrderRecord {
        &self.record
    }

    pub fn draft(&self) -> &ServiceDraft {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.state == EditOrderState::Saving
    }

    pub fn set_service_type(&mut self, service_type: Option<ServiceType>) -> ServiceOrderResult<()> {
        self.edit("edit the service type", |draft| {
            draft.service_type = service_type
        })
    }

    pub fn set_store_note(&mut self, note: impl Into<String>) -> ServiceOrderResult<()> {
        let note = note.into();
        self.edit("edit the store note", |draft| draft.notes.store_note = note)
    }

    pub fn set_customer_note(&mut self, note: impl Into<String>) -> ServiceOrderResult<()> {
        let note = note.into();
        self.edit("edit the customer note", |draft| {
            draft.notes.customer_note = note
        })
    }

    pub fn set_notes(&mut self, notes: AnnotationPair) -> ServiceOrderResult<()> {
        self.edit("edit the notes", |draft| draft.notes = notes)
    }

    fn edit(
        &mut self,
        action: &'static str,
        apply: impl FnOnce(&mut ServiceDraft),
    ) -> ServiceOrderResult<()> {
        if self.is_busy() {
            return Err(self.refuse(action));
        }

        apply(&mut self.draft);
        self.state = EditOrderState::Loaded;
        Ok(())
    }

    fn refuse(&self, action: &'static str) -> ServiceOrderError {
        ServiceOrderError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    /// Write the service type and notes back to the store
    ///
    /// Saving again after `Saved` writes the same values; updates are
    /// idempotent.
    pub async fn save(&mut self) -> ServiceOrderResult<&StoredOrderRecord> {
        let patch = self.begin_save()?;
        let outcome = self.store.update(&self.record.id, patch).await;
        self.complete_save(outcome)
    }

    /// Validate the draft, enter `Saving` and return the update payload
    pub fn begin_save(&mut self) -> ServiceOrderResult<OrderRecordPatch> {
        if self.is_busy() {
            return Err(self.refuse("save"));
        }
        let service_type = self.draft.require_service_type()?;

        self.state = EditOrderState::Saving;
        Ok(OrderRecordPatch::new(service_type, &self.draft.notes))
    }

    /// Resolve an in-flight save with the store outcome
    pub fn complete_save(
        &mut self,
        outcome: anyhow::Result<StoredOrderRecord>,
    ) -> ServiceOrderResult<&StoredOrderRecord> {
        if !self.is_busy() {
            return Err(self.refuse("complete a save"));
        }

        match outcome {
            Ok(record) => {
                info!(record_id = %record.id, "Service order updated");
                self.state = EditOrderState::Saved;
                self.record = record;
                Ok(&self.record)
            }
            Err(err) => {
                let err = ServiceOrderError::store("update", err);
                warn!(
                    record_id = %self.record.id,
                    operation = "update",
                    error = %err,
                    "Service order update failed"
                );
                self.state = EditOrderState::SaveFailed {
                    reason: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Materialize the record with the current edits
    pub fn print(&self) -> PrintDocument {
        materialize(
            &self.record.order,
            self.draft.service_type_label(),
            &self.draft.notes,
        )
    }
}

#[cfg(all(test, feature = "in-memory"))]
mod tests {
    use super::*;
    use crate::core::entity::NewOrderRecord;
    use crate::core::order::Order;
    use crate::storage::InMemoryOrderStore;

    async fn seeded(service_type: ServiceType) -> (InMemoryOrderStore, StoredOrderRecord) {
        let store = InMemoryOrderStore::new();
        let record = store
            .insert(NewOrderRecord::new(
                Order::with_sale_number(12),
                service_type,
                &AnnotationPair::new("montagem", "sem pressa"),
            ))
            .await
            .unwrap();
        (store, record)
    }

    #[tokio::test]
    async fn test_load_decodes_notes() {
        let (store, record) = seeded(ServiceType::Warranty).await;
        let session = EditOrderSession::load(Arc::new(store), record.id).await.unwrap();

        assert_eq!(session.state(), &EditOrderState::Loaded);
        assert_eq!(session.draft().service_type, Some(ServiceType::Warranty));
        assert_eq!(
            session.draft().notes,
            AnnotationPair::new("montagem", "sem pressa")
        );
    }

    #[tokio::test]
    async fn test_load_missing_record() {
        let store = Arc::new(InMemoryOrderStore::new());
        let id = Uuid::new_v4();

        match EditOrderSession::load(store, id).await {
            Err(ServiceOrderError::RecordNotFound { id: missing }) => assert_eq!(missing, id),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("expected RecordNotFound"),
        }
    }

    #[tokio::test]
    async fn test_save_updates_only_service_fields() {
        let (store, record) = seeded(ServiceType::Revision).await;
        let mut session = EditOrderSession::from_record(Arc::new(store.clone()), record.clone());

        session.set_service_type(Some(ServiceType::Warranty)).unwrap();
        session.set_customer_note("").unwrap();
        let saved = session.save().await.unwrap().clone();

        assert_eq!(saved.id, record.id);
        assert_eq!(saved.created_at, record.created_at);
        assert_eq!(saved.order, record.order);
        assert_eq!(saved.service_type, "Garantia");
        assert_eq!(saved.annotations, "Loja: montagem\nCliente: ");
        assert_eq!(session.state(), &EditOrderState::Saved);

        let again = session.save().await.unwrap();
        assert_eq!(again.annotations, saved.annotations);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_stored_type_needs_reselection() {
        let (store, mut record) = seeded(ServiceType::Revision).await;
        record.service_type = "Instalação".to_string();
        let mut session = EditOrderSession::from_record(Arc::new(store), record);

        assert_eq!(session.draft().service_type, None);
        assert!(matches!(
            session.save().await,
            Err(ServiceOrderError::ValidationFailed(_))
        ));
        assert_eq!(session.state(), &EditOrderState::Loaded);
    }

    #[tokio::test]
    async fn test_save_failure_is_recoverable() {
        let (store, record) = seeded(ServiceType::Revision).await;
        let mut session = EditOrderSession::from_record(Arc::new(store), record);

        session.begin_save().unwrap();
        assert!(session.set_store_note("x").is_err());

        let err = session
            .complete_save(Err(anyhow::anyhow!("connection reset")))
            .unwrap_err();
        assert_eq!(err.error_code(), "STORE_FAILURE");
        assert!(matches!(session.state(), EditOrderState::SaveFailed { .. }));

        session.set_store_note("x").unwrap();
        assert_eq!(session.state(), &EditOrderState::Loaded);
    }

    #[tokio::test]
    async fn test_print_uses_edits() {
        let (store, record) = seeded(ServiceType::Revision).await;
        let mut session = EditOrderSession::from_record(Arc::new(store), record);
        session.set_store_note("  ").unwrap();

        let doc = session.print();
        assert_eq!(doc.title, "OS_12");
        assert_eq!(doc.service.service_type, "Revisão");
        assert_eq!(doc.service.store_note, "—");
        assert_eq!(doc.service.customer_note, "sem pressa");
    }
}
