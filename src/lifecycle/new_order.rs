//! Creating a service order from a sale lookup
//!
//! ```text
//! Empty ──search──▶ Searching ──▶ Found ──save──▶ Saving ──▶ Saved
//!                        │          ▲                 │
//!                        ├─▶ NotFound                 ▼
//!                        └─▶ LookupFailed        SaveFailed ──edit/save──▶
//! ```
//!
//! Every I/O step is split into `begin_*` / `complete_*` so a caller that
//! drives the request itself (a UI event loop) can observe the in-flight
//! state; [`NewOrderSession::search`] and [`NewOrderSession::save`] run both
//! halves. While a request is in flight every other action is refused, which
//! keeps at most one outstanding request per session.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::annotations::AnnotationPair;
use crate::core::document::{PrintDocument, materialize};
use crate::core::entity::{NewOrderRecord, StoredOrderRecord};
use crate::core::error::{LookupError, ServiceOrderError, ServiceOrderResult};
use crate::core::normalizer::{LookupResponse, normalize};
use crate::core::order::{Order, ServiceType};
use crate::core::service::{RecordStore, SaleLookup};
use crate::lifecycle::draft::ServiceDraft;

/// Where a new-order session stands
#[derive(Debug, Clone, PartialEq)]
pub enum NewOrderState {
    /// No lookup performed yet
    Empty,
    Searching {
        sale_number: i64,
    },
    /// An order is loaded and editable
    Found,
    NotFound {
        sale_number: i64,
    },
    /// Transport failure or unreadable payload; `payload` is kept for display
    LookupFailed {
        sale_number: i64,
        reason: String,
        payload: Option<Value>,
    },
    Saving,
    Saved {
        record: StoredOrderRecord,
    },
    /// The insert was rejected; edits and retries are allowed
    SaveFailed {
        reason: String,
    },
}

impl NewOrderState {
    pub fn name(&self) -> &'static str {
        match self {
            NewOrderState::Empty => "empty",
            NewOrderState::Searching { .. } => "searching",
            NewOrderState::Found => "found",
            NewOrderState::NotFound { .. } => "not found",
            NewOrderState::LookupFailed { .. } => "lookup failed",
            NewOrderState::Saving => "saving",
            NewOrderState::Saved { .. } => "saved",
            NewOrderState::SaveFailed { .. } => "save failed",
        }
    }
}

/// One operator's search → annotate → persist cycle for a new order
pub struct NewOrderSession {
    lookup: Arc<dyn SaleLookup>,
    store: Arc<dyn RecordStore>,
    state: NewOrderState,
    order: Option<Order>,
    draft: ServiceDraft,
}

impl NewOrderSession {
    pub fn new(lookup: Arc<dyn SaleLookup>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            lookup,
            store,
            state: NewOrderState::Empty,
            order: None,
            draft: ServiceDraft::default(),
        }
    }

    pub fn state(&self) -> &NewOrderState {
        &self.state
    }

    /// The loaded order; kept through Saving, SaveFailed and Saved
    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn draft(&self) -> &ServiceDraft {
        &self.draft
    }

    /// Whether a request is in flight
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            NewOrderState::Searching { .. } | NewOrderState::Saving
        )
    }

    /// Whether a save would be accepted right now
    pub fn can_save(&self) -> bool {
        self.is_editable() && self.draft.is_complete()
    }

    fn is_editable(&self) -> bool {
        matches!(self.state, NewOrderState::Found | NewOrderState::SaveFailed { .. })
    }

    fn refuse(&self, action: &'static str) -> ServiceOrderError {
        ServiceOrderError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Look up a sale and load it as the session's order
    pub async fn search(&mut self, sale_number: i64) -> ServiceOrderResult<&Order> {
        self.begin_search(sale_number)?;
        let outcome = self.lookup.fetch(sale_number).await;
        self.complete_search(outcome)
    }

    /// Enter `Searching`, discarding any previous order and edits
    pub fn begin_search(&mut self, sale_number: i64) -> ServiceOrderResult<()> {
        if self.is_busy() {
            return Err(self.refuse("search"));
        }

        self.order = None;
        self.draft = ServiceDraft::default();
        self.state = NewOrderState::Searching { sale_number };
        Ok(())
    }

    /// Resolve an in-flight search with the lookup outcome
    pub fn complete_search(
        &mut self,
        outcome: Result<Value, LookupError>,
    ) -> ServiceOrderResult<&Order> {
        let NewOrderState::Searching { sale_number } = self.state else {
            return Err(self.refuse("complete a search"));
        };

        let payload = match outcome {
            Ok(payload) => payload,
            Err(err) => {
                warn!(sale_number, error = %err, "Sale lookup failed");
                self.state = NewOrderState::LookupFailed {
                    sale_number,
                    reason: err.to_string(),
                    payload: None,
                };
                return Err(err.into());
            }
        };

        debug!(
            sale_number,
            shape = LookupResponse::classify(&payload).kind(),
            "Sale lookup answered"
        );

        match normalize(&payload) {
            Ok(order) => {
                info!(
                    sale_number,
                    items = order.line_items.len(),
                    "Sale found"
                );
                self.state = NewOrderState::Found;
                let order: &Order = self.order.insert(order);
                Ok(order)
            }
            Err(ServiceOrderError::NotFound) => {
                info!(sale_number, "Sale not found");
                self.state = NewOrderState::NotFound { sale_number };
                Err(ServiceOrderError::NotFound)
            }
            Err(err) => {
                warn!(sale_number, error = %err, "Sale lookup returned an unreadable payload");
                self.state = NewOrderState::LookupFailed {
                    sale_number,
                    reason: err.to_string(),
                    payload: err.details(),
                };
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

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

    /// Replace both notes at once
    pub fn set_notes(&mut self, notes: AnnotationPair) -> ServiceOrderResult<()> {
        self.edit("edit the notes", |draft| draft.notes = notes)
    }

    fn edit(
        &mut self,
        action: &'static str,
        apply: impl FnOnce(&mut ServiceDraft),
    ) -> ServiceOrderResult<()> {
        if !self.is_editable() {
            return Err(self.refuse(action));
        }

        apply(&mut self.draft);
        self.state = NewOrderState::Found;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persist
    // ------------------------------------------------------------------

    /// Insert the order with its service data
    ///
    /// Once `Saved`, the session refuses further saves; a new search starts
    /// the next cycle.
    pub async fn save(&mut self) -> ServiceOrderResult<StoredOrderRecord> {
        let record = self.begin_save()?;
        let outcome = self.store.insert(record).await;
        self.complete_save(outcome)
    }

    /// Validate the draft, enter `Saving` and return the insert payload
    pub fn begin_save(&mut self) -> ServiceOrderResult<NewOrderRecord> {
        if !self.is_editable() {
            return Err(self.refuse("save"));
        }
        let Some(order) = self.order.clone() else {
            return Err(self.refuse("save"));
        };
        let service_type = self.draft.require_service_type()?;

        self.state = NewOrderState::Saving;
        Ok(NewOrderRecord::new(order, service_type, &self.draft.notes))
    }

    /// Resolve an in-flight save with the store outcome
    pub fn complete_save(
        &mut self,
        outcome: anyhow::Result<StoredOrderRecord>,
    ) -> ServiceOrderResult<StoredOrderRecord> {
        if self.state != NewOrderState::Saving {
            return Err(self.refuse("complete a save"));
        }

        match outcome {
            Ok(record) => {
                info!(
                    record_id = %record.id,
                    sale_number = record.order.sale_number,
                    "Service order saved"
                );
                self.state = NewOrderState::Saved {
                    record: record.clone(),
                };
                Ok(record)
            }
            Err(err) => {
                let err = ServiceOrderError::store("insert", err);
                warn!(operation = "insert", error = %err, "Service order insert failed");
                self.state = NewOrderState::SaveFailed {
                    reason: err.to_string(),
                };
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Print
    // ------------------------------------------------------------------

    /// Materialize the current order with the current edits
    pub fn print(&self) -> Option<PrintDocument> {
        self.order
            .as_ref()
            .map(|order| materialize(order, self.draft.service_type_label(), &self.draft.notes))
    }
}

#[cfg(all(test, feature = "in-memory"))]
mod tests {
    use super::*;
    use crate::lookup::InMemorySaleLookup;
    use crate::storage::InMemoryOrderStore;
    use serde_json::json;

    fn session() -> (NewOrderSession, InMemorySaleLookup, InMemoryOrderStore) {
        let lookup = InMemorySaleLookup::new();
        let store = InMemoryOrderStore::new();
        let session = NewOrderSession::new(Arc::new(lookup.clone()), Arc::new(store.clone()));
        (session, lookup, store)
    }

    #[tokio::test]
    async fn test_search_found_then_save() {
        let (mut session, lookup, store) = session();
        lookup.respond(7, json!([{ "numero_lancamento": 7, "nome_cliente": "Ana" }]));

        let order = session.search(7).await.unwrap();
        assert_eq!(order.customer_name, "Ana");
        assert_eq!(session.state(), &NewOrderState::Found);
        assert_eq!(session.draft(), &ServiceDraft::default());

        session.set_service_type(Some(ServiceType::Warranty)).unwrap();
        session.set_store_note("trocar tampo").unwrap();
        assert!(session.can_save());

        let record = session.save().await.unwrap();
        assert_eq!(record.service_type, "Garantia");
        assert_eq!(record.annotations, "Loja: trocar tampo\nCliente: ");
        assert!(matches!(session.state(), NewOrderState::Saved { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_save_requires_service_type() {
        let (mut session, lookup, store) = session();
        lookup.respond(1, json!({ "numero_lancamento": 1 }));
        session.search(1).await.unwrap();

        let err = session.save().await.unwrap_err();
        assert!(matches!(err, ServiceOrderError::ValidationFailed(_)));
        assert_eq!(session.state(), &NewOrderState::Found);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_and_lookup_failure() {
        let (mut session, lookup, _) = session();
        lookup.fail(
            2,
            LookupError::Status {
                status: 503,
                body: "indisponível".to_string(),
            },
        );

        assert!(matches!(session.search(1).await, Err(ServiceOrderError::NotFound)));
        assert_eq!(session.state(), &NewOrderState::NotFound { sale_number: 1 });
        assert!(session.order().is_none());

        assert!(matches!(
            session.search(2).await,
            Err(ServiceOrderError::LookupFailed(_))
        ));
        assert!(matches!(
            session.state(),
            NewOrderState::LookupFailed { sale_number: 2, payload: None, .. }
        ));
    }

    #[tokio::test]
    async fn test_unrecognized_payload_is_kept() {
        let (mut session, lookup, _) = session();
        let payload = json!({ "mensagem": "erro interno" });
        lookup.respond(3, payload.clone());

        let err = session.search(3).await.unwrap_err();
        assert_eq!(err.error_code(), "UNRECOGNIZED_SHAPE");
        match session.state() {
            NewOrderState::LookupFailed { payload: kept, .. } => {
                assert_eq!(kept.as_ref(), Some(&payload))
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_one_request_in_flight() {
        let (mut session, _, _) = session();
        session.begin_search(5).unwrap();

        assert!(session.is_busy());
        assert!(matches!(
            session.begin_search(6),
            Err(ServiceOrderError::InvalidTransition { state: "searching", .. })
        ));
        assert!(session.set_store_note("x").is_err());

        session
            .complete_search(Ok(json!({ "numero_lancamento": 5 })))
            .unwrap();
        session.set_service_type(Some(ServiceType::Revision)).unwrap();

        let _payload = session.begin_save().unwrap();
        assert!(session.is_busy());
        assert!(session.begin_save().is_err());
        assert!(session.begin_search(9).is_err());
    }

    #[tokio::test]
    async fn test_save_failure_allows_retry() {
        let (mut session, _, _) = session();
        session.begin_search(5).unwrap();
        session
            .complete_search(Ok(json!({ "numero_lancamento": 5 })))
            .unwrap();
        session.set_service_type(Some(ServiceType::Revision)).unwrap();

        session.begin_save().unwrap();
        let err = session
            .complete_save(Err(anyhow::anyhow!("timeout")))
            .unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(session.state(), NewOrderState::SaveFailed { .. }));
        assert!(session.can_save());

        let retry = session.begin_save().unwrap();
        assert_eq!(retry.order().sale_number, 5);
    }

    #[tokio::test]
    async fn test_saved_session_refuses_second_insert() {
        let (mut session, lookup, store) = session();
        lookup.respond(4, json!({ "numero_lancamento": 4 }));
        session.search(4).await.unwrap();
        session.set_service_type(Some(ServiceType::Revision)).unwrap();
        session.save().await.unwrap();

        assert!(matches!(
            session.save().await,
            Err(ServiceOrderError::InvalidTransition { state: "saved", .. })
        ));
        assert!(session.set_customer_note("depois").is_err());
        assert_eq!(store.len(), 1);

        session.search(4).await.unwrap();
        assert_eq!(session.state(), &NewOrderState::Found);
    }

    #[tokio::test]
    async fn test_print_reflects_edits() {
        let (mut session, lookup, _) = session();
        assert!(session.print().is_none());

        lookup.respond(8, json!({ "numero_lancamento": 8 }));
        session.search(8).await.unwrap();
        session.set_notes(AnnotationPair::new("loja", "")).unwrap();

        let doc = session.print().unwrap();
        assert_eq!(doc.title, "OS_8");
        assert_eq!(doc.service.service_type, "—");
        assert_eq!(doc.service.store_note, "loja");
        assert_eq!(doc.service.customer_note, "—");
    }
}
