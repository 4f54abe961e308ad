//! Macro-generated test suite for `RecordStore` contract validation.
//!
//! The `record_store_tests!` macro generates a test module that validates any
//! `RecordStore` implementation against the full contract: insert, get,
//! newest-first listing, service field updates, deletion and concurrent
//! inserts.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use service_order::storage::InMemoryOrderStore;
//!
//! record_store_tests!(InMemoryOrderStore::new());
//! ```

/// Generate a full `RecordStore` conformance test suite.
///
/// `$factory` must be an expression that evaluates to an instance implementing
/// `RecordStore`. It is re-evaluated for each test to ensure isolation. For
/// the concurrent insert test, the returned store must also implement
/// `Clone + 'static` (shared state via Arc pattern).
#[macro_export]
macro_rules! record_store_tests {
    ($factory:expr) => {
        mod record_store_contract_tests {
            use super::*;
            use service_order::core::annotations::AnnotationPair;
            use service_order::core::entity::OrderRecordPatch;
            use service_order::core::order::ServiceType;
            use service_order::core::service::RecordStore;
            use uuid::Uuid;

            // ==================================================================
            // Insert & Get
            // ==================================================================

            #[tokio::test]
            async fn test_insert_assigns_identity() {
                let store = $factory;
                let payload = new_record(100, "Ana", ServiceType::Revision, "ok", "");

                let stored = store.insert(payload.clone()).await.unwrap();
                assert!(!stored.id.is_nil());
                assert_eq!(stored.order, *payload.order());
                assert_eq!(stored.service_type, "Revisão");
                assert_eq!(stored.annotations, "Loja: ok\nCliente: ");

                let fetched = store.get(&stored.id).await.unwrap().unwrap();
                assert_eq!(fetched, stored);
            }

            #[tokio::test]
            async fn test_insert_twice_creates_two_records() {
                let store = $factory;
                let payload = new_record(7, "Ana", ServiceType::Revision, "", "");

                let first = store.insert(payload.clone()).await.unwrap();
                let second = store.insert(payload).await.unwrap();
                assert_ne!(first.id, second.id);
                assert_count(&store.list().await.unwrap(), 2);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                assert!(store.get(&Uuid::new_v4()).await.unwrap().is_none());
            }

            // ==================================================================
            // List
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let store = $factory;
                assert!(store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_newest_first() {
                let store = $factory;
                for payload in sample_batch(5) {
                    store.insert(payload).await.unwrap();
                    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
                }

                let listed = store.list().await.unwrap();
                assert_count(&listed, 5);
                assert!(
                    listed
                        .windows(2)
                        .all(|pair| pair[0].created_at >= pair[1].created_at)
                );
                assert_eq!(listed[0].order.sale_number, 1004);
                assert_eq!(listed[4].order.sale_number, 1000);
            }

            // ==================================================================
            // Update
            // ==================================================================

            #[tokio::test]
            async fn test_update_changes_only_service_fields() {
                let store = $factory;
                let stored = store
                    .insert(new_record(12, "Bruno", ServiceType::Revision, "a", "b"))
                    .await
                    .unwrap();

                let patch = OrderRecordPatch::new(
                    ServiceType::Warranty,
                    &AnnotationPair::new("trocar tampo", ""),
                );
                let updated = store.update(&stored.id, patch).await.unwrap();

                assert_eq!(updated.id, stored.id);
                assert_eq!(updated.created_at, stored.created_at);
                assert_eq!(updated.order, stored.order);
                assert_eq!(updated.service_type, "Garantia");
                assert_eq!(updated.notes(), AnnotationPair::new("trocar tampo", ""));

                let fetched = store.get(&stored.id).await.unwrap().unwrap();
                assert_eq!(fetched, updated);
            }

            #[tokio::test]
            async fn test_update_is_idempotent() {
                let store = $factory;
                let stored = store
                    .insert(new_record(13, "Carla", ServiceType::Revision, "", ""))
                    .await
                    .unwrap();
                let patch =
                    OrderRecordPatch::new(ServiceType::Warranty, &AnnotationPair::new("x", "y"));

                let once = store.update(&stored.id, patch.clone()).await.unwrap();
                let twice = store.update(&stored.id, patch).await.unwrap();
                assert_eq!(once, twice);
                assert_count(&store.list().await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let store = $factory;
                let patch = OrderRecordPatch::new(ServiceType::Revision, &AnnotationPair::default());
                assert!(store.update(&Uuid::new_v4(), patch).await.is_err());
            }

            // ==================================================================
            // Delete
            // ==================================================================

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let stored = store
                    .insert(new_record(14, "Davi", ServiceType::Revision, "", ""))
                    .await
                    .unwrap();

                store.delete(&stored.id).await.unwrap();
                assert!(store.get(&stored.id).await.unwrap().is_none());
                assert!(store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                // Either Ok or Err is acceptable; it must not panic
                let _ = store.delete(&Uuid::new_v4()).await;
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = $factory;
                let mut handles = Vec::new();

                for payload in sample_batch(10) {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move { store.insert(payload).await }));
                }

                for handle in handles {
                    handle.await.unwrap().unwrap();
                }

                assert_count(&store.list().await.unwrap(), 10);
            }
        }
    };
}
