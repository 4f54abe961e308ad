//! # Service Order
//!
//! Turns a sale registered in an external ERP into a printable, persisted
//! service order (Ordem de Serviço) for a furniture store.
//!
//! ## Pipeline
//!
//! - **Lookup**: fetch the sale by number from a webhook ([`core::SaleLookup`])
//! - **Normalize**: coerce whichever JSON shape came back into an [`core::Order`]
//! - **Annotate**: attach a service type and two free-text notes, packed into a
//!   single labeled text column
//! - **Persist**: insert, list, update and delete rows ([`core::RecordStore`])
//! - **Print**: materialize a fully resolved document for the print dialog
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use service_order::prelude::*;
//!
//! let desk = OrderDesk::from_config(&AppConfig::from_env())?;
//!
//! let mut session = desk.new_order();
//! session.search(100).await?;
//! session.set_service_type(Some(ServiceType::Revision))?;
//! session.set_store_note("Trocar dobradiças")?;
//! let record = session.save().await?;
//!
//! let document = desk.print_record(&record);
//! assert_eq!(document.title, "OS_100");
//! ```

pub mod config;
pub mod core;
pub mod lifecycle;
pub mod lookup;
pub mod print;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        annotations::AnnotationPair,
        document::{PLACEHOLDER, PrintDocument, materialize, materialize_at},
        entity::{NewOrderRecord, OrderRecordPatch, StoredOrderRecord},
        error::{LookupError, ServiceOrderError, ServiceOrderResult, ValidationError},
        normalizer::normalize,
        order::{Address, LineItem, Order, ServiceType},
        query::filter_records,
        service::{RecordStore, SaleLookup},
    };

    // === Workflows ===
    pub use crate::lifecycle::{
        EditOrderSession, EditOrderState, NewOrderSession, NewOrderState, OrderDesk,
        ServiceDraft,
    };

    // === Printing ===
    pub use crate::print::{DirectoryPrintSink, MemoryPrintSink, PrintSink, TextRenderer};

    // === Backends ===
    #[cfg(feature = "http")]
    pub use crate::lookup::HttpSaleLookup;
    #[cfg(feature = "in-memory")]
    pub use crate::lookup::InMemorySaleLookup;
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryOrderStore;
    #[cfg(feature = "http")]
    pub use crate::storage::RestOrderStore;

    // === Config ===
    pub use crate::config::{AppConfig, LookupConfig, StoreConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use uuid::Uuid;
}
