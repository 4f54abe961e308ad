//! Core module containing the domain types and pure transforms of the pipeline

pub mod annotations;
pub mod document;
pub mod entity;
pub mod error;
pub mod normalizer;
pub mod order;
pub mod query;
pub mod service;

pub use annotations::AnnotationPair;
pub use document::{PrintDocument, materialize, materialize_at};
pub use entity::{NewOrderRecord, OrderRecordPatch, StoredOrderRecord};
pub use error::{LookupError, ServiceOrderError, ServiceOrderResult, ValidationError};
pub use normalizer::{LookupResponse, normalize};
pub use order::{Address, LineItem, Order, ServiceType};
pub use query::filter_records;
pub use service::{RecordStore, SaleLookup};
