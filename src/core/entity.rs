//! Persisted service order rows and the write payloads that produce them

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::core::annotations::AnnotationPair;
use crate::core::normalizer::{order_from_object, text};
use crate::core::order::{Order, ServiceType};

/// A service order as held by the record store
///
/// `id` and `created_at` are assigned by the store. `annotations` is always
/// the output of the annotation codec.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredOrderRecord {
    pub id: Uuid,

    pub created_at: DateTime<Utc>,

    #[serde(flatten)]
    pub order: Order,

    /// Raw stored label; legacy rows may carry values outside [`ServiceType`]
    #[serde(rename = "tipo_servico")]
    pub service_type: String,

    #[serde(rename = "observacoes")]
    pub annotations: String,
}

impl StoredOrderRecord {
    /// Decode a row returned by the store
    ///
    /// Uses the same default policy as lookup normalization: null or
    /// mistyped text columns read as empty, a null complement stays absent.
    pub fn from_row(row: &Value) -> Result<Self> {
        let obj = row
            .as_object()
            .ok_or_else(|| anyhow!("stored row is not an object"))?;

        let order = order_from_object(obj)
            .ok_or_else(|| anyhow!("stored row has no usable numero_lancamento"))?;

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("stored row has no id"))?;
        let id = Uuid::parse_str(id).with_context(|| format!("invalid row id '{}'", id))?;

        let created_at = obj
            .get("created_at")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("stored row {} has no created_at", id))?;
        let created_at = DateTime::parse_from_rfc3339(created_at)
            .with_context(|| format!("invalid created_at '{}'", created_at))?
            .with_timezone(&Utc);

        Ok(Self {
            id,
            created_at,
            order,
            service_type: text(obj, "tipo_servico"),
            annotations: text(obj, "observacoes"),
        })
    }

    /// The sale part of the record
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Decoded operator notes
    pub fn notes(&self) -> AnnotationPair {
        AnnotationPair::decode(&self.annotations)
    }

    /// The stored service type, if it is one of the known values
    pub fn service_type_kind(&self) -> Option<ServiceType> {
        ServiceType::from_label(&self.service_type)
    }

    /// Apply an edit; only service type and annotations ever change
    pub fn apply(&mut self, patch: &OrderRecordPatch) {
        self.service_type = patch.service_type.as_str().to_string();
        self.annotations = patch.annotations.clone();
    }
}

/// Insert payload: every order field plus the initial service data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderRecord {
    #[serde(flatten)]
    order: Order,

    #[serde(rename = "tipo_servico")]
    service_type: ServiceType,

    #[serde(rename = "observacoes")]
    annotations: String,
}

impl NewOrderRecord {
    pub fn new(order: Order, service_type: ServiceType, notes: &AnnotationPair) -> Self {
        Self {
            order,
            service_type,
            annotations: notes.encode(),
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn annotations(&self) -> &str {
        &self.annotations
    }

    /// Attach the store-assigned identity
    pub fn into_stored(self, id: Uuid, created_at: DateTime<Utc>) -> StoredOrderRecord {
        StoredOrderRecord {
            id,
            created_at,
            order: self.order,
            service_type: self.service_type.as_str().to_string(),
            annotations: self.annotations,
        }
    }
}

/// Update payload for an existing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRecordPatch {
    #[serde(rename = "tipo_servico")]
    service_type: ServiceType,

    #[serde(rename = "observacoes")]
    annotations: String,
}

impl OrderRecordPatch {
    pub fn new(service_type: ServiceType, notes: &AnnotationPair) -> Self {
        Self {
            service_type,
            annotations: notes.encode(),
        }
    }

    pub fn service_type(&self) -> ServiceType {
        self.service_type
    }

    pub fn annotations(&self) -> &str {
        &self.annotations
    }
}
