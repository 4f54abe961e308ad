//! Operator edits tracked alongside an order

use crate::core::annotations::AnnotationPair;
use crate::core::error::ValidationError;
use crate::core::order::ServiceType;

/// Service type and notes being edited for one order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDraft {
    pub service_type: Option<ServiceType>,
    pub notes: AnnotationPair,
}

impl ServiceDraft {
    /// The selected service type, or `ValidationFailed` when none is
    pub fn require_service_type(&self) -> Result<ServiceType, ValidationError> {
        self.service_type.ok_or(ValidationError::MissingServiceType)
    }

    /// Stored/printed label of the selection, empty when unset
    pub fn service_type_label(&self) -> &'static str {
        self.service_type.map_or("", |kind| kind.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.service_type.is_some()
    }
}
