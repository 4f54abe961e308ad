//! Typed error handling for service order operations
//!
//! Every operation in the crate reports failures through [`ServiceOrderError`],
//! so callers can match on the failure category instead of inspecting
//! message strings.
//!
//! # Error Categories
//!
//! - `ConfigurationMissing` / `ConfigurationInvalid`: fatal, surfaced before any I/O
//! - `LookupFailed`: transport, HTTP or body-decoding failure of the sale lookup
//! - `NotFound`: the lookup answered but carried no sale
//! - `UnrecognizedShape`: the lookup answered with a payload we cannot read
//! - `RecordNotFound` / `StoreFailure`: record store rejected or missed a row
//! - `ValidationFailed`: a persist was attempted with incomplete edits
//! - `InvalidTransition`: a session action was issued from the wrong state
//!
//! # Example
//!
//! ```rust,ignore
//! match session.search(&lookup, 100).await {
//!     Ok(order) => println!("found {}", order.customer_name),
//!     Err(ServiceOrderError::NotFound) => println!("Venda não encontrada"),
//!     Err(err @ ServiceOrderError::UnrecognizedShape { .. }) => {
//!         eprintln!("{}: {:?}", err, err.details());
//!     }
//!     Err(err) => eprintln!("{}", err),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for service order operations
#[derive(Debug, Error)]
pub enum ServiceOrderError {
    /// A required endpoint or credential is absent
    #[error("Missing required configuration '{key}'")]
    ConfigurationMissing { key: String },

    /// Configuration could not be read or parsed
    #[error("Invalid configuration: {message}")]
    ConfigurationInvalid { message: String },

    /// The sale lookup could not be completed
    #[error("Sale lookup failed: {0}")]
    LookupFailed(#[from] LookupError),

    /// The lookup succeeded but yielded no sale
    #[error("Sale not found")]
    NotFound,

    /// The lookup succeeded but the payload matched no known shape
    #[error("Unrecognized sale lookup response: {reason}")]
    UnrecognizedShape { reason: String, payload: Value },

    /// No stored record carries this identifier
    #[error("Service order with id '{id}' not found")]
    RecordNotFound { id: Uuid },

    /// The record store rejected an operation
    #[error("Failed to {operation} service order: {message}")]
    StoreFailure { operation: String, message: String },

    /// Required operator input is missing
    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    /// A session action was issued from a state that does not allow it
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

impl ServiceOrderError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceOrderError::ConfigurationMissing { .. } => "CONFIGURATION_MISSING",
            ServiceOrderError::ConfigurationInvalid { .. } => "CONFIGURATION_INVALID",
            ServiceOrderError::LookupFailed(_) => "LOOKUP_FAILED",
            ServiceOrderError::NotFound => "SALE_NOT_FOUND",
            ServiceOrderError::UnrecognizedShape { .. } => "UNRECOGNIZED_SHAPE",
            ServiceOrderError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            ServiceOrderError::StoreFailure { .. } => "STORE_FAILURE",
            ServiceOrderError::ValidationFailed(_) => "VALIDATION_FAILED",
            ServiceOrderError::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }

    /// Whether the operator may retry the same action
    ///
    /// Only configuration errors are fatal; every other failure is local to
    /// one operation and leaves persisted state untouched.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ServiceOrderError::ConfigurationMissing { .. }
                | ServiceOrderError::ConfigurationInvalid { .. }
        )
    }

    /// Additional details for diagnostic display
    ///
    /// For `UnrecognizedShape` this is the raw lookup payload, untouched.
    pub fn details(&self) -> Option<Value> {
        match self {
            ServiceOrderError::UnrecognizedShape { payload, .. } => Some(payload.clone()),
            ServiceOrderError::RecordNotFound { id } => {
                Some(serde_json::json!({ "id": id.to_string() }))
            }
            ServiceOrderError::LookupFailed(LookupError::Status { status, body }) => {
                Some(serde_json::json!({ "status": status, "body": body }))
            }
            ServiceOrderError::ConfigurationMissing { key } => {
                Some(serde_json::json!({ "key": key }))
            }
            _ => None,
        }
    }

    pub(crate) fn store(operation: &str, err: anyhow::Error) -> Self {
        ServiceOrderError::StoreFailure {
            operation: operation.to_string(),
            message: format!("{:#}", err),
        }
    }

    pub(crate) fn unrecognized(reason: impl Into<String>, payload: &Value) -> Self {
        ServiceOrderError::UnrecognizedShape {
            reason: reason.into(),
            payload: payload.clone(),
        }
    }
}

// =============================================================================
// Lookup Errors
// =============================================================================

/// Errors raised while talking to the sale lookup service
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The request never produced a response
    #[error("request failed: {message}")]
    Transport { message: String },

    /// The service answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not valid JSON
    #[error("response is not valid JSON: {message}")]
    InvalidBody { message: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to operator input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No service type has been selected
    #[error("A service type must be selected before saving")]
    MissingServiceType,

    #[error("Unknown service type '{label}'")]
    UnknownServiceType { label: String },
}

/// A specialized Result type for service order operations
pub type ServiceOrderResult<T> = Result<T, ServiceOrderError>;
