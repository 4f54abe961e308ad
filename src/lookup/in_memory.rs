//! In-memory implementation of SaleLookup for testing and development

use crate::core::SaleLookup;
use crate::core::error::LookupError;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Canned lookup responses keyed by sale number
///
/// Unknown sale numbers answer with an empty array, the way the webhook
/// reports a missing sale. A sale number can also be made to fail.
#[derive(Clone, Default)]
pub struct InMemorySaleLookup {
    responses: Arc<RwLock<HashMap<i64, Result<Value, LookupError>>>>,
}

impl InMemorySaleLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sale_number` with `payload`
    pub fn respond(&self, sale_number: i64, payload: Value) -> &Self {
        self.set(sale_number, Ok(payload))
    }

    /// Fail lookups of `sale_number` with `error`
    pub fn fail(&self, sale_number: i64, error: LookupError) -> &Self {
        self.set(sale_number, Err(error))
    }

    fn set(&self, sale_number: i64, response: Result<Value, LookupError>) -> &Self {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(sale_number, response);
        }
        self
    }
}

#[async_trait]
impl SaleLookup for InMemorySaleLookup {
    async fn fetch(&self, sale_number: i64) -> Result<Value, LookupError> {
        let responses = self
            .responses
            .read()
            .map_err(|e| LookupError::Transport {
                message: format!("Failed to acquire read lock: {}", e),
            })?;

        responses
            .get(&sale_number)
            .cloned()
            .unwrap_or_else(|| Ok(json!([])))
    }
}
