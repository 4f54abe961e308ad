//! Webhook-backed sale lookup.
//!
//! One POST per search with body `{"numero_lancamento": <n>}`. The answer is
//! returned as raw JSON; shape interpretation belongs to the normalizer.

use crate::config::LookupConfig;
use crate::core::SaleLookup;
use crate::core::error::{LookupError, ServiceOrderError, ServiceOrderResult};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

/// HTTP client for the sale lookup webhook
#[derive(Debug, Clone)]
pub struct HttpSaleLookup {
    http: reqwest::Client,
    url: String,
}

impl HttpSaleLookup {
    pub fn new(url: String) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(http: reqwest::Client, url: String) -> Self {
        Self { http, url }
    }

    /// Build from configuration; the webhook URL is required
    pub fn from_config(config: &LookupConfig) -> ServiceOrderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceOrderError::ConfigurationInvalid {
                message: format!("cannot build lookup HTTP client: {}", e),
            })?;

        Ok(Self::with_client(http, config.require_url()?.to_string()))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SaleLookup for HttpSaleLookup {
    async fn fetch(&self, sale_number: i64) -> Result<Value, LookupError> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "numero_lancamento": sale_number }))
            .send()
            .await
            .map_err(|e| LookupError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| LookupError::Transport {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| LookupError::InvalidBody {
            message: e.to_string(),
        })
    }
}
