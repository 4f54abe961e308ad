//! Hosted row store backend speaking the PostgREST dialect.
//!
//! Rows live in one table (default `ordens_servico`) reachable at
//! `{url}/rest/v1/{table}`. The API key is sent both as `apikey` and as a
//! bearer token and is never logged.
//!
//! # Feature flag
//!
//! This module is gated behind the `http` feature flag (on by default).

use crate::config::StoreConfig;
use crate::core::RecordStore;
use crate::core::entity::{NewOrderRecord, OrderRecordPatch, StoredOrderRecord};
use crate::core::error::{ServiceOrderError, ServiceOrderResult};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Record store backed by a PostgREST endpoint
#[derive(Clone)]
pub struct RestOrderStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl fmt::Debug for RestOrderStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestOrderStore")
            .field("base_url", &self.base_url)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl RestOrderStore {
    pub fn new(base_url: String, api_key: String, table: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key, table)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: String,
        api_key: String,
        table: String,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key,
            table,
        }
    }

    /// Build from configuration; endpoint and key are required
    pub fn from_config(config: &StoreConfig) -> ServiceOrderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceOrderError::ConfigurationInvalid {
                message: format!("cannot build store HTTP client: {}", e),
            })?;

        Ok(Self::with_client(
            http,
            config.require_url()?.to_string(),
            config.require_api_key()?.to_string(),
            config.table.clone(),
        ))
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn rows(response: Response) -> Result<Vec<StoredOrderRecord>> {
        let response = Self::ensure_success(response).await?;
        let rows: Vec<Value> = response
            .json()
            .await
            .context("record store response json decode failed")?;

        rows.iter().map(StoredOrderRecord::from_row).collect()
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(anyhow!(
            "record store http error status={} message={}",
            status.as_u16(),
            body
        ))
    }
}

#[async_trait]
impl RecordStore for RestOrderStore {
    async fn insert(&self, record: NewOrderRecord) -> Result<StoredOrderRecord> {
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await
            .context("record store insert request failed")?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("record store returned no row for insert"))
    }

    async fn get(&self, id: &Uuid) -> Result<Option<StoredOrderRecord>> {
        let response = self
            .request(Method::GET)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))])
            .send()
            .await
            .context("record store select request failed")?;

        Ok(Self::rows(response).await?.into_iter().next())
    }

    async fn list(&self) -> Result<Vec<StoredOrderRecord>> {
        let response = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .context("record store list request failed")?;

        Self::rows(response).await
    }

    async fn update(&self, id: &Uuid, patch: OrderRecordPatch) -> Result<StoredOrderRecord> {
        let response = self
            .request(Method::PATCH)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await
            .context("record store update request failed")?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Service order {} not found", id))
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let response = self
            .request(Method::DELETE)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .context("record store delete request failed")?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}
