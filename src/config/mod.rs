//! Configuration loading and management
//!
//! Configuration comes from a YAML file, the process environment, or both
//! (file first, environment on top). Endpoints and credentials are optional
//! at load time and checked by the `require_*` accessors, so a missing value
//! surfaces as `ConfigurationMissing` when an operation needs it.
//!
//! ```yaml
//! lookup:
//!   url: https://hooks.example.com/webhook/gera_os
//!   timeout_secs: 20
//! store:
//!   url: https://project.supabase.co
//!   api_key: <anon key>
//!   table: ordens_servico
//! ```

use crate::core::error::{ServiceOrderError, ServiceOrderResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const ENV_LOOKUP_URL: &str = "SALE_LOOKUP_URL";
pub const ENV_LOOKUP_TIMEOUT_SECS: &str = "SALE_LOOKUP_TIMEOUT_SECS";
pub const ENV_STORE_URL: &str = "SUPABASE_URL";
pub const ENV_STORE_API_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_STORE_TABLE: &str = "SUPABASE_TABLE_OS";

pub const DEFAULT_TABLE: &str = "ordens_servico";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sale lookup endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Webhook receiving `{"numero_lancamento": n}`
    pub url: Option<String>,

    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LookupConfig {
    pub fn require_url(&self) -> ServiceOrderResult<&str> {
        required(self.url.as_deref(), "lookup.url")
    }
}

/// Record store endpoint settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub url: Option<String>,

    pub api_key: Option<String>,

    /// Table holding the service order rows
    pub table: String,

    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl StoreConfig {
    pub fn require_url(&self) -> ServiceOrderResult<&str> {
        required(self.url.as_deref(), "store.url")
    }

    pub fn require_api_key(&self) -> ServiceOrderResult<&str> {
        required(self.api_key.as_deref(), "store.api_key")
    }
}

/// Complete configuration of the pipeline's external collaborators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub lookup: LookupConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ServiceOrderResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ServiceOrderError::ConfigurationInvalid {
                message: format!("cannot read '{}': {}", path.display(), e),
            })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> ServiceOrderResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(yaml).map_err(|e| ServiceOrderError::ConfigurationInvalid {
            message: e.to_string(),
        })
    }

    /// Configuration taken from the process environment only
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Layer process environment variables over this configuration
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Layer values from an arbitrary source over this configuration
    ///
    /// `source` is asked for each `ENV_*` key; blank values are ignored.
    pub fn with_overrides(mut self, source: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| source(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get(ENV_LOOKUP_URL) {
            self.lookup.url = Some(url);
        }
        if let Some(raw) = get(ENV_LOOKUP_TIMEOUT_SECS) {
            match raw.trim().parse() {
                Ok(secs) => self.lookup.timeout_secs = secs,
                Err(_) => tracing::warn!(
                    key = ENV_LOOKUP_TIMEOUT_SECS,
                    value = %raw,
                    "Ignoring non-numeric timeout"
                ),
            }
        }
        if let Some(url) = get(ENV_STORE_URL) {
            self.store.url = Some(url);
        }
        if let Some(key) = get(ENV_STORE_API_KEY) {
            self.store.api_key = Some(key);
        }
        if let Some(table) = get(ENV_STORE_TABLE) {
            self.store.table = table;
        }

        self
    }

    /// Check that every endpoint and credential is present
    pub fn validate(&self) -> ServiceOrderResult<()> {
        self.lookup.require_url()?;
        self.store.require_url()?;
        self.store.require_api_key()?;
        Ok(())
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> ServiceOrderResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceOrderError::ConfigurationMissing {
            key: key.to_string(),
        })
}
