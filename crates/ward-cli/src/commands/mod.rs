//! Subcommand implementations.

pub mod csrf;
pub mod request;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use ward_core::config::API_URL_ENV;
use ward_core::{ApiClient, ApiConfig, BaseUrl, MemoryStore};
use ward_http::TransportConfig;

/// Connection settings from the global flags.
#[derive(Debug, Clone)]
pub struct Connection {
    pub api_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl Connection {
    /// API configuration from `--api-url`, or from the environment.
    pub fn config(&self) -> Result<ApiConfig> {
        match self.api_url.as_deref() {
            Some(api_url) => {
                let base_url = BaseUrl::new(api_url).context("Invalid API URL")?;
                Ok(ApiConfig::new(base_url))
            }
            None => ApiConfig::from_env().with_context(|| {
                format!("No usable API URL. Pass --api-url or set {}.", API_URL_ENV)
            }),
        }
    }

    /// Build an authenticated client reading credentials from `store`.
    pub fn client(&self, store: &MemoryStore) -> Result<ApiClient> {
        let transport = TransportConfig::default()
            .with_timeout(self.timeout)
            .with_user_agent(concat!("ward/", env!("WARD_VERSION")));
        ward_http::connect_with(self.config()?, transport, Arc::new(store.clone()))
            .context("Failed to build HTTP client")
    }
}
