//! ward-http - reqwest-backed transport for ward.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ward_core::{ApiConfig, BaseUrl, MemoryStore};
//!
//! # async fn example() -> Result<(), ward_core::Error> {
//! let config = ApiConfig::new(BaseUrl::new("https://app.example.com")?);
//! let client = ward_http::connect(config, Arc::new(MemoryStore::new()))?;
//!
//! let created = client.post("/items", &serde_json::json!({ "name": "widget" })).await?;
//! println!("{}", created.status());
//! # Ok(())
//! # }
//! ```

mod transport;

use std::sync::Arc;

use ward_core::{ApiClient, ApiConfig, CredentialStore, Error};

pub use transport::{DEFAULT_TIMEOUT, ReqwestTransport, TransportConfig};

/// Build an authenticated client with the default transport settings.
pub fn connect(config: ApiConfig, store: Arc<dyn CredentialStore>) -> Result<ApiClient, Error> {
    connect_with(config, TransportConfig::default(), store)
}

/// Build an authenticated client with custom transport settings.
pub fn connect_with(
    config: ApiConfig,
    transport: TransportConfig,
    store: Arc<dyn CredentialStore>,
) -> Result<ApiClient, Error> {
    let transport = Arc::new(ReqwestTransport::new(transport)?);
    ApiClient::authenticated(config, transport, store)
}
