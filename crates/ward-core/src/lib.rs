//! ward-core - Credential attachment and anti-forgery recovery for HTTP API clients.
//!
//! Every request sent through an [`ApiClient`] passes a chain of
//! [`Interceptor`]s. The [`RequestAuthenticator`] interceptor attaches the
//! bearer session token and the anti-forgery token, and resubmits a request
//! once when the server rejects it with `403 Forbidden`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ward_core::{ApiClient, ApiConfig, BaseUrl, MemoryStore, Transport};
//!
//! # async fn example(transport: Arc<dyn Transport>) -> ward_core::Result<()> {
//! let config = ApiConfig::new(BaseUrl::new("https://app.example.com")?);
//! let store = MemoryStore::new();
//! store.set_session_token("session-token");
//!
//! let client = ApiClient::authenticated(config, transport, Arc::new(store))?;
//! let response = client.get("/profile").await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod store;
pub mod tokens;
pub mod traits;
pub mod types;

pub use auth::{AntiforgeryTokenSupplier, Disposition, RequestAuthenticator};
pub use client::{ApiClient, ApiClientBuilder};
pub use config::ApiConfig;
pub use error::{Error, InvalidInputError, StatusError, TokenFetchError, TransportError};
pub use request::{ApiRequest, Attempt, PendingRequest, RequestClass};
pub use response::ApiResponse;
pub use store::{CredentialKey, CredentialStore, MemoryStore};
pub use tokens::{AntiforgeryToken, SessionToken};
pub use traits::{Interceptor, Transport};
pub use types::BaseUrl;

/// Header carrying the anti-forgery token.
pub const XSRF_HEADER: http::HeaderName = http::HeaderName::from_static("x-xsrf-token");

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
