//! Anti-forgery token fetching.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::TokenFetchError;
use crate::request::ApiRequest;
use crate::store::{CredentialKey, CredentialStore};
use crate::tokens::AntiforgeryToken;
use crate::traits::Transport;

/// Body of the token endpoint's success response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Fetches fresh anti-forgery tokens and caches them in the store.
///
/// The fetch goes straight to the transport, bypassing interceptors, so a
/// refresh never triggers another refresh.
#[derive(Clone)]
pub struct AntiforgeryTokenSupplier {
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    endpoint: Url,
}

impl AntiforgeryTokenSupplier {
    /// Create a supplier fetching from `endpoint`.
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        endpoint: Url,
    ) -> Self {
        Self {
            transport,
            store,
            endpoint,
        }
    }

    /// Fetch a new token and store it under `CSRF_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenFetchError`] if the endpoint is unreachable, answers
    /// with a non-success status, or the body lacks a usable `token` field.
    /// The store is only written on success.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn refresh(&self) -> Result<AntiforgeryToken, TokenFetchError> {
        debug!("Fetching anti-forgery token");

        let request = ApiRequest::get(self.endpoint.clone());
        let response = self.transport.send(&request).await.map_err(|e| {
            warn!(error = %e, "Anti-forgery token request failed");
            TokenFetchError::from(e)
        })?;

        let body: TokenResponse =
            serde_json::from_slice(response.body()).map_err(|e| TokenFetchError::Malformed {
                reason: e.to_string(),
            })?;

        if body.token.is_empty() {
            return Err(TokenFetchError::Malformed {
                reason: "token is empty".to_string(),
            });
        }

        let token = AntiforgeryToken::new(body.token).map_err(|e| TokenFetchError::Malformed {
            reason: e.to_string(),
        })?;

        self.store
            .set(CredentialKey::AntiforgeryToken, token.as_str().to_string());

        debug!("Anti-forgery token refreshed");
        Ok(token)
    }
}

impl fmt::Debug for AntiforgeryTokenSupplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AntiforgeryTokenSupplier")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}
