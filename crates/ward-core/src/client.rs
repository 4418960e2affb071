//! The interceptor pipeline.

use std::fmt;
use std::sync::Arc;

use http::Method;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::auth::{AntiforgeryTokenSupplier, RequestAuthenticator};
use crate::config::ApiConfig;
use crate::error::Error;
use crate::request::{ApiRequest, PendingRequest};
use crate::response::ApiResponse;
use crate::store::CredentialStore;
use crate::traits::{Interceptor, Transport};
use crate::Result;

/// HTTP client running every request through an interceptor chain.
///
/// Cheap to clone; clones share the transport and interceptors and can be
/// used from many tasks at once.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl ApiClient {
    /// Start building a client with no interceptors.
    pub fn builder(config: ApiConfig, transport: Arc<dyn Transport>) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            transport,
            interceptors: Vec::new(),
        }
    }

    /// A client with a [`RequestAuthenticator`] reading from `store`.
    pub fn authenticated(
        config: ApiConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        Ok(Self::builder(config, transport)
            .with_authenticator(store)?
            .build())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    /// Build a request for a path under the API prefix.
    pub fn request(&self, method: Method, path: &str) -> Result<ApiRequest> {
        Ok(ApiRequest::new(method, self.inner.config.api_url(path)?))
    }

    /// Run a request through the interceptors and the transport.
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut pending = PendingRequest::new(request);

        for interceptor in &self.inner.interceptors {
            interceptor.before_send(&mut pending).await?;
        }

        debug!("Sending request");
        let mut outcome = self
            .inner
            .transport
            .send(pending.request())
            .await
            .map_err(Error::from);

        for interceptor in &self.inner.interceptors {
            outcome = interceptor
                .after_receive(&mut pending, outcome, self.inner.transport.as_ref())
                .await;
        }

        match &outcome {
            Ok(response) => {
                debug!(status = %response.status(), attempt = ?pending.attempt(), "Request completed")
            }
            Err(e) => debug!(error = %e, attempt = ?pending.attempt(), "Request failed"),
        }

        outcome
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        let request = self.request(Method::GET, path)?;
        self.execute(request).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        let request = self.request(Method::DELETE, path)?;
        self.execute(request).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let request = self.request(Method::POST, path)?.json(body)?;
        self.execute(request).await
    }

    /// Send a PUT request with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let request = self.request(Method::PUT, path)?.json(body)?;
        self.execute(request).await
    }

    /// Send a PATCH request with a JSON body.
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        let request = self.request(Method::PATCH, path)?.json(body)?;
        self.execute(request).await
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.inner.config)
            .field("interceptors", &self.inner.interceptors.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl ApiClientBuilder {
    /// Append an interceptor; hooks run in the order they are added.
    pub fn interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Append a [`RequestAuthenticator`] using the configured token endpoint.
    pub fn with_authenticator(self, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let endpoint = self.config.csrf_token_url()?;
        let supplier = AntiforgeryTokenSupplier::new(self.transport.clone(), store.clone(), endpoint);
        let authenticator = RequestAuthenticator::new(store, supplier);
        Ok(self.interceptor(Arc::new(authenticator)))
    }

    pub fn build(self) -> ApiClient {
        ApiClient {
            inner: Arc::new(ClientInner {
                config: self.config,
                transport: self.transport,
                interceptors: self.interceptors,
            }),
        }
    }
}
