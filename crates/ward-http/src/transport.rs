//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, instrument, trace};

use ward_core::error::{StatusError, TransportError};
use ward_core::{ApiRequest, ApiResponse, Transport};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Whole-request timeout; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Headers added to every request unless the request sets them.
    pub default_headers: HeaderMap,
    /// Keep cookies between requests, so the session cookie the token is
    /// bound to travels with every call.
    pub cookie_store: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self {
            user_agent: concat!("ward/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            default_headers,
            cookie_store: true,
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP transport built on a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from the given settings.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .default_headers(config.default_headers)
            .cookie_store(config.cookie_store);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(map_reqwest_error)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        debug!("HTTP request");

        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());

        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        trace!(status = %status, len = body.len(), "HTTP response");

        let response = ApiResponse::new(status, headers, body.to_vec());
        if status.is_success() {
            Ok(response)
        } else {
            debug!(status = %status, "HTTP error status");
            Err(StatusError::new(request.clone(), response).into())
        }
    }
}

/// Map a reqwest failure onto the transport error taxonomy.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            message: err.to_string(),
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    }
}
