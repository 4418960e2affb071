//! HTTP transport trait.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;

/// Delivers a request and buffers the response.
///
/// Implementations return `Ok` only for success (2xx) responses. Any other
/// status is reported as [`TransportError::Status`] carrying the request as
/// sent and the full response. Timeouts, redirects and connection reuse are
/// the implementation's business.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}
