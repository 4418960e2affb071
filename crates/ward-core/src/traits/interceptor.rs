//! Request interceptor trait.

use async_trait::async_trait;

use crate::request::PendingRequest;
use crate::response::ApiResponse;
use crate::Result;

use super::Transport;

/// A pair of hooks around the transport.
///
/// `before_send` hooks run in registration order before the request is
/// transmitted; an error aborts the request. `after_receive` hooks run in
/// registration order once the outcome is known, each receiving the outcome
/// left by the previous hook. A hook may resubmit the request through the
/// transport it is handed and return that outcome instead.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Inspect or modify the request before it is sent.
    async fn before_send(&self, _request: &mut PendingRequest) -> Result<()> {
        Ok(())
    }

    /// Inspect, replace or recover the outcome of a send.
    async fn after_receive(
        &self,
        _request: &mut PendingRequest,
        outcome: Result<ApiResponse>,
        _transport: &dyn Transport,
    ) -> Result<ApiResponse> {
        outcome
    }
}
