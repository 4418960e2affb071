//! Credential attachment and anti-forgery recovery.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use http::header::AUTHORIZATION;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{Error, TransportError};
use crate::request::{PendingRequest, RequestClass};
use crate::response::ApiResponse;
use crate::store::CredentialStore;
use crate::traits::{Interceptor, Transport};
use crate::{Result, XSRF_HEADER};

use super::AntiforgeryTokenSupplier;

/// How the authenticator treats the outcome of a send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The response succeeded; pass it through.
    Success,
    /// First `403 Forbidden`: refresh the token and resubmit once.
    RejectedRetriable,
    /// `403 Forbidden` on the resubmission: surface as a rejection.
    RejectedTerminal,
    /// Any other failure; pass it through.
    OtherError,
}

impl Disposition {
    /// Classify an outcome for the given request.
    pub fn classify(request: &PendingRequest, outcome: &Result<ApiResponse>) -> Self {
        match outcome {
            Ok(_) => Disposition::Success,
            Err(Error::Transport(TransportError::Status(err)))
                if err.status() == StatusCode::FORBIDDEN =>
            {
                if request.is_retried() {
                    Disposition::RejectedTerminal
                } else {
                    Disposition::RejectedRetriable
                }
            }
            Err(Error::AuthorizationRejected(_)) => Disposition::RejectedTerminal,
            Err(_) => Disposition::OtherError,
        }
    }
}

/// Interceptor attaching the session and anti-forgery tokens.
///
/// Before sending, the bearer token is attached when one is stored.
/// Mutating requests always get a freshly fetched anti-forgery token; safe
/// requests reuse the cached one, if any. A `403 Forbidden` triggers one
/// refresh-and-resubmit; a second `403` becomes
/// [`Error::AuthorizationRejected`].
#[derive(Clone)]
pub struct RequestAuthenticator {
    store: Arc<dyn CredentialStore>,
    supplier: AntiforgeryTokenSupplier,
}

impl RequestAuthenticator {
    pub fn new(store: Arc<dyn CredentialStore>, supplier: AntiforgeryTokenSupplier) -> Self {
        Self { store, supplier }
    }

    /// Refresh the token and resubmit a request already marked as retried.
    async fn retry(
        &self,
        request: &mut PendingRequest,
        transport: &dyn Transport,
    ) -> Result<ApiResponse> {
        info!("Anti-forgery rejection, refreshing token and retrying once");

        // A refresh failure replaces the 403.
        let token = self.supplier.refresh().await?;
        request
            .request_mut()
            .headers_mut()
            .insert(XSRF_HEADER, token.header_value());

        let outcome = transport.send(request.request()).await.map_err(Error::from);
        match Disposition::classify(request, &outcome) {
            Disposition::RejectedTerminal => terminal(outcome),
            _ => outcome,
        }
    }
}

/// Convert a `403` outcome into a terminal rejection.
fn terminal(outcome: Result<ApiResponse>) -> Result<ApiResponse> {
    match outcome {
        Err(Error::Transport(TransportError::Status(err))) => {
            warn!(status = %err.status(), "Request rejected after token refresh");
            Err(Error::AuthorizationRejected(err))
        }
        other => other,
    }
}

#[async_trait]
impl Interceptor for RequestAuthenticator {
    #[instrument(skip_all, fields(method = %request.request().method(), url = %request.request().url()))]
    async fn before_send(&self, request: &mut PendingRequest) -> Result<()> {
        if let Some(session) = self.store.session_token() {
            let value = session.bearer_header()?;
            request.request_mut().headers_mut().insert(AUTHORIZATION, value);
            trace!("Attached bearer token");
        }

        match request.request().class() {
            RequestClass::Mutating => match self.supplier.refresh().await {
                Ok(token) => {
                    request
                        .request_mut()
                        .headers_mut()
                        .insert(XSRF_HEADER, token.header_value());
                    trace!("Attached fresh anti-forgery token");
                }
                Err(e) => {
                    warn!(error = %e, "Proceeding without anti-forgery token");
                }
            },
            RequestClass::Safe => match self.store.antiforgery_token() {
                Some(token) => {
                    request
                        .request_mut()
                        .headers_mut()
                        .insert(XSRF_HEADER, token.header_value());
                    trace!("Attached cached anti-forgery token");
                }
                None => debug!("No cached anti-forgery token"),
            },
        }

        Ok(())
    }

    async fn after_receive(
        &self,
        request: &mut PendingRequest,
        outcome: Result<ApiResponse>,
        transport: &dyn Transport,
    ) -> Result<ApiResponse> {
        match Disposition::classify(request, &outcome) {
            Disposition::Success | Disposition::OtherError => outcome,
            Disposition::RejectedRetriable if request.begin_retry() => {
                self.retry(request, transport).await
            }
            Disposition::RejectedRetriable | Disposition::RejectedTerminal => terminal(outcome),
        }
    }
}

impl fmt::Debug for RequestAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestAuthenticator")
            .field("supplier", &self.supplier)
            .finish_non_exhaustive()
    }
}
