//! Error types for ward.
//!
//! This module provides a unified error type with explicit variants for
//! transport failures, anti-forgery token fetch failures, terminal
//! authorization rejections and input validation errors.

use std::fmt;

use http::StatusCode;
use thiserror::Error;

use crate::request::ApiRequest;
use crate::response::ApiResponse;

/// The unified error type for ward operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or HTTP failure, passed through from the transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The anti-forgery token could not be obtained.
    #[error("anti-forgery token fetch failed: {0}")]
    TokenFetch(#[from] TokenFetchError),

    /// The server still answered `403 Forbidden` after the token was refreshed.
    #[error("authorization rejected: {0}")]
    AuthorizationRejected(Box<StatusError>),

    /// Input validation errors (base URL, path, header values, body).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Transport(TransportError::Status(err)) => Some(err.status()),
            Error::AuthorizationRejected(err) => Some(err.status()),
            Error::TokenFetch(TokenFetchError::Status { status }) => Some(*status),
            _ => None,
        }
    }

    /// Returns the failed response, if the server produced one.
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Error::Transport(TransportError::Status(err)) => Some(err.response()),
            Error::AuthorizationRejected(err) => Some(err.response()),
            _ => None,
        }
    }

    /// Check if this is a terminal authorization rejection.
    pub fn is_authorization_rejected(&self) -> bool {
        matches!(self, Error::AuthorizationRejected(_))
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP error (request building, body decoding).
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The server answered with a non-success status.
    #[error("{0}")]
    Status(Box<StatusError>),
}

impl TransportError {
    /// Returns the HTTP status if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Status(err) => Some(err.status()),
            _ => None,
        }
    }
}

impl From<StatusError> for TransportError {
    fn from(err: StatusError) -> Self {
        TransportError::Status(Box::new(err))
    }
}

/// A non-success response together with the request that produced it.
#[derive(Debug, Clone)]
pub struct StatusError {
    request: ApiRequest,
    response: ApiResponse,
}

impl StatusError {
    /// Create a new status error.
    pub fn new(request: ApiRequest, response: ApiResponse) -> Self {
        Self { request, response }
    }

    /// HTTP status code of the response.
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// The request as it was sent.
    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// The response as it was received.
    pub fn response(&self) -> &ApiResponse {
        &self.response
    }

    /// Server-provided error message, read from a JSON `message` or `error` field.
    pub fn message(&self) -> Option<String> {
        let body: serde_json::Value = self.response.json().ok()?;
        body.get("message")
            .or_else(|| body.get("error"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP {} for {} {}",
            self.status(),
            self.request.method(),
            self.request.url()
        )?;
        if let Some(message) = self.message() {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for StatusError {}

/// Failures while fetching a fresh anti-forgery token.
#[derive(Debug, Error)]
pub enum TokenFetchError {
    /// The token endpoint could not be reached.
    #[error("token endpoint unreachable: {0}")]
    Unreachable(#[source] TransportError),

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned HTTP {status}")]
    Status { status: StatusCode },

    /// The response body did not carry a usable token.
    #[error("malformed token response: {reason}")]
    Malformed { reason: String },
}

impl From<TransportError> for TokenFetchError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status(err) => TokenFetchError::Status {
                status: err.status(),
            },
            other => TokenFetchError::Unreachable(other),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Path could not be joined onto the base URL.
    #[error("invalid path '{value}': {reason}")]
    Path { value: String, reason: String },

    /// Invalid HTTP method.
    #[error("invalid HTTP method '{value}'")]
    Method { value: String },

    /// Header name or value is not valid HTTP.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// Request body could not be encoded.
    #[error("invalid request body: {reason}")]
    Body { reason: String },
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, Method};

    use super::*;
    use crate::types::BaseUrl;

    fn forbidden(body: &str) -> StatusError {
        let url = BaseUrl::new("https://app.example.com")
            .unwrap()
            .join("/api/items")
            .unwrap();
        let request = ApiRequest::new(Method::POST, url);
        let response = ApiResponse::new(
            StatusCode::FORBIDDEN,
            HeaderMap::new(),
            body.as_bytes().to_vec(),
        );
        StatusError::new(request, response)
    }

    #[test]
    fn status_error_display_includes_server_message() {
        let err = forbidden(r#"{"message":"invalid csrf token"}"#);
        let text = err.to_string();
        assert!(text.contains("403"));
        assert!(text.contains("POST https://app.example.com/api/items"));
        assert!(text.ends_with("invalid csrf token"));
    }

    #[test]
    fn status_error_without_json_body_has_no_message() {
        let err = forbidden("Forbidden");
        assert_eq!(err.message(), None);
    }

    #[test]
    fn status_failure_maps_to_token_fetch_status() {
        let err = TokenFetchError::from(TransportError::from(forbidden("")));
        assert!(matches!(
            err,
            TokenFetchError::Status {
                status: StatusCode::FORBIDDEN
            }
        ));
    }

    #[test]
    fn error_status_is_exposed_for_rejections() {
        let err = Error::AuthorizationRejected(Box::new(forbidden("")));
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert!(err.is_authorization_rejected());
        assert!(err.response().is_some());
    }
}
