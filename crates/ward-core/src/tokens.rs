//! Token types for request authentication.

use std::fmt;

use http::HeaderValue;

use crate::error::InvalidInputError;

/// A bearer session token identifying the authenticated user.
///
/// Session tokens are issued by an external login flow; this crate only
/// reads them from the credential store.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a new session token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token value.
    ///
    /// # Security
    ///
    /// Use only when constructing authorization headers or persisting state.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the `Authorization: Bearer ...` header value, marked sensitive.
    pub fn bearer_header(&self) -> Result<HeaderValue, InvalidInputError> {
        sensitive_value("authorization", &format!("Bearer {}", self.0))
    }
}

// Hide token value in Debug output
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}

/// An anti-forgery (CSRF) token bound to the current session.
///
/// The server may invalidate it at any time; the only signal is a
/// `403 Forbidden` on the next request that carries it. Construction
/// validates that the value can travel in an HTTP header.
///
/// # Security
///
/// - Never logged or displayed in Debug output
#[derive(Clone, PartialEq, Eq)]
pub struct AntiforgeryToken {
    value: String,
    header: HeaderValue,
}

impl AntiforgeryToken {
    /// Create a new anti-forgery token.
    ///
    /// # Errors
    ///
    /// Returns an error if the value contains characters not allowed in a header.
    pub fn new(token: impl Into<String>) -> Result<Self, InvalidInputError> {
        let value = token.into();
        let header = sensitive_value(crate::XSRF_HEADER.as_str(), &value)?;
        Ok(Self { value, header })
    }

    /// Returns the raw token value.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Header value for `X-XSRF-TOKEN`, marked sensitive.
    pub fn header_value(&self) -> HeaderValue {
        self.header.clone()
    }
}

impl fmt::Debug for AntiforgeryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AntiforgeryToken").field(&"[REDACTED]").finish()
    }
}

fn sensitive_value(name: &str, value: &str) -> Result<HeaderValue, InvalidInputError> {
    let mut header = HeaderValue::from_str(value).map_err(|e| InvalidInputError::Header {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    header.set_sensitive(true);
    Ok(header)
}
