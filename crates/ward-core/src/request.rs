//! Outgoing request types.

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use url::Url;

use crate::error::InvalidInputError;

/// Whether a method implies a server-side state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// POST, PUT, DELETE or PATCH.
    Mutating,
    /// Everything else (GET, HEAD, OPTIONS, ...).
    Safe,
}

impl RequestClass {
    const MUTATING: [&'static str; 4] = ["POST", "PUT", "DELETE", "PATCH"];

    /// Classify a method, ignoring ASCII case.
    pub fn of(method: &Method) -> Self {
        let name = method.as_str();
        if Self::MUTATING
            .iter()
            .any(|m| m.eq_ignore_ascii_case(name))
        {
            RequestClass::Mutating
        } else {
            RequestClass::Safe
        }
    }

    /// Returns true for mutating requests.
    pub fn is_mutating(self) -> bool {
        self == RequestClass::Mutating
    }
}

/// Parse a method name, normalizing it to upper case.
pub fn parse_method(value: &str) -> Result<Method, InvalidInputError> {
    Method::from_bytes(value.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
        InvalidInputError::Method {
            value: value.to_string(),
        }
    })
}

/// An HTTP request as handed to the transport.
///
/// Header values set by this crate for credentials are marked sensitive,
/// so `Debug` output never shows them.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request with no headers and no body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Create a GET request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Add a header, replacing any previous value.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a header from strings, validating both parts.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, InvalidInputError> {
        let header_name =
            HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| InvalidInputError::Header {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value =
            HeaderValue::from_str(value.trim()).map_err(|e| InvalidInputError::Header {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(self.with_header(header_name, header_value))
    }

    /// Set a JSON body, adding `Content-Type: application/json` if none is set.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, InvalidInputError> {
        let body = serde_json::to_vec(value).map_err(|e| InvalidInputError::Body {
            reason: e.to_string(),
        })?;
        if !self.headers.contains_key(CONTENT_TYPE) {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        self.body = Some(body);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Classification of this request's method.
    pub fn class(&self) -> RequestClass {
        RequestClass::of(&self.method)
    }
}

/// Which send of a logical request this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attempt {
    /// The original send.
    #[default]
    First,
    /// The single resubmission after an anti-forgery rejection.
    Retry,
}

/// A request travelling through the interceptor chain.
///
/// The attempt marker lives here rather than on the caller's request, so it
/// is scoped to one logical request and moves from `First` to `Retry` at
/// most once.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    request: ApiRequest,
    attempt: Attempt,
}

impl PendingRequest {
    pub fn new(request: ApiRequest) -> Self {
        Self {
            request,
            attempt: Attempt::First,
        }
    }

    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut ApiRequest {
        &mut self.request
    }

    pub fn attempt(&self) -> Attempt {
        self.attempt
    }

    /// Returns true once the request has been resubmitted.
    pub fn is_retried(&self) -> bool {
        self.attempt == Attempt::Retry
    }

    /// Move to the retry attempt.
    ///
    /// Returns false, leaving the request untouched, if it was already retried.
    pub fn begin_retry(&mut self) -> bool {
        match self.attempt {
            Attempt::First => {
                self.attempt = Attempt::Retry;
                true
            }
            Attempt::Retry => false,
        }
    }
}
