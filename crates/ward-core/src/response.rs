//! Response type returned by transports.

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::TransportError;

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(|e| TransportError::Http {
            message: format!("invalid JSON body: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_json_body() {
        let response = ApiResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            br#"{"token":"abc"}"#.to_vec(),
        );
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["token"], "abc");
        assert!(response.is_success());
    }

    #[test]
    fn invalid_json_is_http_error() {
        let response = ApiResponse::new(StatusCode::OK, HeaderMap::new(), b"<html>".to_vec());
        let result: Result<serde_json::Value, _> = response.json();
        assert!(matches!(result, Err(TransportError::Http { .. })));
        assert_eq!(response.text(), "<html>");
    }
}
