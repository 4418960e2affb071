//! API endpoint configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, InvalidInputError};
use crate::types::BaseUrl;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "WARD_API_URL";

/// Default prefix under which protected endpoints live.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Default path of the anti-forgery token endpoint.
pub const DEFAULT_CSRF_TOKEN_PATH: &str = "/api/csrf-token";

/// Where the protected API and its token endpoint live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the server.
    pub base_url: BaseUrl,
    /// Prefix prepended to request paths.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Path of the anti-forgery token endpoint, relative to the base URL.
    #[serde(default = "default_csrf_token_path")]
    pub csrf_token_path: String,
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

fn default_csrf_token_path() -> String {
    DEFAULT_CSRF_TOKEN_PATH.to_string()
}

impl ApiConfig {
    /// Configuration with the default prefix and token path.
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            api_prefix: default_api_prefix(),
            csrf_token_path: default_csrf_token_path(),
        }
    }

    /// Read the base URL from `WARD_API_URL`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_env_value(std::env::var(API_URL_ENV).ok())
    }

    fn from_env_value(value: Option<String>) -> Result<Self, Error> {
        let value = value.ok_or_else(|| InvalidInputError::BaseUrl {
            value: String::new(),
            reason: format!("{} is not set", API_URL_ENV),
        })?;
        Ok(Self::new(BaseUrl::new(value)?))
    }

    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    pub fn with_csrf_token_path(mut self, path: impl Into<String>) -> Self {
        self.csrf_token_path = path.into();
        self
    }

    /// Resolve a request path under the API prefix.
    ///
    /// Absolute `http(s)` URLs must share the base URL's origin.
    pub fn api_url(&self, path: &str) -> Result<Url, Error> {
        if path.starts_with("http://") || path.starts_with("https://") {
            let url = Url::parse(path).map_err(|e| InvalidInputError::Path {
                value: path.to_string(),
                reason: e.to_string(),
            })?;
            if url.origin() != self.base_url.as_url().origin() {
                return Err(InvalidInputError::Path {
                    value: path.to_string(),
                    reason: format!("not on {}", self.base_url),
                }
                .into());
            }
            return Ok(url);
        }
        let prefix = self.api_prefix.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        self.base_url.join(&format!("{}/{}", prefix, path))
    }

    /// URL of the anti-forgery token endpoint.
    pub fn csrf_token_url(&self) -> Result<Url, Error> {
        self.base_url.join(&self.csrf_token_path)
    }
}
