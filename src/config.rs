//! Configuration types.
//!
//! These types are designed to be deserialized from TOML configuration files.
//! The API token is loaded from an environment variable unless set inline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoints;
use crate::error::{ApiError, ApiResult};

/// Top-level SDK configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelConfig {
    /// Base URL for the flights/data/statistics API
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// Base URL for the hotels API (primary or yasen host)
    #[serde(default = "default_hotels_host")]
    pub hotels_host: String,
    /// Affiliate marker, exposed by the facade for seeding search requests
    #[serde(default)]
    pub marker: Option<String>,
    /// REST transport configuration
    #[serde(default)]
    pub rest: RestConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_api_host() -> String {
    endpoints::API_HOST.to_string()
}

fn default_hotels_host() -> String {
    endpoints::HOTELS_HOST.to_string()
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            api_host: default_api_host(),
            hotels_host: default_hotels_host(),
            marker: None,
            rest: RestConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl TravelConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ApiResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ApiError::Configuration(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        toml::from_str(&raw)
            .map_err(|e| ApiError::Configuration(format!("Failed to parse config: {}", e)))
    }
}

/// REST transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RestConfig {
    /// Returns the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Authentication configuration.
///
/// The token is read from an environment variable for security; an inline
/// token takes precedence when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Inline API token; overrides the environment variable
    #[serde(default)]
    pub token: Option<String>,
}

fn default_token_env() -> String {
    "TRAVELPAYOUTS_TOKEN".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
            token: None,
        }
    }
}

impl AuthConfig {
    /// Resolve the API token from the inline value or the environment.
    pub fn load_token(&self) -> ApiResult<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        std::env::var(&self.token_env).map_err(|_| {
            ApiError::Configuration(format!("API token not found in ${}", self.token_env))
        })
    }

    /// Returns true if a token is available.
    pub fn has_token(&self) -> bool {
        self.token.is_some() || std::env::var(&self.token_env).is_ok()
    }
}
