//! HTTP client for the hotel API hosts.
//!
//! The hotel API is spread over two hosts with different path layouts:
//! the engine host serves versioned endpoints under `/api`, the dump host
//! serves catalog dumps under `/tp`. Which layout applies is decided by
//! the host the client was built for. Every request carries the partner
//! token as a query parameter on top of the access-token header.

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::client::{check_status, decode_body};
use super::shape::query_pairs;
use crate::config::RestConfig;
use crate::endpoints;
use crate::error::{ApiError, ApiResult};

/// HTTP client for `engine.hotellook.com` and `yasen.hotellook.com`.
pub struct HotelsClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL, decides the path layout
    base_url: String,
    /// Partner access token, injected into every query
    token: String,
}

impl HotelsClient {
    /// Create a new client for the given hotel host and token.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        config: &RestConfig,
    ) -> ApiResult<Self> {
        let token = token.into();

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "X-Access-Token",
            header::HeaderValue::from_str(&token)
                .map_err(|e| ApiError::Configuration(format!("Invalid access token: {e}")))?,
        );

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    /// Make a GET request against a bare endpoint name.
    ///
    /// The token is seeded into the query before caller options are
    /// merged, so callers can override it.
    pub async fn get<T: DeserializeOwned>(
        &self,
        version: &str,
        path: &str,
        options: Map<String, Value>,
    ) -> ApiResult<T> {
        let path = build_path(&self.base_url, version, path);
        let url = format!("{}{}", self.base_url, path);
        let query = seeded_query(&self.token, options);

        debug!("GET {}", path);

        let response = self
            .client
            .get(&url)
            .query(&query_pairs(&query))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(format!("Failed to read response: {e}")))?;

        check_status(status, &body)?;
        decode_body(&body)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the access token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Build the host-relative path for a bare endpoint name.
///
/// The dump host routes everything under `/tp` without a version.
fn build_path(base_url: &str, version: &str, path: &str) -> String {
    if base_url.trim_end_matches('/') == endpoints::HOTELS_YASEN_HOST {
        format!("/tp/{path}.json")
    } else {
        format!("/api/{version}/{path}.json")
    }
}

/// Seed the token into the query, caller options winning on collision.
fn seeded_query(token: &str, options: Map<String, Value>) -> Map<String, Value> {
    let mut query = Map::new();
    query.insert("token".to_string(), Value::String(token.to_string()));
    query.extend(options);
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_engine_path_is_versioned() {
        let path = build_path(endpoints::HOTELS_HOST, "v2", "lookup");
        assert_eq!(path, "/api/v2/lookup.json");

        let path = build_path(endpoints::HOTELS_HOST, "v1", "search/start");
        assert_eq!(path, "/api/v1/search/start.json");
    }

    #[test]
    fn test_yasen_path_skips_version() {
        let path = build_path(endpoints::HOTELS_YASEN_HOST, "v2", "public/widget_location_dump");
        assert_eq!(path, "/tp/public/widget_location_dump.json");
    }

    #[test]
    fn test_yasen_host_matches_with_trailing_slash() {
        let host = format!("{}/", endpoints::HOTELS_YASEN_HOST);
        assert_eq!(build_path(&host, "v2", "lookup"), "/tp/lookup.json");
    }

    #[test]
    fn test_token_is_seeded() {
        let query = seeded_query("secret", Map::new());
        assert_eq!(query.get("token"), Some(&json!("secret")));
    }

    #[test]
    fn test_caller_wins_on_token_collision() {
        let mut options = Map::new();
        options.insert("token".to_string(), json!("override"));
        options.insert("query".to_string(), json!("moscow"));

        let query = seeded_query("secret", options);
        assert_eq!(query.get("token"), Some(&json!("override")));
        assert_eq!(query.get("query"), Some(&json!("moscow")));
    }

    #[test]
    fn test_client_construction() {
        let client = HotelsClient::new(
            endpoints::HOTELS_HOST,
            "test_token",
            &RestConfig::default(),
        )
        .unwrap();
        assert_eq!(client.base_url(), endpoints::HOTELS_HOST);
        assert_eq!(client.token(), "test_token");
    }
}
