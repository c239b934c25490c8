//! HTTP client for the core API host.
//!
//! Carries the access token as a default header, shapes options into the
//! query string or JSON body, and maps non-success statuses and broken
//! payloads to typed errors instead of transport exceptions.

use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::shape::{query_pairs, shape_payload, MergeMode, RequestPayload};
use crate::config::RestConfig;
use crate::error::{ApiError, ApiResult};

/// Header carrying the partner access token.
const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

/// HTTP client for `api.travelpayouts.com`.
///
/// All endpoint paths are host-relative and already carry their API
/// version, so the client only joins them onto the base URL.
pub struct ApiClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for all requests
    base_url: String,
    /// Partner access token, also used for request signatures
    token: String,
}

impl ApiClient {
    /// Create a new client for the given host and token.
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
            ACCESS_TOKEN_HEADER,
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

    /// Execute a request with pre-shaped payload slots.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: RequestPayload,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);

        debug!("{} {}", method, path);

        let mut request = self.client.request(method, &url);
        if let Some(query) = &payload.query {
            let pairs = query_pairs(query);
            if !pairs.is_empty() {
                request = request.query(&pairs);
            }
        }
        if let Some(json) = &payload.json {
            request = request.json(json);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Make a GET request with the options as the query string.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Map<String, Value>,
    ) -> ApiResult<T> {
        let payload = shape_payload(&Method::GET, MergeMode::Replace, options);
        self.execute(Method::GET, path, payload).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> ApiResult<T> {
        let payload = RequestPayload {
            query: None,
            json: Some(body),
        };
        self.execute(Method::POST, path, payload).await
    }

    /// Fetch a JSON document by path or absolute URL.
    ///
    /// Reference data lives on the core host, the currency rates feed on
    /// a standalone one, so absolute URLs pass through untouched.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url)
        };

        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Handle the HTTP response.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
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

/// Map a non-success status to a typed error.
///
/// The API reports failures as a JSON object with a `message` field; when
/// the body is not JSON the message falls back to `unknown`.
pub(crate) fn check_status(status: StatusCode, body: &str) -> ApiResult<()> {
    if status.is_success() {
        return Ok(());
    }

    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());

    Err(ApiError::status(status.as_u16(), message))
}

/// Decode a response body, reporting the raw body on failure.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|_| ApiError::Decode(body.to_string()))
}
