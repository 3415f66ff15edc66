//! HTTP client for GrayCRM API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the GrayCRM API with bounded rate-limit retries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::clients::connection::{ConnectionCache, ConnectionKey};
use crate::clients::errors::{HttpError, InvalidHttpRequestError};
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::{parse_body, HttpResponse};
use crate::config::GrayCrmConfig;

/// Wait time in seconds when a 429 response carries no `Retry-After`.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the GrayCRM API.
///
/// The client handles:
/// - URL construction from the configured origin and `/api/v1`
/// - Default headers including the bearer token and User-Agent
/// - Connection reuse through its context's [`ConnectionCache`]
/// - Bounded retries for 429 responses
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Debug)]
pub struct HttpClient {
    config: Arc<GrayCrmConfig>,
    connections: Arc<ConnectionCache>,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for a configuration and connection cache.
    #[must_use]
    pub fn new(config: Arc<GrayCrmConfig>, connections: Arc<ConnectionCache>) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}graycrm-rust/{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", config.api_key().as_ref()),
        );
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("User-Agent".to_string(), user_agent);

        Self {
            config,
            connections,
            default_headers,
        }
    }

    /// Returns the configuration this client sends with.
    #[must_use]
    pub fn config(&self) -> &GrayCrmConfig {
        &self.config
    }

    /// Returns the connection cache of this client's context.
    #[must_use]
    pub fn connections(&self) -> &ConnectionCache {
        &self.connections
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the GrayCRM API.
    ///
    /// This method handles:
    /// - Request validation
    /// - Header merging (request headers override the defaults)
    /// - Response decoding and status classification
    /// - Retry logic for 429 responses
    ///
    /// A 429 response is retried up to `max_retries` times, sleeping for its
    /// `Retry-After` seconds (or [`RETRY_WAIT_TIME`]) before resending the
    /// identical request. When the budget is spent the rate-limit error is
    /// returned with its `retry_after` hint. No other status is retried.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if validation fails, the connection fails, or the
    /// final response is not 2xx.
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = format!("{}{}", self.config.base_url(), request.path);
        let headers = self.merged_headers(&request)?;
        let connection = self
            .connections
            .connection(&ConnectionKey::for_config(&self.config))?;

        let mut retries: u32 = 0;
        loop {
            let response = Self::send_once(&connection, &url, &headers, &request).await?;
            if response.is_ok() {
                return Ok(response);
            }

            let error =
                HttpError::from_response(response.code, &response.body, response.retry_after);

            if let HttpError::RateLimited { retry_after, .. } = &error {
                if retries < self.config.max_retries() {
                    retries += 1;
                    let wait = retry_after.unwrap_or(RETRY_WAIT_TIME);
                    tracing::warn!(
                        attempt = retries,
                        wait_seconds = wait,
                        path = %request.path,
                        "Rate limited by GrayCRM, retrying"
                    );
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                    continue;
                }
            }

            return Err(error);
        }
    }

    async fn send_once(
        connection: &reqwest::Client,
        url: &str,
        headers: &HeaderMap,
        request: &HttpRequest,
    ) -> Result<HttpResponse, HttpError> {
        tracing::debug!(
            method = %request.http_method,
            path = %request.path,
            "Sending GrayCRM request"
        );

        let mut req_builder = connection
            .request(request.http_method.into(), url)
            .headers(headers.clone());

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        tracing::debug!(
            status = code,
            bytes = body_text.len(),
            path = %request.path,
            "Received GrayCRM response"
        );

        Ok(HttpResponse::new(code, res_headers, parse_body(&body_text)))
    }

    /// Builds the outgoing header map.
    ///
    /// Header names are case-insensitive, so a request header replaces a
    /// default of the same name regardless of spelling.
    fn merged_headers(&self, request: &HttpRequest) -> Result<HeaderMap, InvalidHttpRequestError> {
        let mut headers = HeaderMap::new();
        let pairs = self
            .default_headers
            .iter()
            .chain(request.extra_headers.iter().map(|(k, v)| (k, v)));

        for (name, value) in pairs {
            let invalid = || InvalidHttpRequestError::InvalidHeader { name: name.clone() };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
