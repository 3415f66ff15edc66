//! The GrayCRM client and execution context.
//!
//! This module provides the [`Client`] type, the JSON facade every resource
//! operation goes through.

use std::sync::Arc;

use serde_json::Value;

use crate::clients::connection::ConnectionCache;
use crate::clients::errors::HttpError;
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{HttpMethod, HttpRequest, Params};
use crate::config::{ConfigOverrides, GrayCrmConfig};

/// A GrayCRM client bound to one logical execution context.
///
/// A `Client` is cheap to clone: clones share the same configuration and
/// connection cache, so they belong to the same context. Use
/// [`with_overrides`](Self::with_overrides) to derive an isolated context for
/// another tenant or request scope; it never touches the original.
///
/// Every method sends exactly one logical request (plus any bounded 429
/// retries) and returns the decoded body. An empty body decodes to
/// `Value::Null`.
///
/// # Thread Safety
///
/// `Client` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use graycrm::{ApiKey, Client, GrayCrmConfig, Host};
///
/// let config = GrayCrmConfig::builder()
///     .host(Host::new("acme.graycrm.io")?)
///     .api_key(ApiKey::new("gcrm_live_abc123")?)
///     .build()?;
/// let client = Client::new(config);
///
/// let body = client.get("/contacts/abc", None).await?;
/// println!("{}", body["data"]["first_name"]);
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    http_client: Arc<HttpClient>,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a client with its own, initially empty, connection cache.
    #[must_use]
    pub fn new(config: GrayCrmConfig) -> Self {
        Self::from_parts(Arc::new(config), Arc::new(ConnectionCache::new()))
    }

    fn from_parts(config: Arc<GrayCrmConfig>, connections: Arc<ConnectionCache>) -> Self {
        Self {
            http_client: Arc::new(HttpClient::new(config, connections)),
        }
    }

    /// Returns the configuration of this context.
    #[must_use]
    pub fn config(&self) -> &GrayCrmConfig {
        self.http_client.config()
    }

    /// Derives an isolated context with the given overrides applied.
    ///
    /// The returned client has a fresh connection cache. Neither the
    /// configuration nor the cache of `self` is affected.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graycrm::{ApiKey, Client, ConfigOverrides, GrayCrmConfig, Host};
    ///
    /// let base = Client::new(
    ///     GrayCrmConfig::builder()
    ///         .host(Host::new("acme.graycrm.io").unwrap())
    ///         .api_key(ApiKey::new("gcrm_live_abc123").unwrap())
    ///         .build()
    ///         .unwrap(),
    /// );
    ///
    /// let tenant = base.with_overrides(ConfigOverrides {
    ///     host: Some(Host::new("beta.graycrm.io").unwrap()),
    ///     ..ConfigOverrides::default()
    /// });
    ///
    /// assert_eq!(tenant.config().host().host_name(), "beta.graycrm.io");
    /// assert_eq!(base.config().host().host_name(), "acme.graycrm.io");
    /// ```
    #[must_use]
    pub fn with_overrides(&self, overrides: ConfigOverrides) -> Self {
        let config = self.config().with_overrides(overrides);
        Self::from_parts(Arc::new(config), Arc::new(ConnectionCache::new()))
    }

    /// Returns the number of connections opened by this context so far.
    #[must_use]
    pub fn cached_connections(&self) -> usize {
        self.http_client.connections().len()
    }

    /// Sends a GET request with optional query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for invalid paths, network failures, and non-2xx
    /// responses.
    pub async fn get(&self, path: &str, params: Option<&Params>) -> Result<Value, HttpError> {
        let mut builder = HttpRequest::builder(HttpMethod::Get, path);
        if let Some(params) = params {
            builder = builder.params(params);
        }
        self.send(builder.build()?).await
    }

    /// Sends a POST request with an optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for invalid paths, network failures, and non-2xx
    /// responses.
    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<Value, HttpError> {
        let mut builder = HttpRequest::builder(HttpMethod::Post, path);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        self.send(builder.build()?).await
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for invalid paths, network failures, and non-2xx
    /// responses.
    pub async fn patch(&self, path: &str, body: Value) -> Result<Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Patch, path)
            .body(body)
            .build()?;
        self.send(request).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for invalid paths, network failures, and non-2xx
    /// responses.
    pub async fn delete(&self, path: &str) -> Result<Value, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, path).build()?;
        self.send(request).await
    }

    /// Sends a fully built request and returns its decoded body.
    ///
    /// Use this for requests that need extra headers.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for invalid requests, network failures, and
    /// non-2xx responses.
    pub async fn send(&self, request: HttpRequest) -> Result<Value, HttpError> {
        let response = self.http_client.request(request).await?;
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, Host};

    fn create_test_client() -> Client {
        Client::new(
            GrayCrmConfig::builder()
                .host(Host::new("acme.graycrm.io").unwrap())
                .api_key(ApiKey::new("gcrm_test_key").unwrap())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_clones_share_context() {
        let client = create_test_client();
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.http_client, &clone.http_client));
    }

    #[test]
    fn test_overrides_create_isolated_context() {
        let client = create_test_client();
        let other = client.with_overrides(ConfigOverrides {
            api_key: Some(ApiKey::new("gcrm_other_key").unwrap()),
            ..ConfigOverrides::default()
        });

        assert!(!Arc::ptr_eq(&client.http_client, &other.http_client));
        assert_eq!(client.config().api_key().as_ref(), "gcrm_test_key");
        assert_eq!(other.config().api_key().as_ref(), "gcrm_other_key");
        assert_eq!(other.cached_connections(), 0);
    }

    #[tokio::test]
    async fn test_relative_path_is_rejected_before_sending() {
        let client = create_test_client();
        let result = client.get("contacts", None).await;
        assert!(matches!(result, Err(HttpError::InvalidRequest(_))));
        assert_eq!(client.cached_connections(), 0);
    }
}
