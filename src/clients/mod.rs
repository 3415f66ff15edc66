//! HTTP client types for GrayCRM API communication.
//!
//! This module provides the transport layer every resource operation goes
//! through. It handles request construction, authentication headers, JSON
//! decoding, status classification, rate-limit retries, and connection reuse.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Client`]: The cheap-to-clone JSON facade and execution context
//! - [`HttpClient`]: The async HTTP client performing the retry loop
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A decoded response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH, DELETE)
//! - [`ConnectionCache`]: Per-context reusable connections
//! - [`HttpError`]: The status-driven error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::{ApiKey, Client, GrayCrmConfig, Host, HttpMethod, HttpRequest};
//!
//! let client = Client::new(
//!     GrayCrmConfig::builder()
//!         .host(Host::new("acme.graycrm.io")?)
//!         .api_key(ApiKey::new("gcrm_live_abc123")?)
//!         .build()?,
//! );
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/contacts")
//!     .query_param("page", "2")
//!     .header("X-Request-Id", "abc")
//!     .build()?;
//!
//! let body = client.send(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! - **429 (Rate Limited)**: Resent up to `max_retries` times, sleeping for the
//!   `Retry-After` header value, or 1 second if not present
//! - **Everything else**: Returned immediately without retry
//!
//! The default `max_retries` is 0, meaning no automatic retries.

mod client;
mod connection;
mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use client::Client;
pub use connection::{ConnectionCache, ConnectionKey, POOL_IDLE_TIMEOUT};
pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, RETRY_WAIT_TIME, SDK_VERSION};
pub use http_request::{flatten_params, HttpMethod, HttpRequest, HttpRequestBuilder, Params};
pub use http_response::{parse_body, HttpResponse};
