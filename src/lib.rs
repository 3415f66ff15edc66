//! # GrayCRM Rust Client
//!
//! A Rust client for the GrayCRM REST API, providing type-safe configuration,
//! an HTTP layer with rate-limit retries, and record types with lazy,
//! paginated queries.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`GrayCrmConfig`] and [`GrayCrmConfigBuilder`]
//! - Validated newtypes for the API key and host
//! - A cloneable [`Client`] with per-tenant overrides and pooled connections
//! - Typed errors mapped from HTTP status codes ([`HttpError`])
//! - Record types with CRUD and dirty tracking via [`rest::Resource`]
//! - Lazy, memoized queries via [`rest::Relation`] with offset and cursor
//!   pagination
//! - Nested sub-resources that remember the path they were loaded from
//!
//! ## Quick Start
//!
//! ```rust
//! use graycrm::{ApiKey, Client, GrayCrmConfig, Host};
//!
//! let config = GrayCrmConfig::builder()
//!     .host(Host::new("acme.graycrm.io").unwrap())
//!     .api_key(ApiKey::new("gcrm_live_abc123").unwrap())
//!     .per_page(50)
//!     .build()
//!     .unwrap();
//!
//! let client = Client::new(config);
//! assert_eq!(client.config().base_url(), "https://acme.graycrm.io/api/v1");
//! ```
//!
//! ## Working With Records
//!
//! ```rust,ignore
//! use graycrm::rest::{Filters, Resource};
//! use graycrm::resources::Contact;
//!
//! // Lazy query, sent on first access and memoized afterwards
//! let vips = Contact::filter(&client, Filters::new().tag("vip")).per(100);
//! for contact in vips.items().await? {
//!     println!("{:?} {:?}", contact.first_name(), contact.email());
//! }
//!
//! // Walk every page
//! let mut pages = Contact::all(&client).pages();
//! while let Some(page) = pages.next().await {
//!     let page = page?;
//!     println!("page {:?}: {} contacts", page.current_page(), page.len());
//! }
//!
//! // Validation failures are recorded, not raised, by `save`
//! let mut contact = Contact::new();
//! contact.set_first_name("");
//! if !contact.save(&client).await? {
//!     println!("{:?}", contact.errors());
//! }
//! ```
//!
//! ## Multiple Tenants
//!
//! ```rust
//! use graycrm::{ApiKey, Client, ConfigOverrides, GrayCrmConfig, Host};
//!
//! let config = GrayCrmConfig::builder()
//!     .host(Host::new("acme.graycrm.io").unwrap())
//!     .api_key(ApiKey::new("gcrm_live_acme").unwrap())
//!     .build()
//!     .unwrap();
//! let acme = Client::new(config);
//!
//! let globex = acme.with_overrides(ConfigOverrides {
//!     host: Some(Host::new("globex.graycrm.io").unwrap()),
//!     api_key: Some(ApiKey::new("gcrm_live_globex").unwrap()),
//!     ..Default::default()
//! });
//!
//! assert_eq!(globex.config().host().host_name(), "globex.graycrm.io");
//! assert_eq!(acme.config().host().host_name(), "acme.graycrm.io");
//! ```
//!
//! ## Logging
//!
//! Requests, retries, and connection setup are reported through
//! [`tracing`]. Install any subscriber to see them.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration lives in the [`Client`] passed to every call
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

pub use rest::resources;

// Re-export public types at crate root for convenience
pub use config::{ApiKey, ConfigOverrides, GrayCrmConfig, GrayCrmConfigBuilder, Host};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    flatten_params, parse_body, Client, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpRequestBuilder, HttpResponse, HttpResponseError, InvalidHttpRequestError, Params,
};

// Re-export resource layer types
pub use rest::{Collection, Filters, Pages, Pagination, Record, Relation, Resource, ResourceError};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::Value;
}
