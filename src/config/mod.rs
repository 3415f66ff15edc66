//! Configuration types for the GrayCRM client.
//!
//! This module provides the configuration used to reach a GrayCRM instance.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`GrayCrmConfig`]: The validated configuration (host, API key, timeouts, paging, retries)
//! - [`GrayCrmConfigBuilder`]: A builder for constructing [`GrayCrmConfig`] instances
//! - [`ConfigOverrides`]: Per-context overrides merged into a copy of a base configuration
//! - [`ApiKey`]: A validated API key newtype with masked debug output
//! - [`Host`]: A validated host / origin
//!
//! # Example
//!
//! ```rust
//! use graycrm::{ApiKey, GrayCrmConfig, Host};
//!
//! let config = GrayCrmConfig::builder()
//!     .host(Host::new("acme.graycrm.io").unwrap())
//!     .api_key(ApiKey::new("gcrm_live_abc123").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url(), "https://acme.graycrm.io/api/v1");
//! ```

mod newtypes;

pub use newtypes::{ApiKey, Host};

use std::time::Duration;

use crate::error::ConfigError;

/// Default read timeout for a single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout for a single request.
pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Default page size sent with every list request.
pub const DEFAULT_PER_PAGE: u32 = 25;

/// Path prefix of the versioned REST API.
pub const API_PATH: &str = "/api/v1";

/// Configuration for the GrayCRM client.
///
/// A `GrayCrmConfig` always carries a non-empty host and API key: both are
/// validated newtypes and [`GrayCrmConfigBuilder::build`] refuses to produce
/// a configuration without them.
///
/// # Thread Safety
///
/// `GrayCrmConfig` is `Clone`, `Send`, and `Sync`. Per-context variations are
/// produced with [`with_overrides`](Self::with_overrides), which returns a new
/// value and leaves the original untouched.
#[derive(Clone, Debug)]
pub struct GrayCrmConfig {
    host: Host,
    api_key: ApiKey,
    timeout: Duration,
    open_timeout: Duration,
    per_page: u32,
    max_retries: u32,
    user_agent_prefix: Option<String>,
}

impl GrayCrmConfig {
    /// Creates a new builder for constructing a `GrayCrmConfig`.
    #[must_use]
    pub fn builder() -> GrayCrmConfigBuilder {
        GrayCrmConfigBuilder::new()
    }

    /// Returns the host.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the read timeout applied to every request.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the connect timeout applied to every request.
    #[must_use]
    pub const fn open_timeout(&self) -> Duration {
        self.open_timeout
    }

    /// Returns the default page size for list requests.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Returns how many times a rate-limited request is resent (0 = never).
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the base URL every request path is appended to.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}{API_PATH}", self.host.origin())
    }

    /// Returns a copy of this configuration with the given overrides applied.
    ///
    /// Unset override fields keep the value from `self`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graycrm::{ApiKey, ConfigOverrides, GrayCrmConfig, Host};
    ///
    /// let base = GrayCrmConfig::builder()
    ///     .host(Host::new("acme.graycrm.io").unwrap())
    ///     .api_key(ApiKey::new("gcrm_live_base").unwrap())
    ///     .build()
    ///     .unwrap();
    ///
    /// let tenant = base.with_overrides(ConfigOverrides {
    ///     api_key: Some(ApiKey::new("gcrm_live_tenant").unwrap()),
    ///     ..Default::default()
    /// });
    ///
    /// assert_eq!(tenant.api_key().as_ref(), "gcrm_live_tenant");
    /// assert_eq!(base.api_key().as_ref(), "gcrm_live_base");
    /// assert_eq!(tenant.host(), base.host());
    /// ```
    #[must_use]
    pub fn with_overrides(&self, overrides: ConfigOverrides) -> Self {
        Self {
            host: overrides.host.unwrap_or_else(|| self.host.clone()),
            api_key: overrides.api_key.unwrap_or_else(|| self.api_key.clone()),
            timeout: overrides.timeout.unwrap_or(self.timeout),
            open_timeout: overrides.open_timeout.unwrap_or(self.open_timeout),
            per_page: overrides
                .per_page
                .filter(|n| *n > 0)
                .unwrap_or(self.per_page),
            max_retries: overrides.max_retries.unwrap_or(self.max_retries),
            user_agent_prefix: overrides
                .user_agent_prefix
                .or_else(|| self.user_agent_prefix.clone()),
        }
    }
}

// Verify GrayCrmConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GrayCrmConfig>();
};

/// Optional replacements for a base [`GrayCrmConfig`].
///
/// Used to derive a tenant- or request-scoped configuration without mutating
/// the shared default. A `per_page` override of zero is ignored.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Replacement host.
    pub host: Option<Host>,
    /// Replacement API key.
    pub api_key: Option<ApiKey>,
    /// Replacement read timeout.
    pub timeout: Option<Duration>,
    /// Replacement connect timeout.
    pub open_timeout: Option<Duration>,
    /// Replacement default page size.
    pub per_page: Option<u32>,
    /// Replacement retry budget for rate-limited requests.
    pub max_retries: Option<u32>,
    /// Replacement user agent prefix.
    pub user_agent_prefix: Option<String>,
}

/// Builder for constructing [`GrayCrmConfig`] instances.
///
/// Required fields are `host` and `api_key`. All other fields have defaults.
///
/// # Defaults
///
/// - `timeout`: 30 seconds
/// - `open_timeout`: 10 seconds
/// - `per_page`: 25
/// - `max_retries`: 0
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct GrayCrmConfigBuilder {
    host: Option<Host>,
    api_key: Option<ApiKey>,
    timeout: Option<Duration>,
    open_timeout: Option<Duration>,
    per_page: Option<u32>,
    max_retries: Option<u32>,
    user_agent_prefix: Option<String>,
}

impl GrayCrmConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host (required).
    #[must_use]
    pub fn host(mut self, host: Host) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = Some(timeout);
        self
    }

    /// Sets the default page size for list requests.
    #[must_use]
    pub const fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Sets how many times a rate-limited request is resent.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`GrayCrmConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `host` or `api_key`
    /// are not set, and [`ConfigError::InvalidPerPage`] for a zero page size.
    pub fn build(self) -> Result<GrayCrmConfig, ConfigError> {
        let host = self
            .host
            .ok_or(ConfigError::MissingRequiredField { field: "host" })?;
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if per_page == 0 {
            return Err(ConfigError::InvalidPerPage);
        }

        Ok(GrayCrmConfig {
            host,
            api_key,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            open_timeout: self.open_timeout.unwrap_or(DEFAULT_OPEN_TIMEOUT),
            per_page,
            max_retries: self.max_retries.unwrap_or(0),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
