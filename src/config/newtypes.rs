//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use reqwest::Url;
use std::fmt;

/// A validated GrayCRM API key.
///
/// This newtype ensures the API key is non-empty and masks its value in
/// debug output to prevent accidental exposure in logs.
///
/// # Example
///
/// ```rust
/// use graycrm::ApiKey;
///
/// let key = ApiKey::new("gcrm_live_abc123").unwrap();
/// assert_eq!(key.as_ref(), "gcrm_live_abc123");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(*****)")
    }
}

/// A validated GrayCRM host.
///
/// Accepts either a bare host name (`acme.graycrm.io`, optionally with a
/// port), which is served over HTTPS, or an explicit `http://` / `https://`
/// origin, which is used verbatim. The explicit form exists for local
/// deployments and mock servers.
///
/// # Example
///
/// ```rust
/// use graycrm::Host;
///
/// let host = Host::new("acme.graycrm.io").unwrap();
/// assert_eq!(host.origin(), "https://acme.graycrm.io");
/// assert_eq!(host.host_name(), "acme.graycrm.io");
/// assert_eq!(host.port(), 443);
///
/// let local = Host::new("http://127.0.0.1:8080").unwrap();
/// assert_eq!(local.origin(), "http://127.0.0.1:8080");
/// assert_eq!(local.port(), 8080);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Host {
    raw: String,
    origin: String,
    host_name: String,
    port: u16,
}

impl Host {
    /// Creates a new validated host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyHost`] if the host is empty, or
    /// [`ConfigError::InvalidHost`] if it contains whitespace, uses a scheme
    /// other than `http`/`https`, or carries a path.
    pub fn new(host: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = host.into();
        if raw.is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        let invalid = || ConfigError::InvalidHost { host: raw.clone() };

        if raw.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let origin = if raw.contains("://") {
            raw.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", raw.trim_end_matches('/'))
        };

        let url = Url::parse(&origin).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.path() != "/" {
            return Err(invalid());
        }

        let host_name = url.host_str().ok_or_else(invalid)?.to_string();
        let port = url.port_or_known_default().ok_or_else(invalid)?;

        Ok(Self {
            raw,
            origin,
            host_name,
            port,
        })
    }

    /// Returns the origin requests are sent to (scheme, host, and port).
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the host name without scheme or port.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Returns the port, defaulting to the scheme's well-known port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl AsRef<str> for Host {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty() {
        assert_eq!(ApiKey::new(""), Err(ConfigError::EmptyApiKey));
    }

    #[test]
    fn test_api_key_debug_is_masked() {
        let key = ApiKey::new("gcrm_live_secret").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("gcrm_live_secret"));
    }

    #[test]
    fn test_host_rejects_empty() {
        assert_eq!(Host::new(""), Err(ConfigError::EmptyHost));
    }

    #[test]
    fn test_bare_host_uses_https() {
        let host = Host::new("demo.graycrm.io").unwrap();
        assert_eq!(host.origin(), "https://demo.graycrm.io");
        assert_eq!(host.as_ref(), "demo.graycrm.io");
    }

    #[test]
    fn test_bare_host_with_port() {
        let host = Host::new("demo.graycrm.io:8443").unwrap();
        assert_eq!(host.host_name(), "demo.graycrm.io");
        assert_eq!(host.port(), 8443);
    }

    #[test]
    fn test_explicit_origin_trailing_slash_is_trimmed() {
        let host = Host::new("http://localhost:3000/").unwrap();
        assert_eq!(host.origin(), "http://localhost:3000");
        assert_eq!(host.port(), 3000);
    }

    #[test]
    fn test_host_rejects_other_schemes_and_paths() {
        assert!(matches!(
            Host::new("ftp://files.example.com"),
            Err(ConfigError::InvalidHost { .. })
        ));
        assert!(matches!(
            Host::new("https://acme.graycrm.io/api"),
            Err(ConfigError::InvalidHost { .. })
        ));
        assert!(matches!(
            Host::new("acme graycrm.io"),
            Err(ConfigError::InvalidHost { .. })
        ));
    }
}
