//! Reusable HTTP connections keyed by endpoint and timeouts.
//!
//! Each [`Client`](crate::Client) context owns one [`ConnectionCache`]. A
//! connection is created the first time a key is seen and reused for every
//! later request with the same key, so repeated calls share keep-alive
//! sockets. Contexts built with
//! [`Client::with_overrides`](crate::Client::with_overrides) start with an
//! empty cache of their own.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::config::GrayCrmConfig;

/// Idle keep-alive window for pooled connections.
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// The identity of a reusable connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    /// Host name without scheme.
    pub host: String,
    /// Port, defaulted from the scheme.
    pub port: u16,
    /// Read timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub open_timeout: Duration,
}

impl ConnectionKey {
    /// Derives the key for a configuration.
    #[must_use]
    pub fn for_config(config: &GrayCrmConfig) -> Self {
        Self {
            host: config.host().host_name().to_string(),
            port: config.host().port(),
            timeout: config.timeout(),
            open_timeout: config.open_timeout(),
        }
    }
}

/// A per-context cache of `reqwest` clients.
#[derive(Debug, Default)]
pub struct ConnectionCache {
    connections: Mutex<HashMap<ConnectionKey, reqwest::Client>>,
}

impl ConnectionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the connection for `key`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the client cannot be built (for
    /// example, when TLS initialization fails).
    pub fn connection(&self, key: &ConnectionKey) -> Result<reqwest::Client, reqwest::Error> {
        let mut connections = self
            .connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(client) = connections.get(key) {
            return Ok(client.clone());
        }

        tracing::debug!(
            host = %key.host,
            port = key.port,
            "Opening GrayCRM connection"
        );

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(key.timeout)
            .connect_timeout(key.open_timeout)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .build()?;

        connections.insert(key.clone(), client.clone());
        Ok(client)
    }

    /// Returns the number of cached connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no connection has been opened yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(host: &str, timeout: u64) -> ConnectionKey {
        ConnectionKey {
            host: host.to_string(),
            port: 443,
            timeout: Duration::from_secs(timeout),
            open_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_same_key_reuses_connection() {
        let cache = ConnectionCache::new();
        cache.connection(&key("a.graycrm.io", 30)).unwrap();
        cache.connection(&key("a.graycrm.io", 30)).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_different_timeouts_use_distinct_connections() {
        let cache = ConnectionCache::new();
        cache.connection(&key("a.graycrm.io", 30)).unwrap();
        cache.connection(&key("a.graycrm.io", 5)).unwrap();
        cache.connection(&key("b.graycrm.io", 30)).unwrap();
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_new_cache_is_empty() {
        assert!(ConnectionCache::new().is_empty());
    }
}
