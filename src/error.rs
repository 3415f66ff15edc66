//! Error types for GrayCRM client configuration.
//!
//! This module contains the error type raised while building or validating
//! a [`GrayCrmConfig`](crate::GrayCrmConfig).
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` so that an
//! invalid configuration fails before any request is built. Error messages are
//! designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use graycrm::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Configuration errors are fatal: they are never retried and they can never
/// reach the transport, because a [`Client`](crate::Client) can only be built
/// from an already validated configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid GrayCRM API key.")]
    EmptyApiKey,

    /// Host cannot be empty.
    #[error("Host cannot be empty. Please provide the GrayCRM host (e.g., 'acme.graycrm.io').")]
    EmptyHost,

    /// Host is not usable as a request origin.
    #[error("Invalid host '{host}'. Expected a bare host name (e.g., 'acme.graycrm.io') or an http(s) origin.")]
    InvalidHost {
        /// The invalid host that was provided.
        host: String,
    },

    /// Page size must be at least one.
    #[error("Invalid per_page value 0. The default page size must be at least 1.")]
    InvalidPerPage,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
