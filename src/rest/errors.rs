//! Resource-level error types.
//!
//! This module contains the error type returned by [`Resource`](crate::rest::Resource),
//! [`Relation`](crate::rest::Relation), and [`Collection`](crate::rest::Collection)
//! operations. HTTP failures pass through unchanged as [`ResourceError::Http`];
//! the other variants describe failures that happen before or after the
//! request.
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::rest::{Resource, ResourceError};
//! use graycrm::resources::Contact;
//!
//! match Contact::find(&client, "abc").await {
//!     Ok(contact) => println!("Found: {:?}", contact.first_name()),
//!     Err(e) if e.is_not_found() => println!("no such contact"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::clients::HttpError;

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// An HTTP-level error occurred.
    ///
    /// This includes the validation class, which only the strict variants
    /// (`create_strict`, `save_strict`, `update_strict`) surface as an error.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// An instance operation was attempted on a record without an id.
    #[error("Cannot {operation} a {resource} that has not been saved")]
    MissingId {
        /// The type name of the resource.
        resource: &'static str,
        /// The operation being attempted (e.g., "reload", "destroy").
        operation: &'static str,
    },

    /// Polling did not reach a terminal state in time.
    #[error("{resource} did not complete within {seconds} seconds")]
    Timeout {
        /// The type name of the resource.
        resource: &'static str,
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// A response payload did not have the expected shape.
    #[error("Unexpected response payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResourceError {
    /// Returns the field-level validation messages of a 422 error.
    ///
    /// Returns an empty map for every other error.
    #[must_use]
    pub fn validation_errors(&self) -> HashMap<String, Vec<String>> {
        match self {
            Self::Http(HttpError::Validation(e)) => e.validation_errors(),
            _ => HashMap::new(),
        }
    }

    /// Returns `true` for a 404 response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http(HttpError::NotFound(_)))
    }

    /// Returns `true` for a 422 response.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Http(HttpError::Validation(_)))
    }

    /// Returns the HTTP status for response-derived errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
