//! HTTP-specific error types for the GrayCRM client.
//!
//! This module contains the status-driven error taxonomy. The transport is the
//! only place an HTTP status is interpreted; every higher layer either passes
//! these errors through untouched or converts the validation class into a
//! value-based failure.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: The decoded `error` envelope of a non-2xx response
//! - [`InvalidHttpRequestError`]: A request that failed validation before sending
//! - [`HttpError`]: Unified error type, one variant per status class
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::HttpError;
//!
//! match client.get("/contacts/abc", None).await {
//!     Ok(body) => println!("{body}"),
//!     Err(HttpError::NotFound(e)) => println!("missing: {}", e.message),
//!     Err(HttpError::Validation(e)) => println!("invalid: {:?}", e.validation_errors()),
//!     Err(HttpError::RateLimited { retry_after, .. }) => println!("slow down: {retry_after:?}"),
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

/// The decoded error envelope of a non-successful response.
///
/// GrayCRM reports failures as `{"error": {"code", "message", "details"}}`.
/// When the envelope or its message is missing, the message defaults to
/// `"HTTP <status>"`.
///
/// # Example
///
/// ```rust
/// use graycrm::HttpResponseError;
/// use serde_json::json;
///
/// let error = HttpResponseError::from_body(404, &json!({
///     "error": {"code": "not_found", "message": "Contact not found"}
/// }));
/// assert_eq!(error.status, 404);
/// assert_eq!(error.code.as_deref(), Some("not_found"));
/// assert_eq!(error.message, "Contact not found");
///
/// let bare = HttpResponseError::from_body(502, &serde_json::Value::Null);
/// assert_eq!(bare.message, "HTTP 502");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The machine-readable error code, if the server sent one.
    pub code: Option<String>,
    /// The human-readable message.
    pub message: String,
    /// Additional structured detail (field errors for validation failures).
    pub details: Option<Value>,
}

impl HttpResponseError {
    /// Extracts the error envelope from a decoded response body.
    ///
    /// The `error` key is preferred; an object body without it is read as the
    /// envelope itself. Any other body yields an envelope with only the
    /// default message.
    #[must_use]
    pub fn from_body(status: u16, body: &Value) -> Self {
        let envelope = match body.get("error") {
            Some(Value::Object(map)) => Some(map),
            Some(_) => None,
            None => body.as_object(),
        };

        let message = envelope
            .and_then(|map| map.get("message"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .or_else(|| body.get("error").and_then(Value::as_str).map(ToString::to_string))
            .unwrap_or_else(|| format!("HTTP {status}"));

        let code = envelope
            .and_then(|map| map.get("code"))
            .and_then(Value::as_str)
            .map(ToString::to_string);

        let details = envelope
            .and_then(|map| map.get("details"))
            .filter(|details| !details.is_null())
            .cloned();

        Self {
            status,
            code,
            message,
            details,
        }
    }

    /// Returns the field-level validation messages carried in `details`.
    ///
    /// Each field maps to its list of messages; a single string message is
    /// wrapped into a one-element list. Returns an empty map when there are
    /// no object-shaped details.
    #[must_use]
    pub fn validation_errors(&self) -> HashMap<String, Vec<String>> {
        let Some(Value::Object(details)) = &self.details else {
            return HashMap::new();
        };

        details
            .iter()
            .map(|(field, messages)| {
                let messages = match messages {
                    Value::Array(items) => items
                        .iter()
                        .map(|item| {
                            item.as_str()
                                .map_or_else(|| item.to_string(), ToString::to_string)
                        })
                        .collect(),
                    Value::String(message) => vec![message.clone()],
                    other => vec![other.to_string()],
                };
                (field.clone(), messages)
            })
            .collect()
    }
}

/// Error returned when an HTTP request fails validation before sending.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// Request paths are absolute below the API root.
    #[error("Invalid request path '{path}'. Paths must start with '/'.")]
    InvalidPath {
        /// The path that was provided.
        path: String,
    },

    /// A PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A header name or value cannot be sent.
    #[error("Invalid header '{name}'.")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },
}

/// Unified error type for all transport-level failures.
///
/// Non-2xx responses are classified by status:
///
/// | Status | Variant |
/// |--------|---------|
/// | 401 | [`Authentication`](Self::Authentication) |
/// | 403 | [`Forbidden`](Self::Forbidden) |
/// | 404 | [`NotFound`](Self::NotFound) |
/// | 409 | [`Conflict`](Self::Conflict) |
/// | 422 | [`Validation`](Self::Validation) |
/// | 429 | [`RateLimited`](Self::RateLimited) |
/// | 500-599 | [`Server`](Self::Server) |
/// | anything else | [`Response`](Self::Response) |
///
/// Only `RateLimited` is ever retried, and only by the transport.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The API key was rejected (401).
    #[error("Authentication failed: {0}")]
    Authentication(HttpResponseError),

    /// The API key is not allowed to perform the request (403).
    #[error("Forbidden: {0}")]
    Forbidden(HttpResponseError),

    /// The requested resource does not exist (404).
    #[error("Not found: {0}")]
    NotFound(HttpResponseError),

    /// The request conflicts with the current server state (409).
    #[error("Conflict: {0}")]
    Conflict(HttpResponseError),

    /// The server rejected the submitted attributes (422).
    #[error("Validation failed: {0}")]
    Validation(HttpResponseError),

    /// Too many requests (429).
    #[error("Rate limited: {error}")]
    RateLimited {
        /// The decoded error envelope.
        error: HttpResponseError,
        /// Seconds to wait before retrying, from the `Retry-After` header.
        retry_after: Option<u64>,
    },

    /// The server failed (5xx).
    #[error("Server error: {0}")]
    Server(HttpResponseError),

    /// Any other non-successful status.
    #[error("HTTP error: {0}")]
    Response(HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error, including read and connect timeouts.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Classifies a non-successful response.
    ///
    /// # Example
    ///
    /// ```rust
    /// use graycrm::HttpError;
    /// use serde_json::json;
    ///
    /// let error = HttpError::from_response(429, &json!({}), Some(3));
    /// assert!(matches!(error, HttpError::RateLimited { retry_after: Some(3), .. }));
    ///
    /// let error = HttpError::from_response(503, &json!({}), None);
    /// assert!(matches!(error, HttpError::Server(_)));
    /// ```
    #[must_use]
    pub fn from_response(status: u16, body: &Value, retry_after: Option<u64>) -> Self {
        let error = HttpResponseError::from_body(status, body);
        match status {
            401 => Self::Authentication(error),
            403 => Self::Forbidden(error),
            404 => Self::NotFound(error),
            409 => Self::Conflict(error),
            422 => Self::Validation(error),
            429 => Self::RateLimited { error, retry_after },
            500..=599 => Self::Server(error),
            _ => Self::Response(error),
        }
    }

    /// Returns the decoded error envelope for response-derived errors.
    #[must_use]
    pub const fn response_error(&self) -> Option<&HttpResponseError> {
        match self {
            Self::Authentication(e)
            | Self::Forbidden(e)
            | Self::NotFound(e)
            | Self::Conflict(e)
            | Self::Validation(e)
            | Self::Server(e)
            | Self::Response(e)
            | Self::RateLimited { error: e, .. } => Some(e),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }

    /// Returns the HTTP status for response-derived errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response_error().map(|e| e.status)
    }

    /// Returns the `Retry-After` hint of a rate-limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(code: &str, message: &str) -> Value {
        json!({"error": {"code": code, "message": message}})
    }

    #[test]
    fn test_status_routing() {
        let body = envelope("x", "y");
        assert!(matches!(
            HttpError::from_response(401, &body, None),
            HttpError::Authentication(_)
        ));
        assert!(matches!(
            HttpError::from_response(403, &body, None),
            HttpError::Forbidden(_)
        ));
        assert!(matches!(
            HttpError::from_response(404, &body, None),
            HttpError::NotFound(_)
        ));
        assert!(matches!(
            HttpError::from_response(409, &body, None),
            HttpError::Conflict(_)
        ));
        assert!(matches!(
            HttpError::from_response(422, &body, None),
            HttpError::Validation(_)
        ));
        assert!(matches!(
            HttpError::from_response(429, &body, None),
            HttpError::RateLimited {
                retry_after: None,
                ..
            }
        ));
        assert!(matches!(
            HttpError::from_response(500, &body, None),
            HttpError::Server(_)
        ));
        assert!(matches!(
            HttpError::from_response(599, &body, None),
            HttpError::Server(_)
        ));
        assert!(matches!(
            HttpError::from_response(418, &body, None),
            HttpError::Response(_)
        ));
    }

    #[test]
    fn test_envelope_fields_are_extracted() {
        let body = json!({
            "error": {
                "code": "validation_failed",
                "message": "Invalid",
                "details": {"first_name": ["can't be blank"]}
            }
        });
        let error = HttpResponseError::from_body(422, &body);

        assert_eq!(error.status, 422);
        assert_eq!(error.code.as_deref(), Some("validation_failed"));
        assert_eq!(error.message, "Invalid");
        assert_eq!(
            error.validation_errors().get("first_name"),
            Some(&vec!["can't be blank".to_string()])
        );
    }

    #[test]
    fn test_default_message_when_envelope_missing() {
        let error = HttpResponseError::from_body(500, &json!({"raw": "<html>oops</html>"}));
        assert_eq!(error.message, "HTTP 500");
        assert!(error.code.is_none());
    }

    #[test]
    fn test_string_error_is_used_as_message() {
        let error = HttpResponseError::from_body(400, &json!({"error": "Bad things"}));
        assert_eq!(error.message, "Bad things");
    }

    #[test]
    fn test_validation_errors_empty_without_details() {
        let error = HttpResponseError::from_body(422, &envelope("validation_failed", "Invalid"));
        assert!(error.validation_errors().is_empty());
    }

    #[test]
    fn test_status_and_retry_after_accessors() {
        let error = HttpError::from_response(429, &json!({}), Some(7));
        assert_eq!(error.status(), Some(429));
        assert_eq!(error.retry_after(), Some(7));

        let error = HttpError::from(InvalidHttpRequestError::InvalidPath {
            path: "contacts".to_string(),
        });
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_error_messages_include_server_message() {
        let error = HttpError::from_response(404, &envelope("not_found", "Not found"), None);
        assert_eq!(error.to_string(), "Not found: Not found");
    }
}
