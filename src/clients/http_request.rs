//! HTTP request types for the GrayCRM client.
//!
//! This module provides the [`HttpRequest`] type and its builder, plus the
//! query-string flattening used for list parameters.

use std::fmt;

use serde_json::Value;

use crate::clients::errors::InvalidHttpRequestError;

/// Query parameters as an ordered JSON object.
///
/// Values may be strings, numbers, booleans, nested objects, or arrays;
/// [`flatten_params`] turns them into query-string pairs.
pub type Params = serde_json::Map<String, Value>;

/// HTTP methods used by the GrayCRM API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for reading records and lists.
    Get,
    /// HTTP POST method for creating records and custom actions.
    Post,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing records.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// An HTTP request to be sent to the GrayCRM API.
///
/// Paths are relative to the API root (`/api/v1`) and start with `/`.
///
/// # Example
///
/// ```rust
/// use graycrm::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/contacts")
///     .query_param("page", "2")
///     .build()
///     .unwrap();
/// assert_eq!(request.query, vec![("page".to_string(), "2".to_string())]);
///
/// let request = HttpRequest::builder(HttpMethod::Patch, "/contacts/abc")
///     .body(json!({"contact": {"first_name": "Ann"}}))
///     .build()
///     .unwrap();
/// assert!(request.body.is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path below the API root.
    pub path: String,
    /// Query-string pairs, in order.
    pub query: Vec<(String, String)>,
    /// The JSON request body, if any.
    pub body: Option<Value>,
    /// Headers that override the client defaults.
    pub extra_headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `path` does not start with `/`
    /// - `http_method` is `Patch` but `body` is `None`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if !self.path.starts_with('/') {
            return Err(InvalidHttpRequestError::InvalidPath {
                path: self.path.clone(),
            });
        }

        if self.http_method == HttpMethod::Patch && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    request: HttpRequest,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            request: HttpRequest {
                http_method: method,
                path: path.into(),
                query: Vec::new(),
                body: None,
                extra_headers: Vec::new(),
            },
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query.push((key.into(), value.into()));
        self
    }

    /// Adds every pair produced by flattening `params`.
    #[must_use]
    pub fn params(mut self, params: &Params) -> Self {
        self.request.query.extend(flatten_params(params));
        self
    }

    /// Adds a header that overrides the client default of the same name.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.extra_headers.push((key.into(), value.into()));
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        self.request.verify()?;
        Ok(self.request)
    }
}

/// Flattens nested parameters into query-string pairs.
///
/// Nested objects use bracket notation (`q[first_name]=Ann`), arrays repeat
/// the key with `[]` (`ids[]=1&ids[]=2`), and `null` becomes an empty value.
///
/// # Example
///
/// ```rust
/// use graycrm::flatten_params;
/// use serde_json::json;
///
/// let params = json!({"page": 1, "q": {"company": "Acme"}});
/// let pairs = flatten_params(params.as_object().unwrap());
/// assert_eq!(pairs, vec![
///     ("page".to_string(), "1".to_string()),
///     ("q[company]".to_string(), "Acme".to_string()),
/// ]);
/// ```
#[must_use]
pub fn flatten_params(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        flatten_value(key, value, &mut pairs);
    }
    pairs
}

fn flatten_value(key: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (child, nested) in map {
                flatten_value(&format!("{key}[{child}]"), nested, pairs);
            }
        }
        Value::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                flatten_value(&key, item, pairs);
            }
        }
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Null => pairs.push((key.to_string(), String::new())),
        Value::Bool(_) | Value::Number(_) => pairs.push((key.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(value: &Value) -> Vec<(String, String)> {
        flatten_params(value.as_object().unwrap())
    }

    #[test]
    fn test_method_display_is_lowercase() {
        assert_eq!(HttpMethod::Patch.to_string(), "patch");
        assert_eq!(reqwest::Method::from(HttpMethod::Delete), reqwest::Method::DELETE);
    }

    #[test]
    fn test_path_must_be_absolute() {
        let result = HttpRequest::builder(HttpMethod::Get, "contacts").build();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_patch_requires_body() {
        let result = HttpRequest::builder(HttpMethod::Patch, "/contacts/1").build();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingBody { .. })
        ));
    }

    #[test]
    fn test_post_without_body_is_allowed() {
        let request = HttpRequest::builder(HttpMethod::Post, "/flags/f1/claim")
            .build()
            .unwrap();
        assert!(request.body.is_none());
    }

    #[test]
    fn test_flatten_scalars() {
        let result = pairs(&json!({"page": 2, "active": true, "name": "Ann", "none": null}));
        assert_eq!(
            result,
            vec![
                ("page".to_string(), "2".to_string()),
                ("active".to_string(), "true".to_string()),
                ("name".to_string(), "Ann".to_string()),
                ("none".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_flatten_nested_objects_and_arrays() {
        let result = pairs(&json!({"q": {"tags": ["a", "b"], "city": "Austin"}}));
        assert_eq!(
            result,
            vec![
                ("q[tags][]".to_string(), "a".to_string()),
                ("q[tags][]".to_string(), "b".to_string()),
                ("q[city]".to_string(), "Austin".to_string()),
            ]
        );
    }

    #[test]
    fn test_builder_params_appends_after_explicit_pairs() {
        let request = HttpRequest::builder(HttpMethod::Get, "/search")
            .query_param("q", "ann")
            .params(json!({"per_resource": 5}).as_object().unwrap())
            .build()
            .unwrap();
        assert_eq!(request.query.len(), 2);
        assert_eq!(request.query[1].0, "per_resource");
    }
}
