//! HTTP response types for the GrayCRM client.

use std::collections::HashMap;

use serde_json::Value;

/// An HTTP response from the GrayCRM API.
///
/// Header names are lower-cased; a header may carry several values.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers.
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded response body.
    pub body: Value,
    /// Seconds to wait before retrying (from the `Retry-After` header).
    pub retry_after: Option<u64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, reading `Retry-After` from the headers.
    ///
    /// `Retry-After` is read as whole seconds; a value that is not an integer
    /// counts as absent.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Value) -> Self {
        let retry_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<u64>().ok());

        Self {
            code,
            headers,
            body,
            retry_after,
        }
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Decodes a response body.
///
/// An empty body decodes to `null`, and any other text that is not JSON
/// (whitespace included) is preserved
/// under a `raw` key so error envelopes can still be built from it.
///
/// # Example
///
/// ```rust
/// use graycrm::parse_body;
/// use serde_json::json;
///
/// assert_eq!(parse_body(""), serde_json::Value::Null);
/// assert_eq!(parse_body(r#"{"data": 1}"#), json!({"data": 1}));
/// assert_eq!(parse_body("Bad Gateway"), json!({"raw": "Bad Gateway"}));
/// ```
#[must_use]
pub fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::json!({ "raw": text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect()
    }

    #[test]
    fn test_is_ok_for_2xx_only() {
        assert!(HttpResponse::new(200, HashMap::new(), Value::Null).is_ok());
        assert!(HttpResponse::new(204, HashMap::new(), Value::Null).is_ok());
        assert!(!HttpResponse::new(301, HashMap::new(), Value::Null).is_ok());
        assert!(!HttpResponse::new(422, HashMap::new(), Value::Null).is_ok());
    }

    #[test]
    fn test_retry_after_parsing() {
        let response = HttpResponse::new(429, headers(&[("retry-after", "2")]), Value::Null);
        assert_eq!(response.retry_after, Some(2));

        let response = HttpResponse::new(429, headers(&[("retry-after", "0")]), Value::Null);
        assert_eq!(response.retry_after, Some(0));

        let response = HttpResponse::new(429, headers(&[("retry-after", "soon")]), Value::Null);
        assert_eq!(response.retry_after, None);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(200, headers(&[("x-request-id", "r1")]), Value::Null);
        assert_eq!(response.header("X-Request-Id"), Some("r1"));
    }

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("  \n"), json!({"raw": "  \n"}));
        assert_eq!(parse_body("[1,2]"), json!([1, 2]));
        assert_eq!(parse_body("<html>"), json!({"raw": "<html>"}));
    }
}
