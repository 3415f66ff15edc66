//! Account-wide statistics.

use serde_json::Value;

use crate::clients::Client;
use crate::rest::{unwrap_data, ResourceError};

/// Counts and activity figures from `GET /stats`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    /// Number of contacts.
    pub contacts_count: Option<u64>,
    /// Number of properties.
    pub properties_count: Option<u64>,
    /// Number of tags.
    pub tags_count: Option<u64>,
    /// Number of flags.
    pub flags_count: Option<u64>,
    /// Activity totals per day, as returned by the server.
    pub activity_by_date: Vec<Value>,
    /// The most used tags, as returned by the server.
    pub top_tags: Vec<Value>,
}

impl Stats {
    /// The stats endpoint.
    pub const PATH: &'static str = "/stats";

    /// Fetches the current statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn fetch(client: &Client) -> Result<Self, ResourceError> {
        let body = client.get(Self::PATH, None).await?;
        Ok(Self::from_value(&unwrap_data(body)))
    }

    fn from_value(data: &Value) -> Self {
        let count = |key: &str| data.get(key).and_then(Value::as_u64);
        let list = |key: &str| {
            data.get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };
        Self {
            contacts_count: count("contacts_count"),
            properties_count: count("properties_count"),
            tags_count: count("tags_count"),
            flags_count: count("flags_count"),
            activity_by_date: list("activity_by_date"),
            top_tags: list("top_tags"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let stats = Stats::from_value(&json!({
            "contacts_count": 120,
            "properties_count": 40,
            "tags_count": 9,
            "flags_count": 3,
            "top_tags": [{"name": "vip", "count": 12}]
        }));
        assert_eq!(stats.contacts_count, Some(120));
        assert_eq!(stats.flags_count, Some(3));
        assert!(stats.activity_by_date.is_empty());
        assert_eq!(stats.top_tags.len(), 1);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(Stats::from_value(&json!({})), Stats::default());
    }
}
