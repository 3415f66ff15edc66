//! Cross-resource search.

use serde_json::{json, Value};

use super::{Contact, Property, Tag};
use crate::clients::{Client, Params};
use crate::rest::{Resource, ResourceError};

/// Matches returned by [`Search::query`].
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Matching contacts.
    pub contacts: Vec<Contact>,
    /// Matching properties.
    pub properties: Vec<Property>,
    /// Matching tags.
    pub tags: Vec<Tag>,
    /// The total number of matches across all types.
    pub total_count: u64,
}

/// Entry point for `GET /search`.
#[derive(Debug, Clone, Copy)]
pub struct Search;

impl Search {
    /// The search endpoint.
    pub const PATH: &'static str = "/search";

    /// How many matches of each type the server returns by default.
    pub const DEFAULT_PER_RESOURCE: u32 = 5;

    /// Searches contacts, properties, and tags for `q`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = Search::query(&client, "smith", Search::DEFAULT_PER_RESOURCE).await?;
    /// println!("{} matches", result.total_count);
    /// ```
    pub async fn query(
        client: &Client,
        q: &str,
        per_resource: u32,
    ) -> Result<SearchResult, ResourceError> {
        let mut params = Params::new();
        params.insert("q".to_string(), json!(q));
        params.insert("per_resource".to_string(), json!(per_resource));

        let body = client.get(Self::PATH, Some(&params)).await?;
        Ok(SearchResult::from_body(&body))
    }
}

impl SearchResult {
    fn from_body(body: &Value) -> Self {
        let data = body.get("data");
        Self {
            contacts: records(data, "contacts"),
            properties: records(data, "properties"),
            tags: records(data, "tags"),
            total_count: body
                .get("meta")
                .and_then(|meta| meta.get("total_count"))
                .and_then(Value::as_u64)
                .unwrap_or(0),
        }
    }
}

fn records<R: Resource>(data: Option<&Value>, key: &str) -> Vec<R> {
    data.and_then(|d| d.get(key))
        .and_then(Value::as_array)
        .map(|list| list.iter().cloned().map(R::from_value).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body() {
        let result = SearchResult::from_body(&json!({
            "data": {
                "contacts": [{"id": "c1", "first_name": "Ann"}],
                "properties": [],
                "tags": [{"id": "t1", "name": "smith-family"}]
            },
            "meta": {"total_count": 2}
        }));
        assert_eq!(result.contacts.len(), 1);
        assert_eq!(result.contacts[0].first_name().as_deref(), Some("Ann"));
        assert!(result.properties.is_empty());
        assert_eq!(result.tags[0].name().as_deref(), Some("smith-family"));
        assert_eq!(result.total_count, 2);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let result = SearchResult::from_body(&json!({}));
        assert!(result.contacts.is_empty());
        assert!(result.tags.is_empty());
        assert_eq!(result.total_count, 0);
    }
}
