//! Batch operations.
//!
//! [`Batch::execute`] sends several create, update, or delete operations in
//! a single request. Results carry the `index` of the operation they belong
//! to; use [`BatchResponse::get`] rather than relying on array position.
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::resources::{Batch, BatchOperation};
//! use serde_json::json;
//!
//! let response = Batch::execute(&client, vec![
//!     BatchOperation::create("contacts", json!({"first_name": "Ann"})),
//!     BatchOperation::delete("tags", "t1"),
//! ]).await?;
//!
//! if let Some(result) = response.get(1) {
//!     println!("delete returned {:?}", result.status);
//! }
//! ```

use serde::Serialize;
use serde_json::{json, Value};

use crate::clients::Client;
use crate::rest::ResourceError;

/// One operation in a batch request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOperation {
    /// `"create"`, `"update"`, or `"delete"`.
    pub method: String,
    /// The resource collection, e.g. `"contacts"`.
    pub resource: String,
    /// The target record, for updates and deletes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The attributes, for creates and updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl BatchOperation {
    /// Creates a `create` operation.
    #[must_use]
    pub fn create(resource: impl Into<String>, body: Value) -> Self {
        Self {
            method: "create".to_string(),
            resource: resource.into(),
            id: None,
            body: Some(body),
        }
    }

    /// Creates an `update` operation.
    #[must_use]
    pub fn update(resource: impl Into<String>, id: impl Into<String>, body: Value) -> Self {
        Self {
            method: "update".to_string(),
            resource: resource.into(),
            id: Some(id.into()),
            body: Some(body),
        }
    }

    /// Creates a `delete` operation.
    #[must_use]
    pub fn delete(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            method: "delete".to_string(),
            resource: resource.into(),
            id: Some(id.into()),
            body: None,
        }
    }
}

/// The outcome of one batch operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    /// The position of the operation in the request.
    pub index: Option<u64>,
    /// The HTTP status the operation would have returned.
    pub status: Option<u16>,
    /// The record data, on success.
    pub data: Option<Value>,
    /// The error, on failure.
    pub error: Option<Value>,
}

impl BatchResult {
    fn from_value(result: &Value) -> Self {
        let present = |key: &str| result.get(key).filter(|v| !v.is_null()).cloned();
        Self {
            index: result.get("index").and_then(Value::as_u64),
            status: result
                .get("status")
                .and_then(Value::as_u64)
                .and_then(|s| u16::try_from(s).ok()),
            data: present("data"),
            error: present("error"),
        }
    }

    /// Returns `true` for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }
}

/// The results of a batch request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResponse {
    results: Vec<BatchResult>,
}

impl BatchResponse {
    /// Returns the result for the operation at `index` in the request.
    #[must_use]
    pub fn get(&self, index: u64) -> Option<&BatchResult> {
        self.results.iter().find(|r| r.index == Some(index))
    }

    /// All results, in response order.
    #[must_use]
    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    /// The number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if the response has no results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Consumes the response, returning its results.
    #[must_use]
    pub fn into_results(self) -> Vec<BatchResult> {
        self.results
    }

    fn from_body(body: &Value) -> Self {
        let results = ["data", "results"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_array))
            .map(|list| list.iter().map(BatchResult::from_value).collect())
            .unwrap_or_default();
        Self { results }
    }
}

/// Entry point for `POST /batch`.
#[derive(Debug, Clone, Copy)]
pub struct Batch;

impl Batch {
    /// The batch endpoint.
    pub const PATH: &'static str = "/batch";

    /// Executes `operations` in one request.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request as a whole fails.
    /// Failures of single operations are reported in their [`BatchResult`].
    pub async fn execute(
        client: &Client,
        operations: Vec<BatchOperation>,
    ) -> Result<BatchResponse, ResourceError> {
        let body = json!({ "operations": operations });
        let response = client.post(Self::PATH, Some(body)).await?;
        Ok(BatchResponse::from_body(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_serialization_skips_missing_fields() {
        let op = BatchOperation::delete("contacts", "c1");
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"method": "delete", "resource": "contacts", "id": "c1"})
        );
    }

    #[test]
    fn test_get_uses_index_field_not_position() {
        let response = BatchResponse::from_body(&json!({
            "data": [
                {"index": 1, "status": 204, "data": null, "error": null},
                {"index": 0, "status": 201, "data": {"id": "c9"}, "error": null}
            ]
        }));
        let first = response.get(0).unwrap();
        assert_eq!(first.status, Some(201));
        assert_eq!(first.data, Some(json!({"id": "c9"})));
        assert!(response.get(1).unwrap().data.is_none());
        assert!(response.get(2).is_none());
    }

    #[test]
    fn test_results_key_fallback() {
        let response = BatchResponse::from_body(&json!({
            "results": [{"index": 0, "status": 422, "error": {"message": "invalid"}}]
        }));
        assert_eq!(response.len(), 1);
        assert!(!response.get(0).unwrap().is_success());
    }

    #[test]
    fn test_missing_results_is_empty() {
        assert!(BatchResponse::from_body(&json!({})).is_empty());
    }
}
