//! One page of resources plus the metadata needed to reach the next one.
//!
//! GrayCRM list endpoints answer `{"data": [...], "pagination": {...}}`. The
//! pagination object selects one of two modes:
//!
//! - **Cursor mode**: `next_cursor` is present. The next page is requested
//!   with `cursor=<next_cursor>` and without `page`.
//! - **Offset mode**: `page` and `total_pages` are present and
//!   `page < total_pages`. The next page is requested with `page + 1` and
//!   without `cursor`.
//!
//! Cursor mode is checked first, so a response carrying both kinds of
//! metadata is always followed by cursor.
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::rest::Resource;
//! use graycrm::resources::Contact;
//!
//! let mut pages = Contact::all(&client).per(100).pages();
//! while let Some(page) = pages.next().await {
//!     for contact in page? {
//!         println!("{:?}", contact.first_name());
//!     }
//! }
//! ```

use std::ops::Deref;

use serde_json::Value;

use crate::clients::{Client, Params};
use crate::rest::errors::ResourceError;
use crate::rest::resource::Resource;
use crate::rest::tracking::Record;

/// Pagination metadata of one list response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Total number of matching records, if reported.
    pub total: Option<u64>,
    /// Total number of pages, if reported.
    pub total_pages: Option<u64>,
    /// The page number of this response (`page` on the wire).
    pub current_page: Option<u64>,
    /// Opaque token for the next page in cursor mode.
    pub next_cursor: Option<String>,
    /// Whether the server reports more records after this page.
    pub has_more: Option<bool>,
}

impl Pagination {
    /// Reads the `pagination` object of a list response.
    ///
    /// Missing keys and values of an unexpected type are treated as absent.
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let Some(meta) = body.get("pagination") else {
            return Self::default();
        };
        Self {
            total: meta.get("total").and_then(Value::as_u64),
            total_pages: meta.get("total_pages").and_then(Value::as_u64),
            current_page: meta.get("page").and_then(Value::as_u64),
            next_cursor: meta
                .get("next_cursor")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            has_more: meta.get("has_more").and_then(Value::as_bool),
        }
    }
}

/// Everything needed to request one page.
#[derive(Debug, Clone)]
pub(crate) struct PageRequest {
    pub(crate) client: Client,
    pub(crate) path: String,
    pub(crate) params: Params,
    pub(crate) base_path: Option<String>,
}

impl PageRequest {
    pub(crate) async fn fetch<R: Resource>(self) -> Result<Collection<R>, ResourceError> {
        let body = self.client.get(&self.path, Some(&self.params)).await?;
        Ok(Collection::from_response(
            self.client,
            &body,
            self.path,
            self.params,
            self.base_path,
        ))
    }
}

/// An immutable page of resources.
///
/// Dereferences to `[R]`, so slice methods (`len`, `iter`, `first`, indexing)
/// work directly.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    items: Vec<R>,
    pagination: Pagination,
    client: Client,
    path: String,
    params: Params,
    base_path: Option<String>,
}

impl<R: Resource> Collection<R> {
    /// Builds a collection from a list response.
    ///
    /// Each element of `data` becomes a clean resource carrying `base_path`.
    /// A missing or non-array `data` yields an empty page.
    #[must_use]
    pub fn from_response(
        client: Client,
        body: &Value,
        path: String,
        params: Params,
        base_path: Option<String>,
    ) -> Self {
        let items = body
            .get("data")
            .and_then(Value::as_array)
            .map(|data| {
                data.iter()
                    .map(|attrs| {
                        R::from_record(
                            Record::from_value(attrs.clone()).with_base_path(base_path.clone()),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            items,
            pagination: Pagination::from_body(body),
            client,
            path,
            params,
            base_path,
        }
    }

    /// Returns the query parameters for the next page, or `None` when this
    /// is the last one.
    #[must_use]
    pub fn next_params(&self) -> Option<Params> {
        if let Some(cursor) = &self.pagination.next_cursor {
            let mut params: Params = self
                .params
                .iter()
                .filter(|(key, _)| key.as_str() != "page")
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            params.insert("cursor".to_string(), Value::String(cursor.clone()));
            return Some(params);
        }

        match (self.pagination.current_page, self.pagination.total_pages) {
            (Some(current), Some(total)) if current < total => {
                let mut params: Params = self
                    .params
                    .iter()
                    .filter(|(key, _)| key.as_str() != "cursor")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                params.insert("page".to_string(), Value::from(current + 1));
                Some(params)
            }
            _ => None,
        }
    }

    fn successor(&self) -> Option<PageRequest> {
        self.next_params().map(|params| PageRequest {
            client: self.client.clone(),
            path: self.path.clone(),
            params,
            base_path: self.base_path.clone(),
        })
    }

    /// Fetches the next page.
    ///
    /// Returns `Ok(None)` without sending a request when this is the last
    /// page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn next_page(&self) -> Result<Option<Self>, ResourceError> {
        match self.successor() {
            Some(request) => request.fetch().await.map(Some),
            None => Ok(None),
        }
    }

    /// Turns this page into a forward-only walk over it and its successors.
    #[must_use]
    pub fn into_pages(self) -> Pages<R> {
        Pages {
            state: PageState::Ready(self),
        }
    }

    /// Returns `true` if the server reported more records after this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pagination.has_more.unwrap_or(false)
    }

    /// Returns the total number of matching records, if reported.
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.pagination.total
    }

    /// Returns the total number of pages, if reported.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u64> {
        self.pagination.total_pages
    }

    /// Returns this page's number, if reported.
    #[must_use]
    pub const fn current_page(&self) -> Option<u64> {
        self.pagination.current_page
    }

    /// Returns the cursor for the next page, if reported.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.pagination.next_cursor.as_deref()
    }

    /// Returns the pagination metadata.
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Returns the path this page was requested from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query parameters this page was requested with.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the items, consuming the page.
    #[must_use]
    pub fn into_vec(self) -> Vec<R> {
        self.items
    }
}

impl<R> Deref for Collection<R> {
    type Target = [R];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<R> IntoIterator for Collection<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

enum PageState<R> {
    Ready(Collection<R>),
    Pending(PageRequest),
    Done,
}

/// A forward-only walk over consecutive pages.
///
/// Each call to [`next`](Self::next) yields one page and sends at most one
/// request; nothing is fetched ahead. The walk ends after the last page or
/// after the first error, and cannot be rewound.
pub struct Pages<R> {
    state: PageState<R>,
}

impl<R: Resource> Pages<R> {
    pub(crate) fn from_request(request: PageRequest) -> Self {
        Self {
            state: PageState::Pending(request),
        }
    }

    /// Yields the next page, or `None` when the walk is over.
    pub async fn next(&mut self) -> Option<Result<Collection<R>, ResourceError>> {
        let page = match std::mem::replace(&mut self.state, PageState::Done) {
            PageState::Done => return None,
            PageState::Ready(page) => page,
            PageState::Pending(request) => match request.fetch().await {
                Ok(page) => page,
                Err(e) => return Some(Err(e)),
            },
        };

        if let Some(request) = page.successor() {
            self.state = PageState::Pending(request);
        }
        Some(Ok(page))
    }

    /// Walks every remaining page and gathers all items.
    ///
    /// # Errors
    ///
    /// Returns the first request failure.
    pub async fn collect_items(mut self) -> Result<Vec<R>, ResourceError> {
        let mut items = Vec::new();
        while let Some(page) = self.next().await {
            items.extend(page?.into_vec());
        }
        Ok(items)
    }
}

impl<R> std::fmt::Debug for Pages<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            PageState::Ready(_) => "ready",
            PageState::Pending(_) => "pending",
            PageState::Done => "done",
        };
        f.debug_struct("Pages").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, GrayCrmConfig, Host};
    use crate::resources::Tag;
    use serde_json::json;

    fn create_test_client() -> Client {
        Client::new(
            GrayCrmConfig::builder()
                .host(Host::new("http://127.0.0.1:9").unwrap())
                .api_key(ApiKey::new("gcrm_test_key").unwrap())
                .build()
                .unwrap(),
        )
    }

    fn page(body: &Value, params: &Value) -> Collection<Tag> {
        Collection::from_response(
            create_test_client(),
            body,
            "/tags".to_string(),
            params.as_object().unwrap().clone(),
            None,
        )
    }

    #[test]
    fn test_items_are_clean_resources() {
        let collection = page(
            &json!({"data": [{"id": "1", "name": "a"}, {"id": "2", "name": "b"}]}),
            &json!({}),
        );
        assert_eq!(collection.len(), 2);
        assert!(collection.iter().all(|tag| !tag.is_changed()));
    }

    #[test]
    fn test_missing_data_yields_empty_page() {
        let collection = page(&json!({"pagination": {"total": 0}}), &json!({}));
        assert!(collection.is_empty());
        assert_eq!(collection.total(), Some(0));
    }

    #[test]
    fn test_cursor_mode_drops_page() {
        let collection = page(
            &json!({"data": [], "pagination": {"next_cursor": "c2", "page": 1, "total_pages": 5}}),
            &json!({"page": 1, "per_page": 25}),
        );
        let params = collection.next_params().unwrap();
        assert_eq!(params.get("cursor"), Some(&json!("c2")));
        assert!(params.get("page").is_none());
        assert_eq!(params.get("per_page"), Some(&json!(25)));
    }

    #[test]
    fn test_offset_mode_drops_cursor() {
        let collection = page(
            &json!({"data": [], "pagination": {"page": 2, "total_pages": 3}}),
            &json!({"page": 2, "per_page": 25, "cursor": "old"}),
        );
        let params = collection.next_params().unwrap();
        assert_eq!(params.get("page"), Some(&json!(3)));
        assert!(params.get("cursor").is_none());
    }

    #[test]
    fn test_last_offset_page_has_no_successor() {
        let collection = page(
            &json!({"data": [], "pagination": {"page": 3, "total_pages": 3}}),
            &json!({}),
        );
        assert!(collection.next_params().is_none());
    }

    #[test]
    fn test_next_page_without_metadata_sends_nothing() {
        let collection = page(&json!({"data": [{"id": "1"}]}), &json!({}));
        let next = tokio_test::block_on(collection.next_page()).unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn test_has_more_defaults_to_false() {
        let collection = page(&json!({"data": []}), &json!({}));
        assert!(!collection.has_more());
    }

    #[test]
    fn test_pages_yields_single_page_then_ends() {
        let collection = page(&json!({"data": [{"id": "1"}]}), &json!({}));
        let mut pages = collection.into_pages();
        tokio_test::block_on(async {
            assert_eq!(pages.next().await.unwrap().unwrap().len(), 1);
            assert!(pages.next().await.is_none());
        });
    }
}
