//! Lazy, immutable list queries.
//!
//! A [`Relation`] describes a list request (target path, filters, page, page
//! size, cursor) without sending it. Every builder method returns a new
//! relation with an empty result cache; the receiver is never changed. The
//! first materializing call (`collection`, `items`, `count`) sends the request
//! and memoizes the page on that relation instance.
//!
//! # Query Parameters
//!
//! Parameters are assembled in a fixed order:
//!
//! 1. Filters, in insertion order:
//!    - `flag` / `attr` objects expand to `flag_key`/`flag_value` and
//!      `attr_key`/`attr_value` (only the halves that are present)
//!    - `tag` / `app_tag` pass through unchanged
//!    - any other key becomes `q[<key>]`
//! 2. `page`, when set and no cursor is set
//! 3. `per_page`, the explicit value or the configured default (always sent)
//! 4. `cursor`, when set
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::rest::{Filters, Resource};
//! use graycrm::resources::Contact;
//!
//! let vips = Contact::filter(&client, Filters::new().flag("vip", Some("true")))
//!     .filter(Filters::new().query("company", "Acme"))
//!     .per(50);
//!
//! let total = vips.count().await?;
//! for contact in vips.collection().await? {
//!     println!("{:?}", contact.first_name());
//! }
//! ```

use std::fmt;

use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use crate::clients::{Client, Params};
use crate::rest::collection::{Collection, PageRequest, Pages};
use crate::rest::errors::ResourceError;
use crate::rest::resource::{create_at, Resource};

/// An ordered filter map for [`Relation::filter`].
///
/// Later values for the same key replace earlier ones.
///
/// # Example
///
/// ```rust
/// use graycrm::rest::Filters;
/// use serde_json::json;
///
/// let filters = Filters::new()
///     .flag("vip", Some("true"))
///     .tag("customer")
///     .query("city", "Austin");
///
/// assert_eq!(filters.get("flag"), Some(&json!({"key": "vip", "value": "true"})));
/// assert_eq!(Filters::from(json!({"tag": "customer"})).get("tag"), Some(&json!("customer")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters(Map<String, Value>);

impl Filters {
    /// Creates an empty filter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by flag key and, optionally, flag value.
    #[must_use]
    pub fn flag(self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.key_value("flag", key.into(), value)
    }

    /// Filters by custom attribute key and, optionally, value.
    #[must_use]
    pub fn attr(self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.key_value("attr", key.into(), value)
    }

    /// Filters by tag name.
    #[must_use]
    pub fn tag(self, name: impl Into<String>) -> Self {
        self.insert("tag", Value::String(name.into()))
    }

    /// Filters by application tag.
    #[must_use]
    pub fn app_tag(self, name: impl Into<String>) -> Self {
        self.insert("app_tag", Value::String(name.into()))
    }

    /// Adds a predicate sent as `q[<key>]`.
    #[must_use]
    pub fn query(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value.into())
    }

    /// Sets a raw filter entry.
    #[must_use]
    pub fn insert(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    fn key_value(self, filter: &str, key: String, value: Option<&str>) -> Self {
        let mut pair = Map::new();
        pair.insert("key".to_string(), Value::String(key));
        if let Some(value) = value {
            pair.insert("value".to_string(), Value::String(value.to_string()));
        }
        self.insert(filter, Value::Object(pair))
    }

    /// Returns the filter value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy with `other` merged on top.
    #[must_use]
    pub fn merged(&self, other: Self) -> Self {
        let mut map = self.0.clone();
        for (key, value) in other.0 {
            map.insert(key, value);
        }
        Self(map)
    }

    fn append_params(&self, params: &mut Params) {
        for (key, value) in &self.0 {
            match key.as_str() {
                "flag" | "attr" => {
                    for half in ["key", "value"] {
                        if let Some(v) = value.get(half).filter(|v| is_present(v)) {
                            params.insert(format!("{key}_{half}"), v.clone());
                        }
                    }
                }
                "tag" | "app_tag" => {
                    params.insert(key.clone(), value.clone());
                }
                _ => {
                    params.insert(format!("q[{key}]"), value.clone());
                }
            }
        }
    }
}

const fn is_present(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

impl From<Map<String, Value>> for Filters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for Filters {
    /// Uses a JSON object as the filter map; any other value is empty.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

/// A lazy list query over one resource type.
///
/// A relation is either canonical (built from a resource type, targeting its
/// collection path) or nested (built from a parent instance, targeting
/// `<parent instance path>/<sub path>`). Records returned or created through a
/// nested relation carry the nested path as their base path.
pub struct Relation<R> {
    client: Client,
    path: String,
    nested: bool,
    filters: Filters,
    page: Option<u32>,
    per_page: Option<u32>,
    cursor: Option<String>,
    collection: OnceCell<Collection<R>>,
}

impl<R: Resource> Relation<R> {
    /// Creates a relation over a resource type's canonical path.
    #[must_use]
    pub fn new(client: Client, path: impl Into<String>) -> Self {
        Self::build(client, path.into(), false)
    }

    /// Creates a relation over a path reached through a parent record.
    #[must_use]
    pub fn nested(client: Client, path: impl Into<String>) -> Self {
        Self::build(client, path.into(), true)
    }

    fn build(client: Client, path: String, nested: bool) -> Self {
        Self {
            client,
            path,
            nested,
            filters: Filters::default(),
            page: None,
            per_page: None,
            cursor: None,
            collection: OnceCell::new(),
        }
    }

    /// Copies the query state into a new relation with an empty cache.
    fn derive(&self, update: impl FnOnce(&mut Self)) -> Self {
        let mut next = Self {
            client: self.client.clone(),
            path: self.path.clone(),
            nested: self.nested,
            filters: self.filters.clone(),
            page: self.page,
            per_page: self.per_page,
            cursor: self.cursor.clone(),
            collection: OnceCell::new(),
        };
        update(&mut next);
        next
    }

    /// Returns a relation with `filters` merged into the current filters.
    #[must_use]
    pub fn filter(&self, filters: impl Into<Filters>) -> Self {
        let filters = filters.into();
        self.derive(|r| r.filters = r.filters.merged(filters))
    }

    /// Returns a relation requesting page `number`.
    #[must_use]
    pub fn page(&self, number: u32) -> Self {
        self.derive(|r| r.page = Some(number))
    }

    /// Returns a relation requesting `count` records per page.
    #[must_use]
    pub fn per(&self, count: u32) -> Self {
        self.derive(|r| r.per_page = Some(count))
    }

    /// Returns a relation starting at `token`.
    ///
    /// A cursor takes precedence over a page number: `page` is not sent
    /// while a cursor is set.
    #[must_use]
    pub fn cursor(&self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.derive(|r| r.cursor = Some(token))
    }

    /// Returns the target path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns `true` if this relation was reached through a parent record.
    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.nested
    }

    /// Returns the current filters.
    #[must_use]
    pub const fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Returns the client this relation sends with.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Assembles the query parameters of the list request.
    #[must_use]
    pub fn params(&self) -> Params {
        let mut params = Params::new();
        self.filters.append_params(&mut params);

        if self.cursor.is_none() {
            if let Some(page) = self.page {
                params.insert("page".to_string(), Value::from(page));
            }
        }

        let per_page = self.per_page.unwrap_or_else(|| self.client.config().per_page());
        params.insert("per_page".to_string(), Value::from(per_page));

        if let Some(cursor) = &self.cursor {
            params.insert("cursor".to_string(), Value::String(cursor.clone()));
        }

        params
    }

    fn base_path(&self) -> Option<String> {
        self.nested.then(|| self.path.clone())
    }

    fn page_request(&self) -> PageRequest {
        PageRequest {
            client: self.client.clone(),
            path: self.path.clone(),
            params: self.params(),
            base_path: self.base_path(),
        }
    }

    /// Sends the list request once and returns the memoized page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails. A failed request
    /// is not memoized.
    pub async fn collection(&self) -> Result<&Collection<R>, ResourceError> {
        self.collection
            .get_or_try_init(|| self.page_request().fetch())
            .await
    }

    /// Returns a copy of the memoized page's items.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn items(&self) -> Result<Vec<R>, ResourceError> {
        Ok(self.collection().await?.to_vec())
    }

    /// Returns the server-reported total, or the page length when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn count(&self) -> Result<u64, ResourceError> {
        let collection = self.collection().await?;
        Ok(collection
            .total()
            .unwrap_or_else(|| u64::try_from(collection.len()).unwrap_or(u64::MAX)))
    }

    /// Returns the first record, fetched with a page size of one.
    ///
    /// This always sends its own request; an already memoized page is not
    /// consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn first(&self) -> Result<Option<R>, ResourceError> {
        let page = self.per(1).page_request().fetch::<R>().await?;
        Ok(page.into_vec().into_iter().next())
    }

    /// Finds a record by id through the resource type's canonical path.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails, including 404.
    pub async fn find(&self, id: &str) -> Result<R, ResourceError> {
        R::find(&self.client, id).await
    }

    /// Creates a record at this relation's path.
    ///
    /// Returns `Ok(None)` when the server rejects the attributes (422).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for every other failure.
    pub async fn create(&self, attrs: Value) -> Result<Option<R>, ResourceError> {
        match self.create_strict(attrs).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_validation() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Creates a record at this relation's path, failing on validation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for any failure, including 422.
    pub async fn create_strict(&self, attrs: Value) -> Result<R, ResourceError> {
        create_at(&self.client, &self.path, self.base_path(), attrs).await
    }

    /// Starts a forward-only walk over the pages of this query.
    ///
    /// The first page reuses the memoized collection if there is one.
    #[must_use]
    pub fn pages(&self) -> Pages<R> {
        match self.collection.get() {
            Some(collection) => collection.clone().into_pages(),
            None => Pages::from_request(self.page_request()),
        }
    }
}

impl<R: Resource> Clone for Relation<R> {
    fn clone(&self) -> Self {
        self.derive(|_| {})
    }
}

impl<R> fmt::Debug for Relation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("resource", &std::any::type_name::<R>())
            .field("path", &self.path)
            .field("nested", &self.nested)
            .field("filters", &self.filters)
            .field("page", &self.page)
            .field("per_page", &self.per_page)
            .field("cursor", &self.cursor)
            .field("loaded", &self.collection.initialized())
            .finish()
    }
}
