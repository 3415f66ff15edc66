//! The `Resource` trait and the `resource!` declaration macro.
//!
//! Every GrayCRM record type implements [`Resource`]. Implementors provide
//! their name, canonical path, attribute list, nested relations, and access to
//! their [`Record`]; the trait supplies the shared capability set:
//!
//! - Type-level: `find`, `find_by`, `all`, `filter`, `page`, `per`, `cursor`,
//!   `create`, `create_strict`
//! - Instance-level: `save`, `save_strict`, `update`, `update_strict`,
//!   `destroy`, `reload`
//!
//! # Path Resolution
//!
//! A record reached through a parent (for example a flag listed from
//! `/contacts/abc/flags`) keeps that prefix as its base path. Instance
//! operations resolve against `<base path or canonical path>/<id>`, so the
//! flag is updated at `/contacts/abc/flags/<id>` while a flag fetched
//! directly uses `/flags/<id>`.
//!
//! # Validation Failures
//!
//! `create`, `save`, and `update` turn a 422 response into a value
//! (`Ok(None)` / `Ok(false)`) and record the field messages on the instance.
//! The `_strict` variants return the validation error instead. Every other
//! failure is returned as an error by both.
//!
//! # Declaring a Resource
//!
//! ```rust,ignore
//! graycrm::resource! {
//!     /// A label attached to contacts and properties.
//!     pub struct Label {
//!         path: "/labels",
//!         attributes {
//!             name: String => set_name,
//!             created_at: chrono::DateTime<chrono::Utc> => set_created_at,
//!         }
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::clients::{Client, HttpError};
use crate::rest::errors::ResourceError;
use crate::rest::path::{member_path, nested_path, resource_key, unwrap_data, NestedResource};
use crate::rest::relation::{Filters, Relation};
use crate::rest::tracking::Record;

/// A GrayCRM record type.
///
/// Use the [`resource!`](crate::resource) macro to implement this trait; it
/// generates the struct, typed accessors, nested relations, equality, and
/// hashing.
///
/// # Equality
///
/// Two records are equal iff both have an id and the ids match. A new record
/// is never equal to anything, itself included, so several unsaved records
/// can share a `HashSet`.
#[allow(async_fn_in_trait)]
pub trait Resource: Clone + fmt::Debug + Send + Sync + Sized + 'static {
    /// The type name (e.g., `"ContactEmail"`).
    const NAME: &'static str;

    /// The canonical collection path (e.g., `"/contacts"`).
    const PATH: &'static str;

    /// The declared attribute names, `id` first.
    const ATTRIBUTES: &'static [&'static str];

    /// The nested relations reachable from an instance.
    const NESTED: &'static [NestedResource] = &[];

    /// Wraps a record.
    fn from_record(record: Record) -> Self;

    /// Returns the underlying record.
    fn record(&self) -> &Record;

    /// Returns the underlying record mutably.
    fn record_mut(&mut self) -> &mut Record;

    /// Builds a clean instance from an attribute object.
    #[must_use]
    fn from_value(value: Value) -> Self {
        Self::from_record(Record::from_value(value))
    }

    /// The key write bodies are wrapped under (e.g., `"contact_email"`).
    #[must_use]
    fn resource_key() -> String {
        resource_key(Self::NAME)
    }

    /// Returns the id, or `None` for a new record.
    #[must_use]
    fn id(&self) -> Option<String> {
        self.record().id()
    }

    /// Returns the id as a path segment; `None` for a new record.
    #[must_use]
    fn to_param(&self) -> Option<String> {
        self.id()
    }

    /// Returns `true` if the record has no id.
    #[must_use]
    fn is_new(&self) -> bool {
        self.record().is_new()
    }

    /// Returns `true` if the record has an id.
    #[must_use]
    fn is_persisted(&self) -> bool {
        self.record().is_persisted()
    }

    /// Returns `true` if attributes changed since the last load or save.
    #[must_use]
    fn is_changed(&self) -> bool {
        self.record().is_dirty()
    }

    /// Returns the validation messages of the last failed save.
    #[must_use]
    fn errors(&self) -> &HashMap<String, Vec<String>> {
        self.record().errors()
    }

    /// Returns a copy of the attributes as a JSON object.
    #[must_use]
    fn to_value(&self) -> Value {
        self.record().to_value()
    }

    /// Returns the path prefix this record was reached through, if any.
    #[must_use]
    fn base_path(&self) -> Option<&str> {
        self.record().base_path()
    }

    /// Returns the raw value of an attribute.
    #[must_use]
    fn attribute(&self, key: &str) -> Option<&Value> {
        self.record().get(key)
    }

    /// Writes an attribute and marks it changed.
    fn set_attribute(&mut self, key: &str, value: impl Into<Value>) {
        self.record_mut().set(key, value);
    }

    /// The path new records are created at: the base path if set, else the
    /// canonical path.
    #[must_use]
    fn collection_path(&self) -> String {
        self.base_path().unwrap_or(Self::PATH).to_string()
    }

    /// The path of this record.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] for a new record.
    fn instance_path(&self, operation: &'static str) -> Result<String, ResourceError> {
        let id = self.id().ok_or(ResourceError::MissingId {
            resource: Self::NAME,
            operation,
        })?;
        Ok(member_path(&self.collection_path(), &id))
    }

    /// Returns a relation over `<instance path>/<sub_path>`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] for a new record.
    fn nested_relation<C: Resource>(
        &self,
        client: &Client,
        sub_path: &str,
    ) -> Result<Relation<C>, ResourceError> {
        let instance = self.instance_path("list nested resources of")?;
        Ok(Relation::nested(
            client.clone(),
            nested_path(&instance, sub_path),
        ))
    }

    /// Fetches a record by id from the canonical path.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails; a missing
    /// record is `HttpError::NotFound`.
    async fn find(client: &Client, id: &str) -> Result<Self, ResourceError> {
        let body = client.get(&member_path(Self::PATH, id), None).await?;
        Ok(Self::from_value(unwrap_data(body)))
    }

    /// Returns the first record matching `filters`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    async fn find_by(client: &Client, filters: impl Into<Filters>) -> Result<Option<Self>, ResourceError> {
        Self::filter(client, filters).first().await
    }

    /// Returns an unfiltered relation over the canonical path.
    #[must_use]
    fn all(client: &Client) -> Relation<Self> {
        Relation::new(client.clone(), Self::PATH)
    }

    /// Returns a filtered relation over the canonical path.
    #[must_use]
    fn filter(client: &Client, filters: impl Into<Filters>) -> Relation<Self> {
        Self::all(client).filter(filters)
    }

    /// Returns a relation requesting page `number`.
    #[must_use]
    fn page(client: &Client, number: u32) -> Relation<Self> {
        Self::all(client).page(number)
    }

    /// Returns a relation requesting `count` records per page.
    #[must_use]
    fn per(client: &Client, count: u32) -> Relation<Self> {
        Self::all(client).per(count)
    }

    /// Returns a relation starting at a cursor.
    #[must_use]
    fn cursor(client: &Client, token: impl Into<String>) -> Relation<Self> {
        Self::all(client).cursor(token)
    }

    /// Creates a record at the canonical path.
    ///
    /// Returns `Ok(None)` when the server rejects the attributes (422).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for every other failure.
    async fn create(client: &Client, attrs: Value) -> Result<Option<Self>, ResourceError> {
        Self::all(client).create(attrs).await
    }

    /// Creates a record at the canonical path, failing on validation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for any failure, including 422.
    async fn create_strict(client: &Client, attrs: Value) -> Result<Self, ResourceError> {
        create_at(client, Self::PATH, None, attrs).await
    }

    /// Persists the record.
    ///
    /// A persisted record PATCHes only its changed attributes to its instance
    /// path; a new record POSTs all attributes to its collection path. On
    /// success the response is merged in and the record is clean. On a 422
    /// the field messages are kept in [`errors`](Self::errors) and
    /// `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for every non-validation failure.
    async fn save(&mut self, client: &Client) -> Result<bool, ResourceError> {
        match self.save_strict(client).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_validation() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Persists the record, failing on validation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for any failure, including 422.
    async fn save_strict(&mut self, client: &Client) -> Result<(), ResourceError> {
        match persist(self, client).await {
            Err(ResourceError::Http(HttpError::Validation(e))) => {
                self.record_mut().set_errors(e.validation_errors());
                Err(ResourceError::Http(HttpError::Validation(e)))
            }
            other => other,
        }
    }

    /// Applies `attrs` as changes, then [`save`](Self::save)s.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for every non-validation failure.
    async fn update(&mut self, client: &Client, attrs: Value) -> Result<bool, ResourceError> {
        assign(self, attrs);
        self.save(client).await
    }

    /// Applies `attrs` as changes, then [`save_strict`](Self::save_strict)s.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for any failure, including 422.
    async fn update_strict(&mut self, client: &Client, attrs: Value) -> Result<(), ResourceError> {
        assign(self, attrs);
        self.save_strict(client).await
    }

    /// Deletes the record at its instance path.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] for a new record and
    /// [`ResourceError::Http`] if the request fails.
    async fn destroy(&self, client: &Client) -> Result<(), ResourceError> {
        let path = self.instance_path("destroy")?;
        client.delete(&path).await?;
        Ok(())
    }

    /// Replaces all attributes with the server's copy.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] for a new record and
    /// [`ResourceError::Http`] if the request fails.
    async fn reload(&mut self, client: &Client) -> Result<(), ResourceError> {
        let path = self.instance_path("reload")?;
        let body = client.get(&path, None).await?;
        self.record_mut().replace(unwrap_data(body));
        Ok(())
    }
}

fn assign<R: Resource>(resource: &mut R, attrs: Value) {
    if let Value::Object(map) = attrs {
        resource.record_mut().assign(map);
    }
}

/// Wraps attributes under a resource key: `{"<key>": attrs}`.
pub(crate) fn wrap_body(key: String, attrs: Value) -> Value {
    let mut body = Map::new();
    body.insert(key, attrs);
    Value::Object(body)
}

async fn persist<R: Resource>(resource: &mut R, client: &Client) -> Result<(), ResourceError> {
    let key = R::resource_key();
    let body = if resource.is_persisted() {
        let path = resource.instance_path("update")?;
        let changes = Value::Object(resource.record().changed_fields());
        client.patch(&path, wrap_body(key, changes)).await?
    } else {
        let path = resource.collection_path();
        client
            .post(&path, Some(wrap_body(key, resource.to_value())))
            .await?
    };

    let record = resource.record_mut();
    record.merge(unwrap_data(body));
    record.mark_clean();
    record.clear_errors();
    Ok(())
}

/// Creates a record at `path` and tags it with `base_path`.
pub(crate) async fn create_at<R: Resource>(
    client: &Client,
    path: &str,
    base_path: Option<String>,
    attrs: Value,
) -> Result<R, ResourceError> {
    let body = client
        .post(path, Some(wrap_body(R::resource_key(), attrs)))
        .await?;
    Ok(R::from_record(
        Record::from_value(unwrap_data(body)).with_base_path(base_path),
    ))
}

/// Formats a record as `Name { attr: value, .. }` for `Debug` impls.
#[doc(hidden)]
pub fn debug_record(name: &str, record: &Record, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut out = f.debug_struct(name);
    for (key, value) in record.attributes() {
        out.field(key, value);
    }
    out.finish()
}

/// Declares a GrayCRM resource type.
///
/// Generates:
///
/// - the struct wrapping a [`Record`](crate::rest::Record)
/// - the [`Resource`](crate::rest::Resource) impl (`NAME` is the struct name)
/// - a typed getter per attribute returning `Option<T>`, plus the named setter
///   that marks the attribute changed
/// - a method per nested relation returning a nested
///   [`Relation`](crate::rest::Relation)
/// - `Debug`, `Default`, `PartialEq`/`Eq`, and `Hash` by id
///
/// The `id` attribute is always present and read through
/// [`Resource::id`](crate::rest::Resource::id).
///
/// A nested relation written as `name: Target` uses `name` as its sub-path;
/// `name: Target => "sub_path"` overrides it.
///
/// # Equality
///
/// `Eq` is not reflexive for unsaved records: a record without an id is
/// unequal to every record, its own clone included. A `HashSet` or `HashMap`
/// therefore only deduplicates and finds persisted records; an unsaved record
/// inserted into a set cannot be looked up again.
///
/// # Example
///
/// ```rust
/// use graycrm::rest::Resource;
/// use serde_json::json;
///
/// graycrm::resource! {
///     /// A label.
///     pub struct Label {
///         path: "/labels",
///         attributes {
///             name: String => set_name,
///         }
///     }
/// }
///
/// let mut label = Label::from_value(json!({"id": "l1", "name": "hot"}));
/// assert_eq!(label.name().as_deref(), Some("hot"));
///
/// label.set_name("warm");
/// assert!(label.is_changed());
/// assert_eq!(Label::resource_key(), "label");
/// ```
#[macro_export]
macro_rules! resource {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            path: $path:literal,
            attributes {
                $( $attr:ident : $ty:ty => $setter:ident ),* $(,)?
            }
            $( nested {
                $( $rel:ident : $target:ident $(=> $sub:literal)? ),* $(,)?
            } )?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        $vis struct $name {
            record: $crate::rest::Record,
        }

        impl $crate::rest::Resource for $name {
            const NAME: &'static str = stringify!($name);
            const PATH: &'static str = $path;
            const ATTRIBUTES: &'static [&'static str] = &["id" $(, stringify!($attr))*];
            const NESTED: &'static [$crate::rest::NestedResource] = &[
                $($( $crate::__nested_resource!($rel, $target $(, $sub)?), )*)?
            ];

            fn from_record(record: $crate::rest::Record) -> Self {
                Self { record }
            }

            fn record(&self) -> &$crate::rest::Record {
                &self.record
            }

            fn record_mut(&mut self) -> &mut $crate::rest::Record {
                &mut self.record
            }
        }

        impl $name {
            /// Creates an unsaved record with no attributes.
            #[must_use]
            pub fn new() -> Self {
                <Self as $crate::rest::Resource>::from_record($crate::rest::Record::new())
            }

            $(
                #[doc = concat!("Returns the `", stringify!($attr), "` attribute.")]
                #[must_use]
                pub fn $attr(&self) -> Option<$ty> {
                    self.record.get_as(stringify!($attr))
                }

                #[doc = concat!("Sets the `", stringify!($attr), "` attribute and marks it changed.")]
                pub fn $setter(&mut self, value: impl Into<$crate::__private::Value>) {
                    self.record.set(stringify!($attr), value);
                }
            )*

            $($(
                #[doc = concat!("Returns the nested `", stringify!($rel), "` of this record.")]
                ///
                /// # Errors
                ///
                /// Returns `ResourceError::MissingId` for an unsaved record.
                pub fn $rel(
                    &self,
                    client: &$crate::Client,
                ) -> Result<$crate::rest::Relation<$target>, $crate::rest::ResourceError> {
                    <Self as $crate::rest::Resource>::nested_relation(
                        self,
                        client,
                        $crate::__nested_resource!(@sub_path $rel $(, $sub)?),
                    )
                }
            )*)?
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                $crate::rest::debug_record(stringify!($name), &self.record, f)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                match (
                    <Self as $crate::rest::Resource>::id(self),
                    <Self as $crate::rest::Resource>::id(other),
                ) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
        }

        impl Eq for $name {}

        impl ::std::hash::Hash for $name {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash(stringify!($name), state);
                ::std::hash::Hash::hash(&<Self as $crate::rest::Resource>::id(self), state);
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __nested_resource {
    ($rel:ident, $target:ident) => {
        $crate::rest::NestedResource::named(stringify!($rel), stringify!($target))
    };
    ($rel:ident, $target:ident, $sub:literal) => {
        $crate::rest::NestedResource::new(stringify!($rel), stringify!($target), $sub)
    };
    (@sub_path $rel:ident) => {
        stringify!($rel)
    };
    (@sub_path $rel:ident, $sub:literal) => {
        $sub
    };
}
