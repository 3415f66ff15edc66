//! Path building for REST resources.
//!
//! GrayCRM resources live at a canonical collection path (`/contacts`) and,
//! when reached through a parent, at a nested one (`/contacts/abc/flags`).
//! This module builds member and nested paths from those prefixes and
//! derives the body key a resource is wrapped under.
//!
//! # Example
//!
//! ```rust
//! use graycrm::rest::{member_path, nested_path, resource_key};
//!
//! assert_eq!(resource_key("ContactEmail"), "contact_email");
//! assert_eq!(member_path("/contacts", "abc"), "/contacts/abc");
//! assert_eq!(nested_path("/contacts/abc", "flags"), "/contacts/abc/flags");
//! ```

use serde_json::Value;

/// A nested relation declared by a resource type.
///
/// `sub_path` is appended to a parent's instance path to reach the child
/// collection. It is usually the relation name, but differs when the server
/// exposes a join resource (e.g. a contact's `tags` live at `taggings`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedResource {
    /// The relation name on the parent (e.g., `"emails"`).
    pub name: &'static str,
    /// The type name of the child resource (e.g., `"ContactEmail"`).
    pub target: &'static str,
    /// The path segment below the parent's instance path.
    pub sub_path: &'static str,
}

impl NestedResource {
    /// Creates a nested relation whose sub-path differs from its name.
    #[must_use]
    pub const fn new(name: &'static str, target: &'static str, sub_path: &'static str) -> Self {
        Self {
            name,
            target,
            sub_path,
        }
    }

    /// Creates a nested relation whose sub-path is its name.
    #[must_use]
    pub const fn named(name: &'static str, target: &'static str) -> Self {
        Self::new(name, target, name)
    }
}

/// Derives the request-body key from a type name.
///
/// Upper-case letters start a new `_`-separated word and the result is
/// lower-cased, so `ContactEmail` becomes `contact_email`.
#[must_use]
pub fn resource_key(type_name: &str) -> String {
    let mut key = String::with_capacity(type_name.len() + 4);
    for (i, ch) in type_name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                key.push('_');
            }
            key.push(ch.to_ascii_lowercase());
        } else {
            key.push(ch);
        }
    }
    key
}

/// Builds the path of one member of a collection.
///
/// The id is percent-encoded so it is always a single path segment.
#[must_use]
pub fn member_path(collection: &str, id: &str) -> String {
    format!(
        "{}/{}",
        collection.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}

/// Builds a path below an instance path.
#[must_use]
pub fn nested_path(instance: &str, sub_path: &str) -> String {
    format!(
        "{}/{}",
        instance.trim_end_matches('/'),
        sub_path.trim_start_matches('/')
    )
}

/// Returns the `data` payload of a response, or the response itself.
///
/// A missing or `null` `data` key yields the whole body.
#[must_use]
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(_) | None => Value::Object(map),
        },
        other => other,
    }
}

/// Renders an id attribute as a path segment.
///
/// Strings are used verbatim and numbers are formatted; every other value
/// (including `null`) has no path form.
#[must_use]
pub fn id_to_param(id: &Value) -> Option<String> {
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
