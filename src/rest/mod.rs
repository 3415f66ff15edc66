//! Resource, query, and pagination layer.
//!
//! This module turns GrayCRM's REST endpoints into record types with CRUD,
//! filtered queries, pagination, and nested sub-resources.
//!
//! # Overview
//!
//! - [`Resource`]: The trait every record type implements, with default
//!   implementations for `find`, `all`, `create`, `save`, `destroy`, `reload`
//! - [`resource!`](crate::resource): Declares a record type
//! - [`Record`]: Attribute storage with dirty tracking and base path
//! - [`Relation`]: A lazy, immutable, memoized list query
//! - [`Collection`] / [`Pages`]: One page of records and the page walker
//! - [`Filters`]: The filter map accepted by [`Relation::filter`]
//! - [`ResourceError`]: Resource-level errors
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::rest::{Filters, Resource};
//! use graycrm::resources::Contact;
//! use serde_json::json;
//!
//! // Find, modify, and save (only changed attributes are sent)
//! let mut contact = Contact::find(&client, "abc").await?;
//! contact.set_company("Acme");
//! contact.save_strict(&client).await?;
//!
//! // Work through a parent: the flag keeps its nested path
//! let flags = contact.flags(&client)?;
//! let vip = flags.create_strict(json!({"key": "vip", "value": "true"})).await?;
//! assert_eq!(vip.base_path(), Some("/contacts/abc/flags"));
//!
//! // Query lazily
//! let acme = Contact::filter(&client, Filters::new().query("company", "Acme")).per(50);
//! println!("{} contacts", acme.count().await?);
//! ```

mod collection;
mod errors;
mod path;
mod relation;
mod resource;
mod tracking;

pub mod resources;

// Public exports
pub use collection::{Collection, Pages, Pagination};
pub use errors::ResourceError;
pub use path::{id_to_param, member_path, nested_path, resource_key, unwrap_data, NestedResource};
pub use relation::{Filters, Relation};
pub use resource::Resource;
#[doc(hidden)]
pub use resource::debug_record;
pub use tracking::Record;
