//! GrayCRM record types and endpoint helpers.
//!
//! Every record type is declared with [`resource!`](crate::resource) and
//! implements [`Resource`](crate::rest::Resource), so all of them share
//! `find`, `all`, `filter`, `create`, `save`, `destroy`, and `reload`.
//!
//! # Records
//!
//! | Type | Path |
//! |------|------|
//! | [`Contact`] | `/contacts` |
//! | [`Property`] | `/properties` |
//! | [`Tag`] | `/tags` |
//! | [`Flag`] | `/flags` |
//! | [`Note`] | `/notes` |
//! | [`Activity`] | `/activities` |
//! | [`CustomAttribute`] | `/custom_attributes` |
//! | [`ContactEmail`] | `/contact_emails` |
//! | [`ContactPhone`] | `/contact_phones` |
//! | [`ContactProperty`] | `/contact_properties` |
//! | [`AuditEvent`] | `/audit_events` |
//! | [`Webhook`] | `/webhooks` |
//! | [`Export`] | `/exports` |
//!
//! # Other Endpoints
//!
//! - [`Batch`]: several operations in one request
//! - [`Search`]: search across contacts, properties, and tags
//! - [`Stats`]: account-wide counts

mod activity;
mod audit_event;
mod batch;
mod contact;
mod contact_email;
mod contact_phone;
mod contact_property;
mod custom_attribute;
mod export;
mod flag;
mod note;
mod property;
mod search;
mod stats;
mod tag;
mod webhook;

pub use activity::Activity;
pub use audit_event::AuditEvent;
pub use batch::{Batch, BatchOperation, BatchResponse, BatchResult};
pub use contact::{Contact, DuplicateGroup};
pub use contact_email::ContactEmail;
pub use contact_phone::ContactPhone;
pub use contact_property::ContactProperty;
pub use custom_attribute::CustomAttribute;
pub use export::Export;
pub use flag::Flag;
pub use note::Note;
pub use property::Property;
pub use search::{Search, SearchResult};
pub use stats::Stats;
pub use tag::Tag;
pub use webhook::Webhook;
