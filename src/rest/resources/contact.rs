//! Contact resource implementation.
//!
//! This module provides the [`Contact`] resource, the person records at the
//! center of GrayCRM, and [`DuplicateGroup`] for duplicate detection.
//!
//! # Nested Resources
//!
//! | Method | Type | Path below the contact |
//! |--------|------|------------------------|
//! | `emails` | [`ContactEmail`] | `contact_emails` |
//! | `phones` | [`ContactPhone`] | `contact_phones` |
//! | `tags` | [`Tag`] | `taggings` |
//! | `flags` | [`Flag`] | `flags` |
//! | `notes` | [`Note`] | `notes` |
//! | `activities` | [`Activity`] | `activities` |
//! | `custom_attributes` | [`CustomAttribute`] | `custom_attributes` |
//! | `properties` | [`ContactProperty`] | `contact_properties` |
//! | `audit_events` | [`AuditEvent`] | `audit_events` |
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::rest::Resource;
//! use graycrm::resources::Contact;
//!
//! let mut winner = Contact::find(&client, "abc").await?;
//! println!("{:?} <{:?}>", winner.first_name(), winner.email());
//!
//! for group in Contact::duplicates(&client).await? {
//!     println!("{:?}: {} contacts", group.match_type, group.contacts.len());
//! }
//!
//! winner.merge(&client, "def").await?;
//! ```

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::{
    Activity, AuditEvent, ContactEmail, ContactPhone, ContactProperty, CustomAttribute, Flag,
    Note, Tag,
};
use crate::clients::Client;
use crate::rest::{member_path, nested_path, unwrap_data, Resource, ResourceError};

crate::resource! {
    /// A person tracked in GrayCRM.
    ///
    /// Responses may embed the contact's `emails` and `phones`; see
    /// [`email`](Contact::email) and [`phone`](Contact::phone).
    pub struct Contact {
        path: "/contacts",
        attributes {
            first_name: String => set_first_name,
            last_name: String => set_last_name,
            company: String => set_company,
            source: String => set_source,
            source_detail: String => set_source_detail,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
        nested {
            emails: ContactEmail => "contact_emails",
            phones: ContactPhone => "contact_phones",
            tags: Tag => "taggings",
            flags: Flag,
            notes: Note,
            activities: Activity,
            custom_attributes: CustomAttribute,
            properties: ContactProperty => "contact_properties",
            audit_events: AuditEvent,
        }
    }
}

/// A set of contacts the server considers duplicates of each other.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// What matched (e.g., `"email"`, `"phone"`, `"name"`).
    pub match_type: Option<String>,
    /// The matched value.
    pub match_detail: Option<Value>,
    /// The contacts in the group.
    pub contacts: Vec<Contact>,
}

impl Contact {
    /// Returns the primary email.
    ///
    /// The primary entry of an embedded `emails` list wins over a flat
    /// `email` attribute.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.primary_embedded("emails", "email")
    }

    /// Returns the primary phone number.
    ///
    /// The primary entry of an embedded `phones` list wins over a flat
    /// `phone` attribute.
    #[must_use]
    pub fn phone(&self) -> Option<String> {
        self.primary_embedded("phones", "phone")
    }

    fn primary_embedded(&self, list: &str, field: &str) -> Option<String> {
        let embedded = self
            .record
            .get(list)
            .and_then(Value::as_array)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|entry| is_truthy(entry.get("primary")))
            })
            .and_then(|entry| entry.get(field))
            .and_then(Value::as_str);

        embedded
            .or_else(|| self.record.get(field).and_then(Value::as_str))
            .map(ToString::to_string)
    }

    /// Merges the contact `loser_id` into this one.
    ///
    /// The server deletes the loser; the response is merged into this
    /// record's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] for an unsaved contact and
    /// [`ResourceError::Http`] if the request fails.
    pub async fn merge(&mut self, client: &Client, loser_id: &str) -> Result<(), ResourceError> {
        let path = nested_path(&self.instance_path("merge")?, "merge");
        let body = client
            .post(&path, Some(json!({"merge": {"loser_id": loser_id}})))
            .await?;
        self.record.merge(unwrap_data(body));
        Ok(())
    }

    /// Lists groups of likely duplicate contacts.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn duplicates(client: &Client) -> Result<Vec<DuplicateGroup>, ResourceError> {
        let body = client
            .get(&member_path(Self::PATH, "duplicates"), None)
            .await?;

        let groups = body
            .get("data")
            .and_then(Value::as_array)
            .map(|groups| groups.iter().map(DuplicateGroup::from_value).collect())
            .unwrap_or_default();
        Ok(groups)
    }
}

impl DuplicateGroup {
    fn from_value(group: &Value) -> Self {
        Self {
            match_type: group
                .get("match_type")
                .and_then(Value::as_str)
                .map(ToString::to_string),
            match_detail: group.get("match_detail").filter(|v| !v.is_null()).cloned(),
            contacts: group
                .get("contacts")
                .and_then(Value::as_array)
                .map(|contacts| contacts.iter().cloned().map(Contact::from_value).collect())
                .unwrap_or_default(),
        }
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null | Value::Bool(false)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_prefers_primary_embedded_entry() {
        let contact = Contact::from_value(json!({
            "id": "abc",
            "email": "flat@example.com",
            "emails": [
                {"email": "work@example.com", "primary": false},
                {"email": "home@example.com", "primary": true}
            ]
        }));
        assert_eq!(contact.email().as_deref(), Some("home@example.com"));
    }

    #[test]
    fn test_email_falls_back_to_flat_attribute() {
        let contact = Contact::from_value(json!({
            "id": "abc",
            "email": "flat@example.com",
            "emails": [{"email": "work@example.com", "primary": false}]
        }));
        assert_eq!(contact.email().as_deref(), Some("flat@example.com"));
        assert_eq!(contact.phone(), None);
    }

    #[test]
    fn test_phone_from_embedded_list() {
        let contact = Contact::from_value(json!({
            "id": "abc",
            "phones": [{"phone": "+15125550100", "primary": true}]
        }));
        assert_eq!(contact.phone().as_deref(), Some("+15125550100"));
    }

    #[test]
    fn test_nested_wiring() {
        let names: Vec<&str> = Contact::NESTED.iter().map(|n| n.name).collect();
        assert_eq!(
            names,
            vec![
                "emails",
                "phones",
                "tags",
                "flags",
                "notes",
                "activities",
                "custom_attributes",
                "properties",
                "audit_events"
            ]
        );
        let tags = Contact::NESTED.iter().find(|n| n.name == "tags").unwrap();
        assert_eq!(tags.sub_path, "taggings");
        assert_eq!(tags.target, "Tag");
        let flags = Contact::NESTED.iter().find(|n| n.name == "flags").unwrap();
        assert_eq!(flags.sub_path, "flags");
    }

    #[test]
    fn test_duplicate_group_parsing() {
        let group = DuplicateGroup::from_value(&json!({
            "match_type": "email",
            "match_detail": "ann@example.com",
            "contacts": [{"id": "a"}, {"id": "b"}]
        }));
        assert_eq!(group.match_type.as_deref(), Some("email"));
        assert_eq!(group.contacts.len(), 2);
        assert_eq!(group.contacts[1].id().as_deref(), Some("b"));
    }

    #[test]
    fn test_typed_timestamp_getter() {
        let contact = Contact::from_value(json!({"id": "a", "created_at": "2024-01-02T03:04:05Z"}));
        let created = contact.created_at().unwrap();
        assert_eq!(created.to_rfc3339(), "2024-01-02T03:04:05+00:00");
    }
}
