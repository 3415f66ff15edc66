//! Property resource.
//!
//! A property is a physical location (a home, an office) that contacts are
//! linked to.
//!
//! # Nested Resources
//!
//! | Method | Type | Path below the property |
//! |--------|------|-------------------------|
//! | `contacts` | [`ContactProperty`] | `contact_properties` |
//! | `tags` | [`Tag`] | `taggings` |
//! | `flags` | [`Flag`] | `flags` |
//! | `notes` | [`Note`] | `notes` |
//! | `custom_attributes` | [`CustomAttribute`] | `custom_attributes` |
//! | `audit_events` | [`AuditEvent`] | `audit_events` |

use chrono::{DateTime, Utc};

use super::{AuditEvent, ContactProperty, CustomAttribute, Flag, Note, Tag};

crate::resource! {
    /// A physical location linked to contacts.
    pub struct Property {
        path: "/properties",
        attributes {
            name: String => set_name,
            street: String => set_street,
            city: String => set_city,
            state: String => set_state,
            zip: String => set_zip,
            country: String => set_country,
            latitude: f64 => set_latitude,
            longitude: f64 => set_longitude,
            source: String => set_source,
            source_detail: String => set_source_detail,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
        nested {
            contacts: ContactProperty => "contact_properties",
            tags: Tag => "taggings",
            flags: Flag,
            notes: Note,
            custom_attributes: CustomAttribute,
            audit_events: AuditEvent,
        }
    }
}
