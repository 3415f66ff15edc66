//! Contact-property link resource.
//!
//! A contact's properties and a property's contacts are both exposed through
//! this join record, at `<contact>/contact_properties` and
//! `<property>/contact_properties`.

use chrono::{DateTime, Utc};

crate::resource! {
    /// The link between a contact and a property, with the contact's role.
    pub struct ContactProperty {
        path: "/contact_properties",
        attributes {
            contact_id: String => set_contact_id,
            property_id: String => set_property_id,
            role: String => set_role,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
    }
}
