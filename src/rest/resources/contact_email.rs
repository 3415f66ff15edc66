//! Contact email resource.

use chrono::{DateTime, Utc};

crate::resource! {
    /// An email address of a contact, listed at `<contact>/contact_emails`.
    pub struct ContactEmail {
        path: "/contact_emails",
        attributes {
            email: String => set_email,
            label: String => set_label,
            primary: bool => set_primary,
            contact_id: String => set_contact_id,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
    }
}
