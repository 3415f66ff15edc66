//! Contact phone resource.

use chrono::{DateTime, Utc};

crate::resource! {
    /// A phone number of a contact, listed at `<contact>/contact_phones`.
    pub struct ContactPhone {
        path: "/contact_phones",
        attributes {
            phone: String => set_phone,
            label: String => set_label,
            primary: bool => set_primary,
            contact_id: String => set_contact_id,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
    }
}
