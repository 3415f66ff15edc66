//! Note resource.

use chrono::{DateTime, Utc};

crate::resource! {
    /// A free-text note on a contact or property.
    pub struct Note {
        path: "/notes",
        attributes {
            body: String => set_body,
            notable_type: String => set_notable_type,
            notable_id: String => set_notable_id,
            author_id: String => set_author_id,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
    }
}
