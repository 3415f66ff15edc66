//! Tag resource.

use chrono::{DateTime, Utc};

crate::resource! {
    /// A label that can be attached to contacts and properties.
    ///
    /// Tags reached through a parent live at the parent's `taggings` path.
    pub struct Tag {
        path: "/tags",
        attributes {
            name: String => set_name,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
    }
}
