//! Custom attribute resource.

use chrono::{DateTime, Utc};
use serde_json::Value;

crate::resource! {
    /// A free-form key/value pair attached to a contact or property.
    ///
    /// `value` is kept as raw JSON because the server accepts any scalar.
    pub struct CustomAttribute {
        path: "/custom_attributes",
        attributes {
            key: String => set_key,
            value: Value => set_value,
            attributable_type: String => set_attributable_type,
            attributable_id: String => set_attributable_id,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
    }
}
