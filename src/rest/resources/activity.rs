//! Activity resource.
//!
//! Activities record interactions (calls, meetings, emails) with a contact.
//! `occurred_at` is when the interaction happened; `created_at` is when it
//! was logged.
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::rest::Resource;
//! use serde_json::json;
//!
//! let contact = Contact::find(&client, "abc").await?;
//! let call = contact
//!     .activities(&client)?
//!     .create_strict(json!({
//!         "activity_type": "call",
//!         "subject": "Intro call",
//!         "occurred_at": "2024-03-01T15:00:00Z"
//!     }))
//!     .await?;
//! ```

use chrono::{DateTime, Utc};

crate::resource! {
    /// An interaction logged against a contact.
    pub struct Activity {
        path: "/activities",
        attributes {
            activity_type: String => set_activity_type,
            subject: String => set_subject,
            body: String => set_body,
            occurred_at: DateTime<Utc> => set_occurred_at,
            activitable_type: String => set_activitable_type,
            activitable_id: String => set_activitable_id,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
    }
}
