//! Flag resource.
//!
//! Flags are key/value markers on contacts and properties that a user can
//! claim. A flag listed through its parent keeps the parent's path, so
//! [`Flag::claim`] posts to `/contacts/<id>/flags/<flag id>/claim` rather
//! than the canonical `/flags/<flag id>/claim`.
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::rest::Resource;
//! use graycrm::resources::Contact;
//!
//! let contact = Contact::find(&client, "abc").await?;
//! for mut flag in contact.flags(&client)?.items().await? {
//!     if flag.claimed_at().is_none() {
//!         flag.claim(&client).await?;
//!     }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::clients::Client;
use crate::rest::{nested_path, Resource, ResourceError};

crate::resource! {
    /// A claimable marker on a contact or property.
    pub struct Flag {
        path: "/flags",
        attributes {
            key: String => set_key,
            value: Value => set_value,
            claimed_at: DateTime<Utc> => set_claimed_at,
            claimed_by_id: String => set_claimed_by_id,
            flaggable_type: String => set_flaggable_type,
            flaggable_id: String => set_flaggable_id,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
    }
}

impl Flag {
    /// Claims the flag for the API key's user, then reloads it.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] for an unsaved flag and
    /// [`ResourceError::Http`] if either request fails.
    pub async fn claim(&mut self, client: &Client) -> Result<(), ResourceError> {
        let path = nested_path(&self.instance_path("claim")?, "claim");
        client.post(&path, None).await?;
        self.reload(client).await
    }
}
