//! Webhook resource.

use chrono::{DateTime, Utc};

use crate::clients::Client;
use crate::rest::{nested_path, Resource, ResourceError};

crate::resource! {
    /// An outbound webhook subscription.
    ///
    /// `secret` is only returned on creation.
    pub struct Webhook {
        path: "/webhooks",
        attributes {
            url: String => set_url,
            events: Vec<String> => set_events,
            active: bool => set_active,
            secret: String => set_secret,
            consecutive_failures: i64 => set_consecutive_failures,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
    }
}

impl Webhook {
    /// Asks the server to deliver a test event to this webhook.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] for an unsaved webhook and
    /// [`ResourceError::Http`] if the request fails.
    pub async fn send_test(&self, client: &Client) -> Result<(), ResourceError> {
        let path = nested_path(&self.instance_path("test")?, "test");
        client.post(&path, None).await?;
        Ok(())
    }
}
