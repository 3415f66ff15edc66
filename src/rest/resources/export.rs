//! Export resource.
//!
//! Exports are produced asynchronously: create one, then poll it with
//! [`Export::wait_until_complete`] until the server reports `completed` or
//! `failed`.
//!
//! # Example
//!
//! ```rust,ignore
//! use graycrm::rest::Resource;
//! use graycrm::resources::Export;
//! use serde_json::json;
//!
//! let mut export = Export::create_strict(&client, json!({"resource_type": "contacts"})).await?;
//! export
//!     .wait_until_complete(&client, Export::DEFAULT_TIMEOUT, Export::DEFAULT_INTERVAL)
//!     .await?;
//! if export.is_completed() {
//!     println!("{:?}", export.download_url());
//! }
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::clients::Client;
use crate::rest::{Resource, ResourceError};

crate::resource! {
    /// A server-side export of contacts or properties.
    pub struct Export {
        path: "/exports",
        attributes {
            resource_type: String => set_resource_type,
            status: String => set_status,
            total_rows: i64 => set_total_rows,
            query_params: Value => set_query_params,
            download_url: String => set_download_url,
            created_at: DateTime<Utc> => set_created_at,
            updated_at: DateTime<Utc> => set_updated_at,
        }
    }
}

impl Export {
    /// How long [`wait_until_complete`](Self::wait_until_complete) waits by default.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// The default delay between polls.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

    /// Returns `true` if the status is `completed`.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.has_status("completed")
    }

    /// Returns `true` if the status is `failed`.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.has_status("failed")
    }

    /// Returns `true` if the status is `pending`.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.has_status("pending")
    }

    /// Returns `true` if the status is `processing`.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.has_status("processing")
    }

    fn has_status(&self, status: &str) -> bool {
        self.record.get("status").and_then(Value::as_str) == Some(status)
    }

    /// Reloads the export every `interval` until it is completed or failed.
    ///
    /// The export is reloaded at least once. A failed export is not an
    /// error; check [`is_failed`](Self::is_failed) afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Timeout`] once `timeout` has elapsed and
    /// [`ResourceError::Http`] if a reload fails.
    pub async fn wait_until_complete(
        &mut self,
        client: &Client,
        timeout: Duration,
        interval: Duration,
    ) -> Result<(), ResourceError> {
        let deadline = Instant::now() + timeout;
        loop {
            self.reload(client).await?;
            if self.is_completed() || self.is_failed() {
                return Ok(());
            }
            if Instant::now() > deadline {
                return Err(ResourceError::Timeout {
                    resource: Self::NAME,
                    seconds: timeout.as_secs(),
                });
            }
            debug!(
                id = ?self.id(),
                status = ?self.status(),
                "Export not finished, polling again"
            );
            sleep(interval).await;
        }
    }
}
