//! Audit event resource.

use chrono::{DateTime, Utc};
use serde_json::Value;

crate::resource! {
    /// A server-recorded change to a contact or property.
    ///
    /// `changes` maps each changed attribute to its `[before, after]` pair.
    pub struct AuditEvent {
        path: "/audit_events",
        attributes {
            action: String => set_action,
            auditable_type: String => set_auditable_type,
            auditable_id: String => set_auditable_id,
            changes: Value => set_changes,
            performed_by_type: String => set_performed_by_type,
            performed_by_id: String => set_performed_by_id,
            created_at: DateTime<Utc> => set_created_at,
        }
    }
}
