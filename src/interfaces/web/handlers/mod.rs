pub mod agents;
pub mod approvals;
pub mod apps;
pub mod connectors;
pub mod health;
pub mod messages;
pub mod tasks;
pub mod webhooks;

use serde_json::Value;

/// Opaque JSON-blob columns treat an absent or null body field as `{}`.
pub(crate) fn blob_or_empty(value: Option<Value>) -> Value {
    match value {
        Some(v) if !v.is_null() => v,
        _ => serde_json::json!({}),
    }
}
