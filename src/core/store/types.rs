use serde_json::Value;

/// Parse a TEXT column holding an opaque JSON blob. The core never
/// interprets these values; unreadable text degrades to null.
pub(crate) fn parse_blob(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::Null)
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AgentRecord {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AppRecord {
    pub id: i64,
    pub name: Option<String>,
    pub domain: Option<String>,
    pub repo_url: Option<String>,
    pub stack: Value,
    pub created_at: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TaskRecord {
    pub id: i64,
    pub app_id: Option<i64>,
    pub agent_id: Option<i64>,
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    pub input: Value,
    pub priority: i64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ApprovalRecord {
    pub id: i64,
    pub task_id: Option<i64>,
    pub action: String,
    pub requested_by: String,
    pub status: String,
    pub approved_by: Option<String>,
    pub decided_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ConnectorRecord {
    pub id: i64,
    pub app_id: Option<i64>,
    pub provider: String,
    pub config: Value,
    pub created_at: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ConversationRecord {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MessageRecord {
    pub id: i64,
    pub conversation_id: i64,
    pub sender: String,
    pub role: String,
    pub content: String,
    pub thread_id: Option<i64>,
    pub logs: Option<Value>,
    pub created_at: String,
}
