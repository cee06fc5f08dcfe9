use rusqlite::{Connection, params};
use serde_json::Value;

/// Record one task-run invocation. Runs are write-only audit rows; the task
/// runner inserts them inside its transaction, so this stays a free
/// function on the connection.
pub(crate) fn insert_run(
    db: &Connection,
    task_id: Option<i64>,
    model: &str,
    status: &str,
    logs: &Value,
) -> rusqlite::Result<i64> {
    db.execute(
        "INSERT INTO runs (task_id, model, status, logs) VALUES (?1, ?2, ?3, ?4)",
        params![task_id, model, status, logs.to_string()],
    )?;
    Ok(db.last_insert_rowid())
}
