use anyhow::Result;
use rusqlite::{Connection, params};
use serde_json::Value;

use super::Store;
use super::types::{TaskRecord, parse_blob};

impl Store {
    pub async fn list_tasks(&self) -> Result<Vec<TaskRecord>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, app_id, agent_id, type, input, priority, status, created_at, updated_at \
             FROM tasks ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(TaskRecord {
                id: row.get(0)?,
                app_id: row.get(1)?,
                agent_id: row.get(2)?,
                task_type: row.get(3)?,
                input: parse_blob(row.get(4)?),
                priority: row.get(5)?,
                status: row.get(6)?,
                created_at: row.get(7)?,
                updated_at: row.get(8)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub async fn create_task(
        &self,
        app_id: Option<i64>,
        agent_id: Option<i64>,
        task_type: Option<&str>,
        input: &Value,
        priority: i64,
    ) -> Result<TaskRecord> {
        let db = self.db.lock().await;
        db.execute(
            "INSERT INTO tasks (app_id, agent_id, type, input, priority) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![app_id, agent_id, task_type, input.to_string(), priority],
        )?;
        let task = task_by_id(&db, db.last_insert_rowid())?;
        Ok(task)
    }
}

fn task_by_id(db: &Connection, id: i64) -> rusqlite::Result<TaskRecord> {
    db.query_row(
        "SELECT id, app_id, agent_id, type, input, priority, status, created_at, updated_at \
         FROM tasks WHERE id = ?1",
        params![id],
        |row| {
            Ok(TaskRecord {
                id: row.get(0)?,
                app_id: row.get(1)?,
                agent_id: row.get(2)?,
                task_type: row.get(3)?,
                input: parse_blob(row.get(4)?),
                priority: row.get(5)?,
                status: row.get(6)?,
                created_at: row.get(7)?,
                updated_at: row.get(8)?,
            })
        },
    )
}
