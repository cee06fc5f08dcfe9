use anyhow::Result;
use rusqlite::{Connection, params};
use serde_json::Value;

use super::Store;
use super::types::{AppRecord, parse_blob};

impl Store {
    pub async fn list_apps(&self) -> Result<Vec<AppRecord>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, name, domain, repo_url, stack, created_at FROM apps \
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(AppRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                domain: row.get(2)?,
                repo_url: row.get(3)?,
                stack: parse_blob(row.get(4)?),
                created_at: row.get(5)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub async fn create_app(
        &self,
        name: Option<&str>,
        domain: Option<&str>,
        repo_url: Option<&str>,
        stack: &Value,
    ) -> Result<AppRecord> {
        let db = self.db.lock().await;
        db.execute(
            "INSERT INTO apps (name, domain, repo_url, stack) VALUES (?1, ?2, ?3, ?4)",
            params![name, domain, repo_url, stack.to_string()],
        )?;
        let app = app_by_id(&db, db.last_insert_rowid())?;
        Ok(app)
    }
}

fn app_by_id(db: &Connection, id: i64) -> rusqlite::Result<AppRecord> {
    db.query_row(
        "SELECT id, name, domain, repo_url, stack, created_at FROM apps WHERE id = ?1",
        params![id],
        |row| {
            Ok(AppRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                domain: row.get(2)?,
                repo_url: row.get(3)?,
                stack: parse_blob(row.get(4)?),
                created_at: row.get(5)?,
            })
        },
    )
}
