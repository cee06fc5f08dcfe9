use anyhow::Result;
use rusqlite::{Connection, params};
use serde_json::Value;

use super::Store;
use super::types::{ConnectorRecord, parse_blob};

impl Store {
    pub async fn list_connectors(&self) -> Result<Vec<ConnectorRecord>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, app_id, provider, config, created_at FROM connectors \
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ConnectorRecord {
                id: row.get(0)?,
                app_id: row.get(1)?,
                provider: row.get(2)?,
                config: parse_blob(row.get(3)?),
                created_at: row.get(4)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub async fn create_connector(
        &self,
        app_id: Option<i64>,
        provider: &str,
        config: &Value,
    ) -> Result<ConnectorRecord> {
        let db = self.db.lock().await;
        db.execute(
            "INSERT INTO connectors (app_id, provider, config) VALUES (?1, ?2, ?3)",
            params![app_id, provider, config.to_string()],
        )?;
        let connector = connector_by_id(&db, db.last_insert_rowid())?;
        Ok(connector)
    }
}

fn connector_by_id(db: &Connection, id: i64) -> rusqlite::Result<ConnectorRecord> {
    db.query_row(
        "SELECT id, app_id, provider, config, created_at FROM connectors WHERE id = ?1",
        params![id],
        |row| {
            Ok(ConnectorRecord {
                id: row.get(0)?,
                app_id: row.get(1)?,
                provider: row.get(2)?,
                config: parse_blob(row.get(3)?),
                created_at: row.get(4)?,
            })
        },
    )
}
