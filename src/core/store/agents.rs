use anyhow::Result;
use rusqlite::params;

use super::Store;
use super::types::AgentRecord;

/// The fixed crew seeded on first access. Names double as message senders
/// in the scripted task run.
const SEED_AGENTS: [(&str, &str); 9] = [
    ("Ironman", "CTO / Engineering"),
    ("Hulk", "QA / Debug"),
    ("Black Widow", "Support"),
    ("Captain America", "Ops"),
    ("Thor", "Growth / Marketing"),
    ("Hawkeye", "Social"),
    ("Vision", "Analytics"),
    ("Spider‑Man", "Retention / Sales"),
    ("Doctor Strange", "Automation"),
];

impl Store {
    /// Seed the fixed agent roster if the table is empty. The count and the
    /// inserts run under one connection lock, so concurrent first calls
    /// cannot double-seed.
    pub async fn ensure_seed_agents(&self) -> Result<()> {
        let db = self.db.lock().await;
        let count: i64 = db.query_row("SELECT count(*) FROM agents", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }
        for (name, role) in SEED_AGENTS {
            db.execute(
                "INSERT INTO agents (name, role) VALUES (?1, ?2)",
                params![name, role],
            )?;
        }
        Ok(())
    }

    pub async fn list_agents(&self) -> Result<Vec<AgentRecord>> {
        let db = self.db.lock().await;
        let mut stmt =
            db.prepare("SELECT id, name, role, created_at FROM agents ORDER BY name ASC")?;

        let rows = stmt.query_map([], |row| {
            Ok(AgentRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                role: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}
