use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

use super::Store;
use super::types::ApprovalRecord;

impl Store {
    pub async fn list_approvals(&self) -> Result<Vec<ApprovalRecord>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, task_id, action, requested_by, status, approved_by, decided_at, created_at \
             FROM approvals ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], map_approval)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub async fn create_approval(
        &self,
        task_id: Option<i64>,
        action: &str,
        requested_by: &str,
    ) -> Result<ApprovalRecord> {
        let db = self.db.lock().await;
        db.execute(
            "INSERT INTO approvals (task_id, action, requested_by) VALUES (?1, ?2, ?3)",
            params![task_id, action, requested_by],
        )?;
        let approval = approval_by_id(&db, db.last_insert_rowid())?;
        Ok(approval)
    }

    /// Record a decision on an approval. Any status transition is accepted,
    /// including re-deciding an already-decided row; decided_at is stamped
    /// with the decision time. Returns None when the id does not exist.
    pub async fn decide_approval(
        &self,
        id: i64,
        status: &str,
        approved_by: &str,
    ) -> Result<Option<ApprovalRecord>> {
        let db = self.db.lock().await;
        let updated = db.execute(
            "UPDATE approvals SET status = ?1, approved_by = ?2, decided_at = datetime('now') \
             WHERE id = ?3",
            params![status, approved_by, id],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        let approval = approval_by_id(&db, id).optional()?;
        Ok(approval)
    }
}

fn approval_by_id(db: &Connection, id: i64) -> rusqlite::Result<ApprovalRecord> {
    db.query_row(
        "SELECT id, task_id, action, requested_by, status, approved_by, decided_at, created_at \
         FROM approvals WHERE id = ?1",
        params![id],
        map_approval,
    )
}

fn map_approval(row: &rusqlite::Row<'_>) -> rusqlite::Result<ApprovalRecord> {
    Ok(ApprovalRecord {
        id: row.get(0)?,
        task_id: row.get(1)?,
        action: row.get(2)?,
        requested_by: row.get(3)?,
        status: row.get(4)?,
        approved_by: row.get(5)?,
        decided_at: row.get(6)?,
        created_at: row.get(7)?,
    })
}
