use anyhow::Result;
use rusqlite::{Connection, params};

use super::Store;
use super::types::ConversationRecord;

/// Name given to the lazily created singleton conversation.
pub(crate) const DEFAULT_CONVERSATION_NAME: &str = "Avengers War Room";

impl Store {
    /// The active conversation: the earliest-created row, created on first
    /// access if the table is empty.
    pub async fn ensure_conversation(&self) -> Result<ConversationRecord> {
        let db = self.db.lock().await;
        let convo = active_conversation(&db)?;
        Ok(convo)
    }
}

/// Insert-if-absent plus earliest-row select. The guarded INSERT is a single
/// statement, so two racing callers can never create two conversations.
pub(crate) fn active_conversation(db: &Connection) -> rusqlite::Result<ConversationRecord> {
    db.execute(
        "INSERT INTO conversations (name) SELECT ?1 \
         WHERE NOT EXISTS (SELECT 1 FROM conversations)",
        params![DEFAULT_CONVERSATION_NAME],
    )?;
    db.query_row(
        "SELECT id, name, created_at FROM conversations ORDER BY created_at ASC, id ASC LIMIT 1",
        [],
        |row| {
            Ok(ConversationRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_conversation_is_a_singleton() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = Store::open(dir.path()).await.expect("store should open");

        let first = store.ensure_conversation().await.expect("first ensure");
        let second = store.ensure_conversation().await.expect("second ensure");

        assert_eq!(first.id, second.id);
        assert_eq!(first.name, DEFAULT_CONVERSATION_NAME);

        let db = store.db_handle();
        let db = db.lock().await;
        let count: i64 = db
            .query_row("SELECT count(*) FROM conversations", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }
}
