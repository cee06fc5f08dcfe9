use anyhow::Result;
use rusqlite::{Connection, params};
use serde_json::Value;

use super::Store;
use super::types::{MessageRecord, parse_blob};

impl Store {
    /// All messages of a conversation in creation order. The id tiebreak
    /// keeps rows written within the same timestamp second stable.
    pub async fn list_messages(&self, conversation_id: i64) -> Result<Vec<MessageRecord>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, conversation_id, sender, role, content, thread_id, logs, created_at \
             FROM messages WHERE conversation_id = ?1 ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![conversation_id], map_message)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// The last 20 webhook-ingested lines: System-sent messages whose
    /// content starts with "GitHub ", newest first.
    pub async fn github_events(&self, conversation_id: i64) -> Result<Vec<MessageRecord>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, conversation_id, sender, role, content, thread_id, logs, created_at \
             FROM messages WHERE conversation_id = ?1 AND sender = 'System' \
             AND content LIKE 'GitHub %' ORDER BY created_at DESC, id DESC LIMIT 20",
        )?;

        let rows = stmt.query_map(params![conversation_id], map_message)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub async fn create_message(
        &self,
        conversation_id: i64,
        sender: &str,
        role: &str,
        content: &str,
        thread_id: Option<i64>,
        logs: Option<&Value>,
    ) -> Result<MessageRecord> {
        let db = self.db.lock().await;
        let id = insert_message(&db, conversation_id, sender, role, content, thread_id, logs)?;
        let message = message_by_id(&db, id)?;
        Ok(message)
    }
}

/// Append one message row. Free function so the task runner can reuse it
/// inside its own transaction.
pub(crate) fn insert_message(
    db: &Connection,
    conversation_id: i64,
    sender: &str,
    role: &str,
    content: &str,
    thread_id: Option<i64>,
    logs: Option<&Value>,
) -> rusqlite::Result<i64> {
    db.execute(
        "INSERT INTO messages (conversation_id, sender, role, content, thread_id, logs) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            conversation_id,
            sender,
            role,
            content,
            thread_id,
            logs.map(Value::to_string)
        ],
    )?;
    Ok(db.last_insert_rowid())
}

fn message_by_id(db: &Connection, id: i64) -> rusqlite::Result<MessageRecord> {
    db.query_row(
        "SELECT id, conversation_id, sender, role, content, thread_id, logs, created_at \
         FROM messages WHERE id = ?1",
        params![id],
        map_message,
    )
}

fn map_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRecord> {
    Ok(MessageRecord {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        sender: row.get(2)?,
        role: row.get(3)?,
        content: row.get(4)?,
        thread_id: row.get(5)?,
        logs: row.get::<_, Option<String>>(6)?.map(parse_blob),
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn thread_replies_stay_out_of_the_top_level() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = Store::open(dir.path()).await.expect("store should open");
        let convo = store.ensure_conversation().await.expect("conversation");

        let head = store
            .create_message(convo.id, "Ironman", "agent", "Kickoff.", None, None)
            .await
            .expect("head message");
        let reply = store
            .create_message(convo.id, "Hulk", "agent", "On it.", Some(head.id), None)
            .await
            .expect("reply message");

        let all = store.list_messages(convo.id).await.expect("list");
        let top_level: Vec<_> = all.iter().filter(|m| m.thread_id.is_none()).collect();
        let in_thread: Vec<_> = all
            .iter()
            .filter(|m| m.thread_id == Some(head.id))
            .collect();

        assert!(top_level.iter().all(|m| m.id != reply.id));
        assert_eq!(in_thread.len(), 1);
        assert_eq!(in_thread[0].id, reply.id);
    }

    #[tokio::test]
    async fn github_events_filters_sender_and_prefix() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = Store::open(dir.path()).await.expect("store should open");
        let convo = store.ensure_conversation().await.expect("conversation");

        store
            .create_message(convo.id, "System", "agent", "GitHub opened on a/b", None, None)
            .await
            .expect("event message");
        store
            .create_message(convo.id, "Ironman", "agent", "GitHub looks healthy", None, None)
            .await
            .expect("agent chatter");
        store
            .create_message(convo.id, "System", "agent", "Task queued: bugfix", None, None)
            .await
            .expect("queue note");

        let events = store.github_events(convo.id).await.expect("events");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].content, "GitHub opened on a/b");
    }
}
