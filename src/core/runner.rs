use std::sync::Arc;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::Mutex;
use tracing::info;

use crate::core::store::{active_conversation, insert_message, insert_run};

const COORDINATOR: &str = "Ironman";
const MODEL_LABEL: &str = "openai";

/// Scripted multi-step run sequence: the task moves queued → running →
/// completed while a fixed narrative of coordinator and worker messages is
/// appended to the active conversation.
///
/// The whole script executes inside one transaction on the shared
/// connection. A failure at any step rolls every write back, so a task can
/// never be stranded in `running` with a partial thread; re-invoking after
/// a failure replays the script from a clean state.
pub struct TaskRunner {
    db: Arc<Mutex<Connection>>,
}

impl TaskRunner {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    pub async fn run(&self, task_id: Option<i64>, summary: Option<&str>) -> Result<()> {
        let mut db = self.db.lock().await;
        let tx = db.transaction()?;

        let convo = active_conversation(&tx)?;
        let label = match task_id {
            Some(id) => tx
                .query_row(
                    "SELECT type FROM tasks WHERE id = ?1",
                    params![id],
                    |row| row.get::<_, Option<String>>(0),
                )
                .optional()?
                .flatten()
                .unwrap_or_else(|| "Task".to_string()),
            None => "Task".to_string(),
        };

        tx.execute(
            "UPDATE tasks SET status = 'running', updated_at = datetime('now') WHERE id = ?1",
            params![task_id],
        )?;

        let head = insert_message(
            &tx,
            convo.id,
            COORDINATOR,
            "agent",
            &format!("{label} started. Coordination in progress."),
            None,
            None,
        )?;
        insert_message(
            &tx,
            convo.id,
            "Hulk",
            "agent",
            "Running tests and reproducing issues.",
            Some(head),
            None,
        )?;
        insert_message(
            &tx,
            convo.id,
            "Vision",
            "agent",
            "Monitoring metrics and costs.",
            Some(head),
            None,
        )?;

        let report = serde_json::json!({
            "summary": summary
                .map(str::to_string)
                .unwrap_or_else(|| format!("{label} completed.")),
        });
        insert_run(&tx, task_id, MODEL_LABEL, "completed", &report)?;

        tx.execute(
            "UPDATE tasks SET status = 'completed', updated_at = datetime('now') WHERE id = ?1",
            params![task_id],
        )?;

        let closing = match summary {
            Some(s) => s.to_string(),
            None => format!("{label} completed. Report in thread."),
        };
        insert_message(&tx, convo.id, COORDINATOR, "agent", &closing, None, None)?;

        tx.commit()?;
        info!(task_id = ?task_id, "task run recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::Store;

    async fn store_with_task() -> (tempfile::TempDir, Store, i64) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = Store::open(dir.path()).await.expect("store should open");
        let task = store
            .create_task(None, None, Some("bugfix"), &serde_json::json!({}), 3)
            .await
            .expect("task");
        (dir, store, task.id)
    }

    #[tokio::test]
    async fn run_completes_task_and_writes_the_script() {
        let (_dir, store, task_id) = store_with_task().await;
        let runner = TaskRunner::new(store.db_handle());

        runner
            .run(Some(task_id), Some("Shipped the fix."))
            .await
            .expect("run should succeed");

        let tasks = store.list_tasks().await.expect("tasks");
        assert_eq!(tasks[0].status, "completed");

        let convo = store.ensure_conversation().await.expect("conversation");
        let messages = store.list_messages(convo.id).await.expect("messages");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].sender, "Ironman");
        assert_eq!(
            messages[0].content,
            "bugfix started. Coordination in progress."
        );
        assert_eq!(messages[1].thread_id, Some(messages[0].id));
        assert_eq!(messages[2].thread_id, Some(messages[0].id));
        assert_eq!(messages[3].content, "Shipped the fix.");
        assert_eq!(messages[3].thread_id, None);

        let db = store.db_handle();
        let db = db.lock().await;
        let (runs, model): (i64, String) = db
            .query_row(
                "SELECT count(*), max(model) FROM runs WHERE task_id = ?1",
                params![task_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("runs");
        assert_eq!(runs, 1);
        assert_eq!(model, "openai");
    }

    #[tokio::test]
    async fn missing_task_falls_back_to_the_generic_label() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = Store::open(dir.path()).await.expect("store should open");
        let runner = TaskRunner::new(store.db_handle());

        runner.run(None, None).await.expect("run should succeed");

        let convo = store.ensure_conversation().await.expect("conversation");
        let messages = store.list_messages(convo.id).await.expect("messages");
        assert_eq!(
            messages[0].content,
            "Task started. Coordination in progress."
        );
        assert_eq!(messages[3].content, "Task completed. Report in thread.");
    }

    #[tokio::test]
    async fn failed_step_rolls_the_whole_run_back() {
        let (_dir, store, task_id) = store_with_task().await;
        {
            let db = store.db_handle();
            let db = db.lock().await;
            db.execute("DROP TABLE runs", []).expect("drop runs");
        }
        let runner = TaskRunner::new(store.db_handle());

        let result = runner.run(Some(task_id), None).await;
        assert!(result.is_err());

        let tasks = store.list_tasks().await.expect("tasks");
        assert_eq!(tasks[0].status, "queued");

        let convo = store.ensure_conversation().await.expect("conversation");
        let messages = store.list_messages(convo.id).await.expect("messages");
        assert!(messages.is_empty());
    }
}
