// Generated by oxide-notify from Message.sq. Do not edit.

use oxide_notify_runtime::sqlx::sqlite::SqliteRow;
use oxide_notify_runtime::{Database, Query, Result, ToSqlValue};

/// Statements declared in `Message.sq`.
#[derive(Clone)]
pub struct MessageQueries {
    db: Database,
}

impl MessageQueries {
    /// Wraps a database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Runs `selectAll`. The returned query listens on `all_messages`.
    pub fn select_all(&self) -> Query<Vec<SqliteRow>> {
        let keys = vec![String::from("all_messages")];
        self.db.query(keys, "SELECT * FROM messages", vec![])
    }

    /// Runs `selectForConversationAndUser`. The returned query listens on `conversation_:conversation_id`, `user_:user_id`.
    pub fn select_for_conversation_and_user(&self, conversation_id: impl ToSqlValue, user_id: impl ToSqlValue) -> Query<Vec<SqliteRow>> {
        let conversation_id = conversation_id.to_sql_value();
        let user_id = user_id.to_sql_value();
        let keys = vec![format!("conversation_{}", conversation_id.key_fragment()), format!("user_{}", user_id.key_fragment())];
        self.db.query(keys, "SELECT * FROM messages WHERE conversation_id = ?1 AND user_id = ?2", vec![conversation_id.clone(), user_id.clone()])
    }

    /// Runs `selectById`. The returned query listens on `messages`.
    pub fn select_by_id(&self, value1: impl ToSqlValue) -> Query<Vec<SqliteRow>> {
        let value1 = value1.to_sql_value();
        let keys = vec![String::from("messages")];
        self.db.query(keys, "SELECT * FROM messages WHERE id = ?1", vec![value1.clone()])
    }

    /// Runs `insertMessage`, then notifies `conversation_:conversation_id`.
    pub async fn insert_message(&self, conversation_id: impl ToSqlValue, user_id: impl ToSqlValue, body: impl ToSqlValue) -> Result<u64> {
        let conversation_id = conversation_id.to_sql_value();
        let user_id = user_id.to_sql_value();
        let body = body.to_sql_value();
        let keys = vec![format!("conversation_{}", conversation_id.key_fragment())];
        let rows = self.db.execute("INSERT INTO messages (conversation_id, user_id, body) VALUES (?1, ?2, ?3)", vec![conversation_id.clone(), user_id.clone(), body.clone()]).await?;
        self.db.notify(&keys);
        Ok(rows)
    }

    /// Runs `deleteById`, then notifies `messages`.
    pub async fn delete_by_id(&self, id: impl ToSqlValue) -> Result<u64> {
        let id = id.to_sql_value();
        let keys = vec![String::from("messages")];
        let rows = self.db.execute("DELETE FROM messages WHERE id = ?1", vec![id.clone()]).await?;
        self.db.notify(&keys);
        Ok(rows)
    }

    /// Runs `archiveMessage` in one transaction, then notifies `archive`, `messages`
    /// once it commits.
    pub async fn archive_message(&self, id: impl ToSqlValue) -> Result<u64> {
        let id = id.to_sql_value();
        let keys = vec![String::from("archive"), String::from("messages")];
        let mut tx = self.db.begin().await?;
        let mut rows = 0;
        rows += tx.execute("INSERT INTO archive (id, body) SELECT id, body FROM messages WHERE id = ?1", vec![id.clone()]).await?;
        rows += tx.execute("DELETE FROM messages WHERE id = ?1", vec![id.clone()]).await?;
        tx.notify(&keys);
        tx.commit().await?;
        Ok(rows)
    }
}
