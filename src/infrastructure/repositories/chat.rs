use super::db_error;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{ChatMessage, NewChatMessage};
use crate::infrastructure::traits::{ChatMessageRepository, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use di::{Ref, injectable};
use uuid::Uuid;

#[injectable(ChatMessageRepository)]
pub struct DbChatMessageRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbChatMessageRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ChatMessageRepository for DbChatMessageRepository {
    // Messages are never updated, `created_at` is only written here.
    async fn create_message(&self, message: NewChatMessage) -> RepositoryResult<ChatMessage> {
        sqlx::query_as(
            "INSERT INTO chat_messages (id, user_id, session_id, type, content, persona, quality_score, quality_reason, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(message.user_id)
        .bind(message.session_id)
        .bind(message.message_type)
        .bind(message.content)
        .bind(message.persona)
        .bind(message.quality_score)
        .bind(message.quality_reason)
        .bind(Utc::now())
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<ChatMessage>> {
        sqlx::query_as(
            "SELECT * FROM chat_messages WHERE user_id = ? ORDER BY created_at, rowid",
        )
        .bind(user_id)
        .fetch_all(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn list_for_session(&self, session_id: &str) -> RepositoryResult<Vec<ChatMessage>> {
        sqlx::query_as(
            "SELECT * FROM chat_messages WHERE session_id = ? ORDER BY created_at, rowid",
        )
        .bind(session_id)
        .fetch_all(&**self.connection)
        .await
        .map_err(db_error)
    }
}
