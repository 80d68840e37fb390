//! Infrastructure traits, used for DI on higher levels

use crate::infrastructure::entities;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("conflicting record: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(db.message().to_owned())
            }
            e => RepositoryError::Database(e),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns `Conflict` if the username is taken.
    async fn create_user(&self, user: entities::NewUser) -> RepositoryResult<entities::User>;

    async fn find_by_id(&self, user_id: Uuid) -> RepositoryResult<Option<entities::User>>;

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<entities::User>>;

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> RepositoryResult<entities::User>;
}

#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    async fn create_message(
        &self,
        message: entities::NewChatMessage,
    ) -> RepositoryResult<entities::ChatMessage>;

    async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<entities::ChatMessage>>;

    async fn list_for_session(
        &self,
        session_id: &str,
    ) -> RepositoryResult<Vec<entities::ChatMessage>>;
}

#[async_trait]
pub trait CompanionTypeRepository: Send + Sync {
    async fn create_companion_type(
        &self,
        companion_type: entities::NewCompanionType,
    ) -> RepositoryResult<entities::CompanionType>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<entities::CompanionType>>;

    /// All companion types a user can adopt.
    async fn list_available(&self) -> RepositoryResult<Vec<entities::CompanionType>>;
}

#[async_trait]
pub trait CompanionRepository: Send + Sync {
    async fn create_companion(
        &self,
        companion: entities::NewCompanion,
    ) -> RepositoryResult<entities::Companion>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<entities::Companion>>;

    async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<entities::Companion>>;

    /// Persists stats and `last_interaction` of the given companion.
    async fn update_stats(&self, companion: &entities::Companion) -> RepositoryResult<entities::Companion>;

    /// Adds the effects of `interaction_type` to the stored stats, each kept within
    /// `MIN_STAT..=MAX_STAT`, and records the interaction. Both writes share one transaction.
    async fn record_interaction(
        &self,
        companion_id: Uuid,
        interaction_type: &entities::InteractionType,
        wisdom: Option<String>,
        at: DateTime<Utc>,
    ) -> RepositoryResult<entities::Companion>;
}

#[async_trait]
pub trait InteractionTypeRepository: Send + Sync {
    async fn create_interaction_type(
        &self,
        interaction_type: entities::NewInteractionType,
    ) -> RepositoryResult<entities::InteractionType>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<entities::InteractionType>>;

    async fn list_by_companion_type(
        &self,
        companion_type_id: Uuid,
    ) -> RepositoryResult<Vec<entities::InteractionType>>;
}

#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn create_interaction(
        &self,
        companion_id: Uuid,
        interaction_type_id: Uuid,
        wisdom: Option<String>,
    ) -> RepositoryResult<entities::Interaction>;

    async fn list_for_companion(
        &self,
        companion_id: Uuid,
    ) -> RepositoryResult<Vec<entities::Interaction>>;
}

#[async_trait]
pub trait QuestRepository: Send + Sync {
    async fn create_quest(&self, title: String, description: String) -> RepositoryResult<entities::Quest>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<entities::Quest>>;

    async fn list_active(&self) -> RepositoryResult<Vec<entities::Quest>>;

    /// Deletes the quest together with its questions.
    async fn delete_quest(&self, id: Uuid) -> RepositoryResult<()>;
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Returns `Conflict` if the quest already has a question at that sequence.
    async fn create_question(&self, question: entities::NewQuestion) -> RepositoryResult<entities::Question>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<entities::Question>>;

    /// Questions of a quest, ordered by sequence.
    async fn list_for_quest(&self, quest_id: Uuid) -> RepositoryResult<Vec<entities::Question>>;

    async fn first_for_quest(&self, quest_id: Uuid) -> RepositoryResult<Option<entities::Question>>;

    /// The question following `sequence` in the quest, if any.
    async fn next_after(
        &self,
        quest_id: Uuid,
        sequence: i32,
    ) -> RepositoryResult<Option<entities::Question>>;
}

#[async_trait]
pub trait QuestProgressRepository: Send + Sync {
    async fn create_progress(
        &self,
        user_id: Uuid,
        quest_id: Uuid,
        current_question_id: Option<Uuid>,
    ) -> RepositoryResult<entities::QuestProgress>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<entities::QuestProgress>>;

    async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<entities::QuestProgress>>;

    /// Persists status, current question and completion time.
    async fn update_progress(
        &self,
        progress: &entities::QuestProgress,
    ) -> RepositoryResult<entities::QuestProgress>;

    /// Stores the answer to `question_id` and moves the progress to the state in `advanced`,
    /// in one transaction.
    ///
    /// Returns `Conflict` and stores nothing if the stored progress no longer sits on
    /// `question_id`.
    async fn record_answer(
        &self,
        advanced: &entities::QuestProgress,
        question_id: Uuid,
        content: String,
    ) -> RepositoryResult<entities::QuestProgress>;
}

#[async_trait]
pub trait AnswerRepository: Send + Sync {
    async fn create_answer(
        &self,
        progress_id: Uuid,
        question_id: Uuid,
        content: String,
    ) -> RepositoryResult<entities::Answer>;

    async fn list_for_progress(&self, progress_id: Uuid) -> RepositoryResult<Vec<entities::Answer>>;
}
