use super::db_error;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{Answer, NewQuestion, Quest, QuestProgress, QuestStatus, Question};
use crate::infrastructure::traits::{
    AnswerRepository, QuestProgressRepository, QuestRepository, QuestionRepository,
    RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::Utc;
use di::{Ref, injectable};
use uuid::Uuid;

#[injectable(QuestRepository)]
pub struct DbQuestRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbQuestRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl QuestRepository for DbQuestRepository {
    async fn create_quest(&self, title: String, description: String) -> RepositoryResult<Quest> {
        sqlx::query_as(
            "INSERT INTO quests (id, title, description, created_at) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(Utc::now())
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Quest>> {
        sqlx::query_as("SELECT * FROM quests WHERE id = ?")
            .bind(id)
            .fetch_optional(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn list_active(&self) -> RepositoryResult<Vec<Quest>> {
        sqlx::query_as("SELECT * FROM quests ORDER BY created_at, rowid")
            .fetch_all(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn delete_quest(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM quests WHERE id = ?")
            .bind(id)
            .execute(&**self.connection)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[injectable(QuestionRepository)]
pub struct DbQuestionRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbQuestionRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl QuestionRepository for DbQuestionRepository {
    async fn create_question(&self, question: NewQuestion) -> RepositoryResult<Question> {
        sqlx::query_as(
            "INSERT INTO questions (id, quest_id, sequence, text, guidance) VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(question.quest_id)
        .bind(question.sequence)
        .bind(question.text)
        .bind(question.guidance)
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Question>> {
        sqlx::query_as("SELECT * FROM questions WHERE id = ?")
            .bind(id)
            .fetch_optional(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn list_for_quest(&self, quest_id: Uuid) -> RepositoryResult<Vec<Question>> {
        sqlx::query_as("SELECT * FROM questions WHERE quest_id = ? ORDER BY sequence, rowid")
            .bind(quest_id)
            .fetch_all(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn first_for_quest(&self, quest_id: Uuid) -> RepositoryResult<Option<Question>> {
        sqlx::query_as(
            "SELECT * FROM questions WHERE quest_id = ? ORDER BY sequence, rowid LIMIT 1",
        )
        .bind(quest_id)
        .fetch_optional(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn next_after(&self, quest_id: Uuid, sequence: i32) -> RepositoryResult<Option<Question>> {
        sqlx::query_as(
            "SELECT * FROM questions WHERE quest_id = ? AND sequence > ? ORDER BY sequence, rowid LIMIT 1",
        )
        .bind(quest_id)
        .bind(sequence)
        .fetch_optional(&**self.connection)
        .await
        .map_err(db_error)
    }
}

#[injectable(QuestProgressRepository)]
pub struct DbQuestProgressRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbQuestProgressRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl QuestProgressRepository for DbQuestProgressRepository {
    async fn create_progress(
        &self,
        user_id: Uuid,
        quest_id: Uuid,
        current_question_id: Option<Uuid>,
    ) -> RepositoryResult<QuestProgress> {
        sqlx::query_as(
            "INSERT INTO quest_progress (id, user_id, quest_id, status, current_question, started_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(quest_id)
        .bind(QuestStatus::InProgress)
        .bind(current_question_id)
        .bind(Utc::now())
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<QuestProgress>> {
        sqlx::query_as("SELECT * FROM quest_progress WHERE id = ?")
            .bind(id)
            .fetch_optional(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<QuestProgress>> {
        sqlx::query_as("SELECT * FROM quest_progress WHERE user_id = ? ORDER BY started_at, rowid")
            .bind(user_id)
            .fetch_all(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn update_progress(&self, progress: &QuestProgress) -> RepositoryResult<QuestProgress> {
        sqlx::query_as(
            "UPDATE quest_progress SET status = ?, current_question = ?, completed_at = ? WHERE id = ? RETURNING *",
        )
        .bind(progress.status)
        .bind(progress.current_question_id)
        .bind(progress.completed_at)
        .bind(progress.id)
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn record_answer(
        &self,
        advanced: &QuestProgress,
        question_id: Uuid,
        content: String,
    ) -> RepositoryResult<QuestProgress> {
        let mut tx = self.connection.begin().await.map_err(db_error)?;

        // Only moves progress still sitting on the answered question.
        let progress: Option<QuestProgress> = sqlx::query_as(
            "UPDATE quest_progress SET status = ?, current_question = ?, completed_at = ? WHERE id = ? AND status = ? AND current_question = ? RETURNING *",
        )
        .bind(advanced.status)
        .bind(advanced.current_question_id)
        .bind(advanced.completed_at)
        .bind(advanced.id)
        .bind(QuestStatus::InProgress)
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let progress = progress.ok_or_else(|| {
            RepositoryError::Conflict(format!(
                "quest progress {} is no longer on question {question_id}",
                advanced.id
            ))
        })?;

        sqlx::query(
            "INSERT INTO answers (id, progress_id, question_id, content, submitted_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4())
        .bind(progress.id)
        .bind(question_id)
        .bind(content)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(progress)
    }
}

#[injectable(AnswerRepository)]
pub struct DbAnswerRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbAnswerRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl AnswerRepository for DbAnswerRepository {
    async fn create_answer(
        &self,
        progress_id: Uuid,
        question_id: Uuid,
        content: String,
    ) -> RepositoryResult<Answer> {
        sqlx::query_as(
            "INSERT INTO answers (id, progress_id, question_id, content, submitted_at) VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(progress_id)
        .bind(question_id)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn list_for_progress(&self, progress_id: Uuid) -> RepositoryResult<Vec<Answer>> {
        sqlx::query_as("SELECT * FROM answers WHERE progress_id = ? ORDER BY submitted_at, rowid")
            .bind(progress_id)
            .fetch_all(&**self.connection)
            .await
            .map_err(db_error)
    }
}
