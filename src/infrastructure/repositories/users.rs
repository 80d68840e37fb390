use super::db_error;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{NewUser, User};
use crate::infrastructure::traits::{RepositoryResult, UserRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use di::{Ref, injectable};
use uuid::Uuid;

#[injectable(UserRepository)]
pub struct DbUserRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbUserRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl UserRepository for DbUserRepository {
    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        sqlx::query_as(
            "INSERT INTO users (id, username, password, email, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user.username)
        .bind(user.password)
        .bind(user.email)
        .bind(Utc::now())
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, user_id: Uuid) -> RepositoryResult<Option<User>> {
        sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        sqlx::query_as("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> RepositoryResult<User> {
        sqlx::query_as("UPDATE users SET last_login = ? WHERE id = ? RETURNING *")
            .bind(at)
            .bind(user_id)
            .fetch_one(&**self.connection)
            .await
            .map_err(db_error)
    }
}
