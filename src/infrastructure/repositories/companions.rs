use super::db_error;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{
    Companion, CompanionType, DEFAULT_ENERGY, DEFAULT_HAPPINESS, DEFAULT_WISDOM, Interaction,
    InteractionType, MAX_STAT, MIN_STAT, NewCompanion, NewCompanionType, NewInteractionType,
};
use crate::infrastructure::traits::{
    CompanionRepository, CompanionTypeRepository, InteractionRepository,
    InteractionTypeRepository, RepositoryResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use di::{Ref, injectable};
use uuid::Uuid;

#[injectable(CompanionTypeRepository)]
pub struct DbCompanionTypeRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbCompanionTypeRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CompanionTypeRepository for DbCompanionTypeRepository {
    async fn create_companion_type(
        &self,
        companion_type: NewCompanionType,
    ) -> RepositoryResult<CompanionType> {
        sqlx::query_as(
            "INSERT INTO companion_types (id, name, description, image_url) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(companion_type.name)
        .bind(companion_type.description)
        .bind(companion_type.image_url)
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<CompanionType>> {
        sqlx::query_as("SELECT * FROM companion_types WHERE id = ?")
            .bind(id)
            .fetch_optional(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn list_available(&self) -> RepositoryResult<Vec<CompanionType>> {
        sqlx::query_as("SELECT * FROM companion_types ORDER BY name")
            .fetch_all(&**self.connection)
            .await
            .map_err(db_error)
    }
}

#[injectable(CompanionRepository)]
pub struct DbCompanionRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbCompanionRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CompanionRepository for DbCompanionRepository {
    async fn create_companion(&self, companion: NewCompanion) -> RepositoryResult<Companion> {
        let now = Utc::now();

        sqlx::query_as(
            "INSERT INTO companions (id, user_id, companion_type_id, name, happiness, energy, wisdom, created_at, last_interaction) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(companion.user_id)
        .bind(companion.companion_type_id)
        .bind(companion.name)
        .bind(DEFAULT_HAPPINESS)
        .bind(DEFAULT_ENERGY)
        .bind(DEFAULT_WISDOM)
        .bind(now)
        .bind(now)
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Companion>> {
        sqlx::query_as("SELECT * FROM companions WHERE id = ?")
            .bind(id)
            .fetch_optional(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Companion>> {
        sqlx::query_as("SELECT * FROM companions WHERE user_id = ? ORDER BY created_at, rowid")
            .bind(user_id)
            .fetch_all(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn update_stats(&self, companion: &Companion) -> RepositoryResult<Companion> {
        sqlx::query_as(
            "UPDATE companions SET happiness = ?, energy = ?, wisdom = ?, last_interaction = ? WHERE id = ? RETURNING *",
        )
        .bind(companion.happiness)
        .bind(companion.energy)
        .bind(companion.wisdom)
        .bind(companion.last_interaction)
        .bind(companion.id)
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn record_interaction(
        &self,
        companion_id: Uuid,
        interaction_type: &InteractionType,
        wisdom: Option<String>,
        at: DateTime<Utc>,
    ) -> RepositoryResult<Companion> {
        let mut tx = self.connection.begin().await.map_err(db_error)?;

        let companion = sqlx::query_as(
            "UPDATE companions SET happiness = MIN(MAX(happiness + ?1, ?4), ?5), energy = MIN(MAX(energy + ?2, ?4), ?5), wisdom = MIN(MAX(wisdom + ?3, ?4), ?5), last_interaction = ?6 WHERE id = ?7 RETURNING *",
        )
        .bind(interaction_type.happiness_effect)
        .bind(interaction_type.energy_effect)
        .bind(interaction_type.wisdom_effect)
        .bind(MIN_STAT)
        .bind(MAX_STAT)
        .bind(at)
        .bind(companion_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        sqlx::query(
            "INSERT INTO interactions (id, companion_id, interaction_type_id, wisdom, interaction_time) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4())
        .bind(companion_id)
        .bind(interaction_type.id)
        .bind(wisdom)
        .bind(at)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(companion)
    }
}

#[injectable(InteractionTypeRepository)]
pub struct DbInteractionTypeRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbInteractionTypeRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl InteractionTypeRepository for DbInteractionTypeRepository {
    async fn create_interaction_type(
        &self,
        interaction_type: NewInteractionType,
    ) -> RepositoryResult<InteractionType> {
        sqlx::query_as(
            "INSERT INTO interaction_types (id, companion_type_id, name, description, happiness_effect, energy_effect, wisdom_effect) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(interaction_type.companion_type_id)
        .bind(interaction_type.name)
        .bind(interaction_type.description)
        .bind(interaction_type.happiness_effect)
        .bind(interaction_type.energy_effect)
        .bind(interaction_type.wisdom_effect)
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<InteractionType>> {
        sqlx::query_as("SELECT * FROM interaction_types WHERE id = ?")
            .bind(id)
            .fetch_optional(&**self.connection)
            .await
            .map_err(db_error)
    }

    async fn list_by_companion_type(
        &self,
        companion_type_id: Uuid,
    ) -> RepositoryResult<Vec<InteractionType>> {
        sqlx::query_as(
            "SELECT * FROM interaction_types WHERE companion_type_id = ? ORDER BY name",
        )
        .bind(companion_type_id)
        .fetch_all(&**self.connection)
        .await
        .map_err(db_error)
    }
}

#[injectable(InteractionRepository)]
pub struct DbInteractionRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbInteractionRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl InteractionRepository for DbInteractionRepository {
    async fn create_interaction(
        &self,
        companion_id: Uuid,
        interaction_type_id: Uuid,
        wisdom: Option<String>,
    ) -> RepositoryResult<Interaction> {
        sqlx::query_as(
            "INSERT INTO interactions (id, companion_id, interaction_type_id, wisdom, interaction_time) VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(companion_id)
        .bind(interaction_type_id)
        .bind(wisdom)
        .bind(Utc::now())
        .fetch_one(&**self.connection)
        .await
        .map_err(db_error)
    }

    async fn list_for_companion(&self, companion_id: Uuid) -> RepositoryResult<Vec<Interaction>> {
        sqlx::query_as(
            "SELECT * FROM interactions WHERE companion_id = ? ORDER BY interaction_time, rowid",
        )
        .bind(companion_id)
        .fetch_all(&**self.connection)
        .await
        .map_err(db_error)
    }
}
