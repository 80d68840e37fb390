//! DI "Interfaces"

use crate::core::dto::{ChatRequest, ChatResponse, HealthResponse, PointsResponse, SessionMetricsRequest};
use crate::core::errors::{AiServiceError, ServiceError};
use crate::infrastructure::entities;
use async_trait::async_trait;
use uuid::Uuid;

/// Operations offered by the upstream AI service.
///
/// Each call is a single request; there is no retrying or caching.
#[async_trait]
pub trait AiServiceClient: Send + Sync {
    /// `POST /api/chat/generate`
    async fn generate_chat_response(&self, request: &ChatRequest) -> Result<ChatResponse, AiServiceError>;

    /// `POST /api/session/metrics`
    async fn calculate_session_points(
        &self,
        request: &SessionMetricsRequest,
    ) -> Result<PointsResponse, AiServiceError>;

    /// `GET /api/points/calculations`
    async fn get_points_calculations(&self) -> Result<PointsResponse, AiServiceError>;

    /// `GET /health`
    async fn get_health(&self) -> Result<HealthResponse, AiServiceError>;
}

#[async_trait]
pub trait QuestService: Send + Sync {
    async fn list_quests(&self) -> Result<Vec<entities::Quest>, ServiceError>;

    /// Starts a quest for the user, positioned on the quest's first question.
    ///
    /// A quest without questions is started with no current question.
    async fn start_quest(&self, user_id: Uuid, quest_id: Uuid) -> Result<entities::QuestProgress, ServiceError>;

    async fn current_question(&self, progress_id: Uuid) -> Result<Option<entities::Question>, ServiceError>;

    /// Answers the current question and moves on to the next one, completing the quest after
    /// the last question.
    ///
    /// Returns `Err` if the progress is already completed or has nothing left to answer.
    async fn submit_answer(
        &self,
        progress_id: Uuid,
        content: String,
    ) -> Result<entities::QuestProgress, ServiceError>;
}

#[async_trait]
pub trait CompanionService: Send + Sync {
    async fn adopt_companion(
        &self,
        user_id: Uuid,
        companion_type_id: Uuid,
        name: String,
    ) -> Result<entities::Companion, ServiceError>;

    /// Interaction types offered by the companion's type.
    async fn available_interactions(
        &self,
        companion_id: Uuid,
    ) -> Result<Vec<entities::InteractionType>, ServiceError>;

    /// Applies an interaction to the companion and records it.
    ///
    /// Returns `Err` if the interaction type belongs to another companion type.
    async fn interact(
        &self,
        companion_id: Uuid,
        interaction_type_id: Uuid,
        wisdom: Option<String>,
    ) -> Result<entities::Companion, ServiceError>;
}
