//! Error types surfaced by the core traits.

use crate::infrastructure::traits::RepositoryError;
use thiserror::Error;
use uuid::Uuid;

/// Failure of a call to the upstream AI service.
#[derive(Debug, Error)]
pub enum AiServiceError {
    #[error("request to AI service failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("AI service responded with status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("could not decode AI service response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("invalid AI service endpoint `{0}`")]
    InvalidEndpoint(String),
}

impl AiServiceError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AiServiceError::Transport(e) if e.is_timeout())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("quest progress {0} is already completed")]
    QuestCompleted(Uuid),

    #[error("quest progress {0} has no current question")]
    NoCurrentQuestion(Uuid),

    #[error("interaction type {interaction_type_id} is not available for companion {companion_id}")]
    InteractionNotAvailable {
        companion_id: Uuid,
        interaction_type_id: Uuid,
    },

    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        ServiceError::NotFound { entity, id }
    }
}
