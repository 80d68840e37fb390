//! Request and response shapes exchanged with API clients and the upstream AI service.
//!
//! Inbound bodies use snake_case members. Outbound requests use the names the upstream
//! service reads, and its camelCase responses are accepted as aliases.

use crate::core::validation::{Validate, ValidationErrors};
use crate::infrastructure::entities;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// AI character mode selecting the response style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Persona {
    #[serde(alias = "karma")]
    Karma,
    #[serde(alias = "dharma")]
    Dharma,
    #[serde(alias = "atma")]
    Atma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    #[serde(alias = "USER")]
    User,
    #[serde(alias = "ASSISTANT")]
    Assistant,
    #[serde(alias = "SYSTEM")]
    System,
}

/// One earlier turn of the conversation, sent along as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub persona: Persona,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<ConversationMessage>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConversationMessageDraft {
    pub role: Option<MessageRole>,
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequestDraft {
    pub message: Option<String>,
    pub persona: Option<Persona>,
    pub session_id: Option<String>,
    pub context: Option<Vec<ConversationMessageDraft>>,
}

impl Validate for ChatRequest {
    type Draft = ChatRequestDraft;

    fn validate(draft: ChatRequestDraft) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let message = errors.not_blank("message", draft.message, "Message cannot be empty");
        let persona = errors.required("persona", draft.persona, "Persona must be specified");
        let session_id = errors.not_blank("session_id", draft.session_id, "Session ID cannot be empty");
        let context = draft.context.map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .filter_map(|(i, entry)| {
                    let role = errors.required(format!("context[{i}].role"), entry.role, "Role must be specified");
                    let content =
                        errors.not_blank(format!("context[{i}].content"), entry.content, "Content cannot be empty");
                    Some(ConversationMessage {
                        role: role?,
                        content: content?,
                    })
                })
                .collect::<Vec<_>>()
        });

        match (message, persona, session_id) {
            (Some(message), Some(persona), Some(session_id)) if errors.is_empty() => Ok(ChatRequest {
                message,
                persona,
                session_id,
                context,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: Option<String>,
    pub message: String,
    pub timestamp: Option<String>,
    pub quality_score: Option<i32>,
    pub score_reason: Option<String>,
}

/// Sent upstream as `{persona, durationSeconds, messageCount}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetricsRequest {
    pub persona: Persona,
    #[serde(rename(serialize = "durationSeconds"), alias = "durationSeconds")]
    pub duration_seconds: i32,
    #[serde(rename(serialize = "messageCount"), alias = "messageCount")]
    pub message_count: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionMetricsDraft {
    pub persona: Option<Persona>,
    #[serde(alias = "durationSeconds")]
    pub duration_seconds: Option<i32>,
    #[serde(alias = "messageCount")]
    pub message_count: Option<i32>,
}

impl Validate for SessionMetricsRequest {
    type Draft = SessionMetricsDraft;

    fn validate(draft: SessionMetricsDraft) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let persona = errors.required("persona", draft.persona, "Persona must be specified");
        let duration_seconds = errors
            .required("duration_seconds", draft.duration_seconds, "Duration must be specified")
            .and_then(|d| errors.non_negative("duration_seconds", d, "Duration cannot be negative"));
        let message_count = errors
            .required("message_count", draft.message_count, "Message count must be specified")
            .and_then(|c| errors.non_negative("message_count", c, "Message count cannot be negative"));

        match (persona, duration_seconds, message_count) {
            (Some(persona), Some(duration_seconds), Some(message_count)) if errors.is_empty() => {
                Ok(SessionMetricsRequest {
                    persona,
                    duration_seconds,
                    message_count,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Points awarded for a session.
///
/// `breakdown` is reported as received; its sum is not checked against `total_points`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsResponse {
    #[serde(alias = "pointsEarned")]
    pub points_earned: i32,
    #[serde(alias = "totalPoints")]
    pub total_points: i32,
    #[serde(default)]
    pub breakdown: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub cpu_usage: f64,
    pub memory_usage: MemoryUsage,
    pub disk_usage: DiskUsage,
    pub platform: String,
    pub python_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub percent: f64,
    pub used_mb: f64,
    pub total_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub percent: f64,
    pub used_gb: f64,
    pub total_gb: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMetrics {
    pub cache_size: u64,
    pub uptime_seconds: u64,
}

impl From<Persona> for entities::Persona {
    fn from(persona: Persona) -> Self {
        match persona {
            Persona::Karma => entities::Persona::Karma,
            Persona::Dharma => entities::Persona::Dharma,
            Persona::Atma => entities::Persona::Atma,
        }
    }
}

impl From<entities::Persona> for Persona {
    fn from(persona: entities::Persona) -> Self {
        match persona {
            entities::Persona::Karma => Persona::Karma,
            entities::Persona::Dharma => Persona::Dharma,
            entities::Persona::Atma => Persona::Atma,
        }
    }
}
