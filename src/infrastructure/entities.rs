//! Database entities

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_HAPPINESS: i32 = 50;
pub const DEFAULT_ENERGY: i32 = 50;
pub const DEFAULT_WISDOM: i32 = 10;
/// Bounds of every companion stat.
pub const MIN_STAT: i32 = 0;
pub const MAX_STAT: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    User,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Persona {
    Karma,
    Dharma,
    Atma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub session_id: Option<String>,
    #[sqlx(rename = "type")]
    pub message_type: MessageType,
    pub content: String,
    pub persona: Persona,
    pub quality_score: Option<i32>,
    pub quality_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub user_id: Option<Uuid>,
    pub session_id: Option<String>,
    pub message_type: MessageType,
    pub content: String,
    pub persona: Persona,
    pub quality_score: Option<i32>,
    pub quality_reason: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CompanionType {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCompanionType {
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Companion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub companion_type_id: Uuid,
    pub name: String,
    pub happiness: i32,
    pub energy: i32,
    pub wisdom: i32,
    pub created_at: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCompanion {
    pub user_id: Uuid,
    pub companion_type_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct InteractionType {
    pub id: Uuid,
    pub companion_type_id: Uuid,
    pub name: String,
    pub description: String,
    pub happiness_effect: i32,
    pub energy_effect: i32,
    pub wisdom_effect: i32,
}

#[derive(Debug, Clone)]
pub struct NewInteractionType {
    pub companion_type_id: Uuid,
    pub name: String,
    pub description: String,
    pub happiness_effect: i32,
    pub energy_effect: i32,
    pub wisdom_effect: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct Interaction {
    pub id: Uuid,
    pub companion_id: Uuid,
    pub interaction_type_id: Uuid,
    pub wisdom: Option<String>,
    pub interaction_time: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Quest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub quest_id: Uuid,
    pub sequence: i32,
    pub text: String,
    pub guidance: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub quest_id: Uuid,
    pub sequence: i32,
    pub text: String,
    pub guidance: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct QuestProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quest_id: Uuid,
    pub status: QuestStatus,
    #[sqlx(rename = "current_question")]
    pub current_question_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Answer {
    pub id: Uuid,
    pub progress_id: Uuid,
    pub question_id: Uuid,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
}
