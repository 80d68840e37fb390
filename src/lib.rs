//! Gateway backend for the companion chat application - Library exports for testing

pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;

use crate::config::Settings;
use crate::core::services::{DefaultCompanionService, DefaultQuestService};
use crate::infrastructure::ai_client::HttpAiServiceClient;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::repositories::{
    DbAnswerRepository, DbChatMessageRepository, DbCompanionRepository, DbCompanionTypeRepository,
    DbInteractionRepository, DbInteractionTypeRepository, DbQuestProgressRepository,
    DbQuestRepository, DbQuestionRepository, DbUserRepository,
};
use axum::Router;
use di::{Injectable, ServiceCollection};

/// Service registrations shared by the server and the integration tests.
///
/// `Settings` are resolved from whatever was passed to [`Settings::install`].
pub fn services() -> ServiceCollection {
    let mut services = ServiceCollection::new();
    services
        .add(Settings::singleton())
        .add(DatabaseConnection::singleton())
        .add(HttpAiServiceClient::singleton())
        .add(DbUserRepository::scoped())
        .add(DbChatMessageRepository::scoped())
        .add(DbCompanionTypeRepository::scoped())
        .add(DbCompanionRepository::scoped())
        .add(DbInteractionTypeRepository::scoped())
        .add(DbInteractionRepository::scoped())
        .add(DbQuestRepository::scoped())
        .add(DbQuestionRepository::scoped())
        .add(DbQuestProgressRepository::scoped())
        .add(DbAnswerRepository::scoped())
        .add(DefaultQuestService::scoped())
        .add(DefaultCompanionService::scoped());
    services
}

/// All routes, without a service provider attached.
pub fn app() -> Router {
    Router::new().nest("/api", api::router())
}
