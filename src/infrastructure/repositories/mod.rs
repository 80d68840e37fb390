//! DB Repository abstractions

mod chat;
mod companions;
mod quests;
mod users;

pub use chat::DbChatMessageRepository;
pub use companions::{
    DbCompanionRepository, DbCompanionTypeRepository, DbInteractionRepository,
    DbInteractionTypeRepository,
};
pub use quests::{
    DbAnswerRepository, DbQuestProgressRepository, DbQuestRepository, DbQuestionRepository,
};
pub use users::DbUserRepository;

use crate::infrastructure::traits::RepositoryError;
use log::{debug, error, warn};

fn db_error(e: sqlx::Error) -> RepositoryError {
    let e = RepositoryError::from(e);
    match &e {
        RepositoryError::NotFound => debug!("{e}"),
        RepositoryError::Conflict(message) => warn!("{message}"),
        e => error!("{e}"),
    }
    e
}
