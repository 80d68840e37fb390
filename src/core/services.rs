//! Implementations for the service the app needs.
//!

use crate::core::errors::ServiceError;
use crate::core::traits::{CompanionService, QuestService};
use crate::infrastructure::entities::{
    Companion, InteractionType, NewCompanion, Quest, QuestProgress, QuestStatus, Question,
};
use crate::infrastructure::traits::{
    CompanionRepository, CompanionTypeRepository, InteractionTypeRepository,
    QuestProgressRepository, QuestRepository, QuestionRepository, UserRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use di::{Ref, injectable};
use log::debug;
use uuid::Uuid;

#[injectable(QuestService)]
pub struct DefaultQuestService {
    users: Ref<dyn UserRepository>,
    quests: Ref<dyn QuestRepository>,
    questions: Ref<dyn QuestionRepository>,
    progress: Ref<dyn QuestProgressRepository>,
}

impl DefaultQuestService {
    pub fn new(
        users: Ref<dyn UserRepository>,
        quests: Ref<dyn QuestRepository>,
        questions: Ref<dyn QuestionRepository>,
        progress: Ref<dyn QuestProgressRepository>,
    ) -> Self {
        Self {
            users,
            quests,
            questions,
            progress,
        }
    }

    async fn load_progress(&self, progress_id: Uuid) -> Result<QuestProgress, ServiceError> {
        self.progress
            .find_by_id(progress_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("quest progress", progress_id))
    }
}

#[async_trait]
impl QuestService for DefaultQuestService {
    async fn list_quests(&self) -> Result<Vec<Quest>, ServiceError> {
        Ok(self.quests.list_active().await?)
    }

    async fn start_quest(&self, user_id: Uuid, quest_id: Uuid) -> Result<QuestProgress, ServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))?;
        let quest = self
            .quests
            .find_by_id(quest_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("quest", quest_id))?;

        let first_question = self.questions.first_for_quest(quest.id).await?;
        let progress = self
            .progress
            .create_progress(user_id, quest.id, first_question.map(|q| q.id))
            .await?;

        debug!("user {user_id} started quest {quest_id}");
        Ok(progress)
    }

    async fn current_question(&self, progress_id: Uuid) -> Result<Option<Question>, ServiceError> {
        let progress = self.load_progress(progress_id).await?;

        match progress.current_question_id {
            Some(question_id) => Ok(self.questions.find_by_id(question_id).await?),
            None => Ok(None),
        }
    }

    async fn submit_answer(&self, progress_id: Uuid, content: String) -> Result<QuestProgress, ServiceError> {
        if content.trim().is_empty() {
            return Err(ServiceError::Invalid {
                field: "content",
                reason: "answer cannot be empty",
            });
        }

        let mut progress = self.load_progress(progress_id).await?;
        if progress.status == QuestStatus::Completed {
            return Err(ServiceError::QuestCompleted(progress_id));
        }

        let question_id = progress
            .current_question_id
            .ok_or_else(|| ServiceError::NoCurrentQuestion(progress_id))?;
        let question = self
            .questions
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("question", question_id))?;

        match self.questions.next_after(progress.quest_id, question.sequence).await? {
            Some(next) => progress.current_question_id = Some(next.id),
            None => {
                progress.status = QuestStatus::Completed;
                progress.current_question_id = None;
                progress.completed_at = Some(Utc::now());
                debug!("quest progress {progress_id} completed");
            }
        }

        Ok(self
            .progress
            .record_answer(&progress, question.id, content)
            .await?)
    }
}

#[injectable(CompanionService)]
pub struct DefaultCompanionService {
    users: Ref<dyn UserRepository>,
    companion_types: Ref<dyn CompanionTypeRepository>,
    companions: Ref<dyn CompanionRepository>,
    interaction_types: Ref<dyn InteractionTypeRepository>,
}

impl DefaultCompanionService {
    pub fn new(
        users: Ref<dyn UserRepository>,
        companion_types: Ref<dyn CompanionTypeRepository>,
        companions: Ref<dyn CompanionRepository>,
        interaction_types: Ref<dyn InteractionTypeRepository>,
    ) -> Self {
        Self {
            users,
            companion_types,
            companions,
            interaction_types,
        }
    }

    async fn load_companion(&self, companion_id: Uuid) -> Result<Companion, ServiceError> {
        self.companions
            .find_by_id(companion_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("companion", companion_id))
    }
}

#[async_trait]
impl CompanionService for DefaultCompanionService {
    async fn adopt_companion(
        &self,
        user_id: Uuid,
        companion_type_id: Uuid,
        name: String,
    ) -> Result<Companion, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::Invalid {
                field: "name",
                reason: "companion name cannot be empty",
            });
        }

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))?;
        self.companion_types
            .find_by_id(companion_type_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("companion type", companion_type_id))?;

        Ok(self
            .companions
            .create_companion(NewCompanion {
                user_id,
                companion_type_id,
                name,
            })
            .await?)
    }

    async fn available_interactions(&self, companion_id: Uuid) -> Result<Vec<InteractionType>, ServiceError> {
        let companion = self.load_companion(companion_id).await?;

        Ok(self
            .interaction_types
            .list_by_companion_type(companion.companion_type_id)
            .await?)
    }

    async fn interact(
        &self,
        companion_id: Uuid,
        interaction_type_id: Uuid,
        wisdom: Option<String>,
    ) -> Result<Companion, ServiceError> {
        let companion = self.load_companion(companion_id).await?;
        let interaction_type = self
            .interaction_types
            .find_by_id(interaction_type_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("interaction type", interaction_type_id))?;

        if interaction_type.companion_type_id != companion.companion_type_id {
            return Err(ServiceError::InteractionNotAvailable {
                companion_id,
                interaction_type_id,
            });
        }

        Ok(self
            .companions
            .record_interaction(companion.id, &interaction_type, wisdom, Utc::now())
            .await?)
    }
}
