//! Repository tests against an in-memory database

mod common;

use chrono::Utc;
use common::{connection, setup_test_db};
use companion_gateway::infrastructure::entities::{
    InteractionType, MessageType, NewChatMessage, NewCompanion, NewCompanionType,
    NewInteractionType, NewQuestion, NewUser, Persona, QuestProgress, QuestStatus,
};
use companion_gateway::infrastructure::repositories::{
    DbAnswerRepository, DbChatMessageRepository, DbCompanionRepository, DbCompanionTypeRepository,
    DbInteractionRepository, DbInteractionTypeRepository, DbQuestProgressRepository,
    DbQuestRepository, DbQuestionRepository, DbUserRepository,
};
use companion_gateway::infrastructure::traits::{
    AnswerRepository, ChatMessageRepository, CompanionRepository, CompanionTypeRepository,
    InteractionRepository, InteractionTypeRepository, QuestProgressRepository, QuestRepository,
    QuestionRepository, RepositoryError, UserRepository,
};
use sqlx::SqlitePool;
use uuid::Uuid;

async fn create_user(pool: &SqlitePool, username: &str) -> Uuid {
    DbUserRepository::new(connection(pool))
        .create_user(NewUser {
            username: username.to_owned(),
            password: "hash".to_owned(),
            email: Some(format!("{username}@example.com")),
        })
        .await
        .unwrap()
        .id
}

async fn create_companion_type(pool: &SqlitePool, name: &str) -> Uuid {
    DbCompanionTypeRepository::new(connection(pool))
        .create_companion_type(NewCompanionType {
            name: name.to_owned(),
            description: format!("A {name}"),
            image_url: None,
        })
        .await
        .unwrap()
        .id
}

fn chat_message(user_id: Uuid, session_id: &str, message_type: MessageType, content: &str) -> NewChatMessage {
    NewChatMessage {
        user_id: Some(user_id),
        session_id: Some(session_id.to_owned()),
        message_type,
        content: content.to_owned(),
        persona: Persona::Atma,
        quality_score: None,
        quality_reason: None,
    }
}

#[tokio::test]
async fn test_user_lookup_by_username() {
    let pool = setup_test_db().await;
    let users = DbUserRepository::new(connection(&pool));
    let user_id = create_user(&pool, "ada").await;

    let found = users.find_by_username("ada").await.unwrap().unwrap();

    assert_eq!(found.id, user_id);
    assert_eq!(found.email.as_deref(), Some("ada@example.com"));
    assert!(found.last_login.is_none());
    assert!(users.find_by_username("grace").await.unwrap().is_none());
}

#[tokio::test]
async fn test_record_login_sets_last_login() {
    let pool = setup_test_db().await;
    let users = DbUserRepository::new(connection(&pool));
    let user_id = create_user(&pool, "ada").await;
    let at = Utc::now();

    let user = users.record_login(user_id, at).await.unwrap();

    assert_eq!(user.last_login.map(|t| t.timestamp()), Some(at.timestamp()));
}

#[tokio::test]
async fn test_chat_messages_are_listed_per_session_in_order() {
    let pool = setup_test_db().await;
    let messages = DbChatMessageRepository::new(connection(&pool));
    let user_id = create_user(&pool, "ada").await;

    messages
        .create_message(chat_message(user_id, "s1", MessageType::User, "What is karma?"))
        .await
        .unwrap();
    messages
        .create_message(NewChatMessage {
            quality_score: Some(8),
            quality_reason: Some("Clear".to_owned()),
            ..chat_message(user_id, "s1", MessageType::Ai, "Action and consequence.")
        })
        .await
        .unwrap();
    messages
        .create_message(chat_message(user_id, "s2", MessageType::User, "Hello"))
        .await
        .unwrap();

    let session = messages.list_for_session("s1").await.unwrap();
    let contents: Vec<_> = session.iter().map(|m| m.content.as_str()).collect();

    assert_eq!(contents, vec!["What is karma?", "Action and consequence."]);
    assert_eq!(session[1].message_type, MessageType::Ai);
    assert_eq!(session[1].persona, Persona::Atma);
    assert_eq!(session[1].quality_score, Some(8));
    assert_eq!(messages.list_for_user(user_id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_new_companion_starts_with_default_stats() {
    let pool = setup_test_db().await;
    let companions = DbCompanionRepository::new(connection(&pool));
    let user_id = create_user(&pool, "ada").await;
    let type_id = create_companion_type(&pool, "Owl").await;

    let companion = companions
        .create_companion(NewCompanion {
            user_id,
            companion_type_id: type_id,
            name: "Hoot".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!((companion.happiness, companion.energy, companion.wisdom), (50, 50, 10));
    assert_eq!(companions.list_for_user(user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_stats_persists_values() {
    let pool = setup_test_db().await;
    let companions = DbCompanionRepository::new(connection(&pool));
    let user_id = create_user(&pool, "ada").await;
    let type_id = create_companion_type(&pool, "Owl").await;
    let mut companion = companions
        .create_companion(NewCompanion {
            user_id,
            companion_type_id: type_id,
            name: "Hoot".to_owned(),
        })
        .await
        .unwrap();

    companion.happiness = 99;
    companion.energy = 1;
    companions.update_stats(&companion).await.unwrap();

    let stored = companions.find_by_id(companion.id).await.unwrap().unwrap();
    assert_eq!((stored.happiness, stored.energy, stored.wisdom), (99, 1, 10));
}

#[tokio::test]
async fn test_companion_types_and_their_interactions() {
    let pool = setup_test_db().await;
    let types = DbCompanionTypeRepository::new(connection(&pool));
    let interaction_types = DbInteractionTypeRepository::new(connection(&pool));
    let owl = create_companion_type(&pool, "Owl").await;
    let cat = create_companion_type(&pool, "Cat").await;

    for (companion_type_id, name) in [(owl, "Read"), (owl, "Feed"), (cat, "Pet")] {
        interaction_types
            .create_interaction_type(NewInteractionType {
                companion_type_id,
                name: name.to_owned(),
                description: format!("{name} it"),
                happiness_effect: 5,
                energy_effect: -5,
                wisdom_effect: 1,
            })
            .await
            .unwrap();
    }

    let available: Vec<_> = types
        .list_available()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    let owl_interactions: Vec<_> = interaction_types
        .list_by_companion_type(owl)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();

    assert_eq!(available, vec!["Cat", "Owl"]);
    assert_eq!(owl_interactions, vec!["Feed", "Read"]);
}

#[tokio::test]
async fn test_interactions_are_recorded_per_companion() {
    let pool = setup_test_db().await;
    let companions = DbCompanionRepository::new(connection(&pool));
    let interaction_types = DbInteractionTypeRepository::new(connection(&pool));
    let interactions = DbInteractionRepository::new(connection(&pool));
    let user_id = create_user(&pool, "ada").await;
    let type_id = create_companion_type(&pool, "Owl").await;
    let companion = companions
        .create_companion(NewCompanion {
            user_id,
            companion_type_id: type_id,
            name: "Hoot".to_owned(),
        })
        .await
        .unwrap();
    let read = interaction_types
        .create_interaction_type(NewInteractionType {
            companion_type_id: type_id,
            name: "Read".to_owned(),
            description: "Read together".to_owned(),
            happiness_effect: 0,
            energy_effect: 0,
            wisdom_effect: 3,
        })
        .await
        .unwrap();

    interactions
        .create_interaction(companion.id, read.id, Some("Patience is power".to_owned()))
        .await
        .unwrap();
    interactions.create_interaction(companion.id, read.id, None).await.unwrap();

    let recorded = interactions.list_for_companion(companion.id).await.unwrap();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].wisdom.as_deref(), Some("Patience is power"));
    assert!(recorded[1].wisdom.is_none());
}

#[tokio::test]
async fn test_questions_are_ordered_by_sequence() {
    let pool = setup_test_db().await;
    let quests = DbQuestRepository::new(connection(&pool));
    let questions = DbQuestionRepository::new(connection(&pool));
    let quest = quests
        .create_quest("Inner Peace".to_owned(), "Find calm".to_owned())
        .await
        .unwrap();

    for sequence in [3, 1, 2] {
        questions
            .create_question(NewQuestion {
                quest_id: quest.id,
                sequence,
                text: format!("Question {sequence}"),
                guidance: None,
            })
            .await
            .unwrap();
    }

    let sequences: Vec<_> = questions
        .list_for_quest(quest.id)
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.sequence)
        .collect();
    let first = questions.first_for_quest(quest.id).await.unwrap().unwrap();
    let next = questions.next_after(quest.id, 1).await.unwrap().unwrap();

    assert_eq!(sequences, vec![1, 2, 3]);
    assert_eq!(first.sequence, 1);
    assert_eq!(next.sequence, 2);
    assert!(questions.next_after(quest.id, 3).await.unwrap().is_none());
}

#[tokio::test]
async fn test_active_quests_are_listed_in_creation_order() {
    let pool = setup_test_db().await;
    let quests = DbQuestRepository::new(connection(&pool));

    for title in ["First", "Second"] {
        quests
            .create_quest(title.to_owned(), "desc".to_owned())
            .await
            .unwrap();
    }

    let titles: Vec<_> = quests
        .list_active()
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.title)
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[tokio::test]
async fn test_progress_update_and_answers() {
    let pool = setup_test_db().await;
    let quests = DbQuestRepository::new(connection(&pool));
    let questions = DbQuestionRepository::new(connection(&pool));
    let progress = DbQuestProgressRepository::new(connection(&pool));
    let answers = DbAnswerRepository::new(connection(&pool));
    let user_id = create_user(&pool, "ada").await;
    let quest = quests
        .create_quest("Inner Peace".to_owned(), "Find calm".to_owned())
        .await
        .unwrap();
    let question = questions
        .create_question(NewQuestion {
            quest_id: quest.id,
            sequence: 1,
            text: "What calms you?".to_owned(),
            guidance: Some("Think of a place".to_owned()),
        })
        .await
        .unwrap();

    let mut started = progress
        .create_progress(user_id, quest.id, Some(question.id))
        .await
        .unwrap();
    answers
        .create_answer(started.id, question.id, "The sea".to_owned())
        .await
        .unwrap();
    started.status = QuestStatus::Completed;
    started.current_question_id = None;
    started.completed_at = Some(Utc::now());
    progress.update_progress(&started).await.unwrap();

    let stored = progress.find_by_id(started.id).await.unwrap().unwrap();
    assert_eq!(stored.status, QuestStatus::Completed);
    assert!(stored.current_question_id.is_none());
    assert!(stored.completed_at.is_some());
    assert_eq!(progress.list_for_user(user_id).await.unwrap().len(), 1);

    let stored_answers = answers.list_for_progress(started.id).await.unwrap();
    assert_eq!(stored_answers.len(), 1);
    assert_eq!(stored_answers[0].content, "The sea");
}

#[tokio::test]
async fn test_failed_interaction_leaves_stats_untouched() {
    let pool = setup_test_db().await;
    let companions = DbCompanionRepository::new(connection(&pool));
    let interactions = DbInteractionRepository::new(connection(&pool));
    let user_id = create_user(&pool, "ada").await;
    let type_id = create_companion_type(&pool, "Owl").await;
    let companion = companions
        .create_companion(NewCompanion {
            user_id,
            companion_type_id: type_id,
            name: "Hoot".to_owned(),
        })
        .await
        .unwrap();
    // never stored, so recording the interaction violates its foreign key
    let unknown = InteractionType {
        id: Uuid::new_v4(),
        companion_type_id: type_id,
        name: "Ghost".to_owned(),
        description: "Not there".to_owned(),
        happiness_effect: 20,
        energy_effect: 20,
        wisdom_effect: 20,
    };

    let result = companions
        .record_interaction(companion.id, &unknown, None, Utc::now())
        .await;

    let stored = companions.find_by_id(companion.id).await.unwrap().unwrap();
    assert!(result.is_err());
    assert_eq!((stored.happiness, stored.energy, stored.wisdom), (50, 50, 10));
    assert!(interactions.list_for_companion(companion.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_answer_is_rejected_without_storing() {
    let pool = setup_test_db().await;
    let quests = DbQuestRepository::new(connection(&pool));
    let questions = DbQuestionRepository::new(connection(&pool));
    let progress = DbQuestProgressRepository::new(connection(&pool));
    let answers = DbAnswerRepository::new(connection(&pool));
    let user_id = create_user(&pool, "ada").await;
    let quest = quests
        .create_quest("Inner Peace".to_owned(), "Find calm".to_owned())
        .await
        .unwrap();
    let mut ids = Vec::new();
    for sequence in [1, 2] {
        let question = questions
            .create_question(NewQuestion {
                quest_id: quest.id,
                sequence,
                text: format!("Question {sequence}"),
                guidance: None,
            })
            .await
            .unwrap();
        ids.push(question.id);
    }
    let started = progress
        .create_progress(user_id, quest.id, Some(ids[0]))
        .await
        .unwrap();
    let advanced = QuestProgress {
        current_question_id: Some(ids[1]),
        ..started.clone()
    };

    progress
        .record_answer(&advanced, ids[0], "First".to_owned())
        .await
        .unwrap();
    let stale = progress
        .record_answer(&advanced, ids[0], "First again".to_owned())
        .await;

    assert!(matches!(stale, Err(RepositoryError::Conflict(_))));
    let stored_answers = answers.list_for_progress(started.id).await.unwrap();
    assert_eq!(stored_answers.len(), 1);
    assert_eq!(stored_answers[0].content, "First");
}
