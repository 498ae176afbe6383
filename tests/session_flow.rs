// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quiz sessions recorded through the progress store.

use ai_tutor::db::FirestoreDb;
use ai_tutor::models::progress::status;
use ai_tutor::models::{ProgressRecord, Unit, UnitId};
use ai_tutor::services::quiz::{COINS_PER_CORRECT, COINS_PER_WRONG};
use ai_tutor::services::QuizSession;

mod common;
use common::{test_db_memory, unique_uid};

fn sample_unit() -> Unit {
    serde_json::from_str(
        r#"{
            "title": "Photosynthesis",
            "skills": ["inputs and outputs"],
            "LESSON1CONTENT": [
                {
                    "content": "Plants turn light, water and carbon dioxide into sugar.",
                    "questions": [
                        {"question": "What gas do plants take in?",
                         "options": ["Oxygen", "Carbon dioxide", "Nitrogen"],
                         "answer": "Carbon dioxide"},
                        {"question": "What do plants make?",
                         "options": ["Sugar", "Salt"],
                         "answer": "Sugar"}
                    ]
                }
            ]
        }"#,
    )
    .unwrap()
}

/// Play one quiz for the active unit and save the result, as the CLI does.
async fn play(db: &FirestoreDb, uid: &str, topic: &str, answers: &[&str]) -> ProgressRecord {
    let stored = db.get_progress(uid, topic).await.unwrap();
    let unit_id = stored
        .as_ref()
        .and_then(|p| p.active_unit_id.as_deref())
        .map_or(UnitId::FIRST, |id| id.parse().unwrap());

    let unit = sample_unit();
    let mut quiz =
        QuizSession::new(unit.first_lesson()).with_coins(stored.as_ref().map_or(0, |p| p.coins));
    for answer in answers {
        quiz.answer(answer).unwrap();
    }
    assert!(quiz.is_finished());

    let update = quiz.progress_update(unit_id, stored.as_ref());
    db.save_progress(
        uid,
        topic,
        &update.units,
        update.coins,
        Some(&update.active_unit_id),
    )
    .await
    .unwrap();

    db.get_progress(uid, topic).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_completed_quiz_saves_progress() {
    let db = test_db_memory();
    let uid = unique_uid();
    db.upsert_profile(&uid, "learner@example.com", "Learner", None)
        .await
        .unwrap();

    let record = play(&db, &uid, "Biology", &["B", "sugar"]).await;

    assert_eq!(record.status_of("L1U1"), status::COMPLETED);
    assert_eq!(record.status_of("L1U2"), status::UNLOCKED);
    assert_eq!(record.status_of("L1U3"), status::LOCKED);
    assert_eq!(record.coins, 2 * COINS_PER_CORRECT);
    assert_eq!(record.active_unit_id.as_deref(), Some("L1U2"));
}

#[tokio::test]
async fn test_failed_retry_keeps_completed_unit() {
    let db = test_db_memory();
    let uid = unique_uid();

    play(&db, &uid, "Biology", &["Carbon dioxide", "Sugar"]).await;

    // Go back to the completed unit and fail it.
    db.save_progress(
        &uid,
        "Biology",
        &Default::default(),
        2 * COINS_PER_CORRECT,
        Some("L1U1"),
    )
    .await
    .unwrap();
    let record = play(&db, &uid, "Biology", &["Oxygen", "Salt"]).await;

    assert_eq!(record.status_of("L1U1"), status::COMPLETED);
    assert_eq!(record.status_of("L1U2"), status::UNLOCKED);
    assert_eq!(record.active_unit_id.as_deref(), Some("L1U2"));
    assert_eq!(record.coins, 2 * COINS_PER_CORRECT - 2 * COINS_PER_WRONG);
}

#[tokio::test]
async fn test_path_advances_through_levels() {
    let db = test_db_memory();
    let uid = unique_uid();

    for _ in 0..UnitId::UNITS_PER_LEVEL {
        play(&db, &uid, "Biology", &["Carbon dioxide", "Sugar"]).await;
    }
    let record = db.get_progress(&uid, "Biology").await.unwrap().unwrap();

    assert_eq!(record.status_of("L1U1"), status::COMPLETED);
    assert_eq!(record.status_of("L1U2"), status::COMPLETED);
    assert_eq!(record.status_of("L1U3"), status::COMPLETED);
    assert_eq!(record.status_of("L2U1"), status::UNLOCKED);
    assert_eq!(record.active_unit_id.as_deref(), Some("L2U1"));
    assert_eq!(record.coins, 6 * COINS_PER_CORRECT);
}

#[tokio::test]
async fn test_failed_first_attempt_then_pass() {
    let db = test_db_memory();
    let uid = unique_uid();

    // The penalty for the first answer cannot take an empty balance below zero.
    let record = play(&db, &uid, "Biology", &["Oxygen", "Sugar"]).await;
    assert_eq!(record.status_of("L1U1"), status::UNLOCKED);
    assert_eq!(record.active_unit_id.as_deref(), Some("L1U1"));
    assert_eq!(record.coins, COINS_PER_CORRECT);

    let record = play(&db, &uid, "Biology", &["Carbon dioxide", "Sugar"]).await;
    assert_eq!(record.status_of("L1U1"), status::COMPLETED);
    assert_eq!(record.active_unit_id.as_deref(), Some("L1U2"));
    assert_eq!(record.coins, 3 * COINS_PER_CORRECT);
}
