//! Integration tests for the answer transaction and card ledger.
//!
//! Exercises the repository layer against a real database:
//! - Counter and accuracy bookkeeping
//! - Bronze card unlock and revocation under both mastery policies
//! - Orphaned card cleanup
//! - Concurrent answers on the same entry
//! - Quiz selection policies and round lifecycle

use assert_matches::assert_matches;
use sqlx::PgPool;
use vocab_core::card::{bronze_card_draft, CardDraft, DEFAULT_CARD_IMAGE_URL, RARITY_BRONZE};
use vocab_core::mastery::{CardChange, MasteryPolicy};
use vocab_core::selection::SelectionPolicy;
use vocab_core::types::DbId;
use vocab_db::models::quiz::{RecordAnswer, RecordOutcome};
use vocab_db::models::vocab_entry::CreateVocabEntry;
use vocab_db::repositories::{
    CardRepo, QuizAnswerRepo, QuizRoundRepo, UserRepo, VocabEntryRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const USER: DbId = 1;

async fn create_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(pool, username).await.unwrap().id
}

async fn create_entry(pool: &PgPool, user_id: DbId, latin: &str, german: &str) -> DbId {
    VocabEntryRepo::create(
        pool,
        user_id,
        &CreateVocabEntry {
            latin_word: latin.to_string(),
            german_translation: german.to_string(),
        },
    )
    .await
    .unwrap()
}

fn draft() -> CardDraft {
    bronze_card_draft("aqua", "Wasser", DEFAULT_CARD_IMAGE_URL)
}

async fn answer(
    pool: &PgPool,
    round_id: DbId,
    entry_id: DbId,
    was_correct: bool,
    policy: MasteryPolicy,
) -> vocab_db::models::quiz::AnswerRecord {
    let outcome = QuizAnswerRepo::record(
        pool,
        &RecordAnswer {
            user_id: USER,
            quiz_round_id: round_id,
            vocab_entry_id: entry_id,
            was_correct,
        },
        policy,
        &draft(),
    )
    .await
    .unwrap();
    match outcome {
        RecordOutcome::Recorded(record) => record,
        other => panic!("answer was not recorded: {other:?}"),
    }
}

async fn card_rows(pool: &PgPool, entry_id: DbId) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cards WHERE vocab_entry_id = $1")
        .bind(entry_id)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_default_user_is_seeded(pool: PgPool) {
    let user = UserRepo::find_by_id(&pool, USER).await.unwrap().unwrap();
    assert_eq!(user.username, "default");

    let created = UserRepo::create(&pool, "marcus").await.unwrap();
    assert!(created.id > USER);
    assert!(UserRepo::find_by_id(&pool, 9999).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_new_entry_starts_unanswered(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let entry = VocabEntryRepo::find_for_user(&pool, USER, id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(entry.total_answers, 0);
    assert_eq!(entry.correct_answers, 0);
    assert_eq!(entry.accuracy_percent, 0.0);
    assert!(!entry.has_bronze_card);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_entries_are_scoped_to_owner(pool: PgPool) {
    let other = create_user(&pool, "marcus").await;
    let id = create_entry(&pool, other, "ignis", "Feuer").await;

    assert!(VocabEntryRepo::find_for_user(&pool, USER, id)
        .await
        .unwrap()
        .is_none());
    assert!(VocabEntryRepo::list_for_user(&pool, USER)
        .await
        .unwrap()
        .is_empty());

    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();
    let result = QuizAnswerRepo::record(
        &pool,
        &RecordAnswer {
            user_id: USER,
            quiz_round_id: round.id,
            vocab_entry_id: id,
            was_correct: true,
        },
        MasteryPolicy::Revised,
        &draft(),
    )
    .await
    .unwrap();
    assert_matches!(result, RecordOutcome::EntryNotFound);
    assert_eq!(QuizAnswerRepo::count_for_entry(&pool, id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_is_newest_first(pool: PgPool) {
    let first = create_entry(&pool, USER, "aqua", "Wasser").await;
    let second = create_entry(&pool, USER, "ignis", "Feuer").await;

    let ids: Vec<DbId> = VocabEntryRepo::list_for_user(&pool, USER)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![second, first]);
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_accuracy_follows_recorded_answers(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();

    let answers = [true, false, false, true, true, false, true];
    for &correct in &answers {
        answer(&pool, round.id, id, correct, MasteryPolicy::Revised).await;
    }

    let entry = VocabEntryRepo::find_for_user(&pool, USER, id)
        .await
        .unwrap()
        .unwrap();
    let recorded = QuizAnswerRepo::count_for_entry(&pool, id).await.unwrap();

    assert_eq!(i64::from(entry.total_answers), recorded);
    assert_eq!(entry.correct_answers, 4);
    assert_eq!(entry.accuracy_percent, 4.0 * 100.0 / 7.0);
    assert_eq!(
        QuizAnswerRepo::list_by_round(&pool, round.id)
            .await
            .unwrap()
            .iter()
            .map(|a| a.was_correct)
            .collect::<Vec<_>>(),
        answers.to_vec()
    );
}

// ---------------------------------------------------------------------------
// Card lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_first_correct_answer_unlocks_bronze_card(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();

    let record = answer(&pool, round.id, id, true, MasteryPolicy::Revised).await;

    assert_eq!(record.stats.total_answers, 1);
    assert_eq!(record.stats.correct_answers, 1);
    assert_eq!(record.accuracy_percent, 100.0);
    assert_eq!(record.card_change, CardChange::Unlocked);

    let card = CardRepo::find_for_entry(&pool, id, RARITY_BRONZE)
        .await
        .unwrap()
        .expect("bronze card should exist");
    assert_eq!(Some(card.id), record.card_id);
    assert_eq!(card.title, "aqua");

    let entry = VocabEntryRepo::find_for_user(&pool, USER, id)
        .await
        .unwrap()
        .unwrap();
    assert!(entry.has_bronze_card);

    let owned = CardRepo::list_owned(&pool, USER).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].latin_word, "aqua");
    assert_eq!(owned[0].german_translation, "Wasser");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_wrong_answer_revokes_and_deletes_orphaned_card(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();

    let unlocked = answer(&pool, round.id, id, true, MasteryPolicy::Revised).await;
    let revoked = answer(&pool, round.id, id, false, MasteryPolicy::Revised).await;

    assert_eq!(revoked.accuracy_percent, 50.0);
    assert_eq!(revoked.card_change, CardChange::Revoked);
    assert_eq!(revoked.card_id, unlocked.card_id);
    assert_eq!(card_rows(&pool, id).await, 0);

    let entry = VocabEntryRepo::find_for_user(&pool, USER, id)
        .await
        .unwrap()
        .unwrap();
    assert!(!entry.has_bronze_card);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revocation_keeps_card_with_other_owner(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();
    let record = answer(&pool, round.id, id, true, MasteryPolicy::Revised).await;
    let card_id = record.card_id.unwrap();

    let other = create_user(&pool, "livia").await;
    sqlx::query("INSERT INTO user_cards (user_id, card_id) VALUES ($1, $2)")
        .bind(other)
        .bind(card_id)
        .execute(&pool)
        .await
        .unwrap();

    let revoked = answer(&pool, round.id, id, false, MasteryPolicy::Revised).await;
    assert_eq!(revoked.card_change, CardChange::Revoked);

    assert_eq!(card_rows(&pool, id).await, 1);
    assert_eq!(CardRepo::owner_count(&pool, card_id).await.unwrap(), 1);
    assert!(CardRepo::list_owned(&pool, USER).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_relearned_entry_unlocks_again(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();

    answer(&pool, round.id, id, true, MasteryPolicy::Revised).await;
    answer(&pool, round.id, id, false, MasteryPolicy::Revised).await;
    // 50% -> climb back to 90% with 8 more correct answers (9/10).
    let mut last = None;
    for _ in 0..8 {
        last = Some(answer(&pool, round.id, id, true, MasteryPolicy::Revised).await);
    }
    let last = last.unwrap();

    assert_eq!(last.accuracy_percent, 90.0);
    assert_eq!(last.card_change, CardChange::Unlocked);
    assert_eq!(card_rows(&pool, id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_first_cut_policy_keeps_card(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();

    for _ in 0..2 {
        let r = answer(&pool, round.id, id, true, MasteryPolicy::FirstCut).await;
        assert_eq!(r.card_change, CardChange::Unchanged);
    }
    let third = answer(&pool, round.id, id, true, MasteryPolicy::FirstCut).await;
    assert_eq!(third.card_change, CardChange::Unlocked);

    for _ in 0..3 {
        let r = answer(&pool, round.id, id, false, MasteryPolicy::FirstCut).await;
        assert_eq!(r.card_change, CardChange::Unchanged);
    }
    assert_eq!(card_rows(&pool, id).await, 1);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_correct_answers_create_one_card(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();

    let (a, b) = tokio::join!(
        answer(&pool, round.id, id, true, MasteryPolicy::Revised),
        answer(&pool, round.id, id, true, MasteryPolicy::Revised),
    );

    let unlocks = [a.card_change, b.card_change]
        .iter()
        .filter(|c| **c == CardChange::Unlocked)
        .count();
    assert_eq!(unlocks, 1);
    assert_eq!(card_rows(&pool, id).await, 1);

    let entry = VocabEntryRepo::find_for_user(&pool, USER, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.total_answers, 2);
    assert_eq!(entry.correct_answers, 2);

    let owned: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_cards WHERE user_id = $1")
        .bind(USER)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(owned.0, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_card_violates_unique_constraint(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let insert = "INSERT INTO cards (vocab_entry_id, rarity, title, description, image_url) \
                  VALUES ($1, 'bronze', 't', 'd', 'i')";
    sqlx::query(insert).bind(id).execute(&pool).await.unwrap();

    let err = sqlx::query(insert).bind(id).execute(&pool).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(ref db) if db.constraint() == Some("uq_cards_entry_rarity"));
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_weak_selection_skips_mastered_entries(pool: PgPool) {
    let strong = create_entry(&pool, USER, "aqua", "Wasser").await;
    let fresh = create_entry(&pool, USER, "ignis", "Feuer").await;
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();
    for _ in 0..3 {
        answer(&pool, round.id, strong, true, MasteryPolicy::Revised).await;
    }

    let weak: Vec<DbId> = VocabEntryRepo::list_for_quiz(&pool, USER, SelectionPolicy::Weak, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(weak, vec![fresh]);

    let first: Vec<DbId> = VocabEntryRepo::list_for_quiz(&pool, USER, SelectionPolicy::First, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(first, vec![strong, fresh]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_selection_respects_limit(pool: PgPool) {
    for i in 0..12 {
        create_entry(&pool, USER, &format!("verbum{i}"), &format!("Wort{i}")).await;
    }
    for policy in [SelectionPolicy::Weak, SelectionPolicy::First] {
        let picked = VocabEntryRepo::list_for_quiz(&pool, USER, policy, 10)
            .await
            .unwrap();
        assert_eq!(picked.len(), 10);
        assert!(picked.iter().all(|e| policy.includes(&e.stats())));
    }
}

// ---------------------------------------------------------------------------
// Rounds
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_finish_sets_finished_at_once(pool: PgPool) {
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();
    assert!(!round.is_finished());

    let first = QuizRoundRepo::finish(&pool, USER, round.id)
        .await
        .unwrap()
        .unwrap();
    let second = QuizRoundRepo::finish(&pool, USER, round.id)
        .await
        .unwrap()
        .unwrap();

    assert!(first.finished_at.is_some());
    assert_eq!(first.finished_at, second.finished_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_finish_is_scoped_to_owner(pool: PgPool) {
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();

    let other = create_user(&pool, "claudia").await;
    assert!(QuizRoundRepo::finish(&pool, other, round.id)
        .await
        .unwrap()
        .is_none());
    assert!(!QuizRoundRepo::find_for_user(&pool, USER, round.id)
        .await
        .unwrap()
        .unwrap()
        .is_finished());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_finished_round_refuses_answers(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();
    QuizRoundRepo::finish(&pool, USER, round.id).await.unwrap();

    let input = RecordAnswer {
        user_id: USER,
        quiz_round_id: round.id,
        vocab_entry_id: id,
        was_correct: true,
    };
    let outcome = QuizAnswerRepo::record(&pool, &input, MasteryPolicy::Revised, &draft())
        .await
        .unwrap();
    assert_matches!(outcome, RecordOutcome::RoundFinished);

    let entry = VocabEntryRepo::find_for_user(&pool, USER, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.total_answers, 0);
    assert!(!entry.has_bronze_card);
    assert_eq!(QuizAnswerRepo::count_for_entry(&pool, id).await.unwrap(), 0);
    assert_eq!(card_rows(&pool, id).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_foreign_round_refuses_answers(pool: PgPool) {
    let id = create_entry(&pool, USER, "aqua", "Wasser").await;
    let other = create_user(&pool, "claudia").await;
    let round = QuizRoundRepo::create(&pool, other).await.unwrap();

    let input = RecordAnswer {
        user_id: USER,
        quiz_round_id: round.id,
        vocab_entry_id: id,
        was_correct: true,
    };
    let outcome = QuizAnswerRepo::record(&pool, &input, MasteryPolicy::Revised, &draft())
        .await
        .unwrap();
    assert_matches!(outcome, RecordOutcome::RoundNotFound);
    assert_eq!(QuizAnswerRepo::count_for_entry(&pool, id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_finish_waits_for_open_answer_transaction(pool: PgPool) {
    let round = QuizRoundRepo::create(&pool, USER).await.unwrap();

    // An answer transaction holds the round lock...
    let mut tx = pool.begin().await.unwrap();
    let locked = QuizRoundRepo::lock_for_answer(&mut tx, USER, round.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!locked.is_finished());

    // ...so a concurrent finish blocks until it commits.
    let finisher = {
        let pool = pool.clone();
        tokio::spawn(async move { QuizRoundRepo::finish(&pool, USER, round.id).await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(!finisher.is_finished());

    tx.commit().await.unwrap();
    let finished = finisher.await.unwrap().unwrap().unwrap();
    assert!(finished.is_finished());
}
