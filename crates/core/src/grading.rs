//! Quiz question construction and answer grading.
//!
//! Multiple-choice options are shuffled with a seed derived from the entry
//! alone, so the same question can be rebuilt when the answer arrives and
//! the selected index graded without storing issued questions. The order
//! does not depend on the round a client fetched questions for.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::distractors::DistractorGenerator;
use crate::error::CoreError;
use crate::types::DbId;

/// Number of options shown per multiple-choice question.
pub const OPTION_COUNT: usize = 4;

/// Number of wrong options per question.
pub const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// A multiple-choice question as served to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: DbId,
    pub latin_word: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// Shuffle seed for the question about `entry_id`.
pub fn question_seed(entry_id: DbId) -> u64 {
    (entry_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Correct translation plus up to [`DISTRACTOR_COUNT`] distinct wrong
/// options, shuffled by `seed`. Returns the options and the index of the
/// correct one.
pub fn build_options(translation: &str, distractors: Vec<String>, seed: u64) -> (Vec<String>, usize) {
    let answer_key = normalize_answer(translation);
    let mut options = vec![translation.to_string()];
    for candidate in distractors {
        if options.len() == OPTION_COUNT {
            break;
        }
        let key = normalize_answer(&candidate);
        if key.is_empty() || key == answer_key {
            continue;
        }
        if options.iter().any(|o| normalize_answer(o) == key) {
            continue;
        }
        options.push(candidate);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    options.shuffle(&mut rng);

    let correct_index = options
        .iter()
        .position(|o| o == translation)
        .unwrap_or_default();
    (options, correct_index)
}

/// Build the question for one entry.
pub fn build_question(
    generator: &dyn DistractorGenerator,
    entry_id: DbId,
    latin_word: &str,
    translation: &str,
) -> Question {
    let (options, correct_index) = build_options(
        translation,
        generator.distractors(latin_word, translation),
        question_seed(entry_id),
    );
    Question {
        id: entry_id,
        latin_word: latin_word.to_string(),
        options,
        correct_index,
    }
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

/// A submitted answer: either an option index or free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    Choice(usize),
    FreeText(String),
}

impl AnswerInput {
    /// Pick the answer form from the request fields. An option index wins
    /// when both are present.
    pub fn from_parts(
        selected_option: Option<i64>,
        user_answer: Option<String>,
    ) -> Result<Self, CoreError> {
        match (selected_option, user_answer) {
            (Some(idx), _) => usize::try_from(idx).map(Self::Choice).map_err(|_| {
                CoreError::Validation(format!("selected_option must be non-negative, got {idx}"))
            }),
            (None, Some(text)) => Ok(Self::FreeText(text)),
            (None, None) => Err(CoreError::Validation(
                "selected_option or user_answer required".to_string(),
            )),
        }
    }
}

/// Case-insensitive, whitespace-trimmed form used for free-text comparison.
pub fn normalize_answer(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Grade `answer` for an entry whose translation is `translation`.
///
/// `question` is the rebuilt question and is only consulted for
/// [`AnswerInput::Choice`].
pub fn grade(answer: &AnswerInput, translation: &str, question: &Question) -> Result<bool, CoreError> {
    match answer {
        AnswerInput::Choice(idx) => {
            let option = question.options.get(*idx).ok_or_else(|| {
                CoreError::Validation(format!(
                    "selected_option {idx} out of range (0..{})",
                    question.options.len()
                ))
            })?;
            Ok(*idx == question.correct_index && option == translation)
        }
        AnswerInput::FreeText(text) => Ok(normalize_answer(text) == normalize_answer(translation)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
