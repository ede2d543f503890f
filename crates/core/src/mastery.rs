//! Mastery tracking and bronze-card lifecycle decisions.
//!
//! Every answer updates an entry's counters and re-evaluates whether the
//! user has mastered the word. The result is a [`CardChange`] that the
//! persistence layer applies inside the same transaction as the counter
//! update.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const POLICY_FIRST_CUT: &str = "first_cut";
pub const POLICY_REVISED: &str = "revised";

/// All valid mastery policy names.
pub const VALID_POLICIES: &[&str] = &[POLICY_FIRST_CUT, POLICY_REVISED];

/// Accuracy (percent) required to unlock under [`MasteryPolicy::FirstCut`].
pub const FIRST_CUT_UNLOCK_ACCURACY: f64 = 80.0;
/// Answers required before a card can unlock under [`MasteryPolicy::FirstCut`].
pub const FIRST_CUT_MIN_ANSWERS: i32 = 3;

/// Accuracy (percent) required to hold a card under [`MasteryPolicy::Revised`].
pub const REVISED_UNLOCK_ACCURACY: f64 = 90.0;
/// Answers required before a card can unlock under [`MasteryPolicy::Revised`].
pub const REVISED_MIN_ANSWERS: i32 = 1;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Rule set deciding when a bronze card is unlocked or revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryPolicy {
    /// Unlock at >= 80% after 3 answers. Cards are never revoked.
    FirstCut,
    /// Unlock at >= 90% after 1 answer; revoke as soon as accuracy drops
    /// below 90%. Mastery is re-checked on every answer.
    #[default]
    Revised,
}

impl MasteryPolicy {
    /// Convert from a configuration string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            POLICY_FIRST_CUT => Ok(Self::FirstCut),
            POLICY_REVISED => Ok(Self::Revised),
            _ => Err(format!(
                "Invalid mastery policy '{s}'. Must be one of: {}",
                VALID_POLICIES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstCut => POLICY_FIRST_CUT,
            Self::Revised => POLICY_REVISED,
        }
    }

    pub fn unlock_accuracy(&self) -> f64 {
        match self {
            Self::FirstCut => FIRST_CUT_UNLOCK_ACCURACY,
            Self::Revised => REVISED_UNLOCK_ACCURACY,
        }
    }

    pub fn min_answers(&self) -> i32 {
        match self {
            Self::FirstCut => FIRST_CUT_MIN_ANSWERS,
            Self::Revised => REVISED_MIN_ANSWERS,
        }
    }

    /// Whether a card is taken away again once accuracy falls below the
    /// unlock threshold.
    pub fn revokes(&self) -> bool {
        matches!(self, Self::Revised)
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Per-entry answer counters. Accuracy is always derived from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerStats {
    pub total_answers: i32,
    pub correct_answers: i32,
}

impl AnswerStats {
    pub fn new(total_answers: i32, correct_answers: i32) -> Self {
        Self {
            total_answers,
            correct_answers,
        }
    }

    /// `correct * 100 / total`, or `0.0` before the first answer.
    pub fn accuracy_percent(&self) -> f64 {
        accuracy_percent(self.total_answers, self.correct_answers)
    }

    /// Counters after one more answer.
    pub fn record(self, was_correct: bool) -> Self {
        Self {
            total_answers: self.total_answers + 1,
            correct_answers: self.correct_answers + i32::from(was_correct),
        }
    }
}

/// Accuracy in percent for the given counters. Mirrors the generated
/// `accuracy_percent` column on `vocab_entries`.
pub fn accuracy_percent(total_answers: i32, correct_answers: i32) -> f64 {
    if total_answers <= 0 {
        return 0.0;
    }
    f64::from(correct_answers) * 100.0 / f64::from(total_answers)
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

pub const CHANGE_UNLOCKED: &str = "unlocked";
pub const CHANGE_REVOKED: &str = "revoked";
pub const CHANGE_NONE: &str = "none";

/// What should happen to the user's bronze card for the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardChange {
    Unlocked,
    Revoked,
    #[serde(rename = "none")]
    Unchanged,
}

impl CardChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unlocked => CHANGE_UNLOCKED,
            Self::Revoked => CHANGE_REVOKED,
            Self::Unchanged => CHANGE_NONE,
        }
    }
}

/// Result of evaluating one answer against an entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasteryOutcome {
    pub stats: AnswerStats,
    pub accuracy_percent: f64,
    pub card_change: CardChange,
}

/// Apply one answer to `current` and decide the card lifecycle.
///
/// `owns_card` is whether the user currently holds the entry's bronze card.
pub fn evaluate_answer(
    policy: MasteryPolicy,
    current: AnswerStats,
    was_correct: bool,
    owns_card: bool,
) -> MasteryOutcome {
    let stats = current.record(was_correct);
    let accuracy = stats.accuracy_percent();
    let mastered =
        accuracy >= policy.unlock_accuracy() && stats.total_answers >= policy.min_answers();

    let card_change = if was_correct && mastered && !owns_card {
        CardChange::Unlocked
    } else if policy.revokes() && owns_card && accuracy < policy.unlock_accuracy() {
        CardChange::Revoked
    } else {
        CardChange::Unchanged
    };

    MasteryOutcome {
        stats,
        accuracy_percent: accuracy,
        card_change,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
