//! Which entries a quiz round asks about.

use serde::{Deserialize, Serialize};

use crate::mastery::AnswerStats;

pub const SELECTION_WEAK: &str = "weak";
pub const SELECTION_FIRST: &str = "first";

/// All valid selection policy names.
pub const VALID_SELECTIONS: &[&str] = &[SELECTION_WEAK, SELECTION_FIRST];

/// Maximum number of questions handed out per request.
pub const QUIZ_BATCH_SIZE: i64 = 10;

/// Entries below this accuracy (percent) count as weak.
pub const WEAK_ACCURACY_BELOW: f64 = 70.0;

/// Entries with fewer answers than this count as weak.
pub const WEAK_MIN_ANSWERS: i32 = 3;

/// Strategy for picking quiz entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Entries with accuracy below 70% or fewer than 3 answers.
    #[default]
    Weak,
    /// The user's first entries, unfiltered.
    First,
}

impl SelectionPolicy {
    /// Convert from a configuration string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            SELECTION_WEAK => Ok(Self::Weak),
            SELECTION_FIRST => Ok(Self::First),
            _ => Err(format!(
                "Invalid selection policy '{s}'. Must be one of: {}",
                VALID_SELECTIONS.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => SELECTION_WEAK,
            Self::First => SELECTION_FIRST,
        }
    }

    /// Whether an entry with `stats` is eligible under this policy.
    pub fn includes(&self, stats: &AnswerStats) -> bool {
        match self {
            Self::Weak => {
                stats.accuracy_percent() < WEAK_ACCURACY_BELOW
                    || stats.total_answers < WEAK_MIN_ANSWERS
            }
            Self::First => true,
        }
    }
}
