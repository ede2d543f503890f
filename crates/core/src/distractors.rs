//! Wrong-answer options for multiple-choice questions.

/// Supplies the wrong options shown next to the correct translation.
///
/// Implementations must be deterministic for a given word pair: answers are
/// graded by rebuilding the question the client saw.
pub trait DistractorGenerator: Send + Sync {
    fn distractors(&self, latin_word: &str, translation: &str) -> Vec<String>;
}

/// Static placeholder options until a content generator is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderDistractors;

pub const PLACEHOLDER_DISTRACTORS: [&str; 3] =
    ["<AI-distractor-1>", "<AI-distractor-2>", "<AI-distractor-3>"];

impl DistractorGenerator for PlaceholderDistractors {
    fn distractors(&self, _latin_word: &str, _translation: &str) -> Vec<String> {
        PLACEHOLDER_DISTRACTORS
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }
}
