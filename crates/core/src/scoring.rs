//! Answer comparison and score summaries.

use serde::{Deserialize, Serialize};

use crate::model::Question;

/// A learner's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Position of the selected option.
    Choice(usize),
    /// Free-text answer, already trimmed.
    Typed(String),
    /// Self-graded flashcard: `true` when the learner knew it.
    Recall(bool),
}

impl Answer {
    /// Build a typed answer from raw input.
    ///
    /// Returns `None` for empty or whitespace-only input, which must never be
    /// submitted.
    #[must_use]
    pub fn typed(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self::Typed(trimmed.to_string()))
    }

    /// Human-readable form of the answer for `question`.
    #[must_use]
    pub fn display_text(&self, question: &Question) -> String {
        match self {
            Self::Choice(index) => question
                .option(*index)
                .map_or_else(|| format!("(option {})", index + 1), str::to_string),
            Self::Typed(text) => text.clone(),
            Self::Recall(true) => "Knew it".to_string(),
            Self::Recall(false) => "Didn't know".to_string(),
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whether `answer` is correct for `question`.
///
/// Choice answers compare the selected option text to the correct answer
/// exactly. Typed answers compare case-insensitively after trimming. A missing
/// answer, an out-of-range option or an answer of the wrong kind is never
/// correct.
#[must_use]
pub fn is_correct(question: &Question, answer: Option<&Answer>) -> bool {
    match answer {
        Some(Answer::Choice(index)) => question
            .option(*index)
            .is_some_and(|text| text == question.correct_answer()),
        Some(Answer::Typed(text)) => {
            !question.is_choice() && normalize(text) == normalize(question.correct_answer())
        }
        Some(Answer::Recall(knew)) => *knew,
        None => false,
    }
}

/// `score / total` as a whole percentage, rounding halves up.
#[must_use]
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = score.min(total) as u64;
    let total = total as u64;
    let rounded = (200 * score + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}

#[must_use]
pub fn format_percentage(percent: u32) -> String {
    format!("{percent}%")
}

/// Banner shown on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTier {
    Outstanding,
    Great,
    Good,
    KeepStudying,
}

impl ScoreTier {
    #[must_use]
    pub fn from_percentage(percent: u32) -> Self {
        match percent {
            90.. => Self::Outstanding,
            75.. => Self::Great,
            60.. => Self::Good,
            _ => Self::KeepStudying,
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Outstanding => "Outstanding! 🌟",
            Self::Great => "Great work! 👏",
            Self::Good => "Good effort! Keep practicing! 📚",
            Self::KeepStudying => "Keep studying! You'll improve! 💪",
        }
    }
}
