use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::QuestionId;

/// Data-shape problems detected on a question.
///
/// These are reported for diagnostics only. A malformed choice question is
/// still presented and simply never scores as correct.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id}: correct answer {answer:?} is not one of the options")]
    AnswerNotInOptions { id: QuestionId, answer: String },

    #[error("question {id}: correct answer {answer:?} appears {count} times in the options")]
    AmbiguousAnswer {
        id: QuestionId,
        answer: String,
        count: usize,
    },
}

/// How a question is presented and scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionMode {
    /// The learner picks one of the enumerated options.
    Choice,
    /// The learner types a free-text answer.
    Typed,
}

/// One quiz item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt_text: String,
    correct_answer: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    hint: Option<String>,
}

impl Question {
    /// A free-text question.
    #[must_use]
    pub fn typed(
        id: QuestionId,
        prompt_text: impl Into<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            id,
            prompt_text: prompt_text.into(),
            correct_answer: correct_answer.into(),
            options: Vec::new(),
            hint: None,
        }
    }

    /// A multiple-choice question. `correct_answer` is the literal option text.
    #[must_use]
    pub fn choice(
        id: QuestionId,
        prompt_text: impl Into<String>,
        correct_answer: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            id,
            prompt_text: prompt_text.into(),
            correct_answer: correct_answer.into(),
            options,
            hint: None,
        }
    }

    /// Attach a hint. Blank hints are dropped.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        self.hint = (!hint.trim().is_empty()).then_some(hint);
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn mode(&self) -> QuestionMode {
        if self.options.is_empty() {
            QuestionMode::Typed
        } else {
            QuestionMode::Choice
        }
    }

    #[must_use]
    pub fn is_choice(&self) -> bool {
        self.mode() == QuestionMode::Choice
    }

    /// Option text at `index`, if any.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    /// Drop the options so the question is presented in typed mode.
    #[must_use]
    pub fn into_typed(mut self) -> Self {
        self.options.clear();
        self
    }

    /// Rewrite an index-style correct answer (`"2"`) into the option text it
    /// points at.
    ///
    /// Only applies to choice questions whose answer does not already match an
    /// option verbatim, so an option that is itself a digit is left alone.
    #[must_use]
    pub fn with_canonical_answer(mut self) -> Self {
        if self.options.is_empty() || self.options.contains(&self.correct_answer) {
            return self;
        }
        if let Some(text) = self
            .correct_answer
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| self.options.get(index))
        {
            self.correct_answer = text.clone();
        }
        self
    }

    /// Check the choice invariant: the correct answer equals exactly one option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` describing why the question can never score.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.options.is_empty() {
            return Ok(());
        }
        let count = self
            .options
            .iter()
            .filter(|option| **option == self.correct_answer)
            .count();
        match count {
            0 => Err(QuestionError::AnswerNotInOptions {
                id: self.id,
                answer: self.correct_answer.clone(),
            }),
            1 => Ok(()),
            count => Err(QuestionError::AmbiguousAnswer {
                id: self.id,
                answer: self.correct_answer.clone(),
                count,
            }),
        }
    }
}

/// Letter label for an option position: A, B, C, ...
///
/// Positions past Z fall back to a 1-based number.
#[must_use]
pub fn option_letter(index: usize) -> String {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or_else(|| (index + 1).to_string(), |i| char::from(b'A' + i).to_string())
}
