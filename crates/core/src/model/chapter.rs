use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ChapterId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum KeyError {
    #[error("unknown question type: {0}")]
    UnknownQuestionType(String),

    #[error("unknown JLPT level: {0}")]
    UnknownLevel(String),

    #[error("book name cannot be empty")]
    EmptyBookName,
}

/// JLPT level a chapter is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JlptLevel {
    N5,
    N4,
    N3,
    N2,
    N1,
}

impl JlptLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N5 => "N5",
            Self::N4 => "N4",
            Self::N3 => "N3",
            Self::N2 => "N2",
            Self::N1 => "N1",
        }
    }
}

impl FromStr for JlptLevel {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N5" => Ok(Self::N5),
            "N4" => Ok(Self::N4),
            "N3" => Ok(Self::N3),
            "N2" => Ok(Self::N2),
            "N1" => Ok(Self::N1),
            _ => Err(KeyError::UnknownLevel(s.to_string())),
        }
    }
}

/// Kind of material a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Vocabulary,
    Grammar,
    Kanji,
    Jlpt,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::Vocabulary,
        QuestionType::Grammar,
        QuestionType::Kanji,
        QuestionType::Jlpt,
    ];

    /// Value used in the `question_type` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vocabulary => "vocabulary",
            Self::Grammar => "grammar",
            Self::Kanji => "kanji",
            Self::Jlpt => "jlpt",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vocabulary => "Vocabulary",
            Self::Grammar => "Grammar",
            Self::Kanji => "Kanji",
            Self::Jlpt => "JLPT",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vocabulary" => Ok(Self::Vocabulary),
            "grammar" => Ok(Self::Grammar),
            "kanji" => Ok(Self::Kanji),
            "jlpt" => Ok(Self::Jlpt),
            _ => Err(KeyError::UnknownQuestionType(s.to_string())),
        }
    }
}

/// A chapter of a textbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub title: String,
    pub level: Option<JlptLevel>,
    pub book_name: String,
    pub chapter_number: u32,
}

impl Chapter {
    /// Key for quizzing this chapter with the given material type.
    #[must_use]
    pub fn quiz_key(&self, question_type: QuestionType) -> QuizKey {
        QuizKey {
            book_name: self.book_name.clone(),
            chapter_number: self.chapter_number,
            question_type,
        }
    }
}

/// The (book, chapter, question type) triple that selects a question set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuizKey {
    pub book_name: String,
    pub chapter_number: u32,
    pub question_type: QuestionType,
}

impl QuizKey {
    /// # Errors
    ///
    /// Returns `KeyError::EmptyBookName` when the book name is blank.
    pub fn new(
        book_name: impl Into<String>,
        chapter_number: u32,
        question_type: QuestionType,
    ) -> Result<Self, KeyError> {
        let book_name = book_name.into().trim().to_string();
        if book_name.is_empty() {
            return Err(KeyError::EmptyBookName);
        }
        Ok(Self {
            book_name,
            chapter_number,
            question_type,
        })
    }

    /// Same book and chapter, different material type.
    #[must_use]
    pub fn with_question_type(&self, question_type: QuestionType) -> Self {
        Self {
            question_type,
            ..self.clone()
        }
    }
}

impl fmt::Display for QuizKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} ({})",
            self.book_name, self.chapter_number, self.question_type
        )
    }
}
