//! Client contract for the remote study API.

mod http;
mod memory;
mod wire;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use study_core::model::{
    Chapter, ChapterId, GrammarRecord, Question, QuestionId, QuestionType, QuizKey, StudyRecord,
    VocabularyRecord,
};

use crate::error::ApiError;

pub use http::HttpStudyApi;
pub use memory::{Endpoint, InMemoryStudyApi};

/// Record collections the global search queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Vocabulary,
    Grammar,
    Notes,
}

impl SearchKind {
    pub const ALL: [SearchKind; 3] = [SearchKind::Vocabulary, SearchKind::Grammar, SearchKind::Notes];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Vocabulary => "vocabularies/",
            Self::Grammar => "grammar_patterns/",
            Self::Notes => "notes/",
        }
    }
}

/// The server's verdict on a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnswerVerdict {
    pub is_correct: bool,
    pub correct_answer: String,
}

/// One question in an import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedQuestion {
    pub question_text: String,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
}

/// Body of the bulk question import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRequest {
    pub book_name: String,
    pub chapter_number: u32,
    pub question_type: QuestionType,
    pub questions: Vec<ImportedQuestion>,
}

/// Server summary of an import.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportSummary {
    #[serde(default)]
    pub created: usize,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    pub message: String,
}

/// Remote study data: chapters, records, questions and answer checking.
#[async_trait]
pub trait StudyApi: Send + Sync {
    /// List chapters, optionally restricted to one book.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn list_chapters(&self, book_name: Option<&str>) -> Result<Vec<Chapter>, ApiError>;

    /// Resolve a chapter by book and number.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails. A missing chapter is `Ok(None)`.
    async fn find_chapter(
        &self,
        book_name: &str,
        chapter_number: u32,
    ) -> Result<Option<Chapter>, ApiError>;

    /// Questions from the input-test endpoint for `key`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn input_test_questions(&self, key: &QuizKey) -> Result<Vec<Question>, ApiError>;

    /// Questions from the JLPT-test endpoint for `key`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn jlpt_test_questions(&self, key: &QuizKey) -> Result<Vec<Question>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn vocabularies(&self, chapter: ChapterId) -> Result<Vec<VocabularyRecord>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn grammar_patterns(&self, chapter: ChapterId) -> Result<Vec<GrammarRecord>, ApiError>;

    /// Full-text search over one record collection.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn search(&self, kind: SearchKind, query: &str) -> Result<Vec<StudyRecord>, ApiError>;

    /// Ask the server to score a typed answer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn submit_answer(
        &self,
        question: QuestionId,
        answer: &str,
    ) -> Result<AnswerVerdict, ApiError>;

    /// Upload a batch of input-test questions.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    async fn import_questions(&self, request: &ImportRequest) -> Result<ImportSummary, ApiError>;
}

impl fmt::Debug for dyn StudyApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn StudyApi")
    }
}
