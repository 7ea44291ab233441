use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use study_core::model::{
    Chapter, ChapterId, GrammarRecord, NoteRecord, Question, QuestionId, QuizKey, StudyRecord,
    VocabularyRecord,
};

use super::{AnswerVerdict, ImportRequest, ImportSummary, SearchKind, StudyApi};
use crate::error::ApiError;

/// Endpoints of the in-memory API that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Chapters,
    InputTest,
    JlptTest,
    Vocabularies,
    GrammarPatterns,
    Search(SearchKind),
    SubmitAnswer,
    Import,
}

#[derive(Default)]
struct State {
    chapters: Vec<Chapter>,
    input_questions: HashMap<QuizKey, Vec<Question>>,
    jlpt_questions: HashMap<QuizKey, Vec<Question>>,
    vocabularies: HashMap<ChapterId, Vec<VocabularyRecord>>,
    grammar: HashMap<ChapterId, Vec<GrammarRecord>>,
    notes: Vec<NoteRecord>,
    failing: HashSet<Endpoint>,
    delay: Option<Duration>,
    submissions: Vec<(QuestionId, String)>,
    imports: Vec<ImportRequest>,
    search_queries: Vec<String>,
}

/// In-process `StudyApi` for tests and offline runs.
#[derive(Clone, Default)]
pub struct InMemoryStudyApi {
    state: Arc<Mutex<State>>,
}

impl InMemoryStudyApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))
    }

    fn update(&self, f: impl FnOnce(&mut State)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }

    #[must_use]
    pub fn with_chapter(self, chapter: Chapter) -> Self {
        self.update(|s| s.chapters.push(chapter));
        self
    }

    #[must_use]
    pub fn with_input_questions(self, key: QuizKey, questions: Vec<Question>) -> Self {
        self.set_input_questions(key, questions);
        self
    }

    #[must_use]
    pub fn with_jlpt_questions(self, key: QuizKey, questions: Vec<Question>) -> Self {
        self.update(|s| {
            s.jlpt_questions.insert(key, questions);
        });
        self
    }

    #[must_use]
    pub fn with_vocabularies(self, chapter: ChapterId, records: Vec<VocabularyRecord>) -> Self {
        self.update(|s| {
            s.vocabularies.insert(chapter, records);
        });
        self
    }

    #[must_use]
    pub fn with_grammar_patterns(self, chapter: ChapterId, records: Vec<GrammarRecord>) -> Self {
        self.update(|s| {
            s.grammar.insert(chapter, records);
        });
        self
    }

    #[must_use]
    pub fn with_notes(self, notes: Vec<NoteRecord>) -> Self {
        self.update(|s| s.notes = notes);
        self
    }

    /// Delay every call by `delay` (tokio time, so paused clocks apply).
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        self.update(|s| s.delay = Some(delay));
        self
    }

    #[must_use]
    pub fn failing(self, endpoint: Endpoint) -> Self {
        self.set_failing(endpoint, true);
        self
    }

    pub fn set_failing(&self, endpoint: Endpoint, failing: bool) {
        self.update(|s| {
            if failing {
                s.failing.insert(endpoint);
            } else {
                s.failing.remove(&endpoint);
            }
        });
    }

    pub fn set_input_questions(&self, key: QuizKey, questions: Vec<Question>) {
        self.update(|s| {
            s.input_questions.insert(key, questions);
        });
    }

    /// Answers sent to `submit_answer`, in call order.
    #[must_use]
    pub fn submitted_answers(&self) -> Vec<(QuestionId, String)> {
        self.state
            .lock()
            .map(|s| s.submissions.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn imports(&self) -> Vec<ImportRequest> {
        self.state
            .lock()
            .map(|s| s.imports.clone())
            .unwrap_or_default()
    }

    /// Queries received by `search`, one entry per call.
    #[must_use]
    pub fn search_queries(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.search_queries.clone())
            .unwrap_or_default()
    }

    async fn enter(&self, endpoint: Endpoint) -> Result<MutexGuard<'_, State>, ApiError> {
        let delay = self.lock()?.delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.lock()?;
        if state.failing.contains(&endpoint) {
            return Err(ApiError::Unavailable(format!("{endpoint:?} is failing")));
        }
        Ok(state)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl StudyApi for InMemoryStudyApi {
    async fn list_chapters(&self, book_name: Option<&str>) -> Result<Vec<Chapter>, ApiError> {
        let state = self.enter(Endpoint::Chapters).await?;
        Ok(state
            .chapters
            .iter()
            .filter(|c| book_name.is_none_or(|book| c.book_name == book))
            .cloned()
            .collect())
    }

    async fn find_chapter(
        &self,
        book_name: &str,
        chapter_number: u32,
    ) -> Result<Option<Chapter>, ApiError> {
        let state = self.enter(Endpoint::Chapters).await?;
        Ok(state
            .chapters
            .iter()
            .find(|c| c.book_name == book_name && c.chapter_number == chapter_number)
            .cloned())
    }

    async fn input_test_questions(&self, key: &QuizKey) -> Result<Vec<Question>, ApiError> {
        let state = self.enter(Endpoint::InputTest).await?;
        Ok(state.input_questions.get(key).cloned().unwrap_or_default())
    }

    async fn jlpt_test_questions(&self, key: &QuizKey) -> Result<Vec<Question>, ApiError> {
        let state = self.enter(Endpoint::JlptTest).await?;
        Ok(state.jlpt_questions.get(key).cloned().unwrap_or_default())
    }

    async fn vocabularies(&self, chapter: ChapterId) -> Result<Vec<VocabularyRecord>, ApiError> {
        let state = self.enter(Endpoint::Vocabularies).await?;
        Ok(state.vocabularies.get(&chapter).cloned().unwrap_or_default())
    }

    async fn grammar_patterns(&self, chapter: ChapterId) -> Result<Vec<GrammarRecord>, ApiError> {
        let state = self.enter(Endpoint::GrammarPatterns).await?;
        Ok(state.grammar.get(&chapter).cloned().unwrap_or_default())
    }

    async fn search(&self, kind: SearchKind, query: &str) -> Result<Vec<StudyRecord>, ApiError> {
        self.update(|s| s.search_queries.push(query.to_string()));
        let state = self.enter(Endpoint::Search(kind)).await?;
        let records: Vec<StudyRecord> = match kind {
            SearchKind::Vocabulary => state
                .vocabularies
                .values()
                .flatten()
                .cloned()
                .map(StudyRecord::Vocabulary)
                .collect(),
            SearchKind::Grammar => state
                .grammar
                .values()
                .flatten()
                .cloned()
                .map(StudyRecord::Grammar)
                .collect(),
            SearchKind::Notes => state.notes.iter().cloned().map(StudyRecord::Note).collect(),
        };
        Ok(records
            .into_iter()
            .filter(|r| contains_ci(r.title(), query) || contains_ci(r.body(), query))
            .collect())
    }

    async fn submit_answer(
        &self,
        question: QuestionId,
        answer: &str,
    ) -> Result<AnswerVerdict, ApiError> {
        let mut state = self.enter(Endpoint::SubmitAnswer).await?;
        state.submissions.push((question, answer.to_string()));
        let found = state
            .input_questions
            .values()
            .flatten()
            .find(|q| q.id() == question)
            .ok_or_else(|| ApiError::Unavailable(format!("question {question} not found")))?;
        Ok(AnswerVerdict {
            is_correct: found.correct_answer().to_lowercase() == answer.to_lowercase(),
            correct_answer: found.correct_answer().to_string(),
        })
    }

    async fn import_questions(&self, request: &ImportRequest) -> Result<ImportSummary, ApiError> {
        let mut state = self.enter(Endpoint::Import).await?;
        state.imports.push(request.clone());
        let created = request.questions.len();
        Ok(ImportSummary {
            created,
            errors: Vec::new(),
            message: format!(
                "Successfully imported {created} questions to {} Chapter {}. 0 errors.",
                request.book_name, request.chapter_number
            ),
        })
    }
}
