use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use study_core::Clock;
use study_core::model::{QuestionType, QuizKey};
use study_core::quiz::QuizSession;

use crate::error::ExportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedQuestion {
    pub question_text: String,
    pub correct_answer: String,
    pub hint: Option<String>,
    pub question_type: QuestionType,
    pub user_answer: Option<String>,
}

/// JSON written by a results export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedResults {
    pub book_name: String,
    pub chapter: u32,
    pub question_type: QuestionType,
    pub score: usize,
    pub total_questions: usize,
    pub timestamp: String,
    pub questions: Vec<ExportedQuestion>,
}

impl ExportedResults {
    /// Snapshot `session`. Only the question on screen carries a
    /// `user_answer`: its recorded answer, or else the unsubmitted draft.
    #[must_use]
    pub fn from_session(
        key: &QuizKey,
        session: &QuizSession,
        draft: &str,
        timestamp: String,
    ) -> Self {
        let current = session.current_index();
        let questions = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let user_answer = (index == current)
                    .then(|| match session.submission(index) {
                        Some(submission) => Some(submission.answer.display_text(question)),
                        None => Some(draft.trim().to_string()).filter(|d| !d.is_empty()),
                    })
                    .flatten();
                ExportedQuestion {
                    question_text: question.prompt_text().to_string(),
                    correct_answer: question.correct_answer().to_string(),
                    hint: question.hint().map(str::to_string),
                    question_type: key.question_type,
                    user_answer,
                }
            })
            .collect();
        Self {
            book_name: key.book_name.clone(),
            chapter: key.chapter_number,
            question_type: key.question_type,
            score: session.score(),
            total_questions: session.total(),
            timestamp,
            questions,
        }
    }
}

/// Writes session results as JSON files into a directory.
#[derive(Clone, Debug)]
pub struct ResultsExporter {
    dir: PathBuf,
    clock: Clock,
}

impl ResultsExporter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, clock: Clock) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `session`'s results and return the file path.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if serialization or the write fails.
    pub fn export(
        &self,
        key: &QuizKey,
        session: &QuizSession,
        draft: &str,
    ) -> Result<PathBuf, ExportError> {
        let now = self.clock.now();
        let results = ExportedResults::from_session(key, session, draft, now.to_rfc3339());
        let json = serde_json::to_string_pretty(&results)?;

        let file_name = format!(
            "test-results-{}-{}-{}-{}.json",
            file_safe(&key.book_name),
            key.chapter_number,
            key.question_type,
            now.format("%Y%m%dT%H%M%SZ"),
        );
        let path = self.dir.join(file_name);
        fs::create_dir_all(&self.dir).map_err(|source| ExportError::Write {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), score = results.score, "results exported");
        Ok(path)
    }
}

/// Book names become file-name safe: letters and digits stay, runs of
/// anything else collapse to one `-`.
fn file_safe(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}
