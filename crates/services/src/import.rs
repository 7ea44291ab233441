use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use study_core::model::QuestionType;

use crate::api::{ImportRequest, ImportSummary, ImportedQuestion, StudyApi};
use crate::error::ImportError;

/// A question import file.
///
/// The book, chapter and type may be set in the file or supplied by the
/// caller; caller values win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
    pub questions: Vec<ImportedQuestion>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Document(ImportDocument),
    Questions(Vec<ImportedQuestion>),
}

impl ImportDocument {
    /// Parse a document, or a bare array of questions.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Parse` for malformed JSON.
    pub fn parse(json: &str) -> Result<Self, ImportError> {
        Ok(match serde_json::from_str::<ImportFile>(json)? {
            ImportFile::Document(document) => document,
            ImportFile::Questions(questions) => Self {
                book_name: None,
                chapter_number: None,
                question_type: None,
                questions,
            },
        })
    }

    /// # Errors
    ///
    /// Returns `ImportError::Read` or `ImportError::Parse`.
    pub fn read(path: &Path) -> Result<Self, ImportError> {
        let json = fs::read_to_string(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json)
    }

    /// A starter file with two sample questions.
    #[must_use]
    pub fn template(book_name: &str, chapter_number: u32, question_type: QuestionType) -> Self {
        let sample = |text: &str, answer: &str, hint: &str| ImportedQuestion {
            question_text: text.to_string(),
            correct_answer: answer.to_string(),
            hint: Some(hint.to_string()),
            options: Vec::new(),
            question_type: None,
        };
        Self {
            book_name: Some(book_name.to_string()),
            chapter_number: Some(chapter_number),
            question_type: Some(question_type),
            questions: vec![
                sample("食べる", "たべる", "to eat"),
                sample("飲む", "のむ", "to drink"),
            ],
        }
    }

    /// # Errors
    ///
    /// Returns `ImportError::Write` if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<(), ImportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ImportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the target and keep only questions of the target type.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::MissingField` when neither the file nor
    /// `target` names the book, chapter or type, and
    /// `ImportError::NoQuestions` when nothing of that type remains.
    pub fn into_request(self, target: &ImportTarget) -> Result<ImportRequest, ImportError> {
        let book_name = target
            .book_name
            .clone()
            .or(self.book_name)
            .filter(|b| !b.trim().is_empty())
            .ok_or(ImportError::MissingField("book name"))?;
        let chapter_number = target
            .chapter_number
            .or(self.chapter_number)
            .ok_or(ImportError::MissingField("chapter number"))?;
        let question_type = target
            .question_type
            .or(self.question_type)
            .ok_or(ImportError::MissingField("question type"))?;

        // Untyped questions take the file's type before the target's.
        let file_type = self.question_type;
        let questions: Vec<ImportedQuestion> = self
            .questions
            .into_iter()
            .filter(|q| q.question_type.or(file_type).unwrap_or(question_type) == question_type)
            .map(|q| ImportedQuestion {
                question_type: Some(question_type),
                ..q
            })
            .collect();
        if questions.is_empty() {
            return Err(ImportError::NoQuestions(question_type));
        }
        Ok(ImportRequest {
            book_name,
            chapter_number,
            question_type,
            questions,
        })
    }
}

/// File name `app template` writes when no output path is given.
#[must_use]
pub fn template_file_name(question_type: QuestionType) -> String {
    format!("input-test-template-{}.json", question_type.as_str())
}

/// Caller-supplied book, chapter and type for an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTarget {
    pub book_name: Option<String>,
    pub chapter_number: Option<u32>,
    pub question_type: Option<QuestionType>,
}

/// Uploads question files to the study API.
#[derive(Clone)]
pub struct QuestionImporter {
    api: Arc<dyn StudyApi>,
}

impl QuestionImporter {
    #[must_use]
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self { api }
    }

    /// Read `path` and upload its questions.
    ///
    /// # Errors
    ///
    /// Returns `ImportError` if the file is unusable or the upload fails.
    pub async fn import_file(
        &self,
        path: &Path,
        target: &ImportTarget,
    ) -> Result<ImportSummary, ImportError> {
        let request = ImportDocument::read(path)?.into_request(target)?;
        info!(
            book = %request.book_name,
            chapter = request.chapter_number,
            question_type = %request.question_type,
            count = request.questions.len(),
            "importing questions"
        );
        Ok(self.api.import_questions(&request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryStudyApi;

    #[test]
    fn bare_array_needs_a_target() {
        let doc = ImportDocument::parse(
            r#"[{"question_text":"水","correct_answer":"みず"}]"#,
        )
        .unwrap();
        assert!(matches!(
            doc.clone().into_request(&ImportTarget::default()),
            Err(ImportError::MissingField("book name"))
        ));

        let request = doc
            .into_request(&ImportTarget {
                book_name: Some("Genki".into()),
                chapter_number: Some(4),
                question_type: Some(QuestionType::Kanji),
            })
            .unwrap();
        assert_eq!(request.questions.len(), 1);
        assert_eq!(request.questions[0].question_type, Some(QuestionType::Kanji));
    }

    #[test]
    fn questions_of_other_types_are_dropped() {
        let doc = ImportDocument::parse(
            r#"{
                "book_name": "Genki",
                "chapter_number": 2,
                "question_type": "vocabulary",
                "questions": [
                    {"question_text": "a", "correct_answer": "a"},
                    {"question_text": "b", "correct_answer": "b", "question_type": "grammar"}
                ]
            }"#,
        )
        .unwrap();
        let request = doc.clone().into_request(&ImportTarget::default()).unwrap();
        assert_eq!(request.questions.len(), 1);

        let grammar_only = ImportTarget {
            question_type: Some(QuestionType::Kanji),
            ..ImportTarget::default()
        };
        assert!(matches!(
            doc.into_request(&grammar_only),
            Err(ImportError::NoQuestions(QuestionType::Kanji))
        ));
    }

    #[test]
    fn untyped_questions_keep_the_file_type_under_an_override() {
        let doc = ImportDocument::parse(
            r#"{
                "question_type": "vocabulary",
                "questions": [
                    {"question_text": "水", "correct_answer": "みず"},
                    {"question_text": "川", "correct_answer": "かわ", "question_type": "kanji"}
                ]
            }"#,
        )
        .unwrap();
        let target = ImportTarget {
            book_name: Some("Genki".into()),
            chapter_number: Some(3),
            question_type: Some(QuestionType::Kanji),
        };

        let request = doc.into_request(&target).unwrap();

        assert_eq!(request.question_type, QuestionType::Kanji);
        assert_eq!(request.questions.len(), 1);
        assert_eq!(request.questions[0].question_text, "川");
    }

    #[tokio::test]
    async fn template_file_round_trips_through_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.json");
        ImportDocument::template("Genki", 1, QuestionType::Vocabulary)
            .write(&path)
            .unwrap();

        let api = InMemoryStudyApi::new();
        let summary = QuestionImporter::new(Arc::new(api.clone()))
            .import_file(&path, &ImportTarget::default())
            .await
            .unwrap();

        assert_eq!(summary.created, 2);
        assert!(summary.message.contains("Genki Chapter 1"));
        let imports = api.imports();
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].question_type, QuestionType::Vocabulary);
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = ImportDocument::read(Path::new("/nonexistent/questions.json")).unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
    }

    #[test]
    fn template_name_uses_type_slug() {
        assert_eq!(
            template_file_name(QuestionType::Kanji),
            "input-test-template-kanji.json"
        );
    }
}
