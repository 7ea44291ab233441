//! JSON shapes returned by the study API and their conversion into domain types.

use serde::Deserialize;
use serde_json::Value;

use study_core::model::{
    Chapter, ChapterId, GrammarRecord, NoteRecord, Question, QuestionId, StudyRecord,
    VocabularyRecord,
};

/// A list endpoint response: paginated `{results: [...]}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Page { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Page { results } | Self::Bare(results) => results,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireChapter {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    level: Option<String>,
    book_name: String,
    chapter_number: u32,
}

impl From<WireChapter> for Chapter {
    fn from(wire: WireChapter) -> Self {
        let title = wire
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Chapter {}", wire.chapter_number));
        Self {
            id: ChapterId::new(wire.id),
            title,
            level: wire.level.and_then(|level| level.parse().ok()),
            book_name: wire.book_name,
            chapter_number: wire.chapter_number,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireQuestion {
    id: i64,
    question_text: String,
    correct_answer: Value,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    hint: Option<String>,
}

fn answer_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<WireQuestion> for Question {
    fn from(wire: WireQuestion) -> Self {
        let id = QuestionId::new(wire.id);
        let answer = answer_text(wire.correct_answer);
        let options = wire.options.unwrap_or_default();
        let question = if options.is_empty() {
            Question::typed(id, wire.question_text, answer)
        } else {
            Question::choice(id, wire.question_text, answer, options).with_canonical_answer()
        };
        match wire.hint {
            Some(hint) => question.with_hint(hint),
            None => question,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVocabulary {
    id: i64,
    word: String,
    meaning: String,
    #[serde(default)]
    example: Option<String>,
}

impl From<WireVocabulary> for VocabularyRecord {
    fn from(wire: WireVocabulary) -> Self {
        Self {
            id: wire.id,
            word: wire.word,
            meaning: wire.meaning,
            example: wire.example.filter(|e| !e.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireGrammarExample {
    sentence: String,
}

#[derive(Debug, Deserialize)]
struct WireGrammarUsage {
    explanation: String,
    #[serde(default)]
    examples: Vec<WireGrammarExample>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireGrammar {
    id: i64,
    pattern: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    usages: Vec<WireGrammarUsage>,
}

impl From<WireGrammar> for GrammarRecord {
    fn from(wire: WireGrammar) -> Self {
        let explanation = if wire.usages.is_empty() {
            wire.description.unwrap_or_default()
        } else {
            wire.usages
                .iter()
                .map(|usage| usage.explanation.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        };
        let examples = wire
            .usages
            .into_iter()
            .flat_map(|usage| usage.examples)
            .map(|example| example.sentence)
            .collect();
        Self {
            id: wire.id,
            pattern: wire.pattern,
            explanation,
            examples,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireNote {
    id: i64,
    #[serde(default)]
    title: Option<String>,
    content: String,
}

impl From<WireNote> for NoteRecord {
    fn from(wire: WireNote) -> Self {
        Self {
            id: wire.id,
            title: wire.title.filter(|t| !t.trim().is_empty()),
            content: wire.content,
        }
    }
}

impl From<WireVocabulary> for StudyRecord {
    fn from(wire: WireVocabulary) -> Self {
        Self::Vocabulary(wire.into())
    }
}

impl From<WireGrammar> for StudyRecord {
    fn from(wire: WireGrammar) -> Self {
        Self::Grammar(wire.into())
    }
}

impl From<WireNote> for StudyRecord {
    fn from(wire: WireNote) -> Self {
        Self::Note(wire.into())
    }
}
