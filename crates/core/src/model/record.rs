use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionId};

/// A vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyRecord {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    pub example: Option<String>,
}

/// A grammar pattern with its explanation and example sentences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarRecord {
    pub id: i64,
    pub pattern: String,
    pub explanation: String,
    pub examples: Vec<String>,
}

/// A free-form study note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: i64,
    pub title: Option<String>,
    pub content: String,
}

/// Any study record the remote store hands back.
///
/// Every endpoint's JSON is decoded into one of these variants at the
/// service boundary; presentation code never sees raw remote shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StudyRecord {
    Vocabulary(VocabularyRecord),
    Grammar(GrammarRecord),
    Note(NoteRecord),
    TestQuestion(Question),
}

impl StudyRecord {
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Vocabulary(_) => "Vocabulary",
            Self::Grammar(_) => "Grammar",
            Self::Note(_) => "Note",
            Self::TestQuestion(_) => "Question",
        }
    }

    /// Headline text: the word, pattern, note title or prompt.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Vocabulary(v) => &v.word,
            Self::Grammar(g) => &g.pattern,
            Self::Note(n) => n.title.as_deref().unwrap_or("Untitled note"),
            Self::TestQuestion(q) => q.prompt_text(),
        }
    }

    /// Body text: the meaning, explanation, note content or answer.
    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::Vocabulary(v) => &v.meaning,
            Self::Grammar(g) => &g.explanation,
            Self::Note(n) => &n.content,
            Self::TestQuestion(q) => q.correct_answer(),
        }
    }

    /// Normalize into a flashcard question.
    ///
    /// The front is the word or pattern, the back is the meaning or
    /// explanation, and the first example becomes the hint. Notes are not
    /// quizzable and yield `None`.
    #[must_use]
    pub fn to_flashcard(&self) -> Option<Question> {
        match self {
            Self::Vocabulary(v) => {
                let q = Question::typed(QuestionId::new(v.id), &v.word, &v.meaning);
                Some(match &v.example {
                    Some(example) => q.with_hint(example),
                    None => q,
                })
            }
            Self::Grammar(g) => {
                let q = Question::typed(QuestionId::new(g.id), &g.pattern, &g.explanation);
                Some(match g.examples.first() {
                    Some(example) => q.with_hint(example),
                    None => q,
                })
            }
            Self::Note(_) => None,
            Self::TestQuestion(q) => Some(q.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_becomes_flashcard_with_example_hint() {
        let record = StudyRecord::Vocabulary(VocabularyRecord {
            id: 12,
            word: "食べる".into(),
            meaning: "to eat".into(),
            example: Some("ご飯を食べる".into()),
        });
        let card = record.to_flashcard().unwrap();
        assert_eq!(card.id(), QuestionId::new(12));
        assert_eq!(card.prompt_text(), "食べる");
        assert_eq!(card.correct_answer(), "to eat");
        assert_eq!(card.hint(), Some("ご飯を食べる"));
        assert!(!card.is_choice());
    }

    #[test]
    fn grammar_uses_first_example_and_notes_are_skipped() {
        let grammar = StudyRecord::Grammar(GrammarRecord {
            id: 3,
            pattern: "～ている".into(),
            explanation: "ongoing action".into(),
            examples: vec!["本を読んでいる".into(), "雨が降っている".into()],
        });
        assert_eq!(grammar.to_flashcard().unwrap().hint(), Some("本を読んでいる"));

        let note = StudyRecord::Note(NoteRecord {
            id: 1,
            title: None,
            content: "remember particles".into(),
        });
        assert!(note.to_flashcard().is_none());
        assert_eq!(note.title(), "Untitled note");
    }

    #[test]
    fn records_serialize_with_kind_tag() {
        let record = StudyRecord::Note(NoteRecord {
            id: 5,
            title: Some("Particles".into()),
            content: "は vs が".into(),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "note");
        assert_eq!(json["title"], "Particles");
    }
}
