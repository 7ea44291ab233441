use services::ChapterContents;

use crate::vm::chapter_vm::chapter_label;
use crate::vm::markdown_vm::{plain_text_html, render_markdown};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocabularyRowVm {
    pub key: String,
    pub word: String,
    pub meaning_html: String,
    pub example: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarRowVm {
    pub key: String,
    pub pattern: String,
    pub explanation_html: String,
    pub examples: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterContentsVm {
    pub heading: String,
    pub book_name: String,
    pub level: Option<&'static str>,
    pub vocabularies: Vec<VocabularyRowVm>,
    pub grammar: Vec<GrammarRowVm>,
}

impl ChapterContentsVm {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vocabularies.is_empty() && self.grammar.is_empty()
    }
}

/// Grammar explanations are Markdown; meanings are plain text.
#[must_use]
pub fn map_chapter_contents(contents: &ChapterContents) -> ChapterContentsVm {
    let vocabularies = contents
        .vocabularies
        .iter()
        .enumerate()
        .map(|(position, record)| VocabularyRowVm {
            key: format!("vocabulary-{}-{position}", record.id),
            word: record.word.clone(),
            meaning_html: plain_text_html(&record.meaning),
            example: record
                .example
                .as_ref()
                .filter(|example| !example.trim().is_empty())
                .cloned(),
        })
        .collect();
    let grammar = contents
        .grammar
        .iter()
        .enumerate()
        .map(|(position, record)| GrammarRowVm {
            key: format!("grammar-{}-{position}", record.id),
            pattern: record.pattern.clone(),
            explanation_html: render_markdown(&record.explanation),
            examples: record
                .examples
                .iter()
                .filter(|example| !example.trim().is_empty())
                .cloned()
                .collect(),
        })
        .collect();

    ChapterContentsVm {
        heading: chapter_label(&contents.chapter),
        book_name: contents.chapter.book_name.clone(),
        level: contents.chapter.level.map(|level| level.as_str()),
        vocabularies,
        grammar,
    }
}
