use std::sync::Arc;

use tracing::debug;

use study_core::model::{Chapter, GrammarRecord, VocabularyRecord};

use crate::api::StudyApi;
use crate::error::ApiError;

/// Everything a chapter teaches, for read-only study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterContents {
    pub chapter: Chapter,
    pub vocabularies: Vec<VocabularyRecord>,
    pub grammar: Vec<GrammarRecord>,
}

/// Chapters grouped for the chapter picker.
#[derive(Clone)]
pub struct ChapterCatalog {
    api: Arc<dyn StudyApi>,
}

impl ChapterCatalog {
    #[must_use]
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self { api }
    }

    /// Every chapter, ordered by book then chapter number.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the chapter listing fails.
    pub async fn chapters(&self, book_name: Option<&str>) -> Result<Vec<Chapter>, ApiError> {
        let mut chapters = self.api.list_chapters(book_name).await?;
        chapters.sort_by(|a, b| {
            a.book_name
                .cmp(&b.book_name)
                .then(a.chapter_number.cmp(&b.chapter_number))
        });
        debug!(count = chapters.len(), "chapters listed");
        Ok(chapters)
    }

    /// Vocabulary and grammar of one chapter. A missing chapter is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the chapter lookup or either listing fails.
    pub async fn contents(
        &self,
        book_name: &str,
        chapter_number: u32,
    ) -> Result<Option<ChapterContents>, ApiError> {
        let Some(chapter) = self.api.find_chapter(book_name, chapter_number).await? else {
            debug!(book_name, chapter_number, "chapter not found");
            return Ok(None);
        };
        let (vocabularies, grammar) = tokio::join!(
            self.api.vocabularies(chapter.id),
            self.api.grammar_patterns(chapter.id)
        );
        let contents = ChapterContents {
            chapter,
            vocabularies: vocabularies?,
            grammar: grammar?,
        };
        debug!(
            book_name,
            chapter_number,
            vocabularies = contents.vocabularies.len(),
            grammar = contents.grammar.len(),
            "chapter contents loaded"
        );
        Ok(Some(contents))
    }
}

/// Distinct book names in `chapters`, in order of first appearance.
#[must_use]
pub fn books(chapters: &[Chapter]) -> Vec<String> {
    let mut books: Vec<String> = Vec::new();
    for chapter in chapters {
        if !books.contains(&chapter.book_name) {
            books.push(chapter.book_name.clone());
        }
    }
    books
}
