use services::books;
use study_core::model::{Chapter, GameKind, QuestionType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterRowVm {
    pub book_name: String,
    pub chapter_number: u32,
    pub label: String,
    pub level: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookGroupVm {
    pub book_name: String,
    pub chapters: Vec<ChapterRowVm>,
}

#[must_use]
pub fn group_chapters(chapters: &[Chapter]) -> Vec<BookGroupVm> {
    books(chapters)
        .into_iter()
        .map(|book_name| {
            let rows = chapters
                .iter()
                .filter(|chapter| chapter.book_name == book_name)
                .map(|chapter| ChapterRowVm {
                    book_name: chapter.book_name.clone(),
                    chapter_number: chapter.chapter_number,
                    label: chapter_label(chapter),
                    level: chapter.level.map(|level| level.as_str()),
                })
                .collect();
            BookGroupVm {
                book_name,
                chapters: rows,
            }
        })
        .collect()
}

pub(crate) fn chapter_label(chapter: &Chapter) -> String {
    let default_title = format!("Chapter {}", chapter.chapter_number);
    if chapter.title.trim().is_empty() || chapter.title == default_title {
        default_title
    } else {
        format!("{default_title}: {}", chapter.title)
    }
}

/// Question types the chapter picker offers. The JLPT test always asks for
/// JLPT questions whatever is selected here.
pub const SELECTABLE_TYPES: [QuestionType; 3] = [
    QuestionType::Vocabulary,
    QuestionType::Grammar,
    QuestionType::Kanji,
];

/// Game buttons for a chapter row, labeled with the type each game asks for.
#[must_use]
pub fn game_links(question_type: QuestionType) -> Vec<(GameKind, String)> {
    GameKind::ALL
        .into_iter()
        .map(|game| {
            let ty = game.effective_question_type(question_type);
            (game, format!("{} ({})", game.label(), ty.label()))
        })
        .collect()
}
