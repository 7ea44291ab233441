use services::InMemoryStudyApi;
use services::api::Endpoint;
use study_core::model::{
    Chapter, ChapterId, GameKind, GrammarRecord, JlptLevel, Question, QuestionId, QuestionType,
    QuizKey, VocabularyRecord,
};

use super::test_harness::{ViewKind, setup_view_harness};

fn key() -> QuizKey {
    QuizKey::new("Genki", 3, QuestionType::Vocabulary).expect("valid key")
}

fn genki_chapter(number: u32, title: &str) -> Chapter {
    Chapter {
        id: ChapterId::new(u64::from(number)),
        title: title.to_string(),
        level: Some(JlptLevel::N5),
        book_name: "Genki".to_string(),
        chapter_number: number,
    }
}

fn quiz_view(game: GameKind) -> ViewKind {
    ViewKind::Quiz { game, key: key() }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_lists_chapters_with_game_links() {
    let api = InMemoryStudyApi::new()
        .with_chapter(genki_chapter(2, "Shopping"))
        .with_chapter(genki_chapter(1, "Chapter 1"));
    let mut harness = setup_view_harness(ViewKind::Home, api);

    harness.rebuild();
    let html = harness.drive_until("Chapter 2: Shopping").await;

    assert!(html.contains("Chapter 2: Shopping"), "missing chapter label in {html}");
    assert!(html.contains("All books"), "missing book filter in {html}");
    assert!(
        html.contains("Input Test (Vocabulary)"),
        "missing game link in {html}"
    );
    assert!(html.contains("N5"), "missing level in {html}");
    assert!(html.contains("Study"), "missing chapter contents link in {html}");
}

fn chapter_view(number: u32) -> ViewKind {
    ViewKind::Chapter {
        book: "Genki".to_string(),
        chapter: number,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn chapter_view_lists_vocabulary_and_grammar() {
    let chapter = genki_chapter(3, "New Friends");
    let id = chapter.id;
    let api = InMemoryStudyApi::new()
        .with_chapter(chapter)
        .with_vocabularies(
            id,
            vec![VocabularyRecord {
                id: 1,
                word: "友達".to_string(),
                meaning: "friend".to_string(),
                example: Some("友達と話す。".to_string()),
            }],
        )
        .with_grammar_patterns(
            id,
            vec![GrammarRecord {
                id: 2,
                pattern: "〜ませんか".to_string(),
                explanation: "An **invitation**.".to_string(),
                examples: vec!["行きませんか。".to_string()],
            }],
        );
    let mut harness = setup_view_harness(chapter_view(3), api);

    harness.rebuild();
    let html = harness.drive_until("Chapter 3: New Friends").await;

    assert!(html.contains("友達"), "missing word in {html}");
    assert!(html.contains("友達と話す。"), "missing example in {html}");
    assert!(html.contains("〜ませんか"), "missing pattern in {html}");
    assert!(
        html.contains("<strong>invitation</strong>"),
        "explanation not rendered as Markdown in {html}"
    );
    assert!(html.contains("行きませんか。"), "missing grammar example in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chapter_view_reports_unknown_chapter() {
    let api = InMemoryStudyApi::new().with_chapter(genki_chapter(1, "Chapter 1"));
    let mut harness = setup_view_harness(chapter_view(9), api);

    harness.rebuild();
    let html = harness.drive_until("does not exist").await;

    assert!(html.contains("This chapter does not exist."), "missing error in {html}");
    assert!(!html.contains("Retry"), "unknown chapter offers no retry: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chapter_view_renders_load_failure() {
    let api = InMemoryStudyApi::new()
        .with_chapter(genki_chapter(1, "Chapter 1"))
        .failing(Endpoint::Vocabularies);
    let mut harness = setup_view_harness(chapter_view(1), api);

    harness.rebuild();
    let html = harness.drive_until("Could not load this chapter").await;

    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_renders_error_state() {
    let api = InMemoryStudyApi::new().failing(Endpoint::Chapters);
    let mut harness = setup_view_harness(ViewKind::Home, api);

    harness.rebuild();
    let html = harness.drive_until("Could not load chapters").await;

    assert!(html.contains("Could not load chapters"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn input_test_renders_first_question() {
    let api = InMemoryStudyApi::new().with_input_questions(
        key(),
        vec![
            Question::typed(QuestionId::new(1), "食べる", "たべる"),
            Question::typed(QuestionId::new(2), "飲む", "のむ"),
        ],
    );
    let mut harness = setup_view_harness(quiz_view(GameKind::InputTest), api);

    harness.rebuild();
    let html = harness.drive_until("quiz-progress").await;

    assert!(html.contains("1 / 2"), "missing progress in {html}");
    assert!(html.contains("quiz-input"), "missing answer input in {html}");
    assert!(
        html.contains("食べる") || html.contains("飲む"),
        "missing prompt in {html}"
    );
    assert!(!html.contains("quiz-timer"), "input test has no timer: {html}");
    assert!(html.contains("Export results"), "missing export in {html}");
    assert!(harness.api.submitted_answers().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn jlpt_test_shows_countdown() {
    let api = InMemoryStudyApi::new().with_input_questions(
        key().with_question_type(QuestionType::Jlpt),
        vec![Question::choice(
            QuestionId::new(9),
            "「行く」の読み方は？",
            "いく",
            vec!["いく".into(), "くる".into(), "かえる".into()],
        )],
    );
    let mut harness = setup_view_harness(quiz_view(GameKind::JlptTest), api);

    harness.rebuild();
    let html = harness.drive_until("quiz-timer").await;

    assert!(html.contains("Time: 20:00"), "missing countdown in {html}");
    assert!(html.contains("quiz-option"), "missing options in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn mixed_test_surfaces_load_failure() {
    let api = InMemoryStudyApi::new().failing(Endpoint::JlptTest);
    let mut harness = setup_view_harness(quiz_view(GameKind::MixedTest), api);

    harness.rebuild();
    let html = harness.drive_until("Could not load questions").await;

    assert!(html.contains("Could not load questions"), "missing error in {html}");
    assert!(html.contains("Go back"), "missing back button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn empty_chapter_falls_back_to_practice_questions() {
    let mut harness = setup_view_harness(quiz_view(GameKind::InputTest), InMemoryStudyApi::new());

    harness.rebuild();
    let html = harness.drive_until("quiz-notice").await;

    assert!(
        html.contains("Showing practice questions instead."),
        "missing fallback notice in {html}"
    );
    assert!(html.contains("quiz-progress"), "missing question in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn search_view_renders_empty_box() {
    let mut harness = setup_view_harness(ViewKind::Search, InMemoryStudyApi::new());

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("search-input"), "missing search box in {html}");
    assert!(!html.contains("search-summary"), "summary shown before typing: {html}");
    assert!(harness.api.search_queries().is_empty());
}
