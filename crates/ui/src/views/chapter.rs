use dioxus::prelude::*;
use dioxus_router::Link;
use tracing::warn;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ChapterContentsVm, GrammarRowVm, VocabularyRowVm, map_chapter_contents};

#[component]
pub fn ChapterView(book: String, chapter: u32) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let resource = use_resource(use_reactive!(|(book, chapter)| {
        let catalog = catalog.clone();
        async move {
            match catalog.contents(&book, chapter).await {
                Ok(Some(contents)) => Ok(map_chapter_contents(&contents)),
                Ok(None) => Err(ViewError::ChapterNotFound),
                Err(err) => {
                    warn!(error = %err, book = %book, chapter, "chapter contents failed");
                    Err(ViewError::ContentsUnavailable)
                }
            }
        }
    }));
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page chapter-page",
            Link { class: "btn btn-secondary", to: Route::Home {}, "Back to chapters" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    if err == ViewError::ContentsUnavailable {
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    }
                },
                ViewState::Ready(contents) => rsx! {
                    ChapterContents { contents }
                },
            }
        }
    }
}

#[component]
fn ChapterContents(contents: ChapterContentsVm) -> Element {
    let empty = contents.is_empty();
    let ChapterContentsVm {
        heading,
        book_name,
        level,
        vocabularies,
        grammar,
    } = contents;
    let has_vocabularies = !vocabularies.is_empty();
    let has_grammar = !grammar.is_empty();

    rsx! {
        header { class: "chapter-header",
            h2 { "{heading}" }
            p { class: "chapter-header__book", "{book_name}" }
            if let Some(level) = level {
                span { class: "chapter-row__level", "{level}" }
            }
        }
        if empty {
            p { class: "chapter-empty", "Nothing to study in this chapter yet." }
        }
        if has_vocabularies {
            section { class: "chapter-section",
                h3 { "Vocabulary" }
                ul { class: "chapter-vocabulary",
                    for (key, row) in vocabularies.into_iter().map(|row| (row.key.clone(), row)) {
                        VocabularyRow { key: "{key}", row }
                    }
                }
            }
        }
        if has_grammar {
            section { class: "chapter-section",
                h3 { "Grammar" }
                ul { class: "chapter-grammar",
                    for (key, row) in grammar.into_iter().map(|row| (row.key.clone(), row)) {
                        GrammarRow { key: "{key}", row }
                    }
                }
            }
        }
    }
}

#[component]
fn VocabularyRow(row: VocabularyRowVm) -> Element {
    rsx! {
        li { class: "vocabulary-row",
            p { class: "vocabulary-row__word", lang: "ja", "{row.word}" }
            div { class: "vocabulary-row__meaning", dangerous_inner_html: "{row.meaning_html}" }
            if let Some(example) = row.example {
                p { class: "vocabulary-row__example", lang: "ja", "{example}" }
            }
        }
    }
}

#[component]
fn GrammarRow(row: GrammarRowVm) -> Element {
    rsx! {
        li { class: "grammar-row",
            p { class: "grammar-row__pattern", lang: "ja", "{row.pattern}" }
            div { class: "grammar-row__explanation", dangerous_inner_html: "{row.explanation_html}" }
            if !row.examples.is_empty() {
                ul { class: "grammar-row__examples",
                    for (position, example) in row.examples.into_iter().enumerate() {
                        li { key: "{position}", lang: "ja", "{example}" }
                    }
                }
            }
        }
    }
}
