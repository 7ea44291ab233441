use dioxus::prelude::*;
use dioxus_router::Link;
use tracing::warn;

use study_core::model::QuestionType;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{BookGroupVm, SELECTABLE_TYPES, game_links, group_chapters};

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let mut question_type = use_signal(|| QuestionType::Vocabulary);
    let mut book_filter = use_signal(|| None::<String>);

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let chapters = catalog.chapters(None).await.map_err(|err| {
                warn!(error = %err, "chapter listing failed");
                ViewError::ChaptersUnavailable
            })?;
            Ok::<_, ViewError>(group_chapters(&chapters))
        }
    });
    let state = view_state_from_resource(resource);
    let selected_type = question_type();

    rsx! {
        div { class: "page home-page",
            h2 { "Chapters" }
            div { class: "home-controls",
                label { r#for: "question-type", "Question type" }
                select {
                    id: "question-type",
                    value: "{selected_type}",
                    onchange: move |evt| {
                        if let Ok(ty) = evt.value().parse::<QuestionType>() {
                            question_type.set(ty);
                        }
                    },
                    for ty in SELECTABLE_TYPES {
                        option { value: "{ty}", "{ty.label()}" }
                    }
                }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(groups) => rsx! {
                    if groups.is_empty() {
                        p { "No chapters yet." }
                    } else {
                        BookFilter {
                            books: groups.iter().map(|g| g.book_name.clone()).collect::<Vec<_>>(),
                            selected: book_filter(),
                            on_select: move |book| book_filter.set(book),
                        }
                        for (book, group) in visible_groups(groups, book_filter()) {
                            BookSection { key: "{book}", group, question_type: selected_type }
                        }
                    }
                },
            }
        }
    }
}

fn visible_groups(groups: Vec<BookGroupVm>, filter: Option<String>) -> Vec<(String, BookGroupVm)> {
    groups
        .into_iter()
        .filter(|group| filter.as_ref().is_none_or(|book| *book == group.book_name))
        .map(|group| (group.book_name.clone(), group))
        .collect()
}

#[component]
fn BookFilter(
    books: Vec<String>,
    selected: Option<String>,
    on_select: EventHandler<Option<String>>,
) -> Element {
    rsx! {
        div { class: "book-filter",
            button {
                class: if selected.is_none() { "chip chip--active" } else { "chip" },
                r#type: "button",
                onclick: move |_| on_select.call(None),
                "All books"
            }
            for book in books {
                button {
                    key: "{book}",
                    class: if selected.as_deref() == Some(book.as_str()) { "chip chip--active" } else { "chip" },
                    r#type: "button",
                    onclick: {
                        let book = book.clone();
                        move |_| on_select.call(Some(book.clone()))
                    },
                    "{book}"
                }
            }
        }
    }
}

#[component]
fn BookSection(group: BookGroupVm, question_type: QuestionType) -> Element {
    let links = game_links(question_type);
    rsx! {
        section { class: "book",
            h3 { "{group.book_name}" }
            ul { class: "chapter-list",
                for row in group.chapters {
                    li { key: "{row.chapter_number}", class: "chapter-row",
                        span { class: "chapter-row__label", "{row.label}" }
                        if let Some(level) = row.level {
                            span { class: "chapter-row__level", "{level}" }
                        }
                        div { class: "chapter-row__games",
                            Link {
                                class: "btn btn-small btn-secondary",
                                to: Route::Chapter {
                                    book: row.book_name.clone(),
                                    chapter: row.chapter_number,
                                },
                                "Study"
                            }
                            for (game, label) in links.clone() {
                                Link {
                                    class: "btn btn-small",
                                    to: Route::Quiz {
                                        game,
                                        book: row.book_name.clone(),
                                        chapter: row.chapter_number,
                                        question_type,
                                    },
                                    "{label}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
