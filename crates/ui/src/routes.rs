use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use study_core::model::{GameKind, QuestionType};

use crate::views::{ChapterView, HomeView, QuizView, SearchView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/chapter/:book/:chapter", ChapterView)] Chapter { book: String, chapter: u32 },
        #[route("/quiz/:game/:book/:chapter/:question_type", QuizView)]
        Quiz { game: GameKind, book: String, chapter: u32, question_type: QuestionType },
        #[route("/search", SearchView)] Search {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "日本語" }
            ul {
                li { Link { to: Route::Home {}, "Chapters" } }
                li { Link { to: Route::Search {}, "Search" } }
            }
        }
    }
}
