use std::sync::Arc;

use dioxus::prelude::*;
use services::{SearchDebouncer, SearchResults};

use crate::context::AppContext;
use crate::vm::{SearchSectionVm, map_search_results, summary_label};

#[component]
pub fn SearchView() -> Element {
    let ctx = use_context::<AppContext>();
    let debouncer = use_hook(|| Arc::new(SearchDebouncer::new(ctx.search())));
    let mut input = use_signal(String::new);
    let results = use_signal(|| SearchResults::empty(""));

    {
        let debouncer = Arc::clone(&debouncer);
        use_future(move || {
            let debouncer = Arc::clone(&debouncer);
            let mut results = results;
            async move {
                while let Some(next) = debouncer.next_results().await {
                    // A slow response for an older query must not replace newer results.
                    if next.matches_input(&input.peek()) {
                        results.set(next);
                    }
                }
            }
        });
    }

    let (summary, sections) = {
        let current = results.read();
        (summary_label(&current), map_search_results(&current))
    };
    let value = input();

    rsx! {
        div { class: "page search-page",
            h2 { "Search" }
            input {
                class: "search-input",
                id: "search-input",
                r#type: "search",
                lang: "ja",
                placeholder: "Search vocabulary, grammar and notes",
                value: "{value}",
                oninput: move |evt| {
                    let value = evt.value();
                    debouncer.schedule(&value);
                    input.set(value);
                },
            }
            if !summary.is_empty() {
                p { class: "search-summary", id: "search-summary", "{summary}" }
            }
            for (label, section) in sections.into_iter().map(|section| (section.label, section)) {
                SearchSection { key: "{label}", section }
            }
        }
    }
}

#[component]
fn SearchSection(section: SearchSectionVm) -> Element {
    rsx! {
        section { class: "search-section",
            h3 { "{section.label}" }
            ul { class: "search-hits",
                for hit in section.hits {
                    li { key: "{hit.key}", class: "search-hit",
                        p { class: "search-hit__title", lang: "ja", "{hit.title}" }
                        div { class: "search-hit__body", dangerous_inner_html: "{hit.body_html}" }
                        if let Some(example) = hit.example {
                            p { class: "search-hit__example", lang: "ja", "{example}" }
                        }
                    }
                }
            }
        }
    }
}
