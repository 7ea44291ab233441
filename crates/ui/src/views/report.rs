use dioxus::prelude::*;

use crate::vm::ReportVm;

#[component]
pub fn ReportPanel(
    report: ReportVm,
    can_export: bool,
    export_note: Option<String>,
    on_retake: Callback<()>,
    on_export: Callback<()>,
    on_exit: Callback<()>,
) -> Element {
    rsx! {
        section { class: "report",
            div { class: report.tier_class, id: "report-banner",
                p { class: "report-banner__message", "{report.banner}" }
                p { class: "report-banner__score",
                    span { id: "report-score", "{report.score_label}" }
                    " · "
                    span { id: "report-percentage", "{report.percentage_label}" }
                }
                if let Some(note) = report.time_note.as_deref() {
                    p { class: "report-banner__time", "{note}" }
                }
            }
            table { class: "report-table",
                thead {
                    tr {
                        th { "#" }
                        th { "Question" }
                        th { "Your answer" }
                        th { "Correct answer" }
                        th { "" }
                    }
                }
                tbody {
                    for row in report.rows.iter() {
                        tr { key: "{row.number}", class: row.class(),
                            td { "{row.number}" }
                            td { lang: "ja", "{row.prompt}" }
                            td { lang: "ja", "{row.given_answer}" }
                            td { lang: "ja", "{row.correct_answer}" }
                            td { class: "report-row__marker", "{row.marker()}" }
                        }
                    }
                }
            }
            div { class: "report-actions",
                button {
                    class: "btn",
                    id: "report-retake",
                    r#type: "button",
                    onclick: move |_| on_retake.call(()),
                    "Retake"
                }
                if can_export {
                    button {
                        class: "btn btn-secondary",
                        id: "report-export",
                        r#type: "button",
                        onclick: move |_| on_export.call(()),
                        "Export results"
                    }
                }
                button {
                    class: "btn btn-secondary",
                    id: "report-exit",
                    r#type: "button",
                    onclick: move |_| on_exit.call(()),
                    "Back to chapters"
                }
            }
            if let Some(note) = export_note {
                p { class: "report-export-note", "{note}" }
            }
        }
    }
}
