use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tracing::warn;

use services::{LoadGuard, LoadOutcome, QuizError};
use study_core::model::{AnswerStyle, GameKind, QuestionType, QuizKey};
use study_core::scoring::Answer;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::report::ReportPanel;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{OptionRowVm, QuizMode, QuizVm};

const TICK: Duration = Duration::from_secs(1);

#[component]
pub fn QuizView(game: GameKind, book: String, chapter: u32, question_type: QuestionType) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let quiz_loop = ctx.quiz_loop();
    let exporter = ctx.exporter();
    let guard = use_hook(|| Arc::new(LoadGuard::new()));
    let vm = use_signal(|| None::<QuizVm>);

    {
        let guard = Arc::clone(&guard);
        use_drop(move || guard.invalidate());
    }

    let resource = {
        let quiz_loop = quiz_loop.clone();
        let guard = Arc::clone(&guard);
        let book = book.clone();
        use_resource(use_reactive!(|(game, book, chapter, question_type)| {
            let quiz_loop = quiz_loop.clone();
            let guard = Arc::clone(&guard);
            let mut vm = vm;
            async move {
                let key = QuizKey::new(book, chapter, question_type).map_err(|err| {
                    warn!(error = %err, "invalid quiz key");
                    ViewError::Unknown
                })?;
                match quiz_loop.start(&guard, game, &key).await {
                    Ok(LoadOutcome::Ready(loaded)) => {
                        vm.set(Some(QuizVm::new(game, key, loaded)));
                        Ok(())
                    }
                    Ok(LoadOutcome::Stale) => Ok(()),
                    Err(QuizError::Load(err)) => {
                        vm.set(None);
                        warn!(error = %err, game = game.slug(), "quiz could not load");
                        Err(ViewError::LoadFailed)
                    }
                    Err(err) => {
                        vm.set(None);
                        warn!(error = %err, "quiz could not start");
                        Err(ViewError::Unknown)
                    }
                }
            }
        }))
    };
    let state = view_state_from_resource(resource);

    // Restarted for each run so ticks are phased from the load or retake.
    let run = use_memo(move || vm.read().as_ref().map(QuizVm::run));
    {
        let quiz_loop = quiz_loop.clone();
        let _countdown = use_resource(move || {
            let quiz_loop = quiz_loop.clone();
            let mut vm = vm;
            let run = run();
            async move {
                if run.is_none() {
                    return;
                }
                loop {
                    tokio::time::sleep(TICK).await;
                    let ticking = vm.peek().as_ref().is_some_and(QuizVm::is_ticking);
                    if !ticking {
                        break;
                    }
                    if let Some(vm) = vm.write().as_mut() {
                        vm.tick(&quiz_loop);
                    }
                }
            }
        });
    }

    let submit = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |answer: Answer| {
            let mut vm = vm;
            let Some(pending) = vm.write().as_mut().and_then(|vm| vm.begin_submit(answer)) else {
                return;
            };
            let quiz_loop = quiz_loop.clone();
            spawn(async move {
                let turn = pending.turn();
                let verdict = quiz_loop
                    .verdict(game, &pending.question, &pending.answer)
                    .await;
                let delay = vm
                    .write()
                    .as_mut()
                    .and_then(|vm| vm.finish_submit(pending, verdict));
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                    if let Some(vm) = vm.write().as_mut() {
                        vm.auto_advance(turn, &quiz_loop);
                    }
                }
            });
        })
    };

    let on_next = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            let mut vm = vm;
            if let Some(vm) = vm.write().as_mut() {
                vm.next(&quiz_loop);
            }
        })
    };
    let on_restart = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            let mut vm = vm;
            if let Some(vm) = vm.write().as_mut() {
                vm.restart(&quiz_loop);
            }
        })
    };
    let on_export = use_callback(move |()| {
        let mut vm = vm;
        if let Some(vm) = vm.write().as_mut() {
            vm.export(&exporter);
        }
    });
    let on_exit = use_callback(move |()| {
        guard.invalidate();
        navigator.push(Route::Home {});
    });

    let title = format!("{} · {book} Chapter {chapter}", game.label());
    let vm_guard = vm.read();

    rsx! {
        div { class: "page quiz-page",
            header { class: "quiz-header",
                h2 { class: "quiz-title", "{title}" }
                button {
                    class: "quiz-exit",
                    id: "quiz-exit",
                    r#type: "button",
                    onclick: move |_| on_exit.call(()),
                    "Exit"
                }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading questions..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "quiz-error",
                        p { "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| on_exit.call(()),
                            "Go back"
                        }
                    }
                },
                ViewState::Ready(()) => match vm_guard.as_ref() {
                    None => rsx! {
                        p { "Loading questions..." }
                    },
                    Some(quiz) if quiz.is_complete() => rsx! {
                        ReportPanel {
                            report: quiz.report(quiz_loop.now()),
                            can_export: quiz.can_export(),
                            export_note: quiz.export_note().map(str::to_string),
                            on_retake: on_restart,
                            on_export,
                            on_exit,
                        }
                    },
                    Some(_) => rsx! {
                        QuestionPanel { vm, submit, on_next, on_export }
                    },
                },
            }
        }
    }
}

#[component]
fn QuestionPanel(
    vm: Signal<Option<QuizVm>>,
    submit: Callback<Answer>,
    on_next: Callback<()>,
    on_export: Callback<()>,
) -> Element {
    let guard = vm.read();
    let Some(quiz) = guard.as_ref() else {
        return rsx! {};
    };
    let mode = quiz.mode();
    let prompt = quiz.prompt().to_string();
    let presenting = quiz.is_presenting() && !quiz.is_submitting();
    let can_submit = quiz.can_submit();
    let shows_submit = mode != QuizMode::Flashcard
        && quiz.game().profile().answer_style != AnswerStyle::SubmitOnSelect;
    let options = quiz.option_rows();
    let draft = quiz.draft().to_string();
    let card_back = quiz.card_back().map(str::to_string);
    let has_hint = quiz.has_hint();
    let hint_label = quiz.hint_toggle_label();
    let hint = quiz.visible_hint().map(str::to_string);
    let feedback = quiz.feedback();
    let progress = quiz.progress_label();
    let timer = quiz.timer_label();
    let can_go_back = quiz.can_go_back();
    let show_next = quiz.is_feedback();
    let next_label = quiz.next_label();
    let notice = quiz.notice().map(str::to_string);
    let error = quiz.error();
    let can_export = quiz.can_export();
    let export_note = quiz.export_note().map(str::to_string);
    drop(guard);
    let mut vm = vm;

    let submit_pending = move || {
        let answer = vm.peek().as_ref().and_then(QuizVm::pending_answer);
        if let Some(answer) = answer {
            submit.call(answer);
        }
    };

    rsx! {
        if let Some(notice) = notice {
            p { class: "quiz-notice", "{notice}" }
        }
        div { class: mode_class(mode),
            p { class: "quiz-prompt", lang: "ja", "{prompt}" }
            match mode {
                QuizMode::Choice => rsx! {
                    div { class: "quiz-options",
                        for (index, row) in options.into_iter().map(|row| (row.index, row)) {
                            OptionButton {
                                key: "{index}",
                                row,
                                disabled: !presenting,
                                on_select: move |index| {
                                    let answer = vm.write().as_mut().and_then(|quiz| quiz.select(index));
                                    if let Some(answer) = answer {
                                        submit.call(answer);
                                    }
                                },
                            }
                        }
                    }
                },
                QuizMode::Typed => rsx! {
                    input {
                        class: "quiz-input",
                        id: "quiz-input",
                        r#type: "text",
                        lang: "ja",
                        placeholder: "Type your answer",
                        value: "{draft}",
                        disabled: !presenting,
                        oninput: move |evt| {
                            if let Some(quiz) = vm.write().as_mut() {
                                quiz.set_draft(evt.value());
                            }
                        },
                        onkeydown: move |evt| {
                            if evt.data.key() == Key::Enter {
                                evt.prevent_default();
                                submit_pending();
                            }
                        },
                    }
                },
                QuizMode::Flashcard => rsx! {
                    match card_back {
                        None => rsx! {
                            button {
                                class: "btn quiz-reveal",
                                id: "quiz-reveal",
                                r#type: "button",
                                onclick: move |_| {
                                    if let Some(quiz) = vm.write().as_mut() {
                                        quiz.reveal();
                                    }
                                },
                                "Show answer"
                            }
                        },
                        Some(back) => rsx! {
                            p { class: "quiz-card__back", "{back}" }
                            div { class: "quiz-recall",
                                button {
                                    class: "btn quiz-recall__yes",
                                    r#type: "button",
                                    disabled: !presenting,
                                    onclick: move |_| submit.call(Answer::Recall(true)),
                                    "I knew it"
                                }
                                button {
                                    class: "btn quiz-recall__no",
                                    r#type: "button",
                                    disabled: !presenting,
                                    onclick: move |_| submit.call(Answer::Recall(false)),
                                    "Didn't know"
                                }
                            }
                        },
                    }
                },
            }
            if has_hint {
                button {
                    class: "quiz-hint-toggle",
                    r#type: "button",
                    onclick: move |_| {
                        if let Some(quiz) = vm.write().as_mut() {
                            quiz.toggle_hint();
                        }
                    },
                    "{hint_label}"
                }
            }
            if let Some(hint) = hint {
                p { class: "quiz-hint", "{hint}" }
            }
            if let Some(feedback) = feedback {
                div { class: if feedback.is_correct { "quiz-feedback quiz-feedback--correct" } else { "quiz-feedback quiz-feedback--incorrect" },
                    p { class: "quiz-feedback__headline", "{feedback.headline}" }
                    if let Some(answer) = feedback.correct_answer {
                        p { class: "quiz-feedback__answer", "Correct answer: {answer}" }
                    }
                }
            }
            if let Some(err) = error {
                p { class: "quiz-inline-error", "{err.message()}" }
            }
        }
        footer { class: "quiz-footer",
            span { class: "quiz-footer__item", id: "quiz-progress", "{progress}" }
            if let Some(timer) = timer {
                span { class: "quiz-footer__item quiz-footer__timer", id: "quiz-timer", "{timer}" }
            }
            if can_go_back {
                button {
                    class: "btn btn-secondary",
                    id: "quiz-previous",
                    r#type: "button",
                    onclick: move |_| {
                        if let Some(quiz) = vm.write().as_mut() {
                            quiz.previous();
                        }
                    },
                    "Previous"
                }
            }
            if shows_submit {
                button {
                    class: "btn",
                    id: "quiz-submit",
                    r#type: "button",
                    disabled: !can_submit,
                    onclick: move |_| submit_pending(),
                    "Submit"
                }
            }
            if show_next {
                button {
                    class: "btn",
                    id: "quiz-next",
                    r#type: "button",
                    onclick: move |_| on_next.call(()),
                    "{next_label}"
                }
            }
            if can_export {
                button {
                    class: "btn btn-secondary",
                    id: "quiz-export",
                    r#type: "button",
                    onclick: move |_| on_export.call(()),
                    "Export results"
                }
            }
            if let Some(note) = export_note {
                span { class: "quiz-footer__note", "{note}" }
            }
        }
    }
}

#[component]
fn OptionButton(row: OptionRowVm, disabled: bool, on_select: EventHandler<usize>) -> Element {
    let index = row.index;
    rsx! {
        button {
            class: "{row.state.class()}",
            id: "quiz-option-{index}",
            r#type: "button",
            disabled,
            onclick: move |_| on_select.call(index),
            span { class: "quiz-option__letter", "{row.letter}" }
            span { class: "quiz-option__text", "{row.text}" }
        }
    }
}

fn mode_class(mode: QuizMode) -> &'static str {
    match mode {
        QuizMode::Choice => "quiz-card quiz-card--choice",
        QuizMode::Typed => "quiz-card quiz-card--typed",
        QuizMode::Flashcard => "quiz-card quiz-card--flashcard",
    }
}
