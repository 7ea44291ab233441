use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use services::error::QuizError;
use services::{LoadedQuiz, QuestionOrigin, QuizLoopService, ResultsExporter, Verdict};
use study_core::model::{AnswerStyle, GameKind, Question, QuestionMode, QuizKey, option_letter};
use study_core::quiz::{QuizSession, SessionPhase};
use study_core::scoring::Answer;

use crate::views::ViewError;
use crate::vm::report_vm::{ReportVm, map_report};
use crate::vm::time_fmt::format_remaining;

/// How the current question takes its answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizMode {
    Choice,
    Typed,
    Flashcard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    Selected,
    Correct,
    Incorrect,
}

impl OptionState {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Idle => "quiz-option",
            Self::Selected => "quiz-option quiz-option--selected",
            Self::Correct => "quiz-option quiz-option--correct",
            Self::Incorrect => "quiz-option quiz-option--incorrect",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionRowVm {
    pub index: usize,
    pub letter: String,
    pub text: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub is_correct: bool,
    pub headline: &'static str,
    /// The canonical answer, shown only after a wrong answer.
    pub correct_answer: Option<String>,
}

/// An answer taken off the presenter while its verdict is worked out.
#[derive(Clone, Debug)]
pub struct PendingSubmit {
    turn: u64,
    pub question: Question,
    pub answer: Answer,
}

impl PendingSubmit {
    /// Presenter turn the answer was taken on.
    #[must_use]
    pub fn turn(&self) -> u64 {
        self.turn
    }
}

static NEXT_RUN: AtomicU64 = AtomicU64::new(1);

fn next_run() -> u64 {
    NEXT_RUN.fetch_add(1, Ordering::Relaxed)
}

/// Presenter state for one hosted quiz session.
pub struct QuizVm {
    game: GameKind,
    key: QuizKey,
    session: QuizSession,
    origin: QuestionOrigin,
    notice: Option<String>,
    pending_choice: Option<usize>,
    draft: String,
    hint_visible: bool,
    revealed: bool,
    submitting: bool,
    /// Bumped whenever the presented question changes.
    turn: u64,
    /// Unique per load and per retake.
    run: u64,
    error: Option<ViewError>,
    export_note: Option<String>,
}

impl QuizVm {
    #[must_use]
    pub fn new(game: GameKind, key: QuizKey, loaded: LoadedQuiz) -> Self {
        Self {
            game,
            key,
            session: loaded.session,
            origin: loaded.origin,
            notice: loaded.notice,
            pending_choice: None,
            draft: String::new(),
            hint_visible: false,
            revealed: false,
            submitting: false,
            turn: 0,
            run: next_run(),
            error: None,
            export_note: None,
        }
    }

    #[must_use]
    pub fn game(&self) -> GameKind {
        self.game
    }

    #[must_use]
    pub fn key(&self) -> &QuizKey {
        &self.key
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn origin(&self) -> QuestionOrigin {
        self.origin
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<ViewError> {
        self.error
    }

    #[must_use]
    pub fn export_note(&self) -> Option<&str> {
        self.export_note.as_deref()
    }

    // ─── PRESENTATION ──────────────────────────────────────────────────────

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        if self.game.profile().answer_style == AnswerStyle::Recall {
            return QuizMode::Flashcard;
        }
        match self.session.current_question().mode() {
            QuestionMode::Choice => QuizMode::Choice,
            QuestionMode::Typed => QuizMode::Typed,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        self.session.current_question().prompt_text()
    }

    #[must_use]
    pub fn has_hint(&self) -> bool {
        self.session.current_question().hint().is_some()
    }

    /// The hint, while the learner has it toggled on.
    #[must_use]
    pub fn visible_hint(&self) -> Option<&str> {
        self.hint_visible
            .then(|| self.session.current_question().hint())
            .flatten()
    }

    #[must_use]
    pub fn hint_toggle_label(&self) -> &'static str {
        if self.hint_visible { "Hide hint" } else { "Show hint" }
    }

    /// Back of the flashcard, once revealed or answered.
    #[must_use]
    pub fn card_back(&self) -> Option<&str> {
        (self.revealed || self.is_feedback())
            .then(|| self.session.current_question().correct_answer())
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.session.phase() == SessionPhase::Presenting
    }

    #[must_use]
    pub fn is_feedback(&self) -> bool {
        self.session.phase() == SessionPhase::Feedback
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        self.session.progress_label()
    }

    #[must_use]
    pub fn timer_label(&self) -> Option<String> {
        self.session
            .countdown()
            .map(|countdown| format_remaining(countdown.remaining()))
    }

    /// Identifies the current run of the session. Changes on every load and
    /// retake, so a countdown driver keyed on it starts its phase afresh.
    #[must_use]
    pub fn run(&self) -> u64 {
        self.run
    }

    /// Whether the countdown still needs ticks.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.session.countdown().is_some() && !self.session.is_complete()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.session.can_go_back()
    }

    #[must_use]
    pub fn next_label(&self) -> &'static str {
        if self.session.current_index() + 1 >= self.session.total() {
            "Finish"
        } else {
            "Next"
        }
    }

    #[must_use]
    pub fn can_export(&self) -> bool {
        self.game == GameKind::InputTest
    }

    #[must_use]
    pub fn option_rows(&self) -> Vec<OptionRowVm> {
        let question = self.session.current_question();
        let submission = self.session.current_submission();
        question
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let state = match submission {
                    Some(_) if text == question.correct_answer() => OptionState::Correct,
                    Some(s) if s.answer == Answer::Choice(index) => OptionState::Incorrect,
                    Some(_) => OptionState::Idle,
                    None if self.pending_choice == Some(index) => OptionState::Selected,
                    None => OptionState::Idle,
                };
                OptionRowVm {
                    index,
                    letter: option_letter(index),
                    text: text.clone(),
                    state,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<FeedbackVm> {
        if !self.is_feedback() {
            return None;
        }
        let submission = self.session.current_submission()?;
        Some(FeedbackVm {
            is_correct: submission.is_correct,
            headline: if submission.is_correct { "Correct!" } else { "Incorrect" },
            correct_answer: (!submission.is_correct).then(|| submission.correct_answer.clone()),
        })
    }

    // ─── INPUT ─────────────────────────────────────────────────────────────

    pub fn toggle_hint(&mut self) {
        self.hint_visible = !self.hint_visible;
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn set_draft(&mut self, value: String) {
        self.draft = value;
    }

    /// Pick an option.
    ///
    /// Games that submit on select return the answer to submit right away;
    /// the others keep it pending until Submit.
    pub fn select(&mut self, index: usize) -> Option<Answer> {
        if !self.is_presenting() || self.submitting {
            return None;
        }
        if self.game.profile().answer_style == AnswerStyle::SubmitOnSelect {
            return Some(Answer::Choice(index));
        }
        self.pending_choice = Some(index);
        None
    }

    /// What Submit would send. `None` disables the button.
    #[must_use]
    pub fn pending_answer(&self) -> Option<Answer> {
        match self.mode() {
            QuizMode::Choice => self.pending_choice.map(Answer::Choice),
            QuizMode::Typed => Answer::typed(&self.draft),
            QuizMode::Flashcard => None,
        }
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_presenting() && !self.submitting && self.pending_answer().is_some()
    }

    /// Lock the presenter and hand back the question to score.
    pub fn begin_submit(&mut self, answer: Answer) -> Option<PendingSubmit> {
        if !self.is_presenting() || self.submitting {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(PendingSubmit {
            turn: self.turn,
            question: self.session.current_question().clone(),
            answer,
        })
    }

    /// Record the verdict for `pending`.
    ///
    /// Returns the feedback auto-advance delay when the answer was recorded
    /// and the game advances on its own.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmit,
        verdict: Result<Verdict, QuizError>,
    ) -> Option<Duration> {
        if pending.turn != self.turn {
            return None;
        }
        self.submitting = false;
        if !self.is_presenting() {
            return None;
        }
        let verdict = match verdict {
            Ok(verdict) => verdict,
            Err(err) => {
                warn!(error = %err, "answer submission failed");
                self.error = Some(match err {
                    QuizError::Submit(_) => ViewError::SubmitFailed,
                    _ => ViewError::Unknown,
                });
                return None;
            }
        };
        match QuizLoopService::record(&mut self.session, pending.answer, verdict) {
            Ok(_) => self.game.profile().auto_advance,
            Err(err) => {
                warn!(error = %err, "answer could not be recorded");
                self.error = Some(ViewError::Unknown);
                None
            }
        }
    }

    // ─── NAVIGATION ────────────────────────────────────────────────────────

    pub fn next(&mut self, quiz_loop: &QuizLoopService) {
        if quiz_loop.advance(&mut self.session).is_ok() {
            self.reset_question_state();
        }
    }

    /// Advance after the feedback delay, if the learner is still looking at
    /// the feedback given on `turn`.
    pub fn auto_advance(&mut self, turn: u64, quiz_loop: &QuizLoopService) {
        if self.turn == turn && self.is_feedback() {
            self.next(quiz_loop);
        }
    }

    pub fn previous(&mut self) {
        if self.session.previous().is_ok() {
            self.reset_question_state();
        }
    }

    pub fn restart(&mut self, quiz_loop: &QuizLoopService) {
        quiz_loop.restart(&mut self.session);
        self.reset_question_state();
        self.run = next_run();
        self.export_note = None;
    }

    /// One countdown tick. Returns `true` when time ran out.
    pub fn tick(&mut self, quiz_loop: &QuizLoopService) -> bool {
        quiz_loop.tick(&mut self.session)
    }

    fn reset_question_state(&mut self) {
        self.turn += 1;
        self.submitting = false;
        self.pending_choice = None;
        self.draft.clear();
        self.hint_visible = false;
        self.revealed = false;
        self.error = None;
    }

    // ─── RESULTS ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn report(&self, now: DateTime<Utc>) -> ReportVm {
        map_report(&self.session.report(now))
    }

    pub fn export(&mut self, exporter: &ResultsExporter) {
        match exporter.export(&self.key, &self.session, &self.draft) {
            Ok(path) => {
                self.export_note = Some(format!("Saved results to {}", path.display()));
            }
            Err(err) => {
                warn!(error = %err, "results export failed");
                self.error = Some(ViewError::ExportFailed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use services::{InMemoryStudyApi, LoadGuard, LoadOutcome, QuestionSource, StudyApi};
    use study_core::model::{QuestionId, QuestionType};
    use study_core::time::fixed_clock;

    fn key() -> QuizKey {
        QuizKey::new("Genki", 1, QuestionType::Vocabulary).unwrap()
    }

    fn quiz_loop(api: InMemoryStudyApi) -> QuizLoopService {
        let api: Arc<dyn StudyApi> = Arc::new(api);
        QuizLoopService::new(fixed_clock(), Arc::clone(&api))
            .with_source(QuestionSource::new(api).with_seed(3))
    }

    async fn load(quiz_loop: &QuizLoopService, game: GameKind) -> QuizVm {
        match quiz_loop.start(&LoadGuard::new(), game, &key()).await.unwrap() {
            LoadOutcome::Ready(loaded) => QuizVm::new(game, key(), loaded),
            LoadOutcome::Stale => panic!("fresh guard cannot be stale"),
        }
    }

    async fn submit(vm: &mut QuizVm, quiz_loop: &QuizLoopService, answer: Answer) -> Option<Duration> {
        submit_on_turn(vm, quiz_loop, answer).await.1
    }

    async fn submit_on_turn(
        vm: &mut QuizVm,
        quiz_loop: &QuizLoopService,
        answer: Answer,
    ) -> (u64, Option<Duration>) {
        let pending = vm.begin_submit(answer).unwrap();
        let turn = pending.turn();
        let verdict = quiz_loop
            .verdict(vm.game(), &pending.question, &pending.answer)
            .await;
        (turn, vm.finish_submit(pending, verdict))
    }

    fn choice_api() -> InMemoryStudyApi {
        InMemoryStudyApi::new().with_input_questions(
            key(),
            vec![Question::choice(
                QuestionId::new(1),
                "水",
                "みず",
                vec!["みず".into(), "ひ".into(), "き".into()],
            )],
        )
    }

    #[tokio::test]
    async fn typed_submit_is_disabled_for_blank_drafts() {
        let quiz_loop = quiz_loop(InMemoryStudyApi::new());
        let mut vm = load(&quiz_loop, GameKind::InputTest).await;
        assert_eq!(vm.mode(), QuizMode::Typed);
        assert!(vm.notice().is_some());

        vm.set_draft("   ".into());
        assert!(!vm.can_submit());
        vm.set_draft(" たべる ".into());
        assert_eq!(vm.pending_answer(), Some(Answer::Typed("たべる".into())));
    }

    #[tokio::test]
    async fn choice_feedback_marks_options() {
        let quiz_loop = quiz_loop(choice_api());
        let mut vm = load(&quiz_loop, GameKind::MixedTest).await;
        assert_eq!(vm.mode(), QuizMode::Choice);

        assert_eq!(vm.select(1), None);
        assert_eq!(vm.option_rows()[1].state, OptionState::Selected);
        let answer = vm.pending_answer().unwrap();
        assert_eq!(submit(&mut vm, &quiz_loop, answer).await, None);

        let rows = vm.option_rows();
        assert_eq!(rows[0].letter, "A");
        assert_eq!(rows[0].state, OptionState::Correct);
        assert_eq!(rows[1].state, OptionState::Incorrect);
        let feedback = vm.feedback().unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.correct_answer.as_deref(), Some("みず"));
        assert_eq!(vm.next_label(), "Finish");
    }

    #[tokio::test]
    async fn timed_challenge_submits_on_select_and_auto_advances() {
        let quiz_loop = quiz_loop(InMemoryStudyApi::new());
        let mut vm = load(&quiz_loop, GameKind::TimedChallenge).await;
        assert_eq!(vm.timer_label().as_deref(), Some("Time: 1:00"));

        let answer = vm.select(0).unwrap();
        let (turn, delay) = submit_on_turn(&mut vm, &quiz_loop, answer).await;
        assert_eq!(delay, Some(Duration::from_millis(1500)));
        assert!(vm.is_feedback());

        vm.auto_advance(turn, &quiz_loop);
        assert_eq!(vm.session().current_index(), 1);
        assert!(vm.is_presenting());
    }

    #[tokio::test]
    async fn each_load_and_retake_starts_a_new_run() {
        let quiz_loop = quiz_loop(InMemoryStudyApi::new());
        let mut vm = load(&quiz_loop, GameKind::TimedChallenge).await;
        let other = load(&quiz_loop, GameKind::TimedChallenge).await;
        assert_ne!(vm.run(), other.run());

        let first = vm.run();
        let answer = vm.select(0).unwrap();
        submit(&mut vm, &quiz_loop, answer).await;
        vm.next(&quiz_loop);
        assert_eq!(vm.run(), first);

        vm.restart(&quiz_loop);
        assert_ne!(vm.run(), first);
        assert_eq!(vm.timer_label().as_deref(), Some("Time: 1:00"));
    }

    #[tokio::test]
    async fn auto_advance_from_before_a_retake_is_ignored() {
        let quiz_loop = quiz_loop(InMemoryStudyApi::new());
        let mut vm = load(&quiz_loop, GameKind::TimedChallenge).await;

        let answer = vm.select(0).unwrap();
        let (old_turn, _) = submit_on_turn(&mut vm, &quiz_loop, answer).await;
        while !vm.is_complete() {
            vm.tick(&quiz_loop);
        }
        vm.restart(&quiz_loop);

        let answer = vm.select(0).unwrap();
        let (turn, _) = submit_on_turn(&mut vm, &quiz_loop, answer).await;
        vm.auto_advance(old_turn, &quiz_loop);
        assert_eq!(vm.session().current_index(), 0);
        assert!(vm.is_feedback());

        vm.auto_advance(turn, &quiz_loop);
        assert_eq!(vm.session().current_index(), 1);
    }

    #[tokio::test]
    async fn hint_resets_when_question_changes() {
        let quiz_loop = quiz_loop(InMemoryStudyApi::new());
        let mut vm = load(&quiz_loop, GameKind::InputTest).await;
        vm.toggle_hint();
        assert!(vm.visible_hint().is_some());

        let answer = Answer::typed("x").unwrap();
        submit(&mut vm, &quiz_loop, answer).await;
        vm.next(&quiz_loop);
        assert_eq!(vm.visible_hint(), None);
        assert_eq!(vm.draft(), "");
    }

    #[tokio::test]
    async fn stale_verdict_is_ignored() {
        let quiz_loop = quiz_loop(InMemoryStudyApi::new());
        let mut vm = load(&quiz_loop, GameKind::InputTest).await;
        let pending = vm.begin_submit(Answer::typed("x").unwrap()).unwrap();
        assert!(vm.begin_submit(Answer::typed("y").unwrap()).is_none());

        vm.restart(&quiz_loop);
        vm.finish_submit(pending, Ok(Verdict::Local));
        assert!(vm.is_presenting());
        assert_eq!(vm.session().answered_count(), 0);
    }

    #[tokio::test]
    async fn flashcards_reveal_then_recall() {
        let quiz_loop = quiz_loop(InMemoryStudyApi::new());
        let mut vm = load(&quiz_loop, GameKind::Flashcards).await;
        assert_eq!(vm.mode(), QuizMode::Flashcard);
        assert_eq!(vm.card_back(), None);

        vm.reveal();
        assert!(vm.card_back().is_some());
        let delay = submit(&mut vm, &quiz_loop, Answer::Recall(true)).await;
        assert_eq!(delay, Some(Duration::from_millis(1000)));
        assert!(vm.feedback().unwrap().is_correct);
    }

    #[tokio::test]
    async fn export_reports_saved_path() {
        let dir = tempfile::tempdir().unwrap();
        let quiz_loop = quiz_loop(InMemoryStudyApi::new());
        let mut vm = load(&quiz_loop, GameKind::InputTest).await;
        assert!(vm.can_export());

        vm.export(&ResultsExporter::new(dir.path(), fixed_clock()));
        assert!(vm.export_note().unwrap().starts_with("Saved results to"));
    }
}
