use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;
use thiserror::Error;

use super::report::{QuizReport, ReportItem};
use super::shuffle::shuffle_questions;
use crate::model::{GameKind, Question};
use crate::scoring::{self, Answer};
use crate::time::elapsed_secs;
use crate::timer::Countdown;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("the current question is not awaiting an answer")]
    NotPresenting,
    #[error("the current question has not been answered yet")]
    Unanswered,
    #[error("already at the first question")]
    AtFirstQuestion,
    #[error("this quiz does not allow going back")]
    BackNavigationDisabled,
    #[error("answer cannot be empty")]
    EmptyAnswer,
}

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    AllAnswered,
    TimeUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for an answer to the current question.
    Presenting,
    /// The current question has a recorded answer and its verdict is shown.
    Feedback,
    Completed(CompletionReason),
}

/// A recorded answer and its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub answer: Answer,
    pub is_correct: bool,
    pub correct_answer: String,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through a shuffled question list.
///
/// The session is a plain value owned by whoever hosts the quiz. Questions are
/// fixed for its lifetime; only `restart` reorders them. The score is derived
/// from recorded submissions and never stored separately.
#[derive(Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    answers: Vec<Option<Submission>>,
    phase: SessionPhase,
    countdown: Option<Countdown>,
    allow_back: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over already-prepared questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty.
    pub fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let answers = vec![None; questions.len()];
        Ok(Self {
            questions,
            current: 0,
            answers,
            phase: SessionPhase::Presenting,
            countdown: None,
            allow_back: false,
            started_at,
            completed_at: None,
        })
    }

    /// Start a session configured from a game's profile.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty.
    pub fn for_game(
        game: GameKind,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let profile = game.profile();
        let session = Self::new(questions, started_at)?.with_back_navigation(profile.allow_back);
        Ok(match profile.time_limit_secs {
            Some(secs) => session.with_time_limit(secs),
            None => session,
        })
    }

    #[must_use]
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.countdown = Some(Countdown::new(secs));
        self
    }

    #[must_use]
    pub fn with_back_navigation(mut self, allow_back: bool) -> Self {
        self.allow_back = allow_back;
        self
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, SessionPhase::Completed(_))
    }

    #[must_use]
    pub fn allows_back(&self) -> bool {
        self.allow_back
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.allow_back && self.current > 0 && !self.is_complete()
    }

    #[must_use]
    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn submission(&self, index: usize) -> Option<&Submission> {
        self.answers.get(index).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn current_submission(&self) -> Option<&Submission> {
        self.submission(self.current)
    }

    /// Number of correct recorded submissions.
    #[must_use]
    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .flatten()
            .filter(|submission| submission.is_correct)
            .count()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().flatten().count()
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        scoring::percentage(self.score(), self.total())
    }

    /// `n / total`, 1-based.
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("{} / {}", self.current + 1, self.total())
    }

    /// Score `answer` locally and record it for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after completion,
    /// `SessionError::NotPresenting` if the question was already answered and
    /// `SessionError::EmptyAnswer` for a blank typed answer.
    pub fn submit(&mut self, answer: Answer) -> Result<&Submission, SessionError> {
        self.ensure_presenting(&answer)?;
        let question = self.current_question();
        let submission = Submission {
            is_correct: scoring::is_correct(question, Some(&answer)),
            correct_answer: question.correct_answer().to_string(),
            answer,
        };
        Ok(self.record(submission))
    }

    /// Record an answer whose verdict came from elsewhere (the remote scorer).
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::submit`].
    pub fn submit_with_verdict(
        &mut self,
        answer: Answer,
        is_correct: bool,
        correct_answer: impl Into<String>,
    ) -> Result<&Submission, SessionError> {
        self.ensure_presenting(&answer)?;
        Ok(self.record(Submission {
            answer,
            is_correct,
            correct_answer: correct_answer.into(),
        }))
    }

    fn ensure_presenting(&self, answer: &Answer) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Completed(_) => return Err(SessionError::Completed),
            SessionPhase::Feedback => return Err(SessionError::NotPresenting),
            SessionPhase::Presenting => {}
        }
        if matches!(answer, Answer::Typed(text) if text.trim().is_empty()) {
            return Err(SessionError::EmptyAnswer);
        }
        Ok(())
    }

    fn record(&mut self, submission: Submission) -> &Submission {
        self.phase = SessionPhase::Feedback;
        self.answers[self.current].insert(submission)
    }

    /// Move past the answered current question.
    ///
    /// Advancing from the last question completes the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after completion and
    /// `SessionError::Unanswered` while the current question has no answer.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<SessionPhase, SessionError> {
        match self.phase {
            SessionPhase::Completed(_) => return Err(SessionError::Completed),
            SessionPhase::Presenting => return Err(SessionError::Unanswered),
            SessionPhase::Feedback => {}
        }
        if self.current + 1 >= self.questions.len() {
            self.complete(CompletionReason::AllAnswered, now);
        } else {
            self.current += 1;
            self.phase = self.phase_for_current();
        }
        Ok(self.phase)
    }

    /// Step back one question, redisplaying any recorded answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::BackNavigationDisabled` for games without
    /// backward navigation, `SessionError::AtFirstQuestion` at index 0 and
    /// `SessionError::Completed` after completion.
    pub fn previous(&mut self) -> Result<SessionPhase, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if !self.allow_back {
            return Err(SessionError::BackNavigationDisabled);
        }
        if self.current == 0 {
            return Err(SessionError::AtFirstQuestion);
        }
        self.current -= 1;
        self.phase = self.phase_for_current();
        Ok(self.phase)
    }

    fn phase_for_current(&self) -> SessionPhase {
        if self.answers[self.current].is_some() {
            SessionPhase::Feedback
        } else {
            SessionPhase::Presenting
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `true` when this tick ran the clock out and completed the
    /// session. Untimed and completed sessions ignore ticks.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_complete() {
            return false;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return false;
        };
        if countdown.tick() {
            self.complete(CompletionReason::TimeUp, now);
            return true;
        }
        false
    }

    fn complete(&mut self, reason: CompletionReason, now: DateTime<Utc>) {
        self.phase = SessionPhase::Completed(reason);
        self.completed_at = Some(now);
    }

    /// Reshuffle and start over with no answers and a full countdown.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) {
        shuffle_questions(&mut self.questions, rng);
        self.current = 0;
        self.answers.iter_mut().for_each(|answer| *answer = None);
        self.phase = SessionPhase::Presenting;
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.reset();
        }
        self.started_at = now;
        self.completed_at = None;
    }

    /// Seconds spent so far, or until completion.
    ///
    /// Timed sessions report the countdown's elapsed time.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        match &self.countdown {
            Some(countdown) => countdown.elapsed(),
            None => elapsed_secs(self.started_at, self.completed_at.unwrap_or(now)),
        }
    }

    /// Summary of the session so far, in presentation order.
    #[must_use]
    pub fn report(&self, now: DateTime<Utc>) -> QuizReport {
        let items = self
            .questions
            .iter()
            .zip(&self.answers)
            .enumerate()
            .map(|(position, (question, submission))| ReportItem {
                position,
                prompt: question.prompt_text().to_string(),
                given_answer: submission
                    .as_ref()
                    .map(|s| s.answer.display_text(question)),
                correct_answer: submission.as_ref().map_or_else(
                    || question.correct_answer().to_string(),
                    |s| s.correct_answer.clone(),
                ),
                is_correct: submission.as_ref().is_some_and(|s| s.is_correct),
            })
            .collect();
        let completion = match self.phase {
            SessionPhase::Completed(reason) => Some(reason),
            _ => None,
        };
        QuizReport::new(
            items,
            completion,
            self.countdown.is_some().then(|| self.elapsed_secs(now)),
        )
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answered_count())
            .field("phase", &self.phase)
            .field("countdown", &self.countdown)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;
    use crate::quiz::template_questions;
    use crate::time::fixed_now;
    use chrono::Duration;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn typed(id: i64, prompt: &str, answer: &str) -> Question {
        Question::typed(QuestionId::new(id), prompt, answer)
    }

    fn ids(session: &QuizSession) -> Vec<i64> {
        session.questions().iter().map(|q| q.id().value()).collect()
    }

    #[test]
    fn empty_session_returns_error() {
        let err = QuizSession::new(Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, SessionError::Empty);
    }

    #[test]
    fn single_choice_question_completes_with_full_score() {
        let question = Question::choice(
            QuestionId::new(1),
            "水",
            "water",
            vec!["water".into(), "fire".into(), "tree".into(), "earth".into()],
        );
        let mut session = QuizSession::new(vec![question], fixed_now()).unwrap();

        assert!(session.submit(Answer::Choice(0)).unwrap().is_correct);
        assert_eq!(session.phase(), SessionPhase::Feedback);
        let phase = session.advance(fixed_now()).unwrap();

        assert_eq!(phase, SessionPhase::Completed(CompletionReason::AllAnswered));
        assert_eq!(session.score(), 1);
        assert_eq!(session.percentage(), 100);
    }

    #[test]
    fn typed_session_reports_wrong_answer_with_correct_one() {
        let mut session = QuizSession::new(
            vec![typed(1, "食べる", "たべる"), typed(2, "飲む", "のむ")],
            fixed_now(),
        )
        .unwrap();

        session.submit(Answer::typed("たべる").unwrap()).unwrap();
        session.advance(fixed_now()).unwrap();
        let second = session.submit(Answer::typed("xyz").unwrap()).unwrap();
        assert!(!second.is_correct);
        session.advance(fixed_now()).unwrap();

        let report = session.report(fixed_now());
        assert_eq!(report.score, 1);
        assert_eq!(report.percentage, 50);
        let item = &report.items[1];
        assert_eq!(item.prompt, "飲む");
        assert_eq!(item.given_answer.as_deref(), Some("xyz"));
        assert_eq!(item.correct_answer, "のむ");
        assert!(!item.is_correct);
    }

    #[test]
    fn completed_session_rejects_further_moves_and_keeps_score() {
        let mut session = QuizSession::new(vec![typed(1, "a", "a")], fixed_now()).unwrap();
        session.submit(Answer::typed("a").unwrap()).unwrap();
        session.advance(fixed_now()).unwrap();

        assert_eq!(session.advance(fixed_now()), Err(SessionError::Completed));
        assert_eq!(
            session.submit(Answer::typed("b").unwrap()).unwrap_err(),
            SessionError::Completed
        );
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn advance_requires_an_answer_and_submit_happens_once() {
        let mut session =
            QuizSession::new(vec![typed(1, "a", "a"), typed(2, "b", "b")], fixed_now()).unwrap();
        assert_eq!(session.advance(fixed_now()), Err(SessionError::Unanswered));
        session.submit(Answer::typed("a").unwrap()).unwrap();
        assert_eq!(
            session.submit(Answer::typed("a").unwrap()).unwrap_err(),
            SessionError::NotPresenting
        );
    }

    #[test]
    fn blank_typed_answer_is_rejected() {
        let mut session = QuizSession::new(vec![typed(1, "a", "a")], fixed_now()).unwrap();
        let err = session.submit(Answer::Typed("  ".into())).unwrap_err();
        assert_eq!(err, SessionError::EmptyAnswer);
        assert_eq!(session.phase(), SessionPhase::Presenting);
    }

    #[test]
    fn countdown_completes_session_regardless_of_position() {
        let mut session = QuizSession::new(template_questions(), fixed_now())
            .unwrap()
            .with_time_limit(60);
        session.submit(Answer::Choice(0)).unwrap();
        session.advance(fixed_now()).unwrap();

        let mut now = fixed_now();
        for _ in 0..59 {
            now += Duration::seconds(1);
            assert!(!session.tick(now));
        }
        assert_eq!(session.countdown().unwrap().format(), "0:01");
        now += Duration::seconds(1);
        assert!(session.tick(now));

        assert_eq!(
            session.phase(),
            SessionPhase::Completed(CompletionReason::TimeUp)
        );
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.completed_at(), Some(now));
        assert!(!session.tick(now));
        assert_eq!(session.report(now).elapsed_secs, Some(60));
    }

    #[test]
    fn previous_redisplays_recorded_answer() {
        let mut session =
            QuizSession::new(vec![typed(1, "a", "a"), typed(2, "b", "b")], fixed_now())
                .unwrap()
                .with_back_navigation(true);
        session.submit(Answer::typed("wrong").unwrap()).unwrap();
        session.advance(fixed_now()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Presenting);

        assert_eq!(session.previous(), Ok(SessionPhase::Feedback));
        assert_eq!(session.current_index(), 0);
        assert_eq!(
            session.current_submission().unwrap().answer,
            Answer::Typed("wrong".into())
        );
        assert_eq!(session.previous(), Err(SessionError::AtFirstQuestion));

        assert_eq!(session.advance(fixed_now()), Ok(SessionPhase::Presenting));
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn previous_is_rejected_without_back_navigation() {
        let mut session =
            QuizSession::new(vec![typed(1, "a", "a"), typed(2, "b", "b")], fixed_now()).unwrap();
        session.submit(Answer::typed("a").unwrap()).unwrap();
        session.advance(fixed_now()).unwrap();
        assert_eq!(session.previous(), Err(SessionError::BackNavigationDisabled));
    }

    #[test]
    fn restart_resets_answers_and_countdown() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = QuizSession::for_game(GameKind::TimedChallenge, template_questions(), fixed_now())
            .unwrap();
        session.submit(Answer::Choice(0)).unwrap();
        session.tick(fixed_now());

        let later = fixed_now() + Duration::minutes(5);
        session.restart(&mut rng, later);

        assert_eq!(session.phase(), SessionPhase::Presenting);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.countdown().unwrap().remaining(), 60);
        assert_eq!(session.started_at(), later);
        let mut sorted = ids(&session);
        sorted.sort_unstable();
        assert_eq!(sorted, vec![-4, -3, -2, -1]);
    }

    #[test]
    fn restart_does_not_always_produce_the_same_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let source: Vec<Question> = (1..=6).map(|i| typed(i, "q", "a")).collect();
        let mut session = QuizSession::new(source, fixed_now()).unwrap();

        let mut orders = std::collections::HashSet::new();
        for _ in 0..50 {
            session.restart(&mut rng, fixed_now());
            orders.insert(ids(&session));
        }
        assert!(orders.len() > 1);
    }

    #[test]
    fn game_profile_configures_session() {
        let jlpt = QuizSession::for_game(GameKind::JlptTest, template_questions(), fixed_now())
            .unwrap();
        assert!(jlpt.allows_back());
        assert_eq!(jlpt.countdown().unwrap().remaining(), 1_200);

        let input = QuizSession::for_game(GameKind::InputTest, template_questions(), fixed_now())
            .unwrap();
        assert!(!input.allows_back());
        assert!(input.countdown().is_none());
    }

    #[test]
    fn untimed_elapsed_uses_wall_clock() {
        let mut session = QuizSession::new(vec![typed(1, "a", "a")], fixed_now()).unwrap();
        session.submit(Answer::typed("a").unwrap()).unwrap();
        let done = fixed_now() + Duration::seconds(42);
        session.advance(done).unwrap();
        assert_eq!(session.elapsed_secs(done + Duration::seconds(100)), 42);
        assert_eq!(session.report(done).elapsed_secs, None);
    }
}
