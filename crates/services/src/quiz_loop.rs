use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use study_core::Clock;
use study_core::model::{GameKind, Question, QuizKey};
use study_core::quiz::{QuizSession, SessionError, SessionPhase, Submission};
use study_core::scoring::Answer;

use crate::api::{AnswerVerdict, StudyApi};
use crate::error::QuizError;
use crate::guard::LoadGuard;
use crate::source::{LoadedQuestions, QuestionOrigin, QuestionSource};

/// A session ready to present, plus any notice from the load.
#[derive(Debug)]
pub struct LoadedQuiz {
    pub session: QuizSession,
    pub origin: QuestionOrigin,
    pub notice: Option<String>,
}

/// Result of a guarded load.
#[derive(Debug)]
pub enum LoadOutcome {
    Ready(LoadedQuiz),
    /// A newer load started while this one was in flight.
    Stale,
}

/// How a submitted answer gets its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Local,
    Remote(AnswerVerdict),
}

/// Orchestrates loading, answering and restarting quiz sessions.
#[derive(Clone, Debug)]
pub struct QuizLoopService {
    clock: Clock,
    source: QuestionSource,
    api: Arc<dyn StudyApi>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn StudyApi>) -> Self {
        Self {
            clock,
            source: QuestionSource::new(Arc::clone(&api)),
            api,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: QuestionSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Load questions for `key` and start a session, unless a newer load
    /// started on `guard` in the meantime.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Load` when the game surfaces fetch failures.
    pub async fn start(
        &self,
        guard: &LoadGuard,
        game: GameKind,
        key: &QuizKey,
    ) -> Result<LoadOutcome, QuizError> {
        let generation = guard.begin();
        let loaded = self.source.load(game, key).await;
        if !guard.is_current(generation) {
            debug!(%key, game = game.slug(), "dropping stale question load");
            return Ok(LoadOutcome::Stale);
        }
        let LoadedQuestions {
            questions,
            origin,
            notice,
        } = loaded?;
        let session = QuizSession::for_game(game, questions, self.clock.now())?;
        info!(%key, game = game.slug(), total = session.total(), "quiz session started");
        Ok(LoadOutcome::Ready(LoadedQuiz {
            session,
            origin,
            notice,
        }))
    }

    /// Work out the verdict for `answer` on `question`.
    ///
    /// Games with remote scoring ask the server about typed answers to
    /// stored questions; everything else is scored locally.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Session` for a blank typed answer and
    /// `QuizError::Submit` when the remote scorer fails.
    pub async fn verdict(
        &self,
        game: GameKind,
        question: &Question,
        answer: &Answer,
    ) -> Result<Verdict, QuizError> {
        let Answer::Typed(text) = answer else {
            return Ok(Verdict::Local);
        };
        if text.trim().is_empty() {
            return Err(SessionError::EmptyAnswer.into());
        }
        if !game.profile().remote_scoring || question.id().is_template() {
            return Ok(Verdict::Local);
        }
        let verdict = self.api.submit_answer(question.id(), text).await?;
        debug!(question = %question.id(), is_correct = verdict.is_correct, "remote verdict");
        Ok(Verdict::Remote(verdict))
    }

    /// Record `answer` on the session's current question using `verdict`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session is not awaiting an answer.
    pub fn record(
        session: &mut QuizSession,
        answer: Answer,
        verdict: Verdict,
    ) -> Result<Submission, SessionError> {
        let submission = match verdict {
            Verdict::Local => session.submit(answer)?,
            Verdict::Remote(remote) => {
                session.submit_with_verdict(answer, remote.is_correct, remote.correct_answer)?
            }
        };
        Ok(submission.clone())
    }

    /// Score and record `answer` on the current question.
    ///
    /// # Errors
    ///
    /// See [`QuizLoopService::verdict`] and [`QuizLoopService::record`].
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        game: GameKind,
        answer: Answer,
    ) -> Result<Submission, QuizError> {
        if session.phase() != SessionPhase::Presenting {
            return Err(match session.phase() {
                SessionPhase::Completed(_) => SessionError::Completed,
                _ => SessionError::NotPresenting,
            }
            .into());
        }
        let question = session.current_question().clone();
        let verdict = self.verdict(game, &question, &answer).await?;
        Ok(Self::record(session, answer, verdict)?)
    }

    /// # Errors
    ///
    /// Returns `SessionError` if the current question is unanswered or the
    /// session already completed.
    pub fn advance(&self, session: &mut QuizSession) -> Result<SessionPhase, SessionError> {
        session.advance(self.clock.now())
    }

    /// One countdown tick. Returns `true` when time ran out on this tick.
    pub fn tick(&self, session: &mut QuizSession) -> bool {
        let expired = session.tick(self.clock.now());
        if expired {
            info!(total = session.total(), score = session.score(), "time is up");
        }
        expired
    }

    /// Reshuffle the session's questions and start over.
    pub fn restart(&self, session: &mut QuizSession) {
        let now = self.clock.now();
        self.source.with_rng(|rng| session.restart(rng, now));
        debug!(total = session.total(), "quiz session restarted");
    }
}
