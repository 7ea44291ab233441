use std::fmt;
use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use study_core::model::{
    FailurePolicy, GameKind, Question, QuestionFeed, QuestionType, QuizKey, StudyRecord,
};
use study_core::quiz::{prepare_questions, template_questions};

use crate::api::StudyApi;
use crate::error::SourceError;

/// Why the template set replaced the remote questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    Empty,
    FetchFailed,
}

/// Where a loaded question list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrigin {
    Remote,
    Templates(FallbackReason),
}

/// Questions ready to start a session with.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedQuestions {
    pub questions: Vec<Question>,
    pub origin: QuestionOrigin,
    /// Non-blocking message for the learner, set when templates were used.
    pub notice: Option<String>,
}

/// Fetches, shapes and shuffles the questions for one game.
#[derive(Clone)]
pub struct QuestionSource {
    api: Arc<dyn StudyApi>,
    rng: Arc<Mutex<StdRng>>,
}

impl QuestionSource {
    #[must_use]
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self {
            api,
            rng: Arc::new(Mutex::new(StdRng::from_os_rng())),
        }
    }

    /// Use a seeded shuffle so tests see a stable order.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    /// Run `f` with the shared shuffle rng.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        match self.rng.lock() {
            Ok(mut rng) => f(&mut rng),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    /// Load the questions for `game` and `key`.
    ///
    /// An empty result always falls back to the templates. A failed fetch
    /// falls back too, unless the game surfaces failures.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` when the fetch fails and the game's failure
    /// policy is `Surface`.
    pub async fn load(&self, game: GameKind, key: &QuizKey) -> Result<LoadedQuestions, SourceError> {
        let profile = game.profile();
        let key = key.with_question_type(game.effective_question_type(key.question_type));

        let (raw, origin, notice) = match self.fetch(profile.feed, &key).await {
            Ok(raw) => {
                let shaped = shape(game, raw);
                if shaped.is_empty() {
                    info!(%key, game = game.slug(), "no questions found, using templates");
                    (
                        shape(game, template_questions()),
                        QuestionOrigin::Templates(FallbackReason::Empty),
                        Some(format!(
                            "No questions found for {key}. Showing practice questions instead."
                        )),
                    )
                } else {
                    info!(%key, game = game.slug(), count = shaped.len(), "questions loaded");
                    (shaped, QuestionOrigin::Remote, None)
                }
            }
            Err(err) => match profile.failure_policy {
                FailurePolicy::Surface => {
                    warn!(%key, game = game.slug(), error = %err, "question load failed");
                    return Err(err);
                }
                FailurePolicy::FallbackToTemplates => {
                    warn!(%key, game = game.slug(), error = %err, "question load failed, using templates");
                    (
                        shape(game, template_questions()),
                        QuestionOrigin::Templates(FallbackReason::FetchFailed),
                        Some(format!("{err}. Showing practice questions instead.")),
                    )
                }
            },
        };

        let questions = self.with_rng(|rng| prepare_questions(raw, profile.card_limit, rng));
        Ok(LoadedQuestions {
            questions,
            origin,
            notice,
        })
    }

    async fn fetch(&self, feed: QuestionFeed, key: &QuizKey) -> Result<Vec<Question>, SourceError> {
        match feed {
            QuestionFeed::InputTest => self
                .api
                .input_test_questions(key)
                .await
                .map_err(SourceError::Fetch),
            QuestionFeed::InputAndJlpt => {
                let (mut input, jlpt) = tokio::try_join!(
                    self.api.input_test_questions(key),
                    self.api.jlpt_test_questions(key),
                )
                .map_err(SourceError::Fetch)?;
                input.extend(jlpt);
                Ok(input)
            }
            QuestionFeed::ChapterRecords => self.fetch_flashcards(key).await,
        }
    }

    async fn fetch_flashcards(&self, key: &QuizKey) -> Result<Vec<Question>, SourceError> {
        let Some(chapter) = self
            .api
            .find_chapter(&key.book_name, key.chapter_number)
            .await
            .map_err(SourceError::ChapterLookup)?
        else {
            return Ok(Vec::new());
        };

        let records: Vec<StudyRecord> = match key.question_type {
            QuestionType::Grammar => self
                .api
                .grammar_patterns(chapter.id)
                .await
                .map_err(SourceError::Fetch)?
                .into_iter()
                .map(StudyRecord::Grammar)
                .collect(),
            _ => self
                .api
                .vocabularies(chapter.id)
                .await
                .map_err(SourceError::Fetch)?
                .into_iter()
                .map(StudyRecord::Vocabulary)
                .collect(),
        };
        Ok(records.iter().filter_map(StudyRecord::to_flashcard).collect())
    }
}

impl fmt::Debug for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionSource").finish_non_exhaustive()
    }
}

/// Apply the game's shape filter and report malformed choice questions.
fn shape(game: GameKind, questions: Vec<Question>) -> Vec<Question> {
    questions
        .into_iter()
        .filter_map(|q| game.shape_question(q))
        .inspect(|q| {
            if let Err(err) = q.validate() {
                warn!(error = %err, "malformed question will never score");
            }
        })
        .collect()
}
