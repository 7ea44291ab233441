use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Question, QuestionType};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown game: {0}")]
pub struct UnknownGame(pub String);

/// The quiz games built on the session engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Flashcards,
    TimedChallenge,
    InputTest,
    MixedTest,
    JlptTest,
}

/// Where a game gets its questions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionFeed {
    /// Vocabulary or grammar records of the resolved chapter.
    ChapterRecords,
    /// The input-test question endpoint.
    InputTest,
    /// Input-test and JLPT-test endpoints, concatenated.
    InputAndJlpt,
}

/// Which question shapes a game keeps after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionShape {
    Any,
    TypedOnly,
    ChoiceOnly,
}

/// How the learner commits an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStyle {
    /// Pick an option or type, then press Submit.
    Submit,
    /// Picking an option submits it immediately.
    SubmitOnSelect,
    /// Reveal the back of the card and self-grade.
    Recall,
}

/// What a game does when its question fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Replace the failed set with the template questions and show a notice.
    FallbackToTemplates,
    /// Block the session with an error and a "go back" action.
    Surface,
}

/// Static behavior of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameProfile {
    pub feed: QuestionFeed,
    pub shape: QuestionShape,
    pub answer_style: AnswerStyle,
    pub failure_policy: FailurePolicy,
    pub card_limit: Option<usize>,
    pub time_limit_secs: Option<u32>,
    pub auto_advance: Option<Duration>,
    pub allow_back: bool,
    pub remote_scoring: bool,
    pub forced_question_type: Option<QuestionType>,
}

const FLASHCARDS: GameProfile = GameProfile {
    feed: QuestionFeed::ChapterRecords,
    shape: QuestionShape::TypedOnly,
    answer_style: AnswerStyle::Recall,
    failure_policy: FailurePolicy::FallbackToTemplates,
    card_limit: Some(10),
    time_limit_secs: None,
    auto_advance: Some(Duration::from_millis(1_000)),
    allow_back: false,
    remote_scoring: false,
    forced_question_type: None,
};

const TIMED_CHALLENGE: GameProfile = GameProfile {
    feed: QuestionFeed::InputTest,
    shape: QuestionShape::ChoiceOnly,
    answer_style: AnswerStyle::SubmitOnSelect,
    failure_policy: FailurePolicy::FallbackToTemplates,
    card_limit: None,
    time_limit_secs: Some(60),
    auto_advance: Some(Duration::from_millis(1_500)),
    allow_back: false,
    remote_scoring: false,
    forced_question_type: None,
};

const INPUT_TEST: GameProfile = GameProfile {
    feed: QuestionFeed::InputTest,
    shape: QuestionShape::TypedOnly,
    answer_style: AnswerStyle::Submit,
    failure_policy: FailurePolicy::FallbackToTemplates,
    card_limit: None,
    time_limit_secs: None,
    auto_advance: None,
    allow_back: false,
    remote_scoring: true,
    forced_question_type: None,
};

const MIXED_TEST: GameProfile = GameProfile {
    feed: QuestionFeed::InputAndJlpt,
    shape: QuestionShape::Any,
    answer_style: AnswerStyle::Submit,
    failure_policy: FailurePolicy::Surface,
    card_limit: None,
    time_limit_secs: None,
    auto_advance: None,
    allow_back: true,
    remote_scoring: false,
    forced_question_type: None,
};

const JLPT_TEST: GameProfile = GameProfile {
    feed: QuestionFeed::InputTest,
    shape: QuestionShape::ChoiceOnly,
    answer_style: AnswerStyle::Submit,
    failure_policy: FailurePolicy::Surface,
    card_limit: None,
    time_limit_secs: Some(20 * 60),
    auto_advance: None,
    allow_back: true,
    remote_scoring: false,
    forced_question_type: Some(QuestionType::Jlpt),
};

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Flashcards,
        GameKind::TimedChallenge,
        GameKind::InputTest,
        GameKind::MixedTest,
        GameKind::JlptTest,
    ];

    #[must_use]
    pub const fn profile(self) -> GameProfile {
        match self {
            Self::Flashcards => FLASHCARDS,
            Self::TimedChallenge => TIMED_CHALLENGE,
            Self::InputTest => INPUT_TEST,
            Self::MixedTest => MIXED_TEST,
            Self::JlptTest => JLPT_TEST,
        }
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::TimedChallenge => "timed-challenge",
            Self::InputTest => "input-test",
            Self::MixedTest => "mixed-test",
            Self::JlptTest => "jlpt-test",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flashcards => "Flashcards",
            Self::TimedChallenge => "Timed Challenge",
            Self::InputTest => "Input Test",
            Self::MixedTest => "Mixed Test",
            Self::JlptTest => "JLPT-Style Test",
        }
    }

    /// Question type actually requested for a user-selected type.
    #[must_use]
    pub fn effective_question_type(self, selected: QuestionType) -> QuestionType {
        self.profile().forced_question_type.unwrap_or(selected)
    }

    /// Apply this game's shape filter to a loaded question.
    ///
    /// Typed-only games strip options; choice-only games drop typed questions.
    #[must_use]
    pub fn shape_question(self, question: Question) -> Option<Question> {
        match self.profile().shape {
            QuestionShape::Any => Some(question),
            QuestionShape::TypedOnly => Some(question.into_typed()),
            QuestionShape::ChoiceOnly => question.is_choice().then_some(question),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|game| game.slug() == s.trim())
            .ok_or_else(|| UnknownGame(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    #[test]
    fn slugs_round_trip() {
        for game in GameKind::ALL {
            assert_eq!(game.slug().parse::<GameKind>().unwrap(), game);
        }
        assert!("speed-run".parse::<GameKind>().is_err());
    }

    #[test]
    fn jlpt_test_forces_jlpt_questions() {
        assert_eq!(
            GameKind::JlptTest.effective_question_type(QuestionType::Kanji),
            QuestionType::Jlpt
        );
        assert_eq!(
            GameKind::InputTest.effective_question_type(QuestionType::Kanji),
            QuestionType::Kanji
        );
    }

    #[test]
    fn shapes_filter_questions() {
        let choice = Question::choice(
            QuestionId::new(1),
            "水",
            "water",
            vec!["water".into(), "fire".into()],
        );
        let typed = Question::typed(QuestionId::new(2), "水", "みず");

        let stripped = GameKind::InputTest.shape_question(choice.clone()).unwrap();
        assert!(!stripped.is_choice());
        assert!(GameKind::JlptTest.shape_question(typed.clone()).is_none());
        assert!(GameKind::MixedTest.shape_question(typed).is_some());
        assert!(GameKind::TimedChallenge.shape_question(choice).is_some());
    }

    #[test]
    fn timed_games_have_limits() {
        assert_eq!(GameKind::TimedChallenge.profile().time_limit_secs, Some(60));
        assert_eq!(GameKind::JlptTest.profile().time_limit_secs, Some(1_200));
        assert_eq!(GameKind::InputTest.profile().time_limit_secs, None);
        assert_eq!(GameKind::Flashcards.profile().card_limit, Some(10));
    }
}
