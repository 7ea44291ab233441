mod chapter;
mod game;
mod ids;
mod question;
mod record;

pub use chapter::{Chapter, JlptLevel, KeyError, QuestionType, QuizKey};
pub use game::{
    AnswerStyle, FailurePolicy, GameKind, GameProfile, QuestionFeed, QuestionShape, UnknownGame,
};
pub use ids::{ChapterId, QuestionId};
pub use question::{Question, QuestionError, QuestionMode, option_letter};
pub use record::{GrammarRecord, NoteRecord, StudyRecord, VocabularyRecord};
