#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod guard;
pub mod import;
pub mod quiz_loop;
pub mod search;
pub mod source;

pub use study_core::Clock;

pub use api::{
    AnswerVerdict, HttpStudyApi, ImportRequest, ImportSummary, ImportedQuestion, InMemoryStudyApi,
    SearchKind, StudyApi,
};
pub use app_services::AppServices;
pub use catalog::{ChapterCatalog, ChapterContents, books};
pub use config::StudyApiConfig;
pub use error::{ApiError, ConfigError, ExportError, ImportError, QuizError, SourceError};
pub use export::{ExportedResults, ResultsExporter};
pub use guard::{Generation, LoadGuard};
pub use import::{ImportDocument, ImportTarget, QuestionImporter, template_file_name};
pub use quiz_loop::{LoadOutcome, LoadedQuiz, QuizLoopService, Verdict};
pub use search::{SEARCH_DEBOUNCE, SearchDebouncer, SearchResults, SearchService};
pub use source::{FallbackReason, QuestionOrigin, QuestionSource};
