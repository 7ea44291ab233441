//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use study_core::quiz::SessionError;

/// Errors emitted by `StudyApi` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted while fetching questions for a quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("could not look up the chapter: {0}")]
    ChapterLookup(#[source] ApiError),
    #[error("could not fetch questions: {0}")]
    Fetch(#[source] ApiError),
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Load(#[from] SourceError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("could not submit answer: {0}")]
    Submit(#[from] ApiError),
}

/// Errors emitted by `ResultsExporter`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Errors emitted by `QuestionImporter`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid question file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no {0} questions found in the file")]
    NoQuestions(study_core::model::QuestionType),
    #[error("missing {0}: pass it on the command line or set it in the file")]
    MissingField(&'static str),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid api base url {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api base url must use http or https, got {0:?}")]
    UnsupportedScheme(String),
    #[error("invalid http timeout {0:?}: expected whole seconds")]
    InvalidTimeout(String),
}
