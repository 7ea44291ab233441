use std::sync::Arc;

use crate::Clock;
use crate::api::{HttpStudyApi, InMemoryStudyApi, StudyApi};
use crate::catalog::ChapterCatalog;
use crate::config::StudyApiConfig;
use crate::error::ApiError;
use crate::export::ResultsExporter;
use crate::import::QuestionImporter;
use crate::quiz_loop::QuizLoopService;
use crate::search::SearchService;

/// Assembles app-facing services around one `StudyApi`.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    search: SearchService,
    catalog: ChapterCatalog,
    exporter: Arc<ResultsExporter>,
    importer: QuestionImporter,
}

impl AppServices {
    /// Build services talking to the HTTP study API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the HTTP client cannot be built.
    pub fn from_config(config: &StudyApiConfig, clock: Clock) -> Result<Self, ApiError> {
        let api: Arc<dyn StudyApi> = Arc::new(HttpStudyApi::new(config)?);
        Ok(Self::with_api(api, config, clock))
    }

    /// Build services backed by an in-process API.
    #[must_use]
    pub fn in_memory(api: InMemoryStudyApi, config: &StudyApiConfig, clock: Clock) -> Self {
        Self::with_api(Arc::new(api), config, clock)
    }

    #[must_use]
    pub fn with_api(api: Arc<dyn StudyApi>, config: &StudyApiConfig, clock: Clock) -> Self {
        Self {
            quiz_loop: Arc::new(QuizLoopService::new(clock, Arc::clone(&api))),
            search: SearchService::new(Arc::clone(&api)),
            catalog: ChapterCatalog::new(Arc::clone(&api)),
            exporter: Arc::new(ResultsExporter::new(config.export_dir.clone(), clock)),
            importer: QuestionImporter::new(api),
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn search(&self) -> SearchService {
        self.search.clone()
    }

    #[must_use]
    pub fn catalog(&self) -> ChapterCatalog {
        self.catalog.clone()
    }

    #[must_use]
    pub fn exporter(&self) -> Arc<ResultsExporter> {
        Arc::clone(&self.exporter)
    }

    #[must_use]
    pub fn importer(&self) -> QuestionImporter {
        self.importer.clone()
    }
}
