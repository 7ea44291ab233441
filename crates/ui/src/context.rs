use std::sync::Arc;

use services::{ChapterCatalog, QuizLoopService, ResultsExporter, SearchService};

/// Services the views need, supplied by the composition root.
pub trait UiApp: Send + Sync {
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn search(&self) -> SearchService;
    fn catalog(&self) -> ChapterCatalog;
    fn exporter(&self) -> Arc<ResultsExporter>;
}

#[derive(Clone)]
pub struct AppContext {
    quiz_loop: Arc<QuizLoopService>,
    search: SearchService,
    catalog: ChapterCatalog,
    exporter: Arc<ResultsExporter>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_loop: app.quiz_loop(),
            search: app.search(),
            catalog: app.catalog(),
            exporter: app.exporter(),
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
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
