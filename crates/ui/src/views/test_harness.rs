use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    AppServices, ChapterCatalog, Clock, InMemoryStudyApi, QuizLoopService, ResultsExporter,
    SearchService, StudyApiConfig,
};
use study_core::model::{GameKind, QuizKey};
use study_core::time::fixed_now;
use tempfile::TempDir;

use crate::context::{UiApp, build_app_context};
use crate::views::{ChapterView, HomeView, QuizView, SearchView};

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn search(&self) -> SearchService {
        self.services.search()
    }

    fn catalog(&self) -> ChapterCatalog {
        self.services.catalog()
    }

    fn exporter(&self) -> Arc<ResultsExporter> {
        self.services.exporter()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Chapter { book: String, chapter: u32 },
    Quiz { game: GameKind, key: QuizKey },
    Search,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Chapter { book, chapter } => rsx! { ChapterView { book, chapter } },
        ViewKind::Quiz { game, key } => rsx! {
            QuizView {
                game,
                book: key.book_name.clone(),
                chapter: key.chapter_number,
                question_type: key.question_type,
            }
        },
        ViewKind::Search => rsx! { SearchView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub api: InMemoryStudyApi,
    pub _export_dir: TempDir,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until `needle` shows up in the rendered HTML or the attempts run out.
    pub async fn drive_until(&mut self, needle: &str) -> String {
        for _ in 0..20 {
            let html = self.render();
            if html.contains(needle) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, api: InMemoryStudyApi) -> ViewHarness {
    let export_dir = tempfile::tempdir().expect("tempdir");
    let config = StudyApiConfig::from_lookup(|_| None)
        .expect("default config")
        .with_export_dir(export_dir.path());
    let services = AppServices::in_memory(api.clone(), &config, Clock::fixed(fixed_now()));
    let app = Arc::new(TestApp { services });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        api,
        _export_dir: export_dir,
    }
}
