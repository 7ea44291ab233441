use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use study_core::model::StudyRecord;

use crate::api::{SearchKind, StudyApi};

/// Quiet period before a keystroke turns into a search.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Records matching one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub query: String,
    pub records: Vec<StudyRecord>,
}

impl SearchResults {
    #[must_use]
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            records: Vec::new(),
        }
    }

    /// Whether these results still answer the text currently in the box.
    #[must_use]
    pub fn matches_input(&self, input: &str) -> bool {
        self.query == input.trim()
    }
}

/// Searches vocabularies, grammar patterns and notes at once.
#[derive(Clone)]
pub struct SearchService {
    api: Arc<dyn StudyApi>,
}

impl SearchService {
    #[must_use]
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self { api }
    }

    /// Query every collection concurrently. A failing collection contributes
    /// no results.
    pub async fn search(&self, query: &str) -> SearchResults {
        let query = query.trim();
        if query.is_empty() {
            return SearchResults::empty(query);
        }
        let (vocabulary, grammar, notes) = tokio::join!(
            self.collection(SearchKind::Vocabulary, query),
            self.collection(SearchKind::Grammar, query),
            self.collection(SearchKind::Notes, query),
        );
        let mut records = vocabulary;
        records.extend(grammar);
        records.extend(notes);
        debug!(query = %query, count = records.len(), "search finished");
        SearchResults {
            query: query.to_string(),
            records,
        }
    }

    async fn collection(&self, kind: SearchKind, query: &str) -> Vec<StudyRecord> {
        match self.api.search(kind, query).await {
            Ok(records) => records,
            Err(err) => {
                warn!(?kind, error = %err, "search endpoint failed");
                Vec::new()
            }
        }
    }
}

/// Debounces keystrokes into searches.
///
/// Each `schedule` replaces the pending timer. Searches that already started
/// run to completion and deliver their results; callers drop results whose
/// query no longer matches the input.
pub struct SearchDebouncer {
    service: SearchService,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    results_tx: mpsc::UnboundedSender<SearchResults>,
    results_rx: AsyncMutex<mpsc::UnboundedReceiver<SearchResults>>,
}

impl SearchDebouncer {
    #[must_use]
    pub fn new(service: SearchService) -> Self {
        Self::with_delay(service, SEARCH_DEBOUNCE)
    }

    #[must_use]
    pub fn with_delay(service: SearchService, delay: Duration) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            service,
            delay,
            pending: Mutex::new(None),
            results_tx,
            results_rx: AsyncMutex::new(results_rx),
        }
    }

    /// Schedule a search for `input` after the quiet period.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, input: &str) {
        let query = input.trim().to_string();
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        if query.is_empty() {
            let _ = self.results_tx.send(SearchResults::empty(query));
            return;
        }

        let service = self.service.clone();
        let tx = self.results_tx.clone();
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(query = %query, "debounce elapsed, searching");
            // Detached so a later keystroke cannot cancel a running request.
            tokio::spawn(async move {
                let results = service.search(&query).await;
                let _ = tx.send(results);
            });
        }));
    }

    /// Wait for the next delivered result set.
    pub async fn next_results(&self) -> Option<SearchResults> {
        self.results_rx.lock().await.recv().await
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Endpoint, InMemoryStudyApi};
    use study_core::model::{ChapterId, NoteRecord, VocabularyRecord};

    fn api() -> InMemoryStudyApi {
        InMemoryStudyApi::new()
            .with_vocabularies(
                ChapterId::new(1),
                vec![VocabularyRecord {
                    id: 1,
                    word: "食べる".into(),
                    meaning: "to eat".into(),
                    example: None,
                }],
            )
            .with_notes(vec![NoteRecord {
                id: 2,
                title: Some("Eating verbs".into()),
                content: "食べる and 飲む".into(),
            }])
    }

    fn debouncer(api: &InMemoryStudyApi) -> SearchDebouncer {
        SearchDebouncer::new(SearchService::new(Arc::new(api.clone())))
    }

    #[tokio::test]
    async fn failing_collection_contributes_nothing() {
        let api = api().failing(Endpoint::Search(SearchKind::Vocabulary));
        let results = SearchService::new(Arc::new(api)).search(" eat ").await;
        assert_eq!(results.query, "eat");
        assert_eq!(results.records.len(), 1);
        assert_eq!(results.records[0].kind_label(), "Note");
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_search_only_the_last_input() {
        let api = api();
        let debouncer = debouncer(&api);

        debouncer.schedule("e");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule("ea");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule("eat");

        let results = debouncer.next_results().await.unwrap();
        assert_eq!(results.query, "eat");
        assert_eq!(results.records.len(), 2);
        assert_eq!(api.search_queries(), vec!["eat", "eat", "eat"]);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_search_is_not_cancelled() {
        let api = api().with_delay(Duration::from_millis(500));
        let debouncer = debouncer(&api);

        debouncer.schedule("eat");
        tokio::time::sleep(Duration::from_millis(350)).await;
        debouncer.schedule("verbs");

        let first = debouncer.next_results().await.unwrap();
        let second = debouncer.next_results().await.unwrap();
        assert_eq!(first.query, "eat");
        assert_eq!(second.query, "verbs");
        assert!(!first.matches_input("verbs"));
        assert!(second.matches_input(" verbs "));
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_the_input_delivers_empty_results_immediately() {
        let api = api();
        let debouncer = debouncer(&api);
        debouncer.schedule("eat");
        debouncer.schedule("   ");

        let results = debouncer.next_results().await.unwrap();
        assert_eq!(results, SearchResults::empty(""));
        assert!(api.search_queries().is_empty());
    }
}
