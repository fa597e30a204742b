//! Debounced search with stale-response discard and persisted history.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use tokio::sync::Mutex;

use super::{ClientError, SearchBackend, SearchRequest};
use crate::search::{
    HistoryStore, SearchHistory, SearchResultItem, item::rank, merge_suggestions,
    suggest::MIN_QUERY_CHARS,
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum SearchOutcome {
    Results {
        request: SearchRequest,
        items: Vec<SearchResultItem>,
    },
    Empty { request: SearchRequest },
    /// The request failed. [`SearchSession::retry`] re-issues it.
    Failed {
        request: SearchRequest,
        error: ClientError,
    },
    /// The query was blank; no request was made.
    Cleared,
    /// A newer search started during the quiet interval; no request was made.
    Superseded,
    /// A newer search started while this one was in flight; its response was dropped.
    Stale,
}

impl SearchOutcome {
    pub fn items(&self) -> &[SearchResultItem] {
        match self {
            SearchOutcome::Results { items, .. } => items,
            _ => &[],
        }
    }
}

pub struct SearchSession<B, S> {
    backend: B,
    history: Mutex<SearchHistory<S>>,
    debounce: Duration,
    generation: AtomicU64,
    last_request: Mutex<Option<SearchRequest>>,
}

impl<B, S> SearchSession<B, S>
where
    B: SearchBackend + Sync,
    S: HistoryStore + Send,
{
    pub fn new(backend: B, history: SearchHistory<S>, debounce: Duration) -> Self {
        Self {
            backend,
            history: Mutex::new(history),
            debounce,
            generation: AtomicU64::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Waits for input to settle, then runs `request`. Every call supersedes the ones before it.
    pub async fn search(&self, request: SearchRequest) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if request.q.trim().is_empty() {
            *self.last_request.lock().await = None;
            return SearchOutcome::Cleared;
        }

        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return SearchOutcome::Superseded;
        }

        self.run(generation, request).await
    }

    pub async fn retry(&self) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let Some(request) = self.last_request.lock().await.clone() else {
            return SearchOutcome::Cleared;
        };
        self.run(generation, request).await
    }

    async fn run(&self, generation: u64, request: SearchRequest) -> SearchOutcome {
        *self.last_request.lock().await = Some(request.clone());
        tracing::debug!(q = %request.q, generation, "search issued");

        let result = self.backend.search(&request).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(q = %request.q, generation, "discarding stale search response");
            return SearchOutcome::Stale;
        }

        match result {
            Ok(payload) => {
                if let Err(err) = self.history.lock().await.record(&request.q).await {
                    tracing::warn!(error = %err, "failed to persist search history");
                }
                let mut items = payload.normalize();
                rank(&mut items, &request.q);
                if items.is_empty() {
                    SearchOutcome::Empty { request }
                } else {
                    SearchOutcome::Results { request, items }
                }
            }
            Err(error) => {
                tracing::warn!(q = %request.q, error = %error, "search failed");
                SearchOutcome::Failed { request, error }
            }
        }
    }

    /// History matches followed by backend suggestions. Short queries only consult history.
    pub async fn suggest(&self, partial: &str) -> Vec<String> {
        let backend = if partial.trim().chars().count() < MIN_QUERY_CHARS {
            Vec::new()
        } else {
            match self.backend.suggestions(partial.trim()).await {
                Ok(suggestions) => suggestions,
                Err(err) => {
                    tracing::warn!(error = %err, "suggestions unavailable");
                    Vec::new()
                }
            }
        };
        let history = self.history.lock().await;
        merge_suggestions(partial, history.entries(), &backend)
    }

    pub async fn history(&self) -> Vec<String> {
        self.history.lock().await.entries().to_vec()
    }

    pub async fn clear_history(&self) -> Result<(), crate::search::history::HistoryError> {
        self.history.lock().await.clear().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::{
        Mutex as StdMutex,
        atomic::{AtomicBool, AtomicUsize},
    };

    use reqwest::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::search::{MemoryHistoryStore, ResultType, SearchPayload};

    #[derive(Default)]
    struct FakeBackend {
        calls: AtomicUsize,
        queries: StdMutex<Vec<String>>,
        failing: AtomicBool,
        suggestion_calls: AtomicUsize,
    }

    fn payload_for(q: &str) -> SearchPayload {
        if q == "nada" {
            return serde_json::from_value(json!([])).unwrap();
        }
        serde_json::from_value(json!({
            "products": [
                { "id": Uuid::new_v4(), "name": format!("{q} auxiliar"), "slug": "aux" },
                { "id": Uuid::new_v4(), "name": q, "slug": "exact" }
            ],
            "total": 2
        }))
        .unwrap()
    }

    impl SearchBackend for FakeBackend {
        async fn search(&self, request: &SearchRequest) -> Result<SearchPayload, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(request.q.clone());
            if request.q == "lento" {
                tokio::time::sleep(Duration::from_millis(500)).await;
            } else {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(ClientError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "boom".into(),
                });
            }
            Ok(payload_for(&request.q))
        }

        async fn suggestions(&self, partial: &str) -> Result<Vec<String>, ClientError> {
            self.suggestion_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![format!("{partial} roble"), format!("{partial} vidrio")])
        }
    }

    async fn session(
        store: MemoryHistoryStore,
    ) -> SearchSession<FakeBackend, MemoryHistoryStore> {
        SearchSession::new(
            FakeBackend::default(),
            SearchHistory::load(store).await,
            DEFAULT_DEBOUNCE,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_input_issues_one_request() {
        let session = session(MemoryHistoryStore::default()).await;

        let (first, second) = tokio::join!(session.search(SearchRequest::new("me")), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            session.search(SearchRequest::new("mesa")).await
        });

        assert!(matches!(first, SearchOutcome::Superseded));
        assert!(matches!(second, SearchOutcome::Results { .. }));
        assert_eq!(session.backend().calls.load(Ordering::SeqCst), 1);
        assert_eq!(*session.backend().queries.lock().unwrap(), vec!["mesa"]);
    }

    #[tokio::test(start_paused = true)]
    async fn results_are_ranked_and_recorded() {
        let store = MemoryHistoryStore::default();
        let session = session(store.clone()).await;

        let outcome = session.search(SearchRequest::new("mesa")).await;
        let titles: Vec<_> = outcome.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["mesa", "mesa auxiliar"]);
        assert!(outcome.items().iter().all(|i| i.kind == ResultType::Product));
        assert_eq!(session.history().await, vec!["mesa"]);
        assert_eq!(store.snapshot().unwrap(), vec!["mesa"]);
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_is_discarded() {
        let session = session(MemoryHistoryStore::default()).await;

        let (slow, fast) = tokio::join!(session.search(SearchRequest::new("lento")), async {
            tokio::time::sleep(DEFAULT_DEBOUNCE + Duration::from_millis(50)).await;
            session.search(SearchRequest::new("rapido")).await
        });

        assert!(matches!(slow, SearchOutcome::Stale));
        assert!(matches!(fast, SearchOutcome::Results { .. }));
        assert_eq!(session.backend().calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.history().await, vec!["rapido"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_then_manual_retry() {
        let session = session(MemoryHistoryStore::default()).await;
        session.backend().failing.store(true, Ordering::SeqCst);

        let outcome = session.search(SearchRequest::new("sofa")).await;
        match outcome {
            SearchOutcome::Failed { request, error } => {
                assert_eq!(request.q, "sofa");
                assert!(matches!(error, ClientError::Status { .. }));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(session.history().await.is_empty());
        assert_eq!(session.backend().calls.load(Ordering::SeqCst), 1);

        session.backend().failing.store(false, Ordering::SeqCst);
        let outcome = session.retry().await;
        assert!(matches!(outcome, SearchOutcome::Results { .. }));
        assert_eq!(session.backend().calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.history().await, vec!["sofa"]);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_query_clears_without_request() {
        let session = session(MemoryHistoryStore::default()).await;
        let outcome = session.search(SearchRequest::new("   ")).await;
        assert!(matches!(outcome, SearchOutcome::Cleared));
        assert!(matches!(session.retry().await, SearchOutcome::Cleared));
        assert_eq!(session.backend().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_is_not_an_error() {
        let session = session(MemoryHistoryStore::default()).await;
        let outcome = session.search(SearchRequest::new("nada")).await;
        assert!(matches!(outcome, SearchOutcome::Empty { .. }));
        assert_eq!(session.history().await, vec!["nada"]);
    }

    #[tokio::test]
    async fn short_queries_skip_backend_suggestions() {
        let store = MemoryHistoryStore::with_entries(vec!["mesa roble".into(), "sofa".into()]);
        let session = session(store).await;

        let suggestions = session.suggest("m").await;
        assert_eq!(suggestions, vec!["mesa roble"]);
        assert_eq!(session.backend().suggestion_calls.load(Ordering::SeqCst), 0);

        let suggestions = session.suggest("mesa").await;
        assert_eq!(suggestions, vec!["mesa roble", "mesa vidrio"]);
        assert_eq!(session.backend().suggestion_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_history_empties_store() {
        let store = MemoryHistoryStore::with_entries(vec!["mesa".into()]);
        let session = session(store.clone()).await;
        session.clear_history().await.unwrap();
        assert!(session.history().await.is_empty());
        assert!(store.snapshot().unwrap().is_empty());
    }
}
