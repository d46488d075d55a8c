//! Shared handler state.

use std::sync::Arc;

use gnotes_core::{
    ActionTracker, AiUsageLog, CompletionBackend, EmbeddingBackend, NoteStore, NotesWorkspace,
};
use gnotes_inference::{Assistant, RetryPolicy};
use gnotes_search::{SearchConfig, SemanticSearch};

use crate::services::AnalyticsCache;

#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<NotesWorkspace>,
    pub assistant: Arc<Assistant>,
    pub search: Arc<SemanticSearch>,
    pub tracker: Arc<ActionTracker>,
    pub usage_log: Arc<dyn AiUsageLog>,
    pub analytics_cache: AnalyticsCache,
}

/// Collaborators [`AppState`] is built from.
pub struct Backends {
    pub store: Arc<dyn NoteStore>,
    pub usage_log: Arc<dyn AiUsageLog>,
    pub completion: Arc<dyn CompletionBackend>,
    pub embedder: Arc<dyn EmbeddingBackend>,
}

impl AppState {
    pub fn new(backends: Backends) -> Self {
        Self::with_options(
            backends,
            SearchConfig::default(),
            RetryPolicy::default(),
            AnalyticsCache::disabled(),
        )
    }

    pub fn with_options(
        backends: Backends,
        search: SearchConfig,
        retry: RetryPolicy,
        analytics_cache: AnalyticsCache,
    ) -> Self {
        let Backends {
            store,
            usage_log,
            completion,
            embedder,
        } = backends;

        Self {
            workspace: Arc::new(NotesWorkspace::new(store.clone()).with_embedder(embedder.clone())),
            assistant: Arc::new(Assistant::new(completion, usage_log.clone()).with_retry(retry)),
            search: Arc::new(SemanticSearch::new(store, embedder).with_config(search)),
            tracker: Arc::new(ActionTracker::new()),
            usage_log,
            analytics_cache,
        }
    }

    pub fn store(&self) -> &Arc<dyn NoteStore> {
        self.workspace.store()
    }
}
