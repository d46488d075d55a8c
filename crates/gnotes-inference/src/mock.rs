//! Mock backends for deterministic testing.
//!
//! ```rust,ignore
//! use gnotes_inference::mock::{MockCompletion, MockEmbedder};
//!
//! let completion = MockCompletion::new().with_response("A generated title");
//! let embedder = MockEmbedder::new().with_dimension(64);
//! ```

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use gnotes_core::{
    normalize_for_embedding, ChatMessage, CompletionBackend, EmbeddingBackend, Error,
    GenerationParams, Result, Vector,
};

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// A recorded completion call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub messages: Vec<ChatMessage>,
    pub params: GenerationParams,
}

/// Completion backend that replays scripted outcomes.
///
/// Scripted outcomes are consumed in order; once exhausted every call
/// returns the default response.
#[derive(Clone)]
pub struct MockCompletion {
    default_response: String,
    latency: Option<Duration>,
    script: Arc<Mutex<VecDeque<Result<String>>>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            default_response: "Mock response".to_string(),
            latency: None,
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Response returned once the script is exhausted.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Sleep this long before answering each call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a one-off outcome.
    pub fn then(self, outcome: Result<String>) -> Self {
        lock(&self.script).push_back(outcome);
        self
    }

    /// Queue a one-off failure.
    pub fn then_fail(self, error: Error) -> Self {
        self.then(Err(error))
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.call_log).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.call_log).len()
    }
}

#[async_trait]
impl CompletionBackend for MockCompletion {
    async fn complete(&self, messages: &[ChatMessage], params: GenerationParams) -> Result<String> {
        lock(&self.call_log).push(MockCall {
            messages: messages.to_vec(),
            params,
        });
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let next = lock(&self.script).pop_front();
        match next {
            Some(outcome) => outcome.map(|s| s.trim().to_string()),
            None => Ok(self.default_response.trim().to_string()),
        }
    }

    fn model_name(&self) -> &str {
        "mock-chat"
    }
}

/// Deterministic bag-of-words embedder.
///
/// Each normalized word is hashed into one of `dimension` buckets, so texts
/// sharing words have a positive cosine similarity and identical texts have
/// similarity 1.
#[derive(Clone)]
pub struct MockEmbedder {
    dimension: usize,
    failure: Arc<Mutex<Option<String>>>,
    call_log: Arc<Mutex<Vec<String>>>,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            dimension: 64,
            failure: Arc::new(Mutex::new(None)),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension.max(1);
        self
    }

    /// Fail every call with a network error until cleared with `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        *lock(&self.failure) = message.map(str::to_string);
    }

    /// Every text embedded so far.
    pub fn inputs(&self) -> Vec<String> {
        lock(&self.call_log).clone()
    }

    /// The vector this embedder produces for `text`.
    pub fn vector_for(&self, text: &str) -> Vector {
        let mut v = vec![0.0f32; self.dimension];
        for word in normalize_for_embedding(text).split(' ').filter(|w| !w.is_empty()) {
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            word.hash(&mut hasher);
            v[(hasher.finish() % self.dimension as u64) as usize] += 1.0;
        }
        Vector::from(v)
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbedder {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if let Some(message) = lock(&self.failure).clone() {
            return Err(Error::Request(message));
        }
        lock(&self.call_log).extend(texts.iter().cloned());
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embed"
    }
}
