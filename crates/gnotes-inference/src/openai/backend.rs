//! OpenAI-compatible backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use gnotes_core::{
    ChatMessage, CompletionBackend, EmbeddingBackend, Error, GenerationParams, Result, Vector,
};

use super::error::{to_core_error, Endpoint};
use super::types::*;

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Default embedding model.
pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-ada-002";

/// Embedding dimension of text-embedding-ada-002.
pub const DEFAULT_DIMENSION: usize = 1536;

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model used for chat completions.
    pub chat_model: String,
    /// Model used for embeddings.
    pub embed_model: String,
    /// Expected embedding dimension.
    pub embed_dimension: usize,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: String::new(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            embed_dimension: DEFAULT_DIMENSION,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OpenAIConfig {
    /// Read configuration from the environment.
    ///
    /// `OPENAI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("OPENAI_API_KEY is not set".to_string()))?;

        Ok(Self {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            api_key,
            chat_model: std::env::var("OPENAI_CHAT_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            embed_model: std::env::var("OPENAI_EMBED_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBED_MODEL.to_string()),
            embed_dimension: std::env::var("OPENAI_EMBED_DIM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DIMENSION),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// OpenAI-compatible completion and embedding backend.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            op = "init",
            base_url = %config.base_url,
            chat_model = %config.chat_model,
            embed_model = %config.embed_model,
            "Initializing OpenAI backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env()?)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build an authenticated POST request.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        self.client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }

    /// Send a JSON request and decode a success body.
    async fn post_json<B, R>(&self, endpoint: &str, kind: Endpoint, body: &B) -> Result<R>
    where
        B: serde::Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.build_request(endpoint).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(to_core_error(kind, status.as_u16(), &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::MalformedResponse(format!("unexpected response body: {}", e)))
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAIBackend {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let start = Instant::now();

        let request = EmbeddingRequest {
            model: self.config.embed_model.clone(),
            input: texts.to_vec(),
        };
        let result: EmbeddingResponse = self
            .post_json("/embeddings", Endpoint::Embedding, &request)
            .await?;

        if result.data.len() != texts.len() {
            return Err(Error::MalformedResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                result.data.len()
            )));
        }

        if let Some(bad) = result
            .data
            .iter()
            .find(|d| d.embedding.len() != self.config.embed_dimension)
        {
            return Err(Error::MalformedResponse(format!(
                "expected {}-dimensional embeddings, got {}",
                self.config.embed_dimension,
                bad.embedding.len()
            )));
        }

        // Sort by index to ensure correct ordering
        let mut data = result.data;
        data.sort_by_key(|d| d.index);
        let vectors: Vec<Vector> = data
            .into_iter()
            .map(|d| Vector::from(d.embedding))
            .collect();

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "embed_texts",
            model = %self.config.embed_model,
            result_count = vectors.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Embeddings generated"
        );
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.config.embed_dimension
    }

    fn model_name(&self) -> &str {
        &self.config.embed_model
    }
}

#[async_trait]
impl CompletionBackend for OpenAIBackend {
    async fn complete(&self, messages: &[ChatMessage], params: GenerationParams) -> Result<String> {
        let start = Instant::now();
        let prompt_len: usize = messages.iter().map(|m| m.content.len()).sum();

        let request = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };
        let result: ChatCompletionResponse = self
            .post_json("/chat/completions", Endpoint::Completion, &request)
            .await?;

        let content = result
            .first_content()
            .ok_or_else(|| {
                Error::MalformedResponse("response has no choices[0].message.content".to_string())
            })?
            .trim()
            .to_string();

        debug!(
            subsystem = "inference",
            component = "openai",
            op = "complete",
            model = %self.config.chat_model,
            prompt_len,
            response_len = content.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Completion finished"
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.chat_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, DEFAULT_OPENAI_URL);
        assert_eq!(config.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.embed_model, "text-embedding-ada-002");
        assert_eq!(config.embed_dimension, 1536);
    }

    #[test]
    fn test_model_name_accessors() {
        let config = OpenAIConfig {
            chat_model: "test-chat".to_string(),
            embed_model: "test-embed".to_string(),
            embed_dimension: 8,
            ..Default::default()
        };
        let backend = OpenAIBackend::new(config).unwrap();
        assert_eq!(EmbeddingBackend::model_name(&backend), "test-embed");
        assert_eq!(CompletionBackend::model_name(&backend), "test-chat");
        assert_eq!(backend.dimension(), 8);
    }
}
