//! The three AI writing aids: summarize, expand shorthand, auto-title.
//!
//! Every call records an AI usage event before reaching the model. A
//! failure to record is logged and otherwise ignored.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use gnotes_core::defaults::{GENERATED_TITLE_MAX_CHARS, GENERATED_TITLE_TRUNCATE_AT};
use gnotes_core::{
    AiFeature, AiUsageLog, ChatMessage, CompletionBackend, Error, GenerationParams, Result,
};

use crate::retry::RetryPolicy;

/// A fixed prompt for one feature.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub feature: AiFeature,
    pub system: &'static str,
    /// Prepended to the user input, separated by a newline.
    pub instruction: &'static str,
    pub params: GenerationParams,
}

impl PromptTemplate {
    pub fn messages(&self, input: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system),
            ChatMessage::user(format!("{}\n{}", self.instruction, input)),
        ]
    }
}

pub const SUMMARIZE: PromptTemplate = PromptTemplate {
    feature: AiFeature::Summarize,
    system: "You are a helpful assistant that summarizes notes.",
    instruction: "Summarize this note:",
    params: GenerationParams {
        temperature: 0.7,
        max_tokens: 100,
    },
};

pub const EXPAND: PromptTemplate = PromptTemplate {
    feature: AiFeature::Generate,
    system: "You are a helpful assistant that expands shorthand or bullet points into a full, \
             clear note. Provide comprehensive, well-structured content that fully expands on \
             the given points.",
    instruction: "Expand this shorthand or bullet points into a full note:",
    params: GenerationParams {
        temperature: 0.7,
        max_tokens: 1000,
    },
};

pub const AUTO_TITLE: PromptTemplate = PromptTemplate {
    feature: AiFeature::AutoTitle,
    system: "You are a helpful assistant that generates concise, descriptive titles for notes. \
             Keep titles under 50 characters and make them clear and specific.",
    instruction: "Generate a short, descriptive title for this note (max 50 characters):",
    params: GenerationParams {
        temperature: 0.3,
        max_tokens: 16,
    },
};

/// Cut titles over the limit to the truncation length plus `...`.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > GENERATED_TITLE_MAX_CHARS {
        let cut: String = title.chars().take(GENERATED_TITLE_TRUNCATE_AT).collect();
        format!("{}...", cut)
    } else {
        title.to_string()
    }
}

/// Runs the fixed prompts against a completion backend.
pub struct Assistant {
    completion: Arc<dyn CompletionBackend>,
    usage: Arc<dyn AiUsageLog>,
    retry: RetryPolicy,
}

impl Assistant {
    pub fn new(completion: Arc<dyn CompletionBackend>, usage: Arc<dyn AiUsageLog>) -> Self {
        Self {
            completion,
            usage,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model_name(&self) -> &str {
        self.completion.model_name()
    }

    /// Short summary of a note's content.
    pub async fn summarize(&self, content: &str) -> Result<String> {
        self.run(&SUMMARIZE, content).await
    }

    /// Full note text from shorthand or bullet points.
    pub async fn expand_shorthand(&self, shorthand: &str) -> Result<String> {
        self.run(&EXPAND, shorthand).await
    }

    /// Title for a note's content, at most 50 characters.
    pub async fn auto_title(&self, content: &str) -> Result<String> {
        let title = self.run(&AUTO_TITLE, content).await?;
        Ok(truncate_title(&title))
    }

    async fn run(&self, prompt: &PromptTemplate, input: &str) -> Result<String> {
        if input.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "{} needs non-empty input",
                prompt.feature.label()
            )));
        }

        if let Err(e) = self.usage.record(prompt.feature).await {
            warn!(
                subsystem = "inference",
                component = "assistant",
                feature = prompt.feature.as_str(),
                error = %e,
                "Failed to log AI usage"
            );
        }

        let start = Instant::now();
        let messages = prompt.messages(input);
        let result = self
            .retry
            .run(prompt.feature.as_str(), || {
                self.completion.complete(&messages, prompt.params)
            })
            .await;

        match &result {
            Ok(text) => info!(
                subsystem = "inference",
                component = "assistant",
                feature = prompt.feature.as_str(),
                prompt_len = input.len(),
                response_len = text.len(),
                duration_ms = start.elapsed().as_millis() as u64,
                "AI call complete"
            ),
            Err(e) => warn!(
                subsystem = "inference",
                component = "assistant",
                feature = prompt.feature.as_str(),
                error = %e,
                "AI call failed"
            ),
        }
        result
    }
}
