//! # gnotes-inference
//!
//! Completion and embedding backends for GenAI Notes.
//!
//! This crate provides:
//! - An OpenAI-compatible backend implementing both `CompletionBackend` and
//!   `EmbeddingBackend`
//! - HTTP status to error-taxonomy mapping
//! - A bounded linear retry policy
//! - The `Assistant`: fixed prompts for summarize, expand, and auto-title,
//!   with AI usage logging
//! - Scripted mock backends (feature `mock`)

pub mod assist;
pub mod openai;
pub mod retry;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use gnotes_core::*;

pub use assist::{truncate_title, Assistant, PromptTemplate};
pub use openai::{OpenAIBackend, OpenAIConfig};
pub use retry::RetryPolicy;
