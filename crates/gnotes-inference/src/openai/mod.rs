//! OpenAI-compatible backend.
//!
//! Works with any endpoint that speaks the OpenAI `/chat/completions` and
//! `/embeddings` wire format.
//!
//! # Example
//!
//! ```rust,no_run
//! use gnotes_inference::openai::OpenAIBackend;
//! use gnotes_core::{ChatMessage, CompletionBackend, GenerationParams};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::from_env().unwrap();
//!     let messages = vec![ChatMessage::user("Say hello")];
//!     let text = backend.complete(&messages, GenerationParams::default()).await.unwrap();
//!     println!("{}", text);
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    OpenAIBackend, OpenAIConfig, DEFAULT_CHAT_MODEL, DEFAULT_DIMENSION, DEFAULT_EMBED_MODEL,
    DEFAULT_OPENAI_URL, DEFAULT_TIMEOUT_SECS,
};
pub use error::{to_core_error, Endpoint, OpenAIErrorCode};
pub use types::*;
