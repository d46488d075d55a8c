//! # gnotes-api
//!
//! HTTP API for GenAI Notes, plus the services shared with the
//! `gnotes-embeddings` maintenance CLI.
//!
//! The router is built from an [`AppState`] whose collaborators are all
//! injected, so tests run it against in-memory stores and mock backends.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod services;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use error::ApiError;
pub use router::build_router;
pub use services::{AnalyticsCache, EmbeddingMaintenance, RunSummary};
pub use state::{AppState, Backends};
