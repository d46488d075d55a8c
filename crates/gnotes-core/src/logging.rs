//! Structured logging field name constants.
//!
//! All crates use these constants for structured `tracing` fields so log
//! queries can rely on the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "search", "db", "inference", "workspace", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "openai", "pool", "assistant", "semantic_search"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "complete", "embed_texts", "match_notes", "backfill"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

/// AI feature name ("summarize", "autoTitle", "generate").
pub const FEATURE: &str = "feature";

/// Search query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or query.
pub const RESULT_COUNT: &str = "result_count";

/// Similarity threshold applied to a match query.
pub const THRESHOLD: &str = "threshold";

/// Retry attempt number (1-based).
pub const ATTEMPT: &str = "attempt";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Every field name above, for log shippers that need an allow-list.
pub const ALL_FIELDS: [&str; 15] = [
    SUBSYSTEM,
    COMPONENT,
    OPERATION,
    NOTE_ID,
    FEATURE,
    QUERY,
    DURATION_MS,
    RESULT_COUNT,
    THRESHOLD,
    ATTEMPT,
    MODEL,
    PROMPT_LEN,
    RESPONSE_LEN,
    SUCCESS,
    ERROR_MSG,
];
