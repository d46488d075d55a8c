//! Default values shared across crates.
//!
//! Thresholds here are starting points, not tuned values; every one of them
//! can be overridden through configuration.

// =============================================================================
// NOTE FORM
// =============================================================================

/// Maximum number of characters in a note title.
pub const TITLE_MAX_CHARS: usize = 100;

/// Generated titles longer than this are truncated.
pub const GENERATED_TITLE_MAX_CHARS: usize = 50;

/// Length a generated title is cut to before the ellipsis is appended.
pub const GENERATED_TITLE_TRUNCATE_AT: usize = 47;

// =============================================================================
// SEARCH
// =============================================================================

/// Similarity threshold for the first semantic search attempt.
pub const SEARCH_THRESHOLD_STRICT: f64 = 0.6;

/// Similarity threshold used when the strict attempt returns nothing.
pub const SEARCH_THRESHOLD_FALLBACK: f64 = 0.4;

/// Similarity threshold for related-note lookups.
pub const RELATED_THRESHOLD: f64 = 0.7;

/// Default number of semantic search results.
pub const SEARCH_LIMIT: i64 = 5;

/// Default number of related notes.
pub const RELATED_LIMIT: i64 = 3;

// =============================================================================
// AI CALLS
// =============================================================================

/// Maximum attempts for an AI call, including the first.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Base delay between attempts; attempt `n` waits `n * base`.
pub const RETRY_BASE_DELAY_MS: u64 = 1000;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default completion token budget.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

// =============================================================================
// ANALYTICS
// =============================================================================

/// Length of the notes-per-day histogram.
pub const TRAILING_DAYS: usize = 7;

/// Number of tags in the popularity chart.
pub const TOP_TAG_LIMIT: usize = 10;

// =============================================================================
// MAINTENANCE
// =============================================================================

/// Pause between notes during embedding backfill.
pub const BACKFILL_DELAY_MS: u64 = 100;
