//! Structured logging schema and field name constants for hookmark.
//!
//! These constants are the field schema log aggregation can query by. The
//! `tracing` macros and `#[instrument]` take field names as identifiers, so
//! call sites spell the same names literally (`event_id = %id`); a new field
//! gets a constant here first.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied (partial folder path, failed delivery) |
//! | INFO  | Lifecycle events (startup, shutdown), delivery completions |
//! | DEBUG | Decision points (trigger disabled, enrichment skipped) |
//! | TRACE | Per-item iteration (each ancestor lookup) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one pipeline run.
/// Format: UUIDv7 (time-ordered).
pub const EVENT_ID: &str = "event_id";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Mutation kind ("created", "updated", "deleted", "moved").
pub const EVENT_KIND: &str = "event_kind";

/// Bookmark node ID being operated on.
pub const NODE_ID: &str = "node_id";

/// Parent folder ID used for enrichment.
pub const PARENT_ID: &str = "parent_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of ancestors visited by the path resolver.
pub const DEPTH: &str = "depth";

/// HTTP status returned by the webhook endpoint.
pub const STATUS_CODE: &str = "status_code";

/// Serialized payload size in bytes.
pub const BODY_LEN: &str = "body_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Outcome label ("delivered", "skipped", "failed").
pub const OUTCOME: &str = "outcome";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
