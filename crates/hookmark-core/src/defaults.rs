//! Centralized default constants for hookmark.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// ANCESTRY
// =============================================================================

/// Maximum number of parent links followed when resolving a folder path.
///
/// The bookmark store guarantees an acyclic parent chain; browsers cap real
/// folder nesting far below this. Exceeding it yields an empty path.
pub const MAX_ANCESTOR_DEPTH: usize = 256;

/// Separator between folder titles in a resolved path.
pub const FOLDER_PATH_SEPARATOR: &str = "/";

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Title used for every user-visible failure alert.
pub const NOTIFY_TITLE_ERROR: &str = "Error";

/// Alert shown when no webhook URL is configured.
pub const NOTIFY_MSG_URL_MISSING: &str = "Webhook URL is not set in the settings.";

/// Alert shown when a delivery attempt fails.
pub const NOTIFY_MSG_DELIVERY_FAILED: &str = "Failed to send bookmark data to the webhook.";

/// Number of recent alerts retained by the in-memory notification log.
pub const NOTIFICATION_HISTORY: usize = 50;

// =============================================================================
// EVENT BUS
// =============================================================================

/// Broadcast buffer for mutation notifications (production).
pub const EVENT_BUS_CAPACITY: usize = 256;

/// Broadcast buffer for mutation notifications (tests).
pub const EVENT_BUS_CAPACITY_TEST: usize = 32;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port for the host API.
pub const SERVER_PORT: u16 = 3400;

/// Default settings file path (relative to the working directory).
pub const SETTINGS_PATH: &str = "hookmark.toml";

/// Default root folder title. Browsers report the root with an empty title.
pub const ROOT_TITLE: &str = "";

/// ID assigned to the root node of a fresh bookmark tree.
pub const ROOT_ID: &str = "0";
