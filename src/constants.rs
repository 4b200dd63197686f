//! Shared constants used across the application.

/// User agent string sent on all outbound Bluesky requests.
pub const USER_AGENT: &str = "bsky-reaction-compiler/0.1";

/// Recency window in hours used when the caller omits one or sends garbage.
pub const DEFAULT_HOURS: i64 = 24;

/// Minimum repost count used when the caller omits one or sends garbage.
pub const DEFAULT_MIN_REPOSTS: u64 = 10;

/// Page size requested from Bluesky when the caller omits one.
pub const DEFAULT_LIMIT: u32 = 100;

/// Hard cap on the page size requested from Bluesky, whatever the caller asks for.
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Base URL for post permalinks.
pub const PERMALINK_BASE: &str = "https://bsky.app/profile";
