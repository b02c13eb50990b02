// src/constants.rs
//! Domain constants that define the operational boundaries of the exporter.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips while draining children and database queries.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// The API version every request is pinned to.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Production endpoint; tests point the client elsewhere.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// How long a single HTTP request may take before it counts as a timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Host prefix used for links to pages in rendered Markdown.
pub const NOTION_LINK_HOST: &str = "www.notion.so";

// ---------------------------------------------------------------------------
// Retry budget
// ---------------------------------------------------------------------------

/// Total attempts per remote call, including the first one.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// First exponential backoff step; doubles on every further attempt.
pub const RETRY_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on a single exponential backoff step.
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

/// Upper bound on the random jitter added to each exponential step.
pub const RETRY_MAX_JITTER: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Placeholder for user names that cannot be resolved.
pub const UNKNOWN_USER: &str = "Unknown";

/// Title given to databases that have none or cannot be read.
pub const UNTITLED_DATABASE: &str = "Untitled";

/// Separator between path components in a composed page path.
pub const PATH_SEPARATOR: &str = " / ";
