//! Central Configuration Constants
//!
//! Single source of truth for client defaults.
//! Environment lookups fall back to these values.

/// Default orchestrator base URL (local development stack)
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Source tag sent when the operator does not pick one
pub const DEFAULT_SOURCE: &str = "unknown";

/// `event_type` attached to every operator submission
pub const MANUAL_SUBMISSION_EVENT_TYPE: &str = "manual_submission";

/// Shown when a failure carries no usable message
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to process log";

/// Number of entries shown in the dashboard's recent activity list
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Number of techniques shown in the dashboard's top techniques list
pub const TOP_TECHNIQUES_LIMIT: usize = 5;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Log Enrichment Client";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get orchestrator base URL from environment or use default
pub fn get_api_base() -> String {
    std::env::var("ENRICH_API_BASE")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Get request timeout from environment. Unset or 0 means no timeout.
pub fn get_request_timeout_secs() -> Option<u64> {
    std::env::var("ENRICH_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|secs| *secs > 0)
}

/// Get history cap from environment. Unset or 0 means unbounded.
pub fn get_history_limit() -> Option<usize> {
    std::env::var("ENRICH_HISTORY_LIMIT")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|limit| *limit > 0)
}
