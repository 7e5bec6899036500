//! Wire types for the orchestrator endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::MANUAL_SUBMISSION_EVENT_TYPE;
use crate::logic::enrichment::{FieldMap, LogSource};

/// Body of `POST /enrich_log`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichLogRequest {
    pub raw_log: String,
    pub source: LogSource,
    pub event_type: String,
    pub metadata: FieldMap,
}

impl EnrichLogRequest {
    /// Request for a log pasted by an operator. Metadata is always empty.
    pub fn manual(raw_log: impl Into<String>, source: LogSource) -> Self {
        Self {
            raw_log: raw_log.into(),
            source,
            event_type: MANUAL_SUBMISSION_EVENT_TYPE.to_string(),
            metadata: FieldMap::new(),
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Downstream stage URLs as configured on the orchestrator
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Pull a human readable message out of an error body's `detail` field.
///
/// `detail` is usually a string. Request validation failures carry a list of
/// `{loc, msg, type}` objects instead; their `msg` entries are joined.
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let detail = value.get("detail")?;

    let message = match detail {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                other => other.get("msg").and_then(Value::as_str).map(str::to_string),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    };

    if message.trim().is_empty() {
        None
    } else {
        Some(message)
    }
}

// ============================================================================
// TESTS
// ============================================================================
