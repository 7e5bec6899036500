//! Transport errors and their operator-facing message.

use crate::constants::GENERIC_FAILURE_MESSAGE;
use crate::logic::enrichment::ModelError;

/// Failure of one call to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS, TLS, body read failure...
    #[error("{0}")]
    Network(String),
    /// Non-2xx status, with the server's `detail` if it sent one
    #[error("Request failed with status code {status}")]
    Status { status: u16, detail: Option<String> },
    /// 2xx status but the body is not a valid enrichment result
    #[error("Malformed enrichment response: {0}")]
    Malformed(#[from] ModelError),
}

impl TransportError {
    /// Server-supplied detail, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            TransportError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Most specific message available: server detail, then the error's own
    /// message, then a generic failure string.
    pub fn user_message(&self) -> String {
        if let Some(detail) = self.detail().filter(|d| !d.trim().is_empty()) {
            return detail.to_string();
        }

        let own = self.to_string();
        if own.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            own
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_wins() {
        let err = TransportError::Status { status: 500, detail: Some("LLM timeout".to_string()) };
        assert_eq!(err.user_message(), "LLM timeout");
    }

    #[test]
    fn test_status_without_detail_uses_own_message() {
        let err = TransportError::Status { status: 502, detail: None };
        assert_eq!(err.user_message(), "Request failed with status code 502");
    }

    #[test]
    fn test_network_message_passes_through() {
        let err = TransportError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), "connection refused");
    }

    #[test]
    fn test_empty_message_falls_back_to_generic() {
        let err = TransportError::Network(String::new());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_malformed_is_prefixed() {
        let err = TransportError::from(ModelError::BlankCorrelationId);
        assert_eq!(err.user_message(), "Malformed enrichment response: correlation_id is blank");
    }
}
