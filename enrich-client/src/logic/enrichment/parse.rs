//! Validated decoding of orchestrator responses.
//!
//! A body that decodes but lacks the root identity is rejected here, so the
//! store never holds a half-valid result.

use super::types::EnrichmentResult;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Invalid JSON, wrong shape, or a required field is missing
    #[error("{0}")]
    Decode(String),
    #[error("correlation_id is blank")]
    BlankCorrelationId,
}

/// Decode a success response body into an [`EnrichmentResult`].
pub fn parse_enrichment(body: &[u8]) -> Result<EnrichmentResult, ModelError> {
    let result: EnrichmentResult =
        serde_json::from_slice(body).map_err(|e| ModelError::Decode(e.to_string()))?;

    if result.correlation_id.trim().is_empty() {
        return Err(ModelError::BlankCorrelationId);
    }

    Ok(result)
}

// ============================================================================
// TESTS
// ============================================================================
