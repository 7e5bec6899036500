//! Orchestrator HTTP Client
//!
//! reqwest client for the enrichment orchestrator. One call per submission:
//! no retry, and no timeout unless one is configured.

use std::time::Duration;

use async_trait::async_trait;

use super::error::TransportError;
use super::types::{extract_detail, EnrichLogRequest, HealthResponse};
use super::EnrichmentTransport;
use crate::logic::enrichment::{parse_enrichment, EnrichmentResult};

/// Orchestrator connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the endpoint paths are appended to
    pub api_base: String,
    /// Per-request timeout. `None` waits for the transport to fail.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        use crate::constants;

        Self {
            api_base: constants::DEFAULT_API_BASE.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load from environment, falling back to defaults
    pub fn from_env() -> Self {
        use crate::constants;

        Self {
            api_base: constants::get_api_base(),
            request_timeout_secs: constants::get_request_timeout_secs(),
        }
    }
}

/// Enrichment orchestrator client
pub struct EnrichClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl EnrichClient {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Check orchestrator health
    pub async fn health_check(&self) -> Result<HealthResponse, TransportError> {
        let url = self.endpoint("health");

        let response = self.http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        serde_json::from_slice(&body)
            .map_err(|e| TransportError::Network(format!("invalid health response: {}", e)))
    }

    /// Submit one log to `POST /enrich_log`
    pub async fn enrich_log(
        &self,
        request: &EnrichLogRequest,
    ) -> Result<EnrichmentResult, TransportError> {
        let url = self.endpoint("enrich_log");

        log::debug!("POST {} (source={}, {} bytes)", url, request.source, request.raw_log.len());

        let response = self.http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            let detail = extract_detail(&body);
            log::warn!(
                "Enrichment request failed ({}): {}",
                status.as_u16(),
                detail.as_deref().unwrap_or("no detail")
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let result = parse_enrichment(&body)?;
        log::info!(
            "Enrichment received: {} ({} stage warnings)",
            result.correlation_id,
            result.errors.len()
        );
        Ok(result)
    }
}

#[async_trait]
impl EnrichmentTransport for EnrichClient {
    async fn enrich_log(
        &self,
        request: &EnrichLogRequest,
    ) -> Result<EnrichmentResult, TransportError> {
        EnrichClient::enrich_log(self, request).await
    }
}

// ============================================================================
// TESTS
// ============================================================================
