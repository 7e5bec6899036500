//! Transport Module - Client to Orchestrator Communication
//!
//! This module handles:
//! - The `EnrichmentTransport` seam the store depends on
//! - The reqwest implementation (`EnrichClient`)
//! - Error detail extraction from failed responses

pub mod client;
pub mod error;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use crate::logic::enrichment::EnrichmentResult;

pub use client::{ClientConfig, EnrichClient};
pub use error::TransportError;
pub use types::{extract_detail, EnrichLogRequest, HealthResponse};

/// One request/response exchange with the enrichment orchestrator.
///
/// The store only knows this trait, so tests and alternative transports can
/// be injected at construction time.
#[async_trait]
pub trait EnrichmentTransport: Send + Sync {
    async fn enrich_log(
        &self,
        request: &EnrichLogRequest,
    ) -> Result<EnrichmentResult, TransportError>;
}

#[async_trait]
impl<T: EnrichmentTransport + ?Sized> EnrichmentTransport for Arc<T> {
    async fn enrich_log(
        &self,
        request: &EnrichLogRequest,
    ) -> Result<EnrichmentResult, TransportError> {
        (**self).enrich_log(request).await
    }
}
