//! Logic Module - Data Model, Store & Views
//!
//! ## Structure
//! - `enrichment/` - EnrichmentResult and stage records
//! - `pipeline/` - Stage status derivation
//! - `transport/` - Orchestrator HTTP client
//! - `store/` - Submission lifecycle and history
//! - `report/` - Text rendering of one result
//! - `dashboard/` - History rows and aggregate statistics

pub mod enrichment;
pub mod pipeline;
pub mod transport;
pub mod store;
pub mod report;
pub mod dashboard;
