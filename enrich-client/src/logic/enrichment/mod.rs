//! Enrichment Module
//!
//! Shape of a single analyzed log: root record plus five optional stage
//! sub-records. Presence of a sub-record is the only signal that its stage
//! completed server-side.
//!
//! ## Structure
//! - `types`: EnrichmentResult and the stage records
//! - `parse`: validated decoding of orchestrator responses

pub mod types;
pub mod parse;

pub use types::{
    EnrichmentResult,
    FieldMap,
    IntentOrigin,
    IntentResult,
    LogSource,
    MitreResult,
    NormalizedLog,
    RiskLevel,
    RiskScore,
    SemanticResult,
};

pub use parse::{parse_enrichment, ModelError};
