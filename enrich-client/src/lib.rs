//! Security Log Enrichment - Operator Client
//!
//! Submits raw security logs to the enrichment orchestrator, tracks the
//! session's results and derives per-stage pipeline progress.

pub mod constants;
pub mod api;
pub mod logic;
