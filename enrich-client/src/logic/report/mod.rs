//! Report Module
//!
//! Plain-text rendering of one enrichment result and its pipeline progress,
//! for terminal output.
//!
//! Absent stages render as "not yet available"; stage-level server errors
//! are listed as warnings and never stop the rest of the report.

use serde_json::Value;

use crate::logic::enrichment::{EnrichmentResult, FieldMap};
use crate::logic::pipeline::{completed_count, StageDescriptor, StageStatus};

const NOT_AVAILABLE: &str = "not yet available";
const NO_SUMMARY: &str = "No summary available.";

/// Render the full analysis view for one result
pub fn render_report(result: &EnrichmentResult) -> String {
    let mut out: Vec<String> = Vec::new();

    out.push(format!("Correlation ID: {}", result.correlation_id));
    out.push(format!("Source: {}", result.source.label()));

    // Summary
    section(&mut out, "Analysis Summary");
    out.push(result.summary.clone().unwrap_or_else(|| NO_SUMMARY.to_string()));
    if !result.recommendations.is_empty() {
        out.push("Recommendations:".to_string());
        for rec in &result.recommendations {
            out.push(format!("  - {}", rec));
        }
    }

    if result.has_warnings() {
        section(&mut out, "Warnings");
        for err in &result.errors {
            out.push(format!("  ! {}", err));
        }
    }

    // Log details
    section(&mut out, "Log Details");
    out.push(format!("Raw log: {}", result.raw_log));
    match &result.normalized {
        Some(n) => {
            out.push(format!("Timestamp: {}", n.timestamp.to_rfc3339()));
            out.push(format!("Event type: {}", n.event_type));
            if let Some(host) = &n.hostname {
                out.push(format!("Host: {}", host));
            }
            if let Some(user) = &n.user {
                out.push(format!("User: {}", user));
            }
            push_fields(&mut out, "Normalized fields", &n.normalized_fields);
        }
        None => out.push(format!("Normalized fields: {}", NOT_AVAILABLE)),
    }

    section(&mut out, "Semantic Interpretation");
    match &result.semantic {
        Some(s) => {
            out.push(s.semantic_summary.clone());
            out.push(format!("Confidence: {}%", as_percent(s.confidence)));
            push_fields(&mut out, "Features", &s.semantic_features);
        }
        None => out.push(NOT_AVAILABLE.to_string()),
    }

    section(&mut out, "Intent Classification");
    match &result.intent {
        Some(i) => {
            out.push(format!("Intent: {} ({})", i.intent, i.source.as_str()));
            out.push(format!("Tactic: {}", i.tactic));
            out.push(format!("Score: {}%", as_percent(i.score)));
            if let Some(explanation) = &i.explanation {
                out.push(format!("Explanation: {}", explanation));
            }
            if !i.matched_rules.is_empty() {
                out.push(format!("Matched rules: {}", i.matched_rules.join(", ")));
            }
        }
        None => out.push(NOT_AVAILABLE.to_string()),
    }

    section(&mut out, "MITRE ATT&CK");
    match &result.mitre {
        Some(m) => {
            out.push(format!("Technique: {} - {}", m.technique_id, m.attack_technique));
            out.push(format!("Tactic: {}", m.tactic));
            out.push(format!("Kill chain phase: {}", m.kill_chain_phase));
            out.push(format!("Confidence: {}%", as_percent(m.confidence)));
            out.push(format!("Explanation: {}", m.explanation));
            if !m.related_techniques.is_empty() {
                out.push(format!("Related: {}", m.related_techniques.join(", ")));
            }
        }
        None => out.push(NOT_AVAILABLE.to_string()),
    }

    section(&mut out, "Risk Analysis");
    match &result.risk {
        Some(r) => {
            out.push(format!("Score: {}/100", r.percent()));
            out.push(format!("Level: {}", r.level.as_str().to_uppercase()));
            for (factor, value) in &r.factors {
                out.push(format!("  {}: {}", factor.replace('_', " "), display_value(value)));
            }
        }
        None => out.push(NOT_AVAILABLE.to_string()),
    }

    out.join("\n")
}

/// Render the six-stage pipeline as a checklist
pub fn render_pipeline(stages: &[StageDescriptor; 6]) -> String {
    let mut out = vec![format!("Pipeline ({}/{} stages)", completed_count(stages), stages.len())];
    for s in stages {
        let mark = match s.status {
            StageStatus::Success => "[x]",
            StageStatus::Pending => "[ ]",
        };
        out.push(format!("  {} {}", mark, s.label));
    }
    out.join("\n")
}

fn section(out: &mut Vec<String>, title: &str) {
    out.push(String::new());
    out.push(format!("== {} ==", title));
}

fn push_fields(out: &mut Vec<String>, title: &str, fields: &FieldMap) {
    if fields.is_empty() {
        return;
    }
    out.push(format!("{}:", title));
    for (key, value) in fields {
        out.push(format!("  {}: {}", key, display_value(value)));
    }
}

/// Strings without quotes, everything else as compact JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn as_percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

// ============================================================================
// TESTS
// ============================================================================
