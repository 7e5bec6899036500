//! Pipeline Stage Derivation
//!
//! Pure view logic: which of the fixed stages have completed for a result.
//! The client cannot see failed or running stages, so the whole algorithm is
//! a presence test on the stage fields. Nothing here is stored.

use serde::Serialize;

use crate::logic::enrichment::EnrichmentResult;

/// Fixed pipeline stages, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Ingest,
    Normalize,
    Semantic,
    Intent,
    Mitre,
    Risk,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Ingest,
        Stage::Normalize,
        Stage::Semantic,
        Stage::Intent,
        Stage::Mitre,
        Stage::Risk,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Stage::Ingest => "ingest",
            Stage::Normalize => "normalize",
            Stage::Semantic => "semantic",
            Stage::Intent => "intent",
            Stage::Mitre => "mitre",
            Stage::Risk => "risk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Ingest => "Log Ingestion",
            Stage::Normalize => "Normalization",
            Stage::Semantic => "Semantic Interpreter",
            Stage::Intent => "Intent Classifier",
            Stage::Mitre => "MITRE Reasoner",
            Stage::Risk => "Risk Engine",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Success,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageDescriptor {
    pub stage: Stage,
    pub label: &'static str,
    pub status: StageStatus,
}

/// Whether the field backing `stage` is present on `result`.
///
/// Ingest and normalize both key off `normalized`: the orchestrator only
/// reports them together.
pub fn stage_present(result: &EnrichmentResult, stage: Stage) -> bool {
    match stage {
        Stage::Ingest | Stage::Normalize => result.normalized.is_some(),
        Stage::Semantic => result.semantic.is_some(),
        Stage::Intent => result.intent.is_some(),
        Stage::Mitre => result.mitre.is_some(),
        Stage::Risk => result.risk.is_some(),
    }
}

/// Derive the six stage descriptors for a result (or for no result yet).
pub fn derive_stages(result: Option<&EnrichmentResult>) -> [StageDescriptor; 6] {
    Stage::ALL.map(|stage| {
        let done = result.is_some_and(|r| stage_present(r, stage));
        StageDescriptor {
            stage,
            label: stage.label(),
            status: if done { StageStatus::Success } else { StageStatus::Pending },
        }
    })
}

/// Count of completed stages, for compact status lines
pub fn completed_count(stages: &[StageDescriptor]) -> usize {
    stages.iter().filter(|s| s.status == StageStatus::Success).count()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::enrichment::{
        FieldMap, IntentOrigin, IntentResult, LogSource, MitreResult, NormalizedLog, RiskLevel,
        RiskScore, SemanticResult,
    };
    use chrono::Utc;

    fn normalized() -> NormalizedLog {
        NormalizedLog {
            timestamp: Utc::now(),
            source: "windows_eventlog".to_string(),
            event_type: "logon_failure".to_string(),
            hostname: None,
            user: Some("admin".to_string()),
            message: None,
            raw_log: "4625".to_string(),
            normalized_fields: FieldMap::new(),
        }
    }

    fn semantic() -> SemanticResult {
        SemanticResult {
            semantic_summary: "failed logon".to_string(),
            semantic_features: FieldMap::new(),
            confidence: 0.7,
        }
    }

    fn intent() -> IntentResult {
        IntentResult {
            intent: "brute_force".to_string(),
            tactic: "Credential Access".to_string(),
            score: 0.6,
            matched_rules: vec![],
            source: IntentOrigin::Llm,
            explanation: None,
        }
    }

    fn mitre() -> MitreResult {
        MitreResult {
            attack_technique: "Brute Force".to_string(),
            technique_id: "T1110".to_string(),
            tactic: "Credential Access".to_string(),
            kill_chain_phase: "actions".to_string(),
            confidence: 0.5,
            explanation: String::new(),
            related_techniques: vec![],
        }
    }

    fn risk() -> RiskScore {
        RiskScore { score: 0.5, level: RiskLevel::Medium, factors: FieldMap::new() }
    }

    /// Build a result whose stage fields follow the 5 low bits of `mask`
    fn with_mask(mask: u8) -> EnrichmentResult {
        let mut r = EnrichmentResult::new("id", "raw", LogSource::Unknown);
        if mask & 0b00001 != 0 {
            r.normalized = Some(normalized());
        }
        if mask & 0b00010 != 0 {
            r.semantic = Some(semantic());
        }
        if mask & 0b00100 != 0 {
            r.intent = Some(intent());
        }
        if mask & 0b01000 != 0 {
            r.mitre = Some(mitre());
        }
        if mask & 0b10000 != 0 {
            r.risk = Some(risk());
        }
        r
    }

    fn expected_bit(stage: Stage) -> u8 {
        match stage {
            Stage::Ingest | Stage::Normalize => 0b00001,
            Stage::Semantic => 0b00010,
            Stage::Intent => 0b00100,
            Stage::Mitre => 0b01000,
            Stage::Risk => 0b10000,
        }
    }

    #[test]
    fn test_status_matches_presence_for_every_combination() {
        for mask in 0u8..32 {
            let result = with_mask(mask);
            let stages = derive_stages(Some(&result));
            for descriptor in stages {
                let expected = if mask & expected_bit(descriptor.stage) != 0 {
                    StageStatus::Success
                } else {
                    StageStatus::Pending
                };
                assert_eq!(
                    descriptor.status, expected,
                    "mask {:05b} stage {:?}",
                    mask, descriptor.stage
                );
            }
        }
    }

    #[test]
    fn test_no_result_is_all_pending() {
        let stages = derive_stages(None);
        assert!(stages.iter().all(|s| s.status == StageStatus::Pending));
        assert_eq!(completed_count(&stages), 0);
    }

    #[test]
    fn test_stage_order_and_labels_fixed() {
        let stages = derive_stages(None);
        let ids: Vec<&str> = stages.iter().map(|s| s.stage.id()).collect();
        assert_eq!(ids, ["ingest", "normalize", "semantic", "intent", "mitre", "risk"]);
        assert_eq!(stages[4].label, "MITRE Reasoner");
    }

    #[test]
    fn test_normalized_only_round_trip() {
        let result = with_mask(0b00001);
        let encoded = serde_json::to_string(&result).unwrap();
        let decoded = crate::logic::enrichment::parse_enrichment(encoded.as_bytes()).unwrap();

        let statuses: Vec<StageStatus> = derive_stages(Some(&decoded))
            .iter()
            .map(|s| s.status)
            .collect();
        assert_eq!(
            statuses,
            [
                StageStatus::Success,
                StageStatus::Success,
                StageStatus::Pending,
                StageStatus::Pending,
                StageStatus::Pending,
                StageStatus::Pending,
            ]
        );
    }

    #[test]
    fn test_derivation_is_repeatable() {
        let result = with_mask(0b10101);
        assert_eq!(derive_stages(Some(&result)), derive_stages(Some(&result)));
        assert_eq!(completed_count(&derive_stages(Some(&result))), 4);
    }
}
