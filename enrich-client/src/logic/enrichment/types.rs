//! Enrichment Result Types
//!
//! Data contract for one analyzed log line as returned by the orchestrator.
//! NO logic here beyond small accessors - stage status lives in `pipeline`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form key/value bag emitted by a stage (`Record<string, any>` on the wire)
pub type FieldMap = BTreeMap<String, Value>;

// ============================================================================
// LOG SOURCE
// ============================================================================

/// Log producer tag. Informational only on the client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSource {
    WindowsEventlog,
    Sysmon,
    LinuxAuditd,
    GenericSyslog,
    /// Sentinel for "not supplied"; also absorbs tags this client does not know
    #[default]
    #[serde(other)]
    Unknown,
}

impl LogSource {
    pub const ALL: [LogSource; 5] = [
        LogSource::WindowsEventlog,
        LogSource::Sysmon,
        LogSource::LinuxAuditd,
        LogSource::GenericSyslog,
        LogSource::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::WindowsEventlog => "windows_eventlog",
            LogSource::Sysmon => "sysmon",
            LogSource::LinuxAuditd => "linux_auditd",
            LogSource::GenericSyslog => "generic_syslog",
            LogSource::Unknown => "unknown",
        }
    }

    /// Human readable name for menus and reports
    pub fn label(&self) -> &'static str {
        match self {
            LogSource::WindowsEventlog => "Windows Event Log",
            LogSource::Sysmon => "Sysmon",
            LogSource::LinuxAuditd => "Linux Auditd",
            LogSource::GenericSyslog => "Generic Syslog",
            LogSource::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LogSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LogSource::ALL
            .iter()
            .copied()
            .find(|source| source.as_str() == wanted)
            .ok_or_else(|| {
                let allowed: Vec<&str> = LogSource::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown log source '{}' (expected one of: {})", s, allowed.join(", "))
            })
    }
}

// ============================================================================
// STAGE SUB-RECORDS
// ============================================================================

/// Output of the ingestion + normalization stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLog {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub event_type: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub raw_log: String,
    pub normalized_fields: FieldMap,
}

/// Output of the semantic interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticResult {
    pub semantic_summary: String,
    pub semantic_features: FieldMap,
    /// 0.0 - 1.0
    pub confidence: f64,
}

/// Which engine produced the intent label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentOrigin {
    Rules,
    Llm,
}

impl IntentOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentOrigin::Rules => "rules",
            IntentOrigin::Llm => "llm",
        }
    }
}

/// Output of the intent classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: String,
    pub tactic: String,
    pub score: f64,
    /// Ordered, as reported by the rule engine
    pub matched_rules: Vec<String>,
    pub source: IntentOrigin,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Output of the MITRE ATT&CK reasoner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitreResult {
    pub attack_technique: String,
    /// T-number, e.g. `T1110`
    pub technique_id: String,
    pub tactic: String,
    pub kill_chain_phase: String,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub explanation: String,
    pub related_techniques: Vec<String>,
}

// ============================================================================
// RISK
// ============================================================================

/// Discrete risk scale. Ordering follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Needs analyst attention (high or critical)
    pub fn is_high(&self) -> bool {
        *self >= RiskLevel::High
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of the risk engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    /// 0.0 - 1.0
    pub score: f64,
    pub level: RiskLevel,
    /// Contributing factor -> explanation
    pub factors: FieldMap,
}

impl RiskScore {
    /// Score on the 0-100 scale used by badges and gauges
    pub fn percent(&self) -> u32 {
        (self.score.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

// ============================================================================
// ROOT ENTITY
// ============================================================================

/// One analyzed log line.
///
/// Each stage field is `None` until the orchestrator ran that stage and it
/// produced output. `None` is never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub correlation_id: String,
    pub raw_log: String,
    #[serde(default)]
    pub source: LogSource,
    #[serde(default)]
    pub event_type: Option<String>,

    #[serde(default)]
    pub normalized: Option<NormalizedLog>,
    #[serde(default)]
    pub semantic: Option<SemanticResult>,
    #[serde(default)]
    pub intent: Option<IntentResult>,
    #[serde(default)]
    pub mitre: Option<MitreResult>,
    #[serde(default)]
    pub risk: Option<RiskScore>,

    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recommendations: Vec<String>,
    /// Stage-level failures reported by the server. Warnings, not client errors.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<String>,
}

impl EnrichmentResult {
    /// Bare result with only the root fields set
    pub fn new(
        correlation_id: impl Into<String>,
        raw_log: impl Into<String>,
        source: LogSource,
    ) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            raw_log: raw_log.into(),
            source,
            event_type: None,
            normalized: None,
            semantic: None,
            intent: None,
            mitre: None,
            risk: None,
            summary: None,
            recommendations: vec![],
            errors: vec![],
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk.as_ref().map(|r| r.level)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// TIMESTAMP CODEC
// ============================================================================

/// The orchestrator emits naive ISO-8601 for timestamps without an offset.
/// Those are read as UTC; anything with an offset goes through RFC 3339.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_log_source_wire_names() {
        let tag = serde_json::to_string(&LogSource::WindowsEventlog).unwrap();
        assert_eq!(tag, "\"windows_eventlog\"");
        assert_eq!(serde_json::to_string(&LogSource::LinuxAuditd).unwrap(), "\"linux_auditd\"");
        assert_eq!(serde_json::to_string(&LogSource::default()).unwrap(), "\"unknown\"");
    }

    #[test]
    fn test_unrecognized_source_reads_as_unknown() {
        let source: LogSource = serde_json::from_str("\"cloudtrail\"").unwrap();
        assert_eq!(source, LogSource::Unknown);
    }

    #[test]
    fn test_log_source_from_str() {
        assert_eq!("sysmon".parse::<LogSource>(), Ok(LogSource::Sysmon));
        assert_eq!(" Generic_Syslog ".parse::<LogSource>(), Ok(LogSource::GenericSyslog));
        let err = "cloudtrail".parse::<LogSource>().unwrap_err();
        assert!(err.contains("windows_eventlog"));
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert!(RiskLevel::Critical.is_high());
        assert!(!RiskLevel::Medium.is_high());
    }

    #[test]
    fn test_risk_percent_rounds_and_clamps() {
        let risk = RiskScore { score: 0.826, level: RiskLevel::High, factors: FieldMap::new() };
        assert_eq!(risk.percent(), 83);
        let over = RiskScore { score: 1.4, level: RiskLevel::Critical, factors: FieldMap::new() };
        assert_eq!(over.percent(), 100);
    }

    #[test]
    fn test_intent_origin_wire_names() {
        let origin: IntentOrigin = serde_json::from_str("\"llm\"").unwrap();
        assert_eq!(origin, IntentOrigin::Llm);
        assert!(serde_json::from_str::<IntentOrigin>("\"heuristic\"").is_err());
    }

    #[test]
    fn test_timestamp_accepts_naive_and_offset_forms() {
        let naive = timestamp::parse("2024-03-01T10:15:30.250000").unwrap();
        assert_eq!((naive.year(), naive.hour(), naive.minute()), (2024, 10, 15));

        let spaced = timestamp::parse("2024-03-01 10:15:30").unwrap();
        assert_eq!(spaced.second(), 30);

        let offset = timestamp::parse("2024-03-01T12:15:30+02:00").unwrap();
        assert_eq!(offset.hour(), 10);

        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let json = r#"{
            "correlation_id": "c-1",
            "raw_log": "x",
            "source": "sysmon",
            "recommendations": null,
            "errors": null
        }"#;
        let result: EnrichmentResult = serde_json::from_str(json).unwrap();
        assert!(result.recommendations.is_empty());
        assert!(!result.has_warnings());
    }
}
