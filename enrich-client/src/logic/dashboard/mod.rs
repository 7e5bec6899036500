//! Dashboard Module
//!
//! Read-only views over session history: one row per result for the
//! history table, plus aggregate statistics.
//!
//! ## Structure
//! - `HistoryRow`: flattened result for tabular display
//! - `DashboardStats`: totals, average risk, recent activity, top techniques

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::constants::{RECENT_ACTIVITY_LIMIT, TOP_TECHNIQUES_LIMIT};
use crate::logic::enrichment::{EnrichmentResult, RiskLevel};

const MISSING: &str = "-";

// ============================================================================
// HISTORY TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub correlation_id: String,
    pub timestamp: String,
    pub source: String,
    pub intent: String,
    pub technique: String,
    pub risk: String,
}

impl HistoryRow {
    pub fn from_result(result: &EnrichmentResult) -> Self {
        Self {
            correlation_id: result.correlation_id.clone(),
            timestamp: result
                .normalized
                .as_ref()
                .map(|n| n.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            source: result.source.as_str().to_string(),
            intent: result
                .intent
                .as_ref()
                .map(|i| i.intent.clone())
                .unwrap_or_else(|| MISSING.to_string()),
            technique: result
                .mitre
                .as_ref()
                .map(|m| format!("{} {}", m.technique_id, m.attack_technique))
                .unwrap_or_else(|| MISSING.to_string()),
            risk: result
                .risk
                .as_ref()
                .map(|r| format!("{} ({})", r.level.as_str().to_uppercase(), r.percent()))
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

/// Render rows as a fixed-width table
pub fn render_history(rows: &[HistoryRow]) -> String {
    if rows.is_empty() {
        return "No logs analyzed yet.".to_string();
    }
    let mut out = vec![format!(
        "{:<19}  {:<17}  {:<24}  {:<32}  {}",
        "TIME", "SOURCE", "INTENT", "TECHNIQUE", "RISK"
    )];
    for row in rows {
        out.push(format!(
            "{:<19}  {:<17}  {:<24}  {:<32}  {}",
            row.timestamp, row.source, row.intent, row.technique, row.risk
        ));
    }
    out.join("\n")
}

// ============================================================================
// STATISTICS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentActivity {
    pub intent: String,
    pub technique: String,
    pub level: Option<RiskLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechniqueCount {
    pub technique_id: String,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    /// 0-100, one decimal. Results without a risk stage count as 0.
    pub average_risk: f64,
    pub recent: Vec<RecentActivity>,
    pub top_techniques: Vec<TechniqueCount>,
}

impl DashboardStats {
    /// `history` is most recent first
    pub fn from_history(history: &[Arc<EnrichmentResult>]) -> Self {
        let total = history.len();
        let count_level = |level: RiskLevel| {
            history.iter().filter(|r| r.risk_level() == Some(level)).count()
        };

        let average_risk = if total == 0 {
            0.0
        } else {
            let sum: f64 = history
                .iter()
                .map(|r| r.risk.as_ref().map(|risk| risk.score).unwrap_or(0.0))
                .sum();
            (sum / total as f64 * 1000.0).round() / 10.0
        };

        let recent = history
            .iter()
            .take(RECENT_ACTIVITY_LIMIT)
            .map(|r| RecentActivity {
                intent: r
                    .intent
                    .as_ref()
                    .map(|i| i.intent.clone())
                    .unwrap_or_else(|| "Unknown Intent".to_string()),
                technique: r
                    .mitre
                    .as_ref()
                    .map(|m| m.attack_technique.clone())
                    .unwrap_or_else(|| "No Technique Mapped".to_string()),
                level: r.risk_level(),
            })
            .collect();

        Self {
            total,
            critical: count_level(RiskLevel::Critical),
            high: count_level(RiskLevel::High),
            average_risk,
            recent,
            top_techniques: top_techniques(history),
        }
    }

    pub fn render(&self) -> String {
        let mut out = vec![
            format!("Total Logs Analyzed: {}", self.total),
            format!("Critical Threats:    {}", self.critical),
            format!("High Risk Events:    {}", self.high),
            format!("Average Risk Score:  {:.1}%", self.average_risk),
            String::new(),
            "Recent Activity:".to_string(),
        ];
        if self.recent.is_empty() {
            out.push("  No logs analyzed yet. Submit a log to see activity.".to_string());
        }
        for item in &self.recent {
            let level = item
                .level
                .map(|l| l.as_str().to_uppercase())
                .unwrap_or_else(|| MISSING.to_string());
            out.push(format!("  {} | {} | {}", item.intent, item.technique, level));
        }

        out.push(String::new());
        out.push("Top Techniques:".to_string());
        if self.top_techniques.is_empty() {
            out.push(format!("  {}", MISSING));
        }
        for t in &self.top_techniques {
            out.push(format!("  {} - {} ({})", t.technique_id, t.name, t.count));
        }
        out.join("\n")
    }
}

/// Count by technique id, most frequent first, ties by id
fn top_techniques(history: &[Arc<EnrichmentResult>]) -> Vec<TechniqueCount> {
    let mut counts: HashMap<&str, TechniqueCount> = HashMap::new();
    for mitre in history.iter().filter_map(|r| r.mitre.as_ref()) {
        counts
            .entry(mitre.technique_id.as_str())
            .or_insert_with(|| TechniqueCount {
                technique_id: mitre.technique_id.clone(),
                name: mitre.attack_technique.clone(),
                count: 0,
            })
            .count += 1;
    }

    let mut ranked: Vec<TechniqueCount> = counts.into_values().collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.technique_id.cmp(&b.technique_id)));
    ranked.truncate(TOP_TECHNIQUES_LIMIT);
    ranked
}

// ============================================================================
// TESTS
// ============================================================================
