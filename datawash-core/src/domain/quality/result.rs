// datawash-core/src/domain/quality/result.rs

use serde::Serialize;

use crate::domain::params::Params;

/// Rule-specific counters (`missing`, `duplicates`, `actual`, `error`, ...).
pub type Stats = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
    pub label: String,
    pub rule_type: String,
    pub params: Params,
    pub passed: bool,
    pub failed_count: usize,
    /// First failing row ids, ascending.
    pub failed_row_ids: Vec<u64>,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualitySummary {
    /// Percentage of fully passing rules, 100.0 when there are no rules.
    pub pass_rate: f64,
    /// Distinct rows failing at least one rule.
    pub failed_row_total: usize,
    pub issue_columns: Vec<String>,
}

impl QualitySummary {
    pub fn all_passed(&self) -> bool {
        self.failed_row_total == 0 && self.pass_rate >= 100.0
    }
}
