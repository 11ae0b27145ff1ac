// datawash-core/src/application/validation.rs

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, instrument};

use crate::domain::dataset::Dataset;
use crate::domain::quality::{QualitySummary, Rule, RuleResult, evaluate};

pub const DEFAULT_FAILED_ROW_SAMPLE: usize = 100;

/// Runs every rule with the default failed-row sample size.
pub fn run_rules(dataset: &Dataset, rules: &[Rule]) -> (Vec<RuleResult>, QualitySummary) {
    run_rules_with(dataset, rules, DEFAULT_FAILED_ROW_SAMPLE)
}

/// Runs every rule independently. Each result keeps at most `sample_limit`
/// failing row ids; the summary counts the full failing sets.
#[instrument(skip(dataset, rules), fields(rules = rules.len(), rows = dataset.num_rows()))]
pub fn run_rules_with(
    dataset: &Dataset,
    rules: &[Rule],
    sample_limit: usize,
) -> (Vec<RuleResult>, QualitySummary) {
    let row_ids = dataset.row_ids();
    let mut results = Vec::with_capacity(rules.len());
    let mut failing_rows: HashSet<u64> = HashSet::new();
    let mut issue_columns: BTreeSet<String> = BTreeSet::new();

    for rule in rules {
        let outcome = evaluate(dataset, rule);
        let failed: Vec<u64> = outcome
            .passed
            .iter()
            .zip(row_ids)
            .filter_map(|(passed, id)| (!*passed).then_some(*id))
            .collect();

        if !failed.is_empty() {
            issue_columns.extend(outcome.columns.iter().cloned());
        }
        failing_rows.extend(failed.iter().copied());

        let result = RuleResult {
            label: rule.label(),
            rule_type: rule.rule_type.clone(),
            params: rule.params.clone(),
            passed: failed.is_empty(),
            failed_count: failed.len(),
            failed_row_ids: failed.into_iter().take(sample_limit).collect(),
            stats: outcome.stats,
        };
        debug!(rule = %result.label, failed = result.failed_count, "Rule evaluated");
        results.push(result);
    }

    let passed = results.iter().filter(|r| r.passed).count();
    let pass_rate = if results.is_empty() {
        100.0
    } else {
        passed as f64 * 100.0 / results.len() as f64
    };
    let summary = QualitySummary {
        pass_rate,
        failed_row_total: failing_rows.len(),
        issue_columns: issue_columns.into_iter().collect(),
    };
    info!(
        pass_rate = summary.pass_rate,
        failed_rows = summary.failed_row_total,
        "Quality rules evaluated"
    );
    (results, summary)
}
