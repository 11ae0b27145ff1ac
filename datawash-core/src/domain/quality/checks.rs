// datawash-core/src/domain/quality/checks.rs

//! Column-wise evaluation of a single rule.

use std::collections::HashMap;

use datafusion::arrow::array::ArrayRef;
use regex::Regex;
use serde_json::Value;

use super::result::Stats;
use super::rule::{Rule, RuleKind};
use crate::domain::dataset::Dataset;
use crate::domain::dataset::cell::{self, Numeric};
use crate::domain::error::DomainError;
use crate::domain::params::{self, Params};

/// Per-row pass mask, counters and the columns the rule looked at.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub passed: Vec<bool>,
    pub stats: Stats,
    pub columns: Vec<String>,
}

impl CheckOutcome {
    fn new(passed: Vec<bool>, columns: Vec<String>) -> Self {
        Self {
            passed,
            stats: Stats::new(),
            columns,
        }
    }

    fn stat(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.stats.insert(key.to_string(), value.into());
        self
    }

    fn all_failed(rows: usize) -> Self {
        Self::new(vec![false; rows], Vec::new())
    }

    pub fn failed_count(&self) -> usize {
        self.passed.iter().filter(|p| !**p).count()
    }
}

/// Evaluates `rule` against every row. Never fails: unknown types and bad
/// parameters turn into an all-failing mask.
pub fn evaluate(dataset: &Dataset, rule: &Rule) -> CheckOutcome {
    let rows = dataset.num_rows();
    let Some(kind) = rule.kind() else {
        return CheckOutcome::all_failed(rows);
    };
    match check(dataset, kind, &rule.params) {
        Ok(outcome) => outcome,
        Err(err) => CheckOutcome::all_failed(rows).stat("error", err.to_string()),
    }
}

fn target<'a>(dataset: &'a Dataset, p: &Params) -> Result<(String, &'a ArrayRef), DomainError> {
    let column = params::required_str(p, "column")?;
    let array = dataset.column(column)?;
    Ok((column.to_string(), array))
}

fn check(dataset: &Dataset, kind: RuleKind, p: &Params) -> Result<CheckOutcome, DomainError> {
    match kind {
        RuleKind::NotNull => {
            let (column, array) = target(dataset, p)?;
            let missing = cell::missing_mask(array)?;
            let count = missing.iter().filter(|m| **m).count();
            let passed = missing.into_iter().map(|m| !m).collect();
            Ok(CheckOutcome::new(passed, vec![column]).stat("missing", count))
        }
        RuleKind::Unique => {
            let (column, array) = target(dataset, p)?;
            let values = cell::json_column(array)?;
            let mut seen: HashMap<String, usize> = HashMap::new();
            for v in values.iter().filter(|v| !v.is_null()) {
                *seen.entry(v.to_string()).or_default() += 1;
            }
            let passed: Vec<bool> = values
                .iter()
                .map(|v| v.is_null() || seen.get(&v.to_string()).is_none_or(|n| *n < 2))
                .collect();
            let duplicates = passed.iter().filter(|p| !**p).count();
            Ok(CheckOutcome::new(passed, vec![column]).stat("duplicates", duplicates))
        }
        RuleKind::UniqueMulti => unique_multi(dataset, params::string_list(p, "columns")?),
        RuleKind::Min => {
            let (column, array) = target(dataset, p)?;
            let min = params::required_f64(p, "min")?;
            numeric_range(array, column, Some(min), None)
        }
        RuleKind::Max => {
            let (column, array) = target(dataset, p)?;
            let max = params::required_f64(p, "max")?;
            numeric_range(array, column, None, Some(max))
        }
        RuleKind::Between => {
            let (column, array) = target(dataset, p)?;
            let min = params::required_f64(p, "min")?;
            let max = params::required_f64(p, "max")?;
            numeric_range(array, column, Some(min), Some(max))
        }
        RuleKind::Allowed => {
            let (column, array) = target(dataset, p)?;
            let allowed = params::value_list(p, "allowed")?;
            let passed = cell::json_column(array)?
                .iter()
                .map(|v| allowed.iter().any(|a| same_value(v, a)))
                .collect();
            Ok(CheckOutcome::new(passed, vec![column]))
        }
        RuleKind::Regex => {
            let (column, array) = target(dataset, p)?;
            let pattern = params::optional_str(p, "pattern")?.unwrap_or_default();
            let regex = match Regex::new(pattern) {
                Ok(regex) => regex,
                Err(err) => {
                    return Ok(CheckOutcome::new(vec![false; array.len()], vec![column])
                        .stat("error", format!("invalid regex: {err}")));
                }
            };
            // Missing cells are matched as the empty string.
            let missing = cell::missing_mask(array)?;
            let passed = cell::display_column(array)?
                .iter()
                .zip(missing)
                .map(|(s, m)| regex.is_match(if m { "" } else { s }))
                .collect();
            Ok(CheckOutcome::new(passed, vec![column]))
        }
        RuleKind::Dtype => {
            let (column, array) = target(dataset, p)?;
            let expected = params::optional_str(p, "dtype")?.unwrap_or_default();
            let actual = cell::dtype_name(array.data_type());
            let matches = canonical_dtype(expected) == actual;
            Ok(CheckOutcome::new(vec![matches; array.len()], vec![column]).stat("actual", actual))
        }
    }
}

fn unique_multi(dataset: &Dataset, columns: Vec<String>) -> Result<CheckOutcome, DomainError> {
    if columns.is_empty() {
        return Err(DomainError::invalid_parameter("columns", "needs at least one column"));
    }
    let values = columns
        .iter()
        .map(|c| cell::json_column(dataset.column(c)?))
        .collect::<Result<Vec<_>, DomainError>>()?;

    let keys: Vec<String> = (0..dataset.num_rows())
        .map(|row| {
            let tuple: Vec<&Value> = values.iter().map(|col| &col[row]).collect();
            serde_json::to_string(&tuple).unwrap_or_default()
        })
        .collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for key in &keys {
        *counts.entry(key.as_str()).or_default() += 1;
    }
    let passed: Vec<bool> = keys
        .iter()
        .map(|k| counts.get(k.as_str()).is_none_or(|n| *n < 2))
        .collect();
    let duplicates = passed.iter().filter(|p| !**p).count();
    Ok(CheckOutcome::new(passed, columns).stat("duplicates", duplicates))
}

fn numeric_range(
    array: &ArrayRef,
    column: String,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<CheckOutcome, DomainError> {
    let cells = cell::numeric_column(array)?;
    let missing = cells.iter().filter(|c| **c == Numeric::Missing).count();
    let non_numeric = cells.iter().filter(|c| **c == Numeric::NonNumeric).count();
    let passed = cells
        .into_iter()
        .map(|c| match c.value() {
            Some(v) => min.is_none_or(|m| v >= m) && max.is_none_or(|m| v <= m),
            None => false,
        })
        .collect();
    Ok(CheckOutcome::new(passed, vec![column])
        .stat("missing", missing)
        .stat("non_numeric", non_numeric))
}

/// Numbers compare numerically, everything else exactly.
fn same_value(cell: &Value, allowed: &Value) -> bool {
    match (cell, allowed) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => cell == allowed,
    }
}

/// Lowercases and folds common aliases onto the canonical dtype names.
fn canonical_dtype(expected: &str) -> String {
    let lowered = expected.trim().to_lowercase();
    match lowered.as_str() {
        "str" | "object" | "utf8" => "string".to_string(),
        "boolean" => "bool".to_string(),
        "timestamp" | "datetime64[ns]" => "datetime".to_string(),
        _ => lowered,
    }
}
