// datawash-core/src/domain/quality/rule.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::domain::params::Params;

/// Declarative check: `{"type": "...", "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default)]
    pub params: Params,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    NotNull,
    Unique,
    UniqueMulti,
    Min,
    Max,
    Between,
    Allowed,
    Regex,
    Dtype,
}

impl RuleKind {
    pub const ALL: [RuleKind; 9] = [
        RuleKind::NotNull,
        RuleKind::Unique,
        RuleKind::UniqueMulti,
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Between,
        RuleKind::Allowed,
        RuleKind::Regex,
        RuleKind::Dtype,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::NotNull => "not_null",
            RuleKind::Unique => "unique",
            RuleKind::UniqueMulti => "unique_multi",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Between => "between",
            RuleKind::Allowed => "allowed",
            RuleKind::Regex => "regex",
            RuleKind::Dtype => "dtype",
        }
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown rule type '{s}'"))
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn show(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl Rule {
    pub fn new(rule_type: impl Into<String>, params: Params) -> Self {
        Self {
            rule_type: rule_type.into(),
            params,
        }
    }

    pub fn kind(&self) -> Option<RuleKind> {
        self.rule_type.parse().ok()
    }

    /// Human readable description, e.g. `Between [0, 10] on age`.
    pub fn label(&self) -> String {
        let p = &self.params;
        let column = show(p.get("column"));
        match self.kind() {
            Some(RuleKind::NotNull) => format!("Not Null: {column}"),
            Some(RuleKind::Unique) => format!("Unique: {column}"),
            Some(RuleKind::UniqueMulti) => {
                let columns: Vec<String> = match p.get("columns") {
                    Some(Value::Array(items)) => items.iter().map(|v| show(Some(v))).collect(),
                    _ => Vec::new(),
                };
                format!("Unique across: {}", columns.join(", "))
            }
            Some(RuleKind::Min) => format!("Min {} on {column}", show(p.get("min"))),
            Some(RuleKind::Max) => format!("Max {} on {column}", show(p.get("max"))),
            Some(RuleKind::Between) => format!(
                "Between [{}, {}] on {column}",
                show(p.get("min")),
                show(p.get("max"))
            ),
            Some(RuleKind::Allowed) => format!("Allowed set on {column}"),
            Some(RuleKind::Regex) => format!("Regex '{}' on {column}", show(p.get("pattern"))),
            Some(RuleKind::Dtype) => format!("Dtype is {} on {column}", show(p.get("dtype"))),
            None => format!("{}: {}", self.rule_type, Value::Object(p.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(value: Value) -> Rule {
        serde_json::from_value(value).unwrap_or_else(|_| Rule::new("invalid", Params::new()))
    }

    #[test]
    fn test_labels() {
        insta::assert_snapshot!(
            rule(json!({"type": "not_null", "params": {"column": "age"}})).label(),
            @"Not Null: age"
        );
        insta::assert_snapshot!(
            rule(json!({"type": "unique_multi", "params": {"columns": ["a", "b"]}})).label(),
            @"Unique across: a, b"
        );
        insta::assert_snapshot!(
            rule(json!({"type": "between", "params": {"column": "age", "min": 0, "max": 10.5}})).label(),
            @"Between [0, 10.5] on age"
        );
        insta::assert_snapshot!(
            rule(json!({"type": "regex", "params": {"column": "email", "pattern": "@"}})).label(),
            @"Regex '@' on email"
        );
        insta::assert_snapshot!(
            rule(json!({"type": "dtype", "params": {"column": "id", "dtype": "int64"}})).label(),
            @"Dtype is int64 on id"
        );
        insta::assert_snapshot!(
            rule(json!({"type": "min", "params": {}})).label(),
            @"Min None on None"
        );
        insta::assert_snapshot!(
            rule(json!({"type": "no_such_rule", "params": {"x": 1}})).label(),
            @r#"no_such_rule: {"x":1}"#
        );
    }

    #[test]
    fn test_params_default_to_empty() -> anyhow::Result<()> {
        let r: Rule = serde_json::from_value(json!({"type": "unique"}))?;
        assert!(r.params.is_empty());
        assert_eq!(r.kind(), Some(RuleKind::Unique));
        Ok(())
    }
}
