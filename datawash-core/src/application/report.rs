// datawash-core/src/application/report.rs

//! Self-contained HTML quality report.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::ports::TemplateEngine;
use crate::domain::dataset::Dataset;
use crate::domain::quality::{QualitySummary, Rule, RuleResult};
use crate::error::DatawashError;

pub const REPORT_TEMPLATE: &str = "quality_report.html";
pub const DEFAULT_SAMPLE_ROWS: usize = 50;
pub const DEFAULT_TITLE: &str = "Data Quality Report";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportMetadata {
    pub title: String,
    /// The only time-dependent input of a report.
    pub generated_at: DateTime<Utc>,
    pub source: Option<String>,
}

impl ReportMetadata {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            generated_at,
            source: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

pub struct ReportGenerator {
    engine: Arc<dyn TemplateEngine>,
    sample_rows: usize,
}

impl ReportGenerator {
    pub fn new(engine: Arc<dyn TemplateEngine>) -> Self {
        Self {
            engine,
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }

    pub fn with_sample_rows(mut self, sample_rows: usize) -> Self {
        self.sample_rows = sample_rows;
        self
    }

    /// Renders the report. Identical inputs give byte-identical output.
    #[instrument(skip_all, fields(rules = rules.len(), results = results.len()))]
    pub fn render(
        &self,
        dataset: &Dataset,
        rules: &[Rule],
        results: &[RuleResult],
        summary: &QualitySummary,
        metadata: &ReportMetadata,
    ) -> Result<String, DatawashError> {
        let context = self.context(dataset, rules, results, summary, metadata)?;
        let html = self.engine.render(REPORT_TEMPLATE, &context)?;
        info!(bytes = html.len(), "Quality report rendered");
        Ok(html)
    }

    fn context(
        &self,
        dataset: &Dataset,
        rules: &[Rule],
        results: &[RuleResult],
        summary: &QualitySummary,
        metadata: &ReportMetadata,
    ) -> Result<Value, DatawashError> {
        let rules: Vec<Value> = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                json!({
                    "index": i + 1,
                    "label": rule.label(),
                    "params": Value::Object(rule.params.clone()).to_string(),
                })
            })
            .collect();

        let results_ctx: Vec<Value> = results
            .iter()
            .map(|r| {
                json!({
                    "label": r.label,
                    "type": r.rule_type,
                    "failed_count": r.failed_count,
                    "status": if r.passed { "PASS" } else { "FAIL" },
                })
            })
            .collect();

        // Union of the sampled ids, ascending.
        let sampled: BTreeSet<u64> = results
            .iter()
            .flat_map(|r| r.failed_row_ids.iter().copied())
            .collect();
        let positions = dataset.row_positions();
        let picked: Vec<(u64, usize)> = sampled
            .into_iter()
            .filter_map(|id| positions.get(&id).map(|p| (id, *p)))
            .take(self.sample_rows)
            .collect();
        let cells = dataset.display_positions(
            &picked.iter().map(|(_, p)| *p).collect::<Vec<_>>(),
        )?;
        let sample_rows: Vec<Value> = picked
            .iter()
            .zip(cells)
            .map(|((id, _), cells)| json!({"row_id": id, "cells": cells}))
            .collect();

        Ok(json!({
            "meta": {
                "title": metadata.title,
                "generated_at": metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                "source": metadata.source,
                "rows": dataset.num_rows(),
                "columns": dataset.num_columns(),
            },
            "summary": {
                "pass_rate": format!("{:.1}", summary.pass_rate),
                "failed_row_total": summary.failed_row_total,
                "issue_column_count": summary.issue_columns.len(),
                "issue_columns": summary.issue_columns,
            },
            "rules": rules,
            "results": results_ctx,
            "sample": {
                "limit": self.sample_rows,
                "columns": dataset.column_names(),
                "rows": sample_rows,
            },
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::validation::run_rules;
    use crate::infrastructure::template::JinjaRenderer;
    use chrono::TimeZone;
    use datafusion::arrow::array::{ArrayRef, Int64Array, StringArray};

    fn generator() -> ReportGenerator {
        ReportGenerator::new(Arc::new(JinjaRenderer::new().unwrap()))
    }

    fn dataset() -> Dataset {
        Dataset::from_columns([
            (
                "id",
                Arc::new(Int64Array::from(vec![Some(1), None, Some(3)])) as ArrayRef,
            ),
            (
                "note",
                Arc::new(StringArray::from(vec!["ok", "<script>alert(1)</script>", "fine"]))
                    as ArrayRef,
            ),
        ])
        .unwrap()
    }

    fn rules() -> Vec<Rule> {
        serde_json::from_value(json!([
            {"type": "not_null", "params": {"column": "id"}},
            {"type": "regex", "params": {"column": "note", "pattern": "^<b>"}}
        ]))
        .unwrap()
    }

    fn metadata() -> ReportMetadata {
        ReportMetadata::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
            .with_source("people.csv")
    }

    #[test]
    fn test_report_is_deterministic_and_escaped() -> anyhow::Result<()> {
        let ds = dataset();
        let rules = rules();
        let (results, summary) = run_rules(&ds, &rules);

        let first = generator().render(&ds, &rules, &results, &summary, &metadata())?;
        let second = generator().render(&ds, &rules, &results, &summary, &metadata())?;
        assert_eq!(first, second);

        assert!(first.contains("2024-05-01 12:00:00 UTC"));
        assert!(first.contains("people.csv"));
        assert!(first.contains("0.0%"));
        assert!(first.contains("FAIL"));
        assert!(first.contains("&lt;script&gt;"));
        assert!(!first.contains("<script>"));
        assert!(first.contains("Regex &#x27;^&lt;b&gt;&#x27; on note"));
        Ok(())
    }

    #[test]
    fn test_sample_rows_are_capped() -> anyhow::Result<()> {
        let ds = dataset();
        let rules = rules();
        let (results, summary) = run_rules(&ds, &rules);

        let html = generator()
            .with_sample_rows(1)
            .render(&ds, &rules, &results, &summary, &metadata())?;
        assert!(html.contains(r#"<td class="row-id">0</td>"#));
        assert!(!html.contains(r#"<td class="row-id">2</td>"#));
        Ok(())
    }

    #[test]
    fn test_all_passing_report() -> anyhow::Result<()> {
        let ds = dataset();
        let (results, summary) = run_rules(&ds, &[]);
        let html = generator().render(&ds, &[], &results, &summary, &metadata())?;
        assert!(html.contains("100.0%"));
        assert!(html.contains("No failing rows"));
        Ok(())
    }
}
