// datawash-core/src/application/session.rs

//! Explicit working context: the loaded dataset, its cleaned view, the
//! pipeline that produced it and the active quality rules.
//!
//! Every mutating call either succeeds completely or leaves the session
//! exactly as it was.

use std::sync::Arc;

use tracing::{info, instrument};

use super::pipeline::{Pipeline, SkippedStep};
use super::registry::TransformRegistry;
use super::validation::{DEFAULT_FAILED_ROW_SAMPLE, run_rules_with};
use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::params::Params;
use crate::domain::pipeline::OnError;
use crate::domain::quality::{QualitySummary, Rule, RuleResult};

#[derive(Debug, Clone)]
pub struct Session {
    original: Dataset,
    current: Dataset,
    pipeline: Pipeline,
    rules: Vec<Rule>,
    on_error: OnError,
    failed_row_sample: usize,
}

impl Session {
    pub fn new(original: Dataset, registry: Arc<TransformRegistry>) -> Self {
        Self {
            current: original.clone(),
            original,
            pipeline: Pipeline::new(registry),
            rules: Vec::new(),
            on_error: OnError::default(),
            failed_row_sample: DEFAULT_FAILED_ROW_SAMPLE,
        }
    }

    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    pub fn with_failed_row_sample(mut self, failed_row_sample: usize) -> Self {
        self.failed_row_sample = failed_row_sample;
        self
    }

    pub fn original(&self) -> &Dataset {
        &self.original
    }

    pub fn current(&self) -> &Dataset {
        &self.current
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn on_error(&self) -> OnError {
        self.on_error
    }

    /// Replays `candidate` on the original and commits both on success.
    fn commit(&mut self, candidate: Pipeline) -> Result<Vec<SkippedStep>, DomainError> {
        let replay = candidate.replay(&self.original, self.on_error)?;
        self.pipeline = candidate;
        self.current = replay.dataset;
        Ok(replay.skipped)
    }

    /// Records a new step and refreshes the current dataset.
    #[instrument(skip(self, parameters))]
    pub fn record(
        &mut self,
        operation: &str,
        parameters: Params,
        label: Option<String>,
    ) -> Result<Vec<SkippedStep>, DomainError> {
        let mut candidate = self.pipeline.clone();
        candidate.add_step(operation, parameters, label);
        let skipped = self.commit(candidate)?;
        info!(steps = self.pipeline.len(), rows = self.current.num_rows(), "Step recorded");
        Ok(skipped)
    }

    /// Returns `Ok(false)` when there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, DomainError> {
        let mut candidate = self.pipeline.clone();
        if !candidate.undo() {
            return Ok(false);
        }
        self.commit(candidate)?;
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, DomainError> {
        let mut candidate = self.pipeline.clone();
        if !candidate.redo() {
            return Ok(false);
        }
        self.commit(candidate)?;
        Ok(true)
    }

    /// Drops every step and returns to the original dataset.
    pub fn reset(&mut self) {
        self.pipeline.clear();
        self.current = self.original.clone();
    }

    /// Replaces the pipeline with one parsed from `json`.
    pub fn load_pipeline(&mut self, json: &str) -> Result<Vec<SkippedStep>, DomainError> {
        let candidate = Pipeline::from_json(json, self.pipeline.registry().clone())?;
        self.commit(candidate)
    }

    /// Swaps the original dataset and replays the current pipeline on it.
    pub fn load_dataset(&mut self, original: Dataset) -> Result<Vec<SkippedStep>, DomainError> {
        let replay = self.pipeline.replay(&original, self.on_error)?;
        self.original = original;
        self.current = replay.dataset;
        Ok(replay.skipped)
    }

    pub fn set_rules(&mut self, rules: Vec<Rule>) {
        self.rules = rules;
    }

    /// Replaces the rules with a JSON array of `{"type", "params"}` objects.
    pub fn load_rules(&mut self, json: &str) -> Result<(), DomainError> {
        let rules: Vec<Rule> =
            serde_json::from_str(json).map_err(|e| DomainError::Document(e.to_string()))?;
        self.rules = rules;
        Ok(())
    }

    /// Evaluates the active rules against the current dataset.
    pub fn check(&self) -> (Vec<RuleResult>, QualitySummary) {
        run_rules_with(&self.current, &self.rules, self.failed_row_sample)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{ArrayRef, Float64Array, StringArray};
    use serde_json::{Value, json};

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap_or_default()
    }

    fn session() -> Session {
        let ds = Dataset::from_columns([
            (
                "age",
                Arc::new(Float64Array::from(vec![Some(30.0), None, Some(41.0)])) as ArrayRef,
            ),
            (
                "city",
                Arc::new(StringArray::from(vec!["Paris", "Lyon", "Paris"])) as ArrayRef,
            ),
        ])
        .unwrap();
        Session::new(ds, Arc::new(TransformRegistry::with_builtins()))
    }

    #[test]
    fn test_record_undo_redo_reset() -> anyhow::Result<()> {
        let mut s = session();
        s.record("drop_columns", params(json!({"columns": ["city"]})), None)?;
        assert_eq!(s.current().column_names(), vec!["age"]);

        assert!(s.undo()?);
        assert_eq!(s.current(), s.original());
        assert!(!s.undo()?);

        assert!(s.redo()?);
        assert_eq!(s.current().num_columns(), 1);

        s.reset();
        assert_eq!(s.current(), s.original());
        assert!(s.pipeline().is_empty());
        Ok(())
    }

    #[test]
    fn test_failed_record_leaves_state_untouched() -> anyhow::Result<()> {
        let mut s = session().with_on_error(OnError::Raise);
        s.record("handle_missing", params(json!({"strategy": "drop"})), None)?;
        let before_rows = s.current().num_rows();

        assert!(s.record("drop_columns", params(json!({"columns": ["ghost"]})), None).is_err());
        assert_eq!(s.pipeline().len(), 1);
        assert_eq!(s.current().num_rows(), before_rows);
        Ok(())
    }

    #[test]
    fn test_skip_mode_reports_skipped_steps() -> anyhow::Result<()> {
        let mut s = session();
        let skipped = s.record("teleport", Params::new(), None)?;
        assert_eq!(skipped.len(), 1);
        assert_eq!(s.pipeline().len(), 1);
        assert_eq!(s.current(), s.original());
        Ok(())
    }

    #[test]
    fn test_bad_pipeline_document_is_rejected() -> anyhow::Result<()> {
        let mut s = session();
        s.record("drop_columns", params(json!({"columns": ["city"]})), None)?;
        assert!(s.load_pipeline(r#"{"steps": [{"params": {}}]}"#).is_err());
        assert_eq!(s.pipeline().len(), 1);
        assert_eq!(s.current().column_names(), vec!["age"]);

        s.load_pipeline(r#"{"version": "1.0", "steps": []}"#)?;
        assert_eq!(s.current(), s.original());
        Ok(())
    }

    #[test]
    fn test_check_runs_rules_on_current_view() -> anyhow::Result<()> {
        let mut s = session();
        s.load_rules(r#"[{"type": "not_null", "params": {"column": "age"}}]"#)?;
        let (results, summary) = s.check();
        assert_eq!(results[0].failed_row_ids, vec![1]);
        assert_eq!(summary.pass_rate, 0.0);

        s.record("handle_missing", params(json!({"strategy": "drop"})), None)?;
        let (_, summary) = s.check();
        assert_eq!(summary.pass_rate, 100.0);

        assert!(s.load_rules("{}").is_err());
        assert_eq!(s.rules().len(), 1);
        Ok(())
    }
}
