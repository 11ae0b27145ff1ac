// datawash-core/src/application/pipeline.rs

//! Ordered, undoable log of cleaning steps, replayed against a stored
//! original dataset.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::registry::TransformRegistry;
use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::params::Params;
use crate::domain::pipeline::document::DEFAULT_VERSION;
use crate::domain::pipeline::{DocumentMeta, OnError, PipelineDocument, Step};

/// A step that replay passed over, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedStep {
    pub index: usize,
    pub operation: String,
    pub reason: String,
}

/// Outcome of a replay: the final dataset plus what happened on the way.
#[derive(Debug, Clone)]
pub struct Replay {
    pub dataset: Dataset,
    pub applied: usize,
    pub skipped: Vec<SkippedStep>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Vec<Step>,
    // Most recently undone step last.
    redo: Vec<Step>,
    version: String,
    registry: Arc<TransformRegistry>,
}

impl Pipeline {
    pub fn new(registry: Arc<TransformRegistry>) -> Self {
        Self {
            steps: Vec::new(),
            redo: Vec::new(),
            version: DEFAULT_VERSION.to_string(),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<TransformRegistry> {
        &self.registry
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn redo_steps(&self) -> &[Step] {
        &self.redo
    }

    pub fn has_steps(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Appends a step and clears the redo buffer. The operation name is not
    /// checked against the registry here.
    pub fn add_step(
        &mut self,
        operation: impl Into<String>,
        parameters: Params,
        label: Option<String>,
    ) -> &Step {
        let mut timestamp = Utc::now();
        if let Some(last) = self.steps.last() {
            timestamp = timestamp.max(last.timestamp());
        }
        self.redo.clear();
        self.steps
            .push(Step::new(operation, parameters, label, timestamp));
        &self.steps[self.steps.len() - 1]
    }

    pub fn undo(&mut self) -> bool {
        match self.steps.pop() {
            Some(step) => {
                debug!(operation = step.operation(), "Undo");
                self.redo.push(step);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo.pop() {
            Some(step) => {
                debug!(operation = step.operation(), "Redo");
                self.steps.push(step);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.steps.clear();
        self.redo.clear();
    }

    /// Replays every step, in order, on `dataset` and reports skipped steps.
    /// `dataset` itself is never modified.
    #[instrument(skip(self, dataset), fields(steps = self.steps.len(), rows = dataset.num_rows()))]
    pub fn replay(&self, dataset: &Dataset, on_error: OnError) -> Result<Replay, DomainError> {
        let mut current = dataset.clone();
        let mut applied = 0;
        let mut skipped = Vec::new();

        for (index, step) in self.steps.iter().enumerate() {
            let outcome = match self.registry.get(step.operation()) {
                Some(operation) => operation
                    .apply(&current, step.parameters())
                    .map_err(|source| DomainError::StepFailed {
                        index,
                        operation: step.operation().to_string(),
                        source: Box::new(source),
                    }),
                None => Err(DomainError::UnknownOperation {
                    index,
                    operation: step.operation().to_string(),
                }),
            };

            match outcome {
                Ok(next) => {
                    current = next;
                    applied += 1;
                }
                Err(err) if on_error == OnError::Raise => return Err(err),
                Err(err) => {
                    warn!(index, operation = step.operation(), error = %err, "Skipping pipeline step");
                    skipped.push(SkippedStep {
                        index,
                        operation: step.operation().to_string(),
                        reason: match &err {
                            DomainError::StepFailed { source, .. } => source.to_string(),
                            other => other.to_string(),
                        },
                    });
                }
            }
        }

        info!(applied, skipped = skipped.len(), "Pipeline replayed");
        Ok(Replay {
            dataset: current,
            applied,
            skipped,
        })
    }

    pub fn apply(&self, dataset: &Dataset, on_error: OnError) -> Result<Dataset, DomainError> {
        self.replay(dataset, on_error).map(|replay| replay.dataset)
    }

    pub fn to_document(&self) -> PipelineDocument {
        PipelineDocument {
            version: self.version.clone(),
            steps: self.steps.clone(),
            meta: DocumentMeta {
                exported_at: Some(Utc::now()),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| DomainError::Document(e.to_string()))
    }

    /// Rebuilds a pipeline from its document. Step timestamps are kept exactly
    /// as given, even out of order; only steps added afterwards are clamped.
    /// The redo buffer starts empty.
    pub fn from_document(document: PipelineDocument, registry: Arc<TransformRegistry>) -> Self {
        Self {
            steps: document.steps,
            redo: Vec::new(),
            version: document.version,
            registry,
        }
    }

    pub fn from_json(text: &str, registry: Arc<TransformRegistry>) -> Result<Self, DomainError> {
        let document: PipelineDocument =
            serde_json::from_str(text).map_err(|e| DomainError::Document(e.to_string()))?;
        Ok(Self::from_document(document, registry))
    }
}
