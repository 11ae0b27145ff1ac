// datawash-core/src/ports/operation.rs

// What a pipeline step needs from a transformation: a name and a pure
// function from (dataset, params) to a new dataset. The pipeline never knows
// which concrete operations exist.

use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::params::Params;

pub trait Operation: Send + Sync {
    fn name(&self) -> &str;

    /// Must not mutate `dataset`; returns a fresh value.
    fn apply(&self, dataset: &Dataset, params: &Params) -> Result<Dataset, DomainError>;
}

/// Adapts a plain function or closure into an [`Operation`].
pub struct FnOperation<F> {
    name: String,
    func: F,
}

impl<F> FnOperation<F>
where
    F: Fn(&Dataset, &Params) -> Result<Dataset, DomainError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Operation for FnOperation<F>
where
    F: Fn(&Dataset, &Params) -> Result<Dataset, DomainError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, dataset: &Dataset, params: &Params) -> Result<Dataset, DomainError> {
        (self.func)(dataset, params)
    }
}
