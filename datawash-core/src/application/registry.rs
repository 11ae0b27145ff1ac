// datawash-core/src/application/registry.rs

//! Name -> operation lookup shared by every pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::transforms;
use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::params::Params;
use crate::ports::operation::{FnOperation, Operation};

#[derive(Default, Clone)]
pub struct TransformRegistry {
    operations: HashMap<String, Arc<dyn Operation>>,
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("operations", &self.names())
            .finish()
    }
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in cleaning operations.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for operation in transforms::builtins() {
            registry.register(operation);
        }
        registry
    }

    /// Registers `operation` under its own name, replacing any previous entry.
    pub fn register(&mut self, operation: Arc<dyn Operation>) -> Option<Arc<dyn Operation>> {
        let name = operation.name().to_string();
        debug!(operation = %name, "Registering operation");
        self.operations.insert(name, operation)
    }

    pub fn register_fn<F>(&mut self, name: &str, func: F) -> Option<Arc<dyn Operation>>
    where
        F: Fn(&Dataset, &Params) -> Result<Dataset, DomainError> + Send + Sync + 'static,
    {
        self.register(Arc::new(FnOperation::new(name, func)))
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Operation>> {
        self.operations.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Sorted operation names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.operations.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_registered() {
        let registry = TransformRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec!["convert_type", "drop_columns", "handle_missing", "rename_columns"]
        );
        assert!(registry.contains("drop_columns"));
        assert!(registry.get("explode").is_none());
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = TransformRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register_fn("noop", |ds, _| Ok(ds.clone())).is_none());
        assert!(registry.register_fn("noop", |ds, _| Ok(ds.clone())).is_some());
        assert_eq!(registry.len(), 1);
    }
}
