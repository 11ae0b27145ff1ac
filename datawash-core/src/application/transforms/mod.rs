// datawash-core/src/application/transforms/mod.rs

//! Built-in cleaning operations registered by `TransformRegistry::with_builtins`.

pub mod columns;
pub mod convert;
pub mod missing;

use std::sync::Arc;

use crate::ports::operation::{FnOperation, Operation};

pub const DROP_COLUMNS: &str = "drop_columns";
pub const RENAME_COLUMNS: &str = "rename_columns";
pub const CONVERT_TYPE: &str = "convert_type";
pub const HANDLE_MISSING: &str = "handle_missing";

pub fn builtins() -> Vec<Arc<dyn Operation>> {
    vec![
        Arc::new(FnOperation::new(DROP_COLUMNS, columns::drop_columns)),
        Arc::new(FnOperation::new(RENAME_COLUMNS, columns::rename_columns)),
        Arc::new(FnOperation::new(CONVERT_TYPE, convert::convert_type)),
        Arc::new(FnOperation::new(HANDLE_MISSING, missing::handle_missing)),
    ]
}
