pub mod operation;
pub mod source;

pub use operation::{FnOperation, Operation};
pub use source::{DatasetSink, DatasetSource};
