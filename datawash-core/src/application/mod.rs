// datawash-core/src/application/mod.rs

pub mod pipeline;
pub mod ports;
pub mod registry;
pub mod report;
pub mod session;
pub mod transforms;
pub mod validation;

// --- RE-EXPORTS (FACADE PATTERN) ---
pub use pipeline::{Pipeline, Replay, SkippedStep};
pub use registry::TransformRegistry;
pub use report::{ReportGenerator, ReportMetadata};
pub use session::Session;
pub use validation::{run_rules, run_rules_with};
