// datawash-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports: contracts the engines depend on (operations, dataset IO).
pub mod ports;

// 2. Domain: datasets, steps, rules and their pure evaluation.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure: config files, documents on disk, DataFusion IO, templates.
pub mod infrastructure;

// 4. Application: pipeline replay, registry, quality runs, report, session.
pub mod application;

pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use application::{Pipeline, ReportGenerator, Session, TransformRegistry};
pub use domain::dataset::Dataset;
pub use domain::pipeline::{OnError, Step};
pub use domain::quality::{QualitySummary, Rule, RuleResult};
pub use error::DatawashError;
