pub mod checks;
pub mod result;
pub mod rule;

pub use checks::{CheckOutcome, evaluate};
pub use result::{QualitySummary, RuleResult, Stats};
pub use rule::{Rule, RuleKind};
