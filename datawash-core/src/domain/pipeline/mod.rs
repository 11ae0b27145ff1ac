pub mod document;
pub mod policy;
pub mod step;
pub mod wire;

pub use document::{DocumentMeta, PipelineDocument};
pub use policy::OnError;
pub use step::Step;
