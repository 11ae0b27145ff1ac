pub mod dataset;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod project;
pub mod quality;

pub use error::DomainError;
