pub mod jinja;

pub use jinja::JinjaRenderer;
