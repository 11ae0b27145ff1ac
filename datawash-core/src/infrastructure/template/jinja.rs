// datawash-core/src/infrastructure/template/jinja.rs

// Report rendering backed by minijinja. Templates ending in `.html` are
// auto-escaped, so dataset values and rule parameters can be handed to the
// template as-is.

use minijinja::{AutoEscape, Environment};

use crate::application::ports::TemplateEngine;
use crate::application::report::REPORT_TEMPLATE;
use crate::error::DatawashError;
use crate::infrastructure::error::InfrastructureError;

const QUALITY_REPORT_SOURCE: &str = include_str!("../../../templates/quality_report.html");

pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    /// Environment with the bundled report template.
    pub fn new() -> Result<Self, InfrastructureError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|name| {
            if name.ends_with(".html") {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });
        env.add_template(REPORT_TEMPLATE, QUALITY_REPORT_SOURCE)?;
        Ok(Self { env })
    }

    /// Registers (or replaces) a template, e.g. a user supplied report layout.
    pub fn with_template(mut self, name: &str, source: String) -> Result<Self, InfrastructureError> {
        self.env.add_template_owned(name.to_string(), source)?;
        Ok(self)
    }
}

impl TemplateEngine for JinjaRenderer {
    fn render(&self, template_name: &str, context: &serde_json::Value) -> Result<String, DatawashError> {
        let template = self
            .env
            .get_template(template_name)
            .map_err(InfrastructureError::TemplateError)?;
        template
            .render(context)
            .map_err(|e| DatawashError::Infrastructure(InfrastructureError::TemplateError(e)))
    }
}
