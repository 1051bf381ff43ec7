//! Template rendering for the Turtle emitter.
//!
//! Uses Handlebars with HTML escaping switched off: identifiers go into the
//! output exactly as decoded. The `literal` helper escapes a value for use
//! inside a quoted Turtle string.

use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde_json::Value;

use crate::templates::TemplatesFile;
use crate::RenderError;

handlebars_helper!(literal: |text: str| escape_literal(text));

/// Compiled renderer with registered helpers
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Compile every template of a templates file
    pub fn new(templates: &TemplatesFile) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();

        // A missing field is a bug in the caller, not an empty string.
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(no_escape);
        handlebars.register_helper("literal", Box::new(literal));

        for (name, template) in &templates.templates {
            handlebars
                .register_template_string(name, &template.template)
                .map_err(|e| RenderError::Template(format!("template {}: {}", name, e)))?;
        }

        Ok(TemplateRenderer { handlebars })
    }

    /// Render a named template with data
    pub fn render(&self, template_name: &str, data: &Value) -> Result<String, RenderError> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| RenderError::Render(format!("{}: {}", template_name, e)))
    }
}

/// Escape a value for a double-quoted Turtle string
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
