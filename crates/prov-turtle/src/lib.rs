//! PROV-O Turtle emission.
//!
//! Every provenance fact maps onto one fixed Turtle template. Activities
//! (process executions) are named `<exe://LABEL>`, entities (files)
//! `<file:NAME>`.
//!
//! # Example
//!
//! ```ignore
//! use prov_turtle::{Fact, TurtleEmitter};
//!
//! let emitter = TurtleEmitter::builtin()?;
//! let ttl = emitter.render(&Fact::Used {
//!     process: "bash~10".to_string(),
//!     file: "/etc/passwd".to_string(),
//! })?;
//! assert_eq!(ttl, "<exe://bash~10> prov:used <file:/etc/passwd> .");
//! ```

pub mod renderer;
pub mod templates;

use renderer::TemplateRenderer;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use templates::TemplatesFile;
use thiserror::Error;

/// One provenance fact, rendered as one or more triples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    /// Activity declaration with its program category.
    Activity { process: String, kind: String },
    /// Entity declaration with label and content type.
    Entity { file: String, kind: String },
    Used { process: String, file: String },
    Generated { file: String, process: String },
    Derived { file: String, origin: String },
    Duration { process: String, started: String, ended: String },
}

impl Fact {
    /// Name of the template rendering this fact
    pub fn template_name(&self) -> &'static str {
        match self {
            Fact::Activity { .. } => "activity",
            Fact::Entity { .. } => "entity",
            Fact::Used { .. } => "used",
            Fact::Generated { .. } => "generated",
            Fact::Derived { .. } => "derived",
            Fact::Duration { .. } => "duration",
        }
    }
}

/// Errors that can occur during rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template load failed: {0}")]
    Template(String),
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders facts into Turtle text.
pub struct TurtleEmitter {
    renderer: TemplateRenderer,
}

impl TurtleEmitter {
    pub fn new(templates: &TemplatesFile) -> Result<Self, RenderError> {
        Ok(TurtleEmitter { renderer: TemplateRenderer::new(templates)? })
    }

    /// Emitter over the compiled-in templates
    pub fn builtin() -> Result<Self, RenderError> {
        Self::new(&TemplatesFile::builtin()?)
    }

    /// Emitter over a templates file on disk
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        tracing::debug!(path = %path.display(), "loading turtle templates");
        Self::new(&TemplatesFile::load(path)?)
    }

    /// The `@prefix` block opening every document
    pub fn header(&self) -> Result<String, RenderError> {
        self.renderer.render("header", &json!({}))
    }

    pub fn render(&self, fact: &Fact) -> Result<String, RenderError> {
        let data = match fact {
            Fact::Activity { process, kind } => json!({ "process": process, "kind": kind }),
            Fact::Entity { file, kind } => json!({ "file": file, "kind": kind }),
            Fact::Used { process, file } | Fact::Generated { file, process } => {
                json!({ "process": process, "file": file })
            }
            Fact::Derived { file, origin } => json!({ "file": file, "origin": origin }),
            Fact::Duration { process, started, ended } => {
                json!({ "process": process, "started": started, "ended": ended })
            }
        };
        self.renderer.render(fact.template_name(), &data)
    }

    /// Render a fact and write it as complete lines
    pub fn write_fact<W: Write + ?Sized>(&self, out: &mut W, fact: &Fact) -> Result<(), RenderError> {
        let text = self.render(fact)?;
        writeln!(out, "{}", text)?;
        Ok(())
    }

    pub fn write_header<W: Write + ?Sized>(&self, out: &mut W) -> Result<(), RenderError> {
        writeln!(out, "{}", self.header()?)?;
        Ok(())
    }
}
