//! Template loading for the Turtle emitter.
//!
//! Templates live in a YAML document with one Handlebars template per
//! triple shape. The default set is compiled into the crate; a replacement
//! file must define every name in [`REQUIRED_TEMPLATES`].

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::RenderError;

/// Templates shipped with the crate
pub const DEFAULT_TEMPLATES: &str = include_str!("../templates/turtle.yaml");

/// Names every templates file has to provide
pub const REQUIRED_TEMPLATES: [&str; 7] = [
    "header",
    "activity",
    "entity",
    "used",
    "generated",
    "derived",
    "duration",
];

/// Top-level templates file structure
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    pub version: String,
    pub templates: HashMap<String, Template>,
}

/// A single template definition
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub description: String,
    pub template: String,
}

impl TemplatesFile {
    /// Load templates from a YAML file
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RenderError::Template(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse templates from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, RenderError> {
        let file: TemplatesFile = serde_yaml::from_str(yaml)
            .map_err(|e| RenderError::Template(format!("invalid templates YAML: {}", e)))?;
        file.validate()?;
        Ok(file)
    }

    /// The compiled-in template set
    pub fn builtin() -> Result<Self, RenderError> {
        Self::from_yaml(DEFAULT_TEMPLATES)
    }

    fn validate(&self) -> Result<(), RenderError> {
        let missing: Vec<&str> = REQUIRED_TEMPLATES
            .iter()
            .copied()
            .filter(|name| !self.templates.contains_key(*name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RenderError::Template(format!("missing templates: {}", missing.join(", "))))
        }
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_complete() {
        let file = TemplatesFile::builtin().unwrap();
        for name in REQUIRED_TEMPLATES {
            assert!(file.get(name).is_some(), "missing {}", name);
        }
        assert!(file.get("header").unwrap().template.starts_with("@prefix prov:"));
    }

    #[test]
    fn test_missing_template_rejected() {
        let yaml = r#"
version: "1.0"
templates:
  header:
    template: "@prefix prov: <http://www.w3.org/ns/prov#> ."
"#;
        let err = TemplatesFile::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("activity"));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(TemplatesFile::from_yaml("templates: [").is_err());
    }
}
