//! Process label normalization.
//!
//! The tracer joins the sub-fields of a process identifier with `;`. Graph
//! identifiers use `:` instead, which the line decoder has already cleared
//! out of every field, so the replacement cannot collide with a real field.

use std::fmt;

/// Separator between sub-fields of a raw process label.
pub const LABEL_SEPARATOR: char = ';';

/// Separator between sub-fields of a graph identifier.
pub const GRAPH_SEPARATOR: char = ':';

/// Canonical label of one process, used as its Activity node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessLabel(String);

impl ProcessLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProcessLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProcessLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a raw process field into a flat graph label
pub fn normalize_label(raw: &str) -> ProcessLabel {
    ProcessLabel(raw.replace(LABEL_SEPARATOR, &GRAPH_SEPARATOR.to_string()))
}
