//! Unified error model
use provlog::ParseError;
use prov_turtle::RenderError;
use thiserror::Error;

/// Failures of a single event against the provenance state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("no active mapping for descriptor {0}")]
    UnmappedDescriptor(String),
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("PARSE/{0}")]
    Parse(#[from] ParseError),

    #[error("STATE/{0}")]
    State(#[from] StateError),

    #[error("RENDER/{0}")]
    Render(#[from] RenderError),

    #[error("IO/{0}")]
    Io(#[from] std::io::Error),

    #[error("ABORT/line {line}: {source}")]
    Aborted {
        line: u64,
        #[source]
        source: ParseError,
    },
}

impl ConvertError {
    /// Whether the error concerns one input line rather than the run.
    pub fn is_line_error(&self) -> bool {
        matches!(self, ConvertError::Parse(_) | ConvertError::State(_))
    }
}
