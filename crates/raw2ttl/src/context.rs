//! Conversion options
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_ON_ERROR: &str = "RAW2TTL_ON_ERROR";
pub const ENV_DEBUG: &str = "RAW2TTL_DEBUG";
pub const ENV_TEMPLATES: &str = "RAW2TTL_TEMPLATES";

/// What to do after a line that cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Comment the line out and keep going.
    #[default]
    Skip,
    /// Comment the line out and stop the run.
    Abort,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(ErrorPolicy::Skip),
            "abort" => Ok(ErrorPolicy::Abort),
            other => Err(format!("unknown error policy '{}' (expected skip or abort)", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub on_error: ErrorPolicy,
    /// Echo every event line as a `# Debug line:` comment before its triples.
    pub debug_echo: bool,
    /// Templates file replacing the compiled-in Turtle templates.
    pub templates_path: Option<PathBuf>,
}

impl ConvertOptions {
    /// Options from the `RAW2TTL_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let on_error = match lookup(ENV_ON_ERROR) {
            Some(raw) => raw.parse::<ErrorPolicy>().unwrap_or_else(|e| {
                tracing::warn!("{}: {}, using skip", ENV_ON_ERROR, e);
                ErrorPolicy::default()
            }),
            None => ErrorPolicy::default(),
        };

        let debug_echo = lookup(ENV_DEBUG)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let templates_path = lookup(ENV_TEMPLATES)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self { on_error, debug_echo, templates_path }
    }
}
