//! raw2ttl: raw tracer provenance log to PROV-O Turtle
//!
//! A single forward pass over the log. [`ProvState`] remembers what the
//! output has already declared and which descriptors name which files;
//! [`Converter`] feeds it one line at a time and streams the triples out.
//!
//! ```text
//! line → provlog (decode) → ProvState (facts) → prov-turtle (triples) → out
//! ```

pub mod context;
pub mod error;
pub mod runner;
pub mod state;

pub use context::{ConvertOptions, ErrorPolicy};
pub use error::{ConvertError, StateError};
pub use runner::{convert_str, ConvertStats, Converter, BAD_LINE_PREFIX, DEBUG_LINE_PREFIX};
pub use state::ProvState;
