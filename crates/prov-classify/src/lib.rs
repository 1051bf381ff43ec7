//! Process-label normalization and entity classification.
//!
//! Turns the raw process identifiers of the tracer log into graph node
//! labels, and assigns every file and process a type tag from the desktop
//! vocabulary:
//!
//! ```ignore
//! use prov_classify::{classify_file, classify_process, normalize_label};
//!
//! let label = normalize_label("cron~100");
//! assert_eq!(classify_process(&label), "Daemon");
//! assert_eq!(classify_file("/etc/passwd"), "Unknown");
//! ```

pub mod classifier;
pub mod normalizer;

pub use classifier::{classify_file, classify_process, executable_token, UNKNOWN_TYPE};
pub use normalizer::{normalize_label, ProcessLabel};
