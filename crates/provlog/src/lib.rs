//! Raw provenance log decoding.
//!
//! The tracer writes one event per line, as a one-letter operation tag
//! followed by colon-separated, percent-encoded fields:
//!
//! ```text
//! x:<asid>:<process>
//! u:<asid>:<process>:<filename>:<nread>
//! g:<asid>:<process>:<filename>:<nwritten>
//! q:<asid>:<process>:<started>:<ended>
//! d:<filename1>:<filename2>
//! w:<range>:<dest>:<dest-offset>:<origin>:<origin-offset>:<length>
//! o:<handle>:<filename>:<mode>
//! c:<handle>
//! #<comment>
//! ```
//!
//! [`decode_line`] splits and decodes a line, [`Event::from_record`] maps the
//! decoded fields onto a typed [`Event`].

pub mod ast;
pub mod parser;
pub mod serializer;

pub use ast::{Event, Line, OpenMode};
pub use parser::{decode_line, parse_event, ParseError};
pub use serializer::serialize_event;

/// Marks a line the converter passes through untouched.
pub const COMMENT_MARKER: char = '#';

/// Separates the operation tag and the fields of a line.
pub const DELIMITER: char = ':';

/// Stands in for a delimiter that survives percent decoding inside a field.
pub const DELIMITER_SUBSTITUTE: char = '+';
