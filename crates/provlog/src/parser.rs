use crate::ast::{Event, Line};
use crate::{COMMENT_MARKER, DELIMITER, DELIMITER_SUBSTITUTE};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no '{}' delimiter in line", DELIMITER)]
    NoDelimiter,
    #[error("unknown operation '{0}'")]
    UnknownOp(String),
    #[error("operation '{op}' takes {expected} fields, got {got}")]
    FieldCount { op: String, expected: usize, got: usize },
    #[error("field {field} is not a number: '{value}'")]
    NotANumber { field: &'static str, value: String },
    #[error("unknown open mode '{0}'")]
    BadMode(String),
}

/// Splits a raw line into its operation tag and decoded fields.
///
/// Comments come back unchanged. Each field is percent-decoded and any
/// delimiter it still contains is replaced by [`DELIMITER_SUBSTITUTE`].
pub fn decode_line(raw: &str) -> Result<Line, ParseError> {
    let line = raw.trim_end_matches(['\n', '\r']);
    if line.starts_with(COMMENT_MARKER) {
        return Ok(Line::Comment(line.to_string()));
    }

    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Blank);
    }

    let (op, rest) = line.split_once(DELIMITER).ok_or(ParseError::NoDelimiter)?;
    let fields = rest.split(DELIMITER).map(decode_field).collect();

    Ok(Line::Record { op: op.to_string(), fields })
}

/// Decodes and types one line; comments and blank lines yield `None`.
pub fn parse_event(raw: &str) -> Result<Option<Event>, ParseError> {
    match decode_line(raw)? {
        Line::Record { op, fields } => Event::from_record(&op, fields).map(Some),
        Line::Comment(_) | Line::Blank => Ok(None),
    }
}

fn decode_field(field: &str) -> String {
    // Lossy: the tracer logs guest bytes, which need not be UTF-8.
    let bytes = urlencoding::decode_binary(field.as_bytes());
    String::from_utf8_lossy(&bytes).replace(DELIMITER, &DELIMITER_SUBSTITUTE.to_string())
}
