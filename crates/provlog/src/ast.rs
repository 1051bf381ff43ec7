use crate::parser::ParseError;

/// A decoded input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Comment line, kept exactly as read (minus the line terminator).
    Comment(String),
    Blank,
    Record { op: String, fields: Vec<String> },
}

/// Access mode of an opened descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
    ReadWrite,
}

impl OpenMode {
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        match token {
            "r" => Ok(OpenMode::Read),
            "w" => Ok(OpenMode::Write),
            "rw" => Ok(OpenMode::ReadWrite),
            other => Err(ParseError::BadMode(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OpenMode::Read => "r",
            OpenMode::Write => "w",
            OpenMode::ReadWrite => "rw",
        }
    }

    /// Whether content written through the descriptor generates the file.
    pub fn writes(&self) -> bool {
        matches!(self, OpenMode::Write | OpenMode::ReadWrite)
    }
}

/// One provenance event of the raw log.
///
/// Process fields hold the raw label as logged; address-space ids, byte
/// counts, timestamps and range kinds are opaque tokens carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Exec {
        asid: String,
        process: String,
    },
    Used {
        asid: String,
        process: String,
        filename: String,
        nread: String,
    },
    Generated {
        asid: String,
        process: String,
        filename: String,
        nwritten: String,
    },
    Duration {
        asid: String,
        process: String,
        started: String,
        ended: String,
    },
    Derived {
        filename1: String,
        filename2: String,
    },
    Write {
        range_kind: String,
        dest: String,
        dest_offset: u64,
        origin: String,
        origin_offset: u64,
        length: u64,
    },
    Open {
        handle: String,
        filename: String,
        mode: OpenMode,
    },
    Close {
        handle: String,
    },
}

impl Event {
    /// The operation tag this event is logged under.
    pub fn op(&self) -> &'static str {
        match self {
            Event::Exec { .. } => "x",
            Event::Used { .. } => "u",
            Event::Generated { .. } => "g",
            Event::Duration { .. } => "q",
            Event::Derived { .. } => "d",
            Event::Write { .. } => "w",
            Event::Open { .. } => "o",
            Event::Close { .. } => "c",
        }
    }

    /// Maps decoded fields positionally onto the event for `op`.
    pub fn from_record(op: &str, fields: Vec<String>) -> Result<Self, ParseError> {
        let expected = match op {
            "x" => 2,
            "u" | "g" | "q" => 4,
            "d" => 2,
            "w" => 6,
            "o" => 3,
            "c" => 1,
            _ => return Err(ParseError::UnknownOp(op.to_string())),
        };
        if fields.len() != expected {
            return Err(ParseError::FieldCount {
                op: op.to_string(),
                expected,
                got: fields.len(),
            });
        }

        let mut it = fields.into_iter();
        // Arity was checked above.
        let mut next = || it.next().unwrap_or_default();

        let event = match op {
            "x" => Event::Exec { asid: next(), process: next() },
            "u" => Event::Used {
                asid: next(),
                process: next(),
                filename: next(),
                nread: next(),
            },
            "g" => Event::Generated {
                asid: next(),
                process: next(),
                filename: next(),
                nwritten: next(),
            },
            "q" => Event::Duration {
                asid: next(),
                process: next(),
                started: next(),
                ended: next(),
            },
            "d" => Event::Derived { filename1: next(), filename2: next() },
            "w" => {
                let range_kind = next();
                let dest = next();
                let dest_offset = parse_number("dest_offset", &next())?;
                let origin = next();
                let origin_offset = parse_number("origin_offset", &next())?;
                let length = parse_number("length", &next())?;
                Event::Write { range_kind, dest, dest_offset, origin, origin_offset, length }
            }
            "o" => {
                let handle = next();
                let filename = next();
                let mode = OpenMode::parse(&next())?;
                Event::Open { handle, filename, mode }
            }
            "c" => Event::Close { handle: next() },
            _ => return Err(ParseError::UnknownOp(op.to_string())),
        };
        Ok(event)
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<u64, ParseError> {
    value.parse().map_err(|_| ParseError::NotANumber {
        field,
        value: value.to_string(),
    })
}
