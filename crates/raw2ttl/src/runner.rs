//! Line driver: decodes each input line, applies it to the provenance state
//! and streams the resulting triples out in input order.
use prov_turtle::{Fact, TurtleEmitter};
use provlog::{decode_line, Event, Line};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

use crate::context::{ConvertOptions, ErrorPolicy};
use crate::error::ConvertError;
use crate::state::ProvState;

/// Prefix of the comment replacing a line that could not be converted.
pub const BAD_LINE_PREFIX: &str = "# Bad line: ";

/// Prefix of the comment echoing a line before its triples.
pub const DEBUG_LINE_PREFIX: &str = "# Debug line: ";

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    pub lines: u64,
    pub events: u64,
    pub comments: u64,
    pub bad_lines: u64,
    pub facts: u64,
}

pub struct Converter<W: Write> {
    state: ProvState,
    emitter: TurtleEmitter,
    out: W,
    options: ConvertOptions,
    header_written: bool,
    stats: ConvertStats,
}

impl<W: Write> Converter<W> {
    pub fn new(out: W, options: ConvertOptions) -> Result<Self, ConvertError> {
        let emitter = match &options.templates_path {
            Some(path) => TurtleEmitter::from_path(path)?,
            None => TurtleEmitter::builtin()?,
        };
        Ok(Self::with_emitter(out, emitter, options))
    }

    pub fn with_emitter(out: W, emitter: TurtleEmitter, options: ConvertOptions) -> Self {
        Self {
            state: ProvState::new(),
            emitter,
            out,
            options,
            header_written: false,
            stats: ConvertStats::default(),
        }
    }

    /// Convert every line of `reader`. Bytes that are not UTF-8 are decoded
    /// lossily.
    pub fn convert<R: BufRead>(&mut self, mut reader: R) -> Result<(), ConvertError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(());
            }
            let line = String::from_utf8_lossy(&buf);
            if let Err(e) = self.process_line(&line) {
                // Whatever was converted so far stays valid output.
                self.out.flush()?;
                return Err(e);
            }
        }
    }

    /// Convert one raw line. Only I/O and rendering failures, and decode
    /// failures under [`ErrorPolicy::Abort`], are returned as errors.
    pub fn process_line(&mut self, raw: &str) -> Result<(), ConvertError> {
        self.ensure_header()?;
        self.stats.lines += 1;
        let line_no = self.stats.lines;
        let raw = raw.trim_end_matches(['\n', '\r']);

        match self.dispatch(raw) {
            Ok(()) => Ok(()),
            Err(e) if e.is_line_error() => {
                self.stats.bad_lines += 1;
                warn!(line = line_no, error = %e, "skipping bad line");
                writeln!(self.out, "{}{}", BAD_LINE_PREFIX, raw)?;

                match e {
                    ConvertError::Parse(source) if self.options.on_error == ErrorPolicy::Abort => {
                        Err(ConvertError::Aborted { line: line_no, source })
                    }
                    _ => Ok(()),
                }
            }
            Err(e) => Err(e),
        }
    }

    fn dispatch(&mut self, raw: &str) -> Result<(), ConvertError> {
        let (op, fields) = match decode_line(raw)? {
            Line::Comment(text) => {
                self.stats.comments += 1;
                writeln!(self.out, "{}", text)?;
                return Ok(());
            }
            Line::Blank => return Ok(()),
            Line::Record { op, fields } => (op, fields),
        };

        if self.options.debug_echo {
            writeln!(self.out, "{}{}", DEBUG_LINE_PREFIX, raw)?;
        }

        let event = Event::from_record(&op, fields)?;
        debug!(op = event.op(), "dispatching event");
        let facts = self.state.apply(&event)?;
        self.stats.events += 1;
        self.emit(&facts)
    }

    fn emit(&mut self, facts: &[Fact]) -> Result<(), ConvertError> {
        for fact in facts {
            self.emitter.write_fact(&mut self.out, fact)?;
            self.stats.facts += 1;
        }
        Ok(())
    }

    fn ensure_header(&mut self) -> Result<(), ConvertError> {
        if !self.header_written {
            self.emitter.write_header(&mut self.out)?;
            self.header_written = true;
        }
        Ok(())
    }

    pub fn stats(&self) -> ConvertStats {
        self.stats
    }

    pub fn state(&self) -> &ProvState {
        &self.state
    }

    /// Write the header if no line did, flush, and hand back the writer.
    pub fn finish(mut self) -> Result<(W, ConvertStats), ConvertError> {
        self.ensure_header()?;
        self.out.flush()?;

        let pending = self.state.unflushed_descriptors();
        if pending > 0 {
            warn!(descriptors = pending, "derivations of unclosed descriptors were not emitted");
        }
        info!(
            lines = self.stats.lines,
            events = self.stats.events,
            bad_lines = self.stats.bad_lines,
            facts = self.stats.facts,
            files = self.state.declared_count(),
            "conversion finished"
        );
        Ok((self.out, self.stats))
    }
}

/// Convert a complete input held in memory; used by tests and small callers.
pub fn convert_str(input: &str, options: ConvertOptions) -> Result<String, ConvertError> {
    let mut converter = Converter::new(Vec::new(), options)?;
    converter.convert(input.as_bytes())?;
    let (out, _) = converter.finish()?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
