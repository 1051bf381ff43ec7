use crate::ast::Event;
use crate::DELIMITER;

/// Renders an event in the raw log format, percent-encoding every field.
pub fn serialize_event(event: &Event) -> String {
    let fields: Vec<String> = match event {
        Event::Exec { asid, process } => vec![asid.clone(), process.clone()],
        Event::Used { asid, process, filename, nread } => {
            vec![asid.clone(), process.clone(), filename.clone(), nread.clone()]
        }
        Event::Generated { asid, process, filename, nwritten } => {
            vec![asid.clone(), process.clone(), filename.clone(), nwritten.clone()]
        }
        Event::Duration { asid, process, started, ended } => {
            vec![asid.clone(), process.clone(), started.clone(), ended.clone()]
        }
        Event::Derived { filename1, filename2 } => vec![filename1.clone(), filename2.clone()],
        Event::Write { range_kind, dest, dest_offset, origin, origin_offset, length } => vec![
            range_kind.clone(),
            dest.clone(),
            dest_offset.to_string(),
            origin.clone(),
            origin_offset.to_string(),
            length.to_string(),
        ],
        Event::Open { handle, filename, mode } => {
            vec![handle.clone(), filename.clone(), mode.as_str().to_string()]
        }
        Event::Close { handle } => vec![handle.clone()],
    };

    let mut out = event.op().to_string();
    for field in &fields {
        out.push(DELIMITER);
        out.push_str(&encode_field(field));
    }
    out
}

fn encode_field(field: &str) -> String {
    // Keep path separators readable; everything else non-alphanumeric is escaped.
    urlencoding::encode(field).replace("%2F", "/")
}
