//! Entity classification.
//!
//! Files are typed by their guessed content type, processes by the
//! category of their executable:
//! - Editor, Shell, Daemon, Fileutil, Shellutil for known programs
//! - the executable name itself for everything else

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use crate::normalizer::{ProcessLabel, GRAPH_SEPARATOR};

/// Type tag for entities nothing better is known about.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Separates the executable from the pid in a process label.
pub const HANDLE_SEPARATOR: char = '~';

lazy_static! {
    /// Program categories of well-known executables
    static ref PROGRAM_TYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("vi", "Editor");
        m.insert("vim", "Editor");
        m.insert("nano", "Editor");
        m.insert("pico", "Editor");
        m.insert("sh", "Shell");
        m.insert("bash", "Shell");
        m.insert("zsh", "Shell");
        m.insert("cron", "Daemon");
        m.insert("acpid", "Daemon");
        m.insert("dbus-daemon", "Daemon");
        m.insert("rpcbind", "Daemon");
        m.insert("init", "Daemon");
        m.insert("tar", "Fileutil");
        m.insert("unzip", "Fileutil");
        m.insert("gzip", "Fileutil");
        m.insert("zip", "Fileutil");
        m.insert("ls", "Shellutil");
        m
    };

    /// Anything the type vocabulary cannot hold
    static ref NON_WORD: Regex = Regex::new(r"\W+").unwrap();
}

/// Type tag of a file, from the content type guessed for its name.
pub fn classify_file(filename: &str) -> String {
    let guessed = mime_guess::from_path(filename)
        .first()
        .map(|mime| NON_WORD.replace_all(mime.essence_str(), "").into_owned())
        .filter(|tag| !tag.is_empty());

    guessed.unwrap_or_else(|| UNKNOWN_TYPE.to_string())
}

/// Type tag of a process, from the category of its executable.
pub fn classify_process(label: &ProcessLabel) -> String {
    let exe = executable_token(label);
    if let Some(category) = PROGRAM_TYPES.get(exe) {
        return category.to_string();
    }

    // The tag becomes a prefixed name, which admits word characters only.
    let sanitized = NON_WORD.replace_all(exe, "").into_owned();
    if sanitized.is_empty() {
        UNKNOWN_TYPE.to_string()
    } else {
        sanitized
    }
}

/// The executable part of a label: before the last `~`, after the last `:`.
pub fn executable_token(label: &ProcessLabel) -> &str {
    let raw = label.as_str();
    let without_pid = raw
        .rsplit_once(HANDLE_SEPARATOR)
        .map(|(exe, _pid)| exe)
        .unwrap_or(raw);

    without_pid
        .rsplit_once(GRAPH_SEPARATOR)
        .map(|(_prefix, exe)| exe)
        .unwrap_or(without_pid)
}
