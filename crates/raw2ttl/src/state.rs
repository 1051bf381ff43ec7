//! Provenance state carried across lines of one run.
//!
//! Every operation returns the facts to emit, in order. Entity declarations
//! come first, so a consumer reading the output front to back always sees a
//! file declared before anything refers to it.

use prov_classify::{classify_file, classify_process, normalize_label, ProcessLabel};
use prov_turtle::Fact;
use provlog::{Event, OpenMode};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::error::StateError;

#[derive(Debug, Default)]
pub struct ProvState {
    declared_files: HashSet<String>,
    descriptors: HashMap<String, String>,
    derived: BTreeMap<String, BTreeSet<String>>,
    generated_pending: HashSet<String>,
    current_process: Option<ProcessLabel>,
}

impl ProvState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch one event to its handler.
    pub fn apply(&mut self, event: &Event) -> Result<Vec<Fact>, StateError> {
        let facts = match event {
            Event::Exec { process, .. } => self.record_exec(process),
            Event::Used { process, filename, .. } => self.record_used(process, filename),
            Event::Generated { process, filename, .. } => self.record_generated(process, filename),
            Event::Duration { process, started, ended, .. } => {
                self.record_duration(process, started, ended)
            }
            Event::Derived { filename1, filename2 } => self.record_derived(filename1, filename2),
            Event::Write { dest, origin, .. } => self.record_write(dest, origin)?,
            Event::Open { handle, filename, mode } => self.record_open(handle, filename, *mode),
            Event::Close { handle } => self.record_close(handle)?,
        };
        Ok(facts)
    }

    /// Declaration facts for `filename` unless it was declared before.
    pub fn declare_file_if_new(&mut self, filename: &str) -> Option<Fact> {
        if self.declared_files.contains(filename) {
            return None;
        }
        self.declared_files.insert(filename.to_string());
        Some(Fact::Entity {
            file: filename.to_string(),
            kind: classify_file(filename),
        })
    }

    pub fn record_used(&mut self, process: &str, filename: &str) -> Vec<Fact> {
        let label = normalize_label(process);
        let mut facts: Vec<Fact> = self.declare_file_if_new(filename).into_iter().collect();
        facts.push(Fact::Used {
            process: label.to_string(),
            file: filename.to_string(),
        });
        facts
    }

    pub fn record_generated(&mut self, process: &str, filename: &str) -> Vec<Fact> {
        let label = normalize_label(process);
        let mut facts: Vec<Fact> = self.declare_file_if_new(filename).into_iter().collect();
        facts.push(Fact::Generated {
            file: filename.to_string(),
            process: label.to_string(),
        });
        facts
    }

    /// Declares the activity. Writes through descriptors are attributed to
    /// the most recently executed process.
    pub fn record_exec(&mut self, process: &str) -> Vec<Fact> {
        let label = normalize_label(process);
        let fact = Fact::Activity {
            process: label.to_string(),
            kind: classify_process(&label),
        };
        self.current_process = Some(label);
        vec![fact]
    }

    pub fn record_duration(&mut self, process: &str, started: &str, ended: &str) -> Vec<Fact> {
        vec![Fact::Duration {
            process: normalize_label(process).to_string(),
            started: started.to_string(),
            ended: ended.to_string(),
        }]
    }

    pub fn record_derived(&mut self, filename1: &str, filename2: &str) -> Vec<Fact> {
        vec![Fact::Derived {
            file: filename1.to_string(),
            origin: filename2.to_string(),
        }]
    }

    /// Maps `handle` to `filename`. Reusing a handle that was never closed
    /// flushes its derivations against the file it mapped before.
    pub fn record_open(&mut self, handle: &str, filename: &str, mode: OpenMode) -> Vec<Fact> {
        let mut facts = Vec::new();
        if let Some(previous) = self.descriptors.insert(handle.to_string(), filename.to_string()) {
            tracing::debug!(handle, previous = %previous, filename, "descriptor remapped");
            facts = self.flush_derived(handle, &previous);
            self.generated_pending.remove(&previous);
        }
        if mode.writes() {
            self.generated_pending.insert(filename.to_string());
        }
        facts
    }

    /// Byte-range write from `origin` into `dest`; offsets and length do not
    /// affect file-level provenance.
    pub fn record_write(&mut self, dest: &str, origin: &str) -> Result<Vec<Fact>, StateError> {
        let filename = self.resolve(dest)?.to_string();
        let origin_filename = self.resolve(origin)?.to_string();

        let mut facts = Vec::new();
        if self.generated_pending.contains(&filename) {
            match &self.current_process {
                Some(process) => {
                    facts.push(Fact::Generated {
                        file: filename.clone(),
                        process: process.to_string(),
                    });
                    self.generated_pending.remove(&filename);
                }
                None => tracing::debug!(file = %filename, "no current process, generation stays pending"),
            }
        }

        self.derived
            .entry(dest.to_string())
            .or_default()
            .insert(origin_filename);

        Ok(facts)
    }

    /// Flushes the derivations accumulated for `handle` and unmaps it.
    pub fn record_close(&mut self, handle: &str) -> Result<Vec<Fact>, StateError> {
        let filename = self
            .descriptors
            .remove(handle)
            .ok_or_else(|| StateError::UnmappedDescriptor(handle.to_string()))?;

        let facts = self.flush_derived(handle, &filename);
        self.generated_pending.remove(&filename);
        Ok(facts)
    }

    fn flush_derived(&mut self, handle: &str, filename: &str) -> Vec<Fact> {
        self.derived
            .remove(handle)
            .unwrap_or_default()
            .into_iter()
            .map(|origin| Fact::Derived {
                file: filename.to_string(),
                origin,
            })
            .collect()
    }

    fn resolve(&self, handle: &str) -> Result<&str, StateError> {
        self.descriptors
            .get(handle)
            .map(String::as_str)
            .ok_or_else(|| StateError::UnmappedDescriptor(handle.to_string()))
    }

    pub fn is_declared(&self, filename: &str) -> bool {
        self.declared_files.contains(filename)
    }

    pub fn declared_count(&self) -> usize {
        self.declared_files.len()
    }

    /// Descriptors still holding derivations that no close has flushed.
    pub fn unflushed_descriptors(&self) -> usize {
        self.derived.len()
    }

    pub fn current_process(&self) -> Option<&ProcessLabel> {
        self.current_process.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entity(file: &str, kind: &str) -> Fact {
        Fact::Entity { file: file.to_string(), kind: kind.to_string() }
    }

    #[test]
    fn test_declare_is_idempotent() {
        let mut state = ProvState::new();
        assert_eq!(state.declare_file_if_new("/etc/passwd"), Some(entity("/etc/passwd", "Unknown")));
        assert_eq!(state.declare_file_if_new("/etc/passwd"), None);
        assert_eq!(state.declared_count(), 1);
    }

    #[test]
    fn test_repeated_use_declares_once() {
        let mut state = ProvState::new();
        let first = state.record_used("bash~10", "/etc/passwd");
        let second = state.record_used("bash~10", "/etc/passwd");

        assert_eq!(
            first,
            vec![
                entity("/etc/passwd", "Unknown"),
                Fact::Used { process: "bash~10".to_string(), file: "/etc/passwd".to_string() },
            ]
        );
        assert_eq!(
            second,
            vec![Fact::Used { process: "bash~10".to_string(), file: "/etc/passwd".to_string() }]
        );
    }

    #[test]
    fn test_generated_shares_declarations_with_used() {
        let mut state = ProvState::new();
        state.record_used("cat~1", "/tmp/a.txt");
        let facts = state.record_generated("tee~2", "/tmp/a.txt");
        assert_eq!(
            facts,
            vec![Fact::Generated { file: "/tmp/a.txt".to_string(), process: "tee~2".to_string() }]
        );
    }

    #[test]
    fn test_exec_normalizes_and_classifies() {
        let mut state = ProvState::new();
        let facts = state.record_exec("1;cron~100");
        assert_eq!(
            facts,
            vec![Fact::Activity { process: "1:cron~100".to_string(), kind: "Daemon".to_string() }]
        );
        assert_eq!(state.current_process().map(|p| p.as_str()), Some("1:cron~100"));
    }

    #[test]
    fn test_duration_uses_normalized_label() {
        let mut state = ProvState::new();
        let facts = state.record_duration("1;bash~10", "100", "200");
        assert_eq!(
            facts,
            vec![Fact::Duration {
                process: "1:bash~10".to_string(),
                started: "100".to_string(),
                ended: "200".to_string(),
            }]
        );
    }

    #[test]
    fn test_derived_does_not_declare() {
        let mut state = ProvState::new();
        let facts = state.record_derived("/tmp/out", "/tmp/in");
        assert_eq!(
            facts,
            vec![Fact::Derived { file: "/tmp/out".to_string(), origin: "/tmp/in".to_string() }]
        );
        assert!(!state.is_declared("/tmp/out"));
    }

    #[test]
    fn test_write_with_unmapped_descriptor() {
        let mut state = ProvState::new();
        state.record_open("3", "/tmp/out", OpenMode::Write);
        assert_eq!(
            state.record_write("3", "9"),
            Err(StateError::UnmappedDescriptor("9".to_string()))
        );
        assert_eq!(
            state.record_write("8", "3"),
            Err(StateError::UnmappedDescriptor("8".to_string()))
        );
        assert_eq!(state.unflushed_descriptors(), 0);
    }

    #[test]
    fn test_write_generates_once_then_close_derives() {
        let mut state = ProvState::new();
        state.record_exec("cp~7");
        state.record_open("3", "/tmp/out", OpenMode::Write);
        state.record_open("4", "/tmp/in", OpenMode::Read);

        let first = state.record_write("3", "4").unwrap();
        assert_eq!(
            first,
            vec![Fact::Generated { file: "/tmp/out".to_string(), process: "cp~7".to_string() }]
        );
        assert!(state.record_write("3", "4").unwrap().is_empty());

        let closed = state.record_close("3").unwrap();
        assert_eq!(
            closed,
            vec![Fact::Derived { file: "/tmp/out".to_string(), origin: "/tmp/in".to_string() }]
        );
        assert_eq!(state.unflushed_descriptors(), 0);
        assert!(state.record_write("3", "4").is_err());
    }

    #[test]
    fn test_close_orders_origins() {
        let mut state = ProvState::new();
        state.record_open("1", "/out", OpenMode::Read);
        state.record_open("2", "/b", OpenMode::Read);
        state.record_open("3", "/a", OpenMode::Read);
        state.record_write("1", "2").unwrap();
        state.record_write("1", "3").unwrap();
        state.record_write("1", "2").unwrap();

        let origins: Vec<Fact> = state.record_close("1").unwrap();
        assert_eq!(
            origins,
            vec![
                Fact::Derived { file: "/out".to_string(), origin: "/a".to_string() },
                Fact::Derived { file: "/out".to_string(), origin: "/b".to_string() },
            ]
        );
    }

    #[test]
    fn test_reopen_flushes_previous_file() {
        let mut state = ProvState::new();
        state.record_exec("cp~1");
        state.record_open("3", "/tmp/A", OpenMode::Write);
        state.record_open("4", "/tmp/in", OpenMode::Read);
        state.record_write("3", "4").unwrap();

        let reopened = state.record_open("3", "/tmp/B", OpenMode::Write);
        assert_eq!(
            reopened,
            vec![Fact::Derived { file: "/tmp/A".to_string(), origin: "/tmp/in".to_string() }]
        );
        assert_eq!(state.unflushed_descriptors(), 0);
        assert!(state.record_close("3").unwrap().is_empty());
    }

    #[test]
    fn test_reopen_drops_pending_generation() {
        let mut state = ProvState::new();
        state.record_open("3", "/tmp/A", OpenMode::Write);
        assert!(state.record_open("3", "/tmp/B", OpenMode::Read).is_empty());

        state.record_exec("cp~1");
        state.record_open("4", "/tmp/in", OpenMode::Read);
        state.record_open("5", "/tmp/A", OpenMode::Read);
        assert!(state.record_write("5", "4").unwrap().is_empty());
    }

    #[test]
    fn test_pending_without_process() {
        let mut state = ProvState::new();
        state.record_open("3", "/tmp/out", OpenMode::ReadWrite);
        state.record_open("4", "/tmp/in", OpenMode::Read);
        assert!(state.record_write("3", "4").unwrap().is_empty());

        state.record_exec("dd~2");
        assert_eq!(
            state.record_write("3", "4").unwrap(),
            vec![Fact::Generated { file: "/tmp/out".to_string(), process: "dd~2".to_string() }]
        );
    }

    #[test]
    fn test_close_unmapped() {
        let mut state = ProvState::new();
        assert_eq!(
            state.record_close("ufd5"),
            Err(StateError::UnmappedDescriptor("ufd5".to_string()))
        );
    }

    #[test]
    fn test_apply_dispatches() {
        let mut state = ProvState::new();
        let event = Event::Used {
            asid: "1".to_string(),
            process: "bash~10".to_string(),
            filename: "/etc/passwd".to_string(),
            nread: "4096".to_string(),
        };
        assert_eq!(state.apply(&event).unwrap().len(), 2);
        assert_eq!(state.apply(&event).unwrap().len(), 1);
    }
}
