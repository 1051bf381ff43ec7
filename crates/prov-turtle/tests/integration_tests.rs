//! Integration tests for prov-turtle with template files on disk.

use pretty_assertions::assert_eq;
use prov_turtle::templates::{TemplatesFile, DEFAULT_TEMPLATES};
use prov_turtle::{Fact, TurtleEmitter};
use std::io::Write;

// =============================================================================
// Header
// =============================================================================

#[test]
fn test_header_declares_all_prefixes() {
    let header = TurtleEmitter::builtin().unwrap().header().unwrap();
    let lines: Vec<&str> = header.lines().collect();
    assert_eq!(
        lines,
        vec![
            "@prefix prov: <http://www.w3.org/ns/prov#> .",
            "@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .",
            "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .",
            "@prefix dt: <http://m000.github.com/ns/v1/desktop#> .",
        ]
    );
}

// =============================================================================
// Custom Templates
// =============================================================================

#[test]
fn test_templates_from_disk() {
    let custom = DEFAULT_TEMPLATES.replace("prov:used", "prov:used_custom");
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(custom.as_bytes()).unwrap();

    let emitter = TurtleEmitter::from_path(file.path()).unwrap();
    let ttl = emitter
        .render(&Fact::Used { process: "bash~1".to_string(), file: "/x".to_string() })
        .unwrap();
    assert_eq!(ttl, "<exe://bash~1> prov:used_custom <file:/x> .");
}

#[test]
fn test_incomplete_templates_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"version: \"1.0\"\ntemplates: {}\n").unwrap();
    assert!(TurtleEmitter::from_path(file.path()).is_err());
}

#[test]
fn test_missing_file() {
    let err = TemplatesFile::load(std::path::Path::new("/nonexistent/turtle.yaml")).unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}

// =============================================================================
// Every Shape
// =============================================================================

#[test]
fn test_every_fact_renders_complete_triples() {
    let emitter = TurtleEmitter::builtin().unwrap();
    let facts = [
        Fact::Activity { process: "a~1".to_string(), kind: "Shell".to_string() },
        Fact::Entity { file: "/f".to_string(), kind: "textplain".to_string() },
        Fact::Used { process: "a~1".to_string(), file: "/f".to_string() },
        Fact::Generated { file: "/f".to_string(), process: "a~1".to_string() },
        Fact::Derived { file: "/f".to_string(), origin: "/g".to_string() },
        Fact::Duration { process: "a~1".to_string(), started: "1".to_string(), ended: "2".to_string() },
    ];

    for fact in &facts {
        let ttl = emitter.render(fact).unwrap();
        for line in ttl.lines() {
            assert!(line.ends_with(" ."), "Unterminated triple for {:?}: {}", fact, line);
        }
    }
}
