//! Tests for whole-program compilation: manifests, modes and sections

use nanoscript::compiler::{split_sections, SectionName, MANIFEST_ID};
use nanoscript::{CompileOptions, Compiler, Error, GameManifest};
use std::collections::HashMap;

fn sources(files: &[(&str, &str)]) -> HashMap<String, String> {
    files
        .iter()
        .map(|(id, text)| (id.to_string(), text.to_string()))
        .collect()
}

fn build(manifest: &str, files: &[(&str, &str)]) -> Result<String, Error> {
    let manifest = GameManifest::from_json(manifest)?;
    Compiler::new(CompileOptions::default()).compile_program(&manifest, &sources(files))
}

const TITLE: &str = "Title
════════
let blink = 0

frame
────────
blink += 1
if blink > 60: setMode(Play)
";

const PLAY: &str = "enter
-----
score = 0

frame
-----
for i < 3:
    score += i
";

// ====================
// Program structure
// ====================

#[test]
fn test_program_layout() {
    let program = build(
        r#"{"scripts": ["util.pyx"], "modes": ["Title*", "Play"]}"#,
        &[
            ("util.pyx", "let score = 0"),
            ("Title.pyx", TITLE),
            ("Play.pyx", PLAY),
        ],
    )
    .unwrap();

    assert!(program.starts_with("'use strict';\n"));
    let util = program.find("/*@\"util.pyx\"*/\nlet score = 0;").unwrap();
    let title = program.find("const Title = (function () {").unwrap();
    let play = program.find("const Play = (function () {").unwrap();
    let dispatch = program.find("let _activeMode = Title;").unwrap();
    assert!(util < title && title < play && play < dispatch);

    assert!(program.contains("/*@\"Title.pyx\":2*/\nlet blink = 0;"));
    assert!(program.contains("/*@\"Play.pyx\":2*/\nscore = 0;"));
    assert!(program.contains("/*@\"Play.pyx\":6*/\nfor (let __i"));
}

#[test]
fn test_only_frame_suspends() {
    let program = build(
        r#"{"scripts": ["loops.pyx"], "modes": ["Play"]}"#,
        &[
            ("loops.pyx", "while busy():\n    wait()"),
            ("Play.pyx", "enter\n-----\nwhile a: b()\n\nframe\n-----\nwhile c: d()"),
        ],
    )
    .unwrap();
    assert_eq!(program.matches("__yieldCounter + 1").count(), 1);
    assert!(program.contains("while (c) { {if (!(__yieldCounter"));
}

#[test]
fn test_flip_y_from_manifest() {
    let program = build(
        r#"{"modes": ["Play"], "flipY": true}"#,
        &[("Play.pyx", "draw()")],
    )
    .unwrap();
    assert!(program.contains("setTransform(xy(0, screenSize.y), xy(1, -1), 0, 1);"));
}

#[test]
fn test_gensyms_unique_across_files() {
    let program = build(
        r#"{"scripts": ["a.pyx", "b.pyx"], "modes": ["Play"]}"#,
        &[
            ("a.pyx", "for i < 2: f(i)"),
            ("b.pyx", "for i < 2: f(i)"),
            ("Play.pyx", "for i < 2: f(i)"),
        ],
    )
    .unwrap();
    assert!(program.contains("__i1__"));
    assert!(program.contains("__i2__"));
    assert!(program.contains("__i3__"));
}

// ====================
// Sections
// ====================

#[test]
fn test_unsectioned_mode_is_all_frame() {
    let table = split_sections("x = 1\ndraw(x)").unwrap();
    assert_eq!(table.get(SectionName::Frame).source, "x = 1\ndraw(x)");
    for name in [SectionName::Init, SectionName::Enter, SectionName::Leave] {
        assert!(table.get(name).is_blank());
    }
}

#[test]
fn test_adjacent_sections_fail() {
    let err = build(
        r#"{"modes": ["Play"]}"#,
        &[("Play.pyx", "enter\n-----\nframe\n-----\ndraw()")],
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::SourceError {
            source_id: "Play.pyx".to_string(),
            line: Some(3),
            message: "There must be at least one line between sections.".to_string(),
        }
    );
}

#[test]
fn test_illegal_section_name() {
    let err = build(
        r#"{"modes": ["Play"]}"#,
        &[("Play.pyx", "update\n-----\ndraw()")],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Play.pyx:1: Illegal section name: \"update\"");
}

#[test]
fn test_section_errors_report_file_lines() {
    let play = PLAY.replace("score += i", "score === i");
    let err = build(
        r#"{"modes": ["Play*", "Title"]}"#,
        &[("Title.pyx", TITLE), ("Play.pyx", &play)],
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::SourceError {
            source_id: "Play.pyx".to_string(),
            line: Some(8),
            message: "Illegal symbol \"===\" (maybe you meant \"==\")".to_string(),
        }
    );
}

// ====================
// Manifest
// ====================

#[test]
fn test_start_mode_required() {
    let err = build(
        r#"{"modes": ["Title", "Play"]}"#,
        &[("Title.pyx", TITLE), ("Play.pyx", PLAY)],
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::SourceError {
            source_id: MANIFEST_ID.to_string(),
            line: None,
            message: "No starting mode defined".to_string(),
        }
    );

    let err = build(
        r#"{"modes": ["Title*", "Play*"]}"#,
        &[("Title.pyx", TITLE), ("Play.pyx", PLAY)],
    )
    .unwrap_err();
    assert!(matches!(err, Error::SourceError { line: None, .. }));
}

#[test]
fn test_missing_source() {
    let err = build(r#"{"scripts": ["gone.pyx"], "modes": ["Play"]}"#, &[("Play.pyx", "f()")])
        .unwrap_err();
    assert_eq!(err, Error::MissingSource("gone.pyx".to_string()));
}

#[test]
fn test_permissive_manifest() {
    let manifest = GameManifest::from_json(
        "{\n  // title first\n  \"modes\": [\"Title*\", \"Play\",],\n  \"scripts\": [\"lib/a.pyx\" /* shared */],\n}",
    )
    .unwrap();
    assert_eq!(manifest.scripts, vec!["lib/a.pyx"]);
    assert_eq!(manifest.modes.len(), 2);
}
