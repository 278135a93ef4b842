//! Integration tests for the mermaid-hydrate binary
//!
//! Each test builds a small site in a temp directory and runs the binary
//! against it.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const WITH_DIAGRAM: &str = "<!DOCTYPE html>\n<html><head><title>Flow</title></head><body>\
<article><pre><code class=\"language-mermaid\">graph TD; A--&gt;B</code></pre></article>\
</body></html>";

const WITHOUT_DIAGRAM: &str = "<!DOCTYPE html>\n<html><head></head><body>\
<pre><code class=\"language-rust\">fn main() {}</code></pre></body></html>";

fn write_site(root: &Path) {
    fs::create_dir_all(root.join("public/guide")).unwrap();
    fs::write(root.join("public/index.html"), WITHOUT_DIAGRAM).unwrap();
    fs::write(root.join("public/guide/flow.html"), WITH_DIAGRAM).unwrap();
    fs::write(root.join("public/notes.txt"), WITH_DIAGRAM).unwrap();
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mermaid-hydrate"))
        .current_dir(dir)
        .args(args)
        .env("RUST_LOG", "mermaid_hydrate=debug")
        .output()
        .expect("Failed to run mermaid-hydrate")
}

#[test]
fn test_converts_in_place() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let output = run_in(dir.path(), &["--input=public", "--script-src=/js/mermaid.js"]);
    assert!(output.status.success(), "{output:?}");

    let flow = fs::read_to_string(dir.path().join("public/guide/flow.html")).unwrap();
    assert!(flow.contains(
        "<article><div class=\"mermaid\" id=\"mermaid-0\">graph TD; A--&gt;B</div></article>"
    ));
    assert!(flow.contains("<script src=\"/js/mermaid.js\"></script>"));
    assert!(!flow.contains("language-mermaid"));

    // untouched files stay byte-identical
    let index = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
    assert_eq!(index, WITHOUT_DIAGRAM);
    let notes = fs::read_to_string(dir.path().join("public/notes.txt")).unwrap();
    assert_eq!(notes, WITH_DIAGRAM);
}

#[test]
fn test_output_directory_mirrors_input() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let output = run_in(dir.path(), &["--input=public", "--output=dist", "--markup-only"]);
    assert!(output.status.success(), "{output:?}");

    let converted = fs::read_to_string(dir.path().join("dist/guide/flow.html")).unwrap();
    assert!(converted.contains("id=\"mermaid-0\""));
    assert!(!converted.contains("<script"));

    // files without diagrams are not copied
    assert!(!dir.path().join("dist/index.html").exists());
    // the source is left alone
    let source = fs::read_to_string(dir.path().join("public/guide/flow.html")).unwrap();
    assert_eq!(source, WITH_DIAGRAM);
}

#[test]
fn test_check_mode_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());

    let output = run_in(dir.path(), &["--input=public", "--check"]);
    assert!(!output.status.success());

    let source = fs::read_to_string(dir.path().join("public/guide/flow.html")).unwrap();
    assert_eq!(source, WITH_DIAGRAM);
}

#[test]
fn test_check_mode_passes_when_nothing_to_do() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("public")).unwrap();
    fs::write(dir.path().join("public/index.html"), WITHOUT_DIAGRAM).unwrap();

    let output = run_in(dir.path(), &["--input=public", "--check"]);
    assert!(output.status.success(), "{output:?}");
}

#[test]
fn test_config_file_is_discovered_from_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    write_site(dir.path());
    fs::create_dir_all(dir.path().join(".config")).unwrap();
    fs::write(
        dir.path().join(".config/mermaid-hydrate.yaml"),
        "input: public\nmermaid:\n  theme: forest\nblocks:\n  id_prefix: diagram-\n",
    )
    .unwrap();

    let output = run_in(&dir.path().join("public/guide"), &[]);
    assert!(output.status.success(), "{output:?}");

    let flow = fs::read_to_string(dir.path().join("public/guide/flow.html")).unwrap();
    assert!(flow.contains("id=\"diagram-0\""));
    assert!(flow.contains("\"theme\":\"forest\""));
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no input given"), "{stderr}");
}

const MIXED_HEAD: &str = "<!DOCTYPE html><html><head><title>Mixed</title></head><body>\
<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">\
<use xlink:href=\"#a\"></use></svg>\
<noscript><img src=\"a.png\"></noscript>\
<pre>\n\nindented</pre>\
<template><pre><code class=\"language-mermaid\">inert</code></pre></template>";

const MIXED_TAIL: &str = "<p>after</p></body></html>";

#[test]
fn test_markup_outside_diagrams_is_preserved() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("public")).unwrap();
    let page = format!(
        "{MIXED_HEAD}<pre><code class=\"language-mermaid\">graph TD; A--&gt;B</code></pre>{MIXED_TAIL}"
    );
    fs::write(dir.path().join("public/mixed.html"), &page).unwrap();

    let output = run_in(dir.path(), &["--input=public", "--markup-only"]);
    assert!(output.status.success(), "{output:?}");

    let converted = fs::read_to_string(dir.path().join("public/mixed.html")).unwrap();
    let expected = format!(
        "{MIXED_HEAD}<div class=\"mermaid\" id=\"mermaid-0\">graph TD; A--&gt;B</div>{MIXED_TAIL}"
    );
    assert_eq!(converted, expected);
}
