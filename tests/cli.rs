//! Integration tests running the fzr binary.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn fzr() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fzr"));
    cmd.env_remove("FZR_LOG");
    cmd.env("FZR_CONFIG", "/nonexistent/fzr/config.json");
    cmd
}

/// Run fzr with `input` piped to stdin
fn run_piped(args: &[&str], input: &str) -> Output {
    let mut child = fzr()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run fzr");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();

    child.wait_with_output().expect("Failed to wait for fzr")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn document(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stderr).expect("stderr should hold the JSON document")
}

#[test]
fn test_piped_input_plain_output() {
    let input = "src/main.rs\nREADME.md\nsrc/lib.rs\n";
    let output = run_piped(&["--color", "never", "rs$"], input);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["src/main.rs", "src/lib.rs"]);
}

#[test]
fn test_colored_output_uses_truecolor_escapes() {
    let output = run_piped(&["--seed", "7", "'main"], "src/main.rs\n");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert_eq!(stdout.matches("\x1b[38;2;").count(), 4);
    assert_eq!(stdout.matches("\x1b[0m").count(), 4);
    assert!(stdout.starts_with("src/\x1b[38;2;"));
}

#[test]
fn test_document_on_stderr() {
    let output = run_piped(&["--seed", "1", "'lib"], "src/lib.rs\nother\n");
    let doc = document(&output);

    let entries = doc.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["text"], "src/lib.rs");

    let runs = entries[0]["lines"].as_array().unwrap();
    let texts: Vec<&str> = runs.iter().map(|r| r["text"].as_str().unwrap()).collect();
    assert_eq!(texts, vec!["src/", "lib", ".rs"]);
    assert_eq!(runs[0]["hl"][0], "rabbit.files.file");
    assert!(runs[1]["hl"][0].as_str().unwrap().starts_with("rabbit.paint."));
}

#[test]
fn test_no_document_flag() {
    let output = run_piped(&["--no-document", "x"], "x\n");
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_or_marker_and_inversion() {
    let input = "foo.rs\nbar.rs\nbaz.go\nfoo_test.rs\n";
    let output = run_piped(
        &["--color", "never", "'foo", "|", "'bar", "!test"],
        input,
    );
    let mut lines = stdout_lines(&output);
    lines.sort();
    assert_eq!(lines, vec!["bar.rs", "foo.rs"]);
}

#[test]
fn test_same_seed_same_colors() {
    let a = run_piped(&["--seed", "99", "ma"], "main\n");
    let b = run_piped(&["--seed", "99", "ma"], "main\n");
    assert_eq!(a.stdout, b.stdout);
    assert_eq!(a.stderr, b.stderr);
}

#[test]
fn test_limit_applies_to_stdin_when_given() {
    let output = run_piped(&["--color", "never", "-n", "2"], "a\nb\nc\n");
    assert_eq!(stdout_lines(&output), vec!["a", "b"]);
}

#[test]
fn test_empty_query_keeps_input_order() {
    let output = run_piped(&["--color", "never", "--sequential"], "c\na\nb\n");
    assert_eq!(stdout_lines(&output), vec!["c", "a", "b"]);
}

fn write_tree(root: &Path) {
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/main.rs"), "").unwrap();
    fs::write(root.join("src/lib.rs"), "").unwrap();
    fs::write(root.join("notes.txt"), "").unwrap();
}

#[test]
fn test_directory_source() {
    let dir = TempDir::new().unwrap();
    write_tree(dir.path());
    let root = dir.path().to_str().unwrap();

    let output = fzr()
        .args(["--color", "never", "--dir", root, "rs$"])
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run fzr");

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.ends_with(".rs") && l.starts_with(root)));
}

#[test]
fn test_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");

    let output = fzr()
        .args(["--dir", missing.to_str().unwrap(), "x"])
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run fzr");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[cfg(unix)]
#[test]
fn test_command_source() {
    let output = fzr()
        .args(["--color", "never", "--cmd", "printf 'alpha\\nbeta\\ngamma\\n'", "'a$"])
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run fzr");

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["alpha", "beta", "gamma"]);
}

#[cfg(unix)]
#[test]
fn test_command_timeout_is_not_an_error() {
    let output = fzr()
        .args([
            "--color",
            "never",
            "--timeout-ms",
            "200",
            "--cmd",
            "echo first; exec sleep 5",
        ])
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run fzr");

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["first"]);
}

#[cfg(unix)]
#[test]
fn test_command_start_failure_is_fatal() {
    let output = fzr()
        .args(["--cmd", "true"])
        .env("PATH", "")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run fzr");

    // `sh` cannot be found without PATH
    assert!(!output.status.success());
}
