//! Integration tests for apibump CLI
//!
//! Tests end-to-end command behavior using the CLI binary.
//! Uses tempfile for isolated test directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// Get the path to the apibump binary (built by cargo)
fn apibump_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_apibump"))
}

/// Run apibump with the given args in the specified directory
fn run_apibump(dir: &Path, args: &[&str]) -> Output {
    apibump_binary()
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute apibump command")
}

/// Get stdout as string
fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as string
fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Parse stdout as JSON
fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!("stdout is not JSON ({}): {}", e, stdout(output));
    })
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write file");
    path
}

/// Previous release: a `Widget` unit plus a free function.
const OLD_SNAPSHOT: &str = r#"{
    "Widget": {
        "name": "Widget",
        "kind": "unit",
        "fields": {
            "count": { "name": "count", "kind": "field", "type": { "name": "int" } }
        },
        "functions": {
            "resize": {
                "name": "resize",
                "kind": "function",
                "type": { "name": "void" },
                "signatures": [
                    { "parameters": [ { "name": "w", "type": { "name": "int" } } ] }
                ]
            }
        }
    },
    "render": {
        "name": "render",
        "kind": "function",
        "type": { "name": "void" },
        "signatures": [ { "parameters": [] } ]
    }
}"#;

/// Adds a new top-level unit: minor.
const ADDED_SNAPSHOT: &str = r#"{
    "Widget": {
        "name": "Widget",
        "kind": "unit",
        "fields": {
            "count": { "name": "count", "kind": "field", "type": { "name": "int" } }
        },
        "functions": {
            "resize": {
                "name": "resize",
                "kind": "function",
                "type": { "name": "void" },
                "signatures": [
                    { "parameters": [ { "name": "w", "type": { "name": "int" } } ] }
                ]
            }
        }
    },
    "render": {
        "name": "render",
        "kind": "function",
        "type": { "name": "void" },
        "signatures": [ { "parameters": [] } ]
    },
    "Theme": { "name": "Theme", "kind": "unit" }
}"#;

/// Removes `Widget.resize`: major.
const REMOVED_SNAPSHOT: &str = r#"{
    "Widget": {
        "name": "Widget",
        "kind": "unit",
        "fields": {
            "count": { "name": "count", "kind": "field", "type": { "name": "int" } }
        }
    },
    "render": {
        "name": "render",
        "kind": "function",
        "type": { "name": "void" },
        "signatures": [ { "parameters": [] } ]
    }
}"#;

/// `render` turns from a function into a field.
const RESHAPED_SNAPSHOT: &str = r#"{
    "Widget": {
        "name": "Widget",
        "kind": "unit",
        "fields": {
            "count": { "name": "count", "kind": "field", "type": { "name": "int" } }
        },
        "functions": {
            "resize": {
                "name": "resize",
                "kind": "function",
                "type": { "name": "void" },
                "signatures": [
                    { "parameters": [ { "name": "w", "type": { "name": "int" } } ] }
                ]
            }
        }
    },
    "render": { "name": "render", "kind": "field", "type": { "name": "void" } }
}"#;

/// Write old/new snapshots into a fresh directory.
fn setup_snapshots(new_snapshot: &str) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "old.json", OLD_SNAPSHOT);
    write_file(temp_dir.path(), "new.json", new_snapshot);
    temp_dir
}

// ============================================================================
// Compare Command Tests
// ============================================================================

#[test]
fn test_compare_identical_is_patch() {
    let temp_dir = setup_snapshots(OLD_SNAPSHOT);
    let output = run_apibump(
        temp_dir.path(),
        &["--format", "json", "compare", "old.json", "new.json"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = stdout_json(&output);
    assert_eq!(json["bump"], "patch");
    assert_eq!(json["changes"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["summary_text"], "No changes");
}

#[test]
fn test_compare_added_entity_is_minor() {
    let temp_dir = setup_snapshots(ADDED_SNAPSHOT);
    let output = run_apibump(
        temp_dir.path(),
        &[
            "--format",
            "json",
            "compare",
            "old.json",
            "new.json",
            "--from-version",
            "1.2.3",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = stdout_json(&output);
    assert_eq!(json["bump"], "minor");
    assert_eq!(json["previous_version"], "1.2.3");
    assert_eq!(json["next_version"], "1.3.0");
    assert_eq!(json["changes"][0]["path"], "Theme");
    assert_eq!(json["changes"][0]["kind"], "entity_was_introduced");
}

#[test]
fn test_compare_removal_on_initial_development_is_minor_release() {
    let temp_dir = setup_snapshots(REMOVED_SNAPSHOT);
    let output = run_apibump(
        temp_dir.path(),
        &[
            "--format",
            "json",
            "compare",
            "old.json",
            "new.json",
            "--from-tag",
            "v0.3.1",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = stdout_json(&output);
    assert_eq!(json["bump"], "major");
    assert_eq!(json["release_bump"], "minor");
    assert_eq!(json["next_version"], "0.4.0");
    assert_eq!(json["changes"][0]["path"], "Widget.resize");
    assert_eq!(json["changes"][0]["severity"], "major");
}

#[test]
fn test_compare_respects_versioning_config() {
    let temp_dir = setup_snapshots(REMOVED_SNAPSHOT);
    write_file(
        temp_dir.path(),
        ".apibump.toml",
        "[versioning]\ninitial_development_major_is_minor = false\n",
    );
    let output = run_apibump(
        temp_dir.path(),
        &[
            "--format",
            "json",
            "compare",
            "old.json",
            "new.json",
            "--from-version",
            "0.3.1",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout_json(&output)["next_version"], "1.0.0");
}

#[test]
fn test_compare_ignore_rules_from_config() {
    let temp_dir = setup_snapshots(REMOVED_SNAPSHOT);
    write_file(
        temp_dir.path(),
        "custom.toml",
        "[ignore]\nentities = [\"Widget.*\"]\n",
    );
    let output = run_apibump(
        temp_dir.path(),
        &[
            "--format",
            "json",
            "--config",
            "custom.toml",
            "compare",
            "old.json",
            "new.json",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = stdout_json(&output);
    // Removal is reported on the parent collection, not on the ignored child path.
    assert_eq!(json["bump"], "major");

    write_file(
        temp_dir.path(),
        "custom.toml",
        "[ignore]\nentities = [\"Widget\"]\n",
    );
    let output = run_apibump(
        temp_dir.path(),
        &[
            "--format",
            "json",
            "--config",
            "custom.toml",
            "compare",
            "old.json",
            "new.json",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = stdout_json(&output);
    assert_eq!(json["bump"], "patch");
    assert_eq!(json["changes"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_compare_writes_changelog_file() {
    let temp_dir = setup_snapshots(REMOVED_SNAPSHOT);
    let output = run_apibump(
        temp_dir.path(),
        &["compare", "old.json", "new.json", "--changelog", "CHANGES.txt"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let changelog =
        fs::read_to_string(temp_dir.path().join("CHANGES.txt")).expect("changelog written");
    assert_eq!(changelog, "Widget.resize: Entity was removed\n");
}

#[test]
fn test_compare_changelog_stdout_and_table() {
    let temp_dir = setup_snapshots(ADDED_SNAPSHOT);
    let output = run_apibump(
        temp_dir.path(),
        &["compare", "old.json", "new.json", "--changelog-stdout"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout_str = stdout(&output);
    assert!(stdout_str.starts_with("Theme: Entity was introduced\n"));
    assert!(stdout_str.contains("BUMP:"));
    assert!(stdout_str.contains("minor"));
}

#[test]
fn test_compare_changelog_targets_conflict() {
    let temp_dir = setup_snapshots(ADDED_SNAPSHOT);
    let output = run_apibump(
        temp_dir.path(),
        &[
            "compare",
            "old.json",
            "new.json",
            "--changelog",
            "CHANGES.txt",
            "--changelog-stdout",
        ],
    );

    assert!(!output.status.success());
    assert!(!temp_dir.path().join("CHANGES.txt").exists());
}

#[test]
fn test_compare_version_sources_conflict() {
    let temp_dir = setup_snapshots(ADDED_SNAPSHOT);
    let output = run_apibump(
        temp_dir.path(),
        &[
            "compare",
            "old.json",
            "new.json",
            "--from-version",
            "1.0.0",
            "--from-tag",
            "v1.0.0",
        ],
    );

    assert!(!output.status.success());
}

#[test]
fn test_compare_shape_mismatch_fails() {
    let temp_dir = setup_snapshots(RESHAPED_SNAPSHOT);
    let output = run_apibump(temp_dir.path(), &["compare", "old.json", "new.json"]);

    assert!(!output.status.success());
    let stderr_str = stderr(&output);
    assert!(
        stderr_str.contains("Cannot compare function with field at `render`"),
        "unexpected stderr: {}",
        stderr_str
    );
}

#[test]
fn test_compare_invalid_version_fails() {
    let temp_dir = setup_snapshots(ADDED_SNAPSHOT);
    let output = run_apibump(
        temp_dir.path(),
        &["compare", "old.json", "new.json", "--from-version", "one.two"],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("one.two"));
}

#[test]
fn test_compare_missing_snapshot_fails() {
    let temp_dir = setup_snapshots(ADDED_SNAPSHOT);
    let output = run_apibump(temp_dir.path(), &["compare", "old.json", "missing.json"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("missing.json"));
}

#[test]
fn test_compare_invalid_config_strict() {
    let temp_dir = setup_snapshots(ADDED_SNAPSHOT);
    write_file(temp_dir.path(), ".apibump.toml", "[ignore\nentities = 1\n");

    let lenient = run_apibump(temp_dir.path(), &["compare", "old.json", "new.json"]);
    assert!(lenient.status.success(), "stderr: {}", stderr(&lenient));
    assert!(stderr(&lenient).contains(".apibump.toml"));

    let strict = run_apibump(
        temp_dir.path(),
        &["compare", "old.json", "new.json", "--strict"],
    );
    assert!(!strict.status.success());
}

#[test]
fn test_compare_changelog_stdout_rejected_with_json() {
    let temp_dir = setup_snapshots(ADDED_SNAPSHOT);
    let output = run_apibump(
        temp_dir.path(),
        &[
            "--format",
            "json",
            "compare",
            "old.json",
            "new.json",
            "--changelog-stdout",
        ],
    );

    assert!(!output.status.success());
    assert!(!stdout(&output).contains("Entity was introduced"));
    assert!(stderr(&output).contains("--changelog-stdout"));
}

#[test]
fn test_compare_next_version_overflow_fails() {
    let temp_dir = setup_snapshots(REMOVED_SNAPSHOT);
    let output = run_apibump(
        temp_dir.path(),
        &[
            "compare",
            "old.json",
            "new.json",
            "--from-version",
            "0.18446744073709551615.0",
        ],
    );

    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(101), "apibump panicked");
    assert!(
        stderr(&output).contains("next version"),
        "unexpected stderr: {}",
        stderr(&output)
    );
}

#[test]
fn test_compare_missing_explicit_config_fails() {
    let temp_dir = setup_snapshots(ADDED_SNAPSHOT);

    for extra in [None, Some("--strict")] {
        let mut args = vec!["--config", "nosuch.toml", "compare", "old.json", "new.json"];
        args.extend(extra);
        let output = run_apibump(temp_dir.path(), &args);

        assert!(!output.status.success(), "args: {:?}", args);
        assert!(stderr(&output).contains("nosuch.toml"));
    }
}

#[test]
fn test_compare_explicit_config_strict() {
    let temp_dir = setup_snapshots(REMOVED_SNAPSHOT);
    write_file(
        temp_dir.path(),
        "custom.toml",
        "[ignore]\nentities = [\"Widget\"]\n",
    );

    let output = run_apibump(
        temp_dir.path(),
        &[
            "--format",
            "json",
            "--config",
            "custom.toml",
            "compare",
            "old.json",
            "new.json",
            "--strict",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = stdout_json(&output);
    assert_eq!(json["bump"], "patch");
    assert_eq!(json["changes"].as_array().map(Vec::len), Some(0));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_prints_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_apibump(temp_dir.path(), &["config"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout_str = stdout(&output);
    assert!(stdout_str.contains("[versioning]"));
    assert!(stdout_str.contains("initial_development_major_is_minor = true"));
}

#[test]
fn test_config_json_reflects_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(
        temp_dir.path(),
        ".apibump.toml",
        "[ignore]\nentities = [\"internal.**\"]\n",
    );
    let output = run_apibump(temp_dir.path(), &["--format", "json", "config"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json = stdout_json(&output);
    assert_eq!(json["ignore"]["entities"][0], "internal.**");
}

// ============================================================================
// Help / Version Tests
// ============================================================================

#[test]
fn test_no_command_prints_help() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_apibump(temp_dir.path(), &[]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("compare"));
}

#[test]
fn test_version_verbose() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_apibump(temp_dir.path(), &["--version-verbose"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("apibump-core"));
}
