//! CLI tests for `argspec check`.

mod common;

use common::{argspec_cmd, run_json, write_tables};

#[test]
fn clean_line_succeeds() {
    let (output, json) = run_json("check", "cmd -n bob '*.txt' out.log");
    assert!(output.status.success());
    assert_eq!(json["ok"], true);
    assert_eq!(json["command"], "cmd");
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(0));
}

#[test]
fn token_classes_are_reported() {
    let (_, json) = run_json("check", "cmd -n bob pat");
    let classes: Vec<_> = json["tokens"]
        .as_array()
        .expect("tokens array")
        .iter()
        .map(|t| t["class"].as_str().unwrap_or("").to_string())
        .collect();
    assert_eq!(
        classes,
        vec!["command", "option", "optionArgument", "positional"]
    );
    assert_eq!(json["tokens"][2]["text"], "bob");
    assert_eq!(json["tokens"][2]["span"]["start"], 7);
}

#[test]
fn unknown_option_fails_with_code() {
    let (output, json) = run_json("check", "cmd -z");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["ok"], false);
    assert_eq!(json["diagnostics"][0]["id"], "ARG1001");
    assert_eq!(json["diagnostics"][0]["context"]["option"], "-z");
    assert_eq!(json["tokens"][1]["class"], "unknownOption");
}

#[test]
fn value_glued_to_a_flag_is_excess() {
    let (output, json) = run_json("check", "cmd --quiet=x");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["diagnostics"][0]["id"], "ARG1202");
    assert_eq!(json["tokens"][2]["class"], "excess");
}

#[test]
fn unknown_short_option_and_excess_fail() {
    let (output, json) = run_json("check", "cmd -q=x a b c");
    assert_eq!(output.status.code(), Some(1));
    let ids: Vec<_> = json["diagnostics"]
        .as_array()
        .expect("diagnostics array")
        .iter()
        .map(|d| d["id"].as_str().unwrap_or("").to_string())
        .collect();
    // `-q=x` is one unknown short option; `c` has no positional slot.
    assert_eq!(ids, vec!["ARG1001", "ARG1201"]);
}

#[test]
fn long_option_value_after_equals_is_checked() {
    let (output, json) = run_json("check", "cmd --color=sometimes");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["diagnostics"][0]["id"], "ARG1101");
    assert_eq!(
        json["diagnostics"][0]["context"]["kind"],
        "one of auto|never"
    );
}

#[test]
fn unknown_command_is_informational() {
    let (output, json) = run_json("check", "frob -x");
    assert!(output.status.success());
    assert_eq!(json["ok"], true);
    assert!(json["command"].is_null());
    assert_eq!(json["diagnostics"][0]["id"], "ARG2001");
    assert_eq!(json["diagnostics"][0]["severity"], "info");
}

#[test]
fn pretty_output_renders_to_stderr() {
    let (_dir, path) = write_tables(common::TABLES);
    let output = argspec_cmd()
        .args([
            "check",
            "--commands",
            &path,
            "--output",
            "pretty",
            "cmd --bogus",
        ])
        .output()
        .expect("run check");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ARG1001"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("1 error"), "unexpected stderr: {stderr}");
}

#[test]
fn missing_tables_file_emits_json_error_envelope() {
    let output = argspec_cmd()
        .args([
            "check",
            "--commands",
            "nope-missing.jsonc",
            "--output",
            "json",
            "cmd",
        ])
        .output()
        .expect("run check");
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json envelope");
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "command_failed");
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("failed to read command tables")),
        "unexpected message: {}",
        json["message"]
    );
}

#[test]
fn invalid_tables_are_rejected() {
    let (_dir, path) = write_tables(
        r#"{"commands":[{"name":"x","options":[{"aliases":["-a"]},{"aliases":["-a"]}]}]}"#,
    );
    let output = argspec_cmd()
        .args(["check", "--commands", &path, "--output", "json", "x"])
        .output()
        .expect("run check");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid json envelope");
    assert!(
        json["message"]
            .as_str()
            .is_some_and(|m| m.contains("declared twice")),
        "unexpected message: {}",
        json["message"]
    );
}
