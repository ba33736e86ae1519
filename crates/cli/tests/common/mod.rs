//! Shared helpers for `argspec` CLI tests.

#![allow(unreachable_pub)]

use std::fs;
use std::process::{Command, Output};

use assert_cmd::cargo;

/// Command tables used by the CLI tests.
pub const TABLES: &str = r#"
// test tables
{
  "commands": [
    {
      "name": "cmd",
      "options": [
        { "aliases": ["-n", "--name"], "argument": { "count": 1, "kind": { "type": "nonEmpty" } } },
        {
          "aliases": ["--color"],
          "argument": { "count": 1, "kind": { "type": "enum", "values": ["auto", "never"] } }
        },
        { "aliases": ["-q", "--quiet"] },
      ],
      "positional": [
        { "name": "pattern", "kind": { "type": "string" } },
        { "name": "file", "kind": { "type": "path" } }
      ]
    }
  ]
}
"#;

pub fn argspec_cmd() -> Command {
    Command::new(cargo::cargo_bin!("argspec"))
}

/// Write `content` to a temporary tables file. Keep the dir alive for the
/// duration of the test.
pub fn write_tables(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("commands.jsonc");
    fs::write(&path, content).expect("write temp tables");
    (dir, path.to_string_lossy().to_string())
}

/// Run `argspec <sub> --commands <tables> <line> --output json`.
#[allow(dead_code)]
pub fn run_json(sub: &str, line: &str) -> (Output, serde_json::Value) {
    let (_dir, path) = write_tables(TABLES);
    let output = argspec_cmd()
        .args([sub, "--commands", &path, "--output", "json", "--", line])
        .output()
        .expect("run argspec");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid json ({e}): {stdout}"));
    (output, json)
}
