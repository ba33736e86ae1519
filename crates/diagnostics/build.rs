//! Build script for generating diagnostic lookup code at compile time.
//!
//! Reads `spec/diagnostics.jsonc` and writes into `OUT_DIR`:
//! - `generated_codes.rs`: `pub const` per diagnostic, named by `constName`
//! - `generated_explain.rs`: id → long description
//! - `generated_severity.rs`: id → default severity
//! - `generated_templates.rs`: (id, variant) → message template

use argspec_jsonc_strip::normalize_jsonc;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let spec_path = Path::new("spec/diagnostics.jsonc");
    println!("cargo:rerun-if-changed={}", spec_path.display());

    let raw = fs::read_to_string(spec_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", spec_path.display()));

    let spec: serde_json::Value = serde_json::from_str(&normalize_jsonc(&raw))
        .expect("failed to parse diagnostics.jsonc as JSON");

    let diagnostics = spec["diagnostics"]
        .as_array()
        .expect("diagnostics.jsonc: expected `diagnostics` array");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let out_path = Path::new(&out_dir);

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    let header = "// Auto-generated from spec/diagnostics.jsonc. DO NOT EDIT.\n\n";
    let mut codes = String::from(header);
    let mut explain = String::from("match id {\n");
    let mut severity = String::from("match id {\n");
    let mut templates = String::from("match (id, variant) {\n");

    for (i, entry) in diagnostics.iter().enumerate() {
        let id = str_field(entry, "id", i);
        let const_name = str_field(entry, "constName", i);
        let summary = str_field(entry, "summary", i);
        let description = str_field(entry, "description", i);

        assert!(
            id.starts_with("ARG") && id.len() == 7 && id[3..].bytes().all(|b| b.is_ascii_digit()),
            "diagnostics[{i}]: id '{id}' must look like ARG0000"
        );
        assert!(
            !const_name.is_empty()
                && const_name
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
                && const_name.as_bytes()[0].is_ascii_uppercase(),
            "diagnostics[{i}] (id={id}): constName '{const_name}' is not SCREAMING_SNAKE_CASE"
        );
        assert!(
            seen_ids.insert(id.to_string()),
            "diagnostics[{i}]: duplicate id '{id}'"
        );
        assert!(
            seen_names.insert(const_name.to_string()),
            "diagnostics[{i}] (id={id}): duplicate constName '{const_name}'"
        );

        codes.push_str(&format!("/// {summary}\n"));
        codes.push_str(&format!("pub const {const_name}: &str = \"{id}\";\n\n"));

        explain.push_str(&format!(
            "    \"{id}\" => Some(\"{}\"),\n",
            escape_rust_string_literal(description)
        ));

        let sev_rs = match str_field(entry, "severity", i) {
            "error" => "Severity::Error",
            "warn" => "Severity::Warn",
            "info" => "Severity::Info",
            other => panic!("diagnostics[{i}] (id={id}): invalid severity '{other}'"),
        };
        severity.push_str(&format!("    \"{id}\" => Some({sev_rs}),\n"));

        let context_keys: HashSet<&str> = entry["contextKeys"]
            .as_array()
            .unwrap_or_else(|| panic!("diagnostics[{i}] (id={id}) missing `contextKeys`"))
            .iter()
            .map(|k| {
                k.as_str().unwrap_or_else(|| {
                    panic!("diagnostics[{i}] (id={id}) contextKeys entries must be strings")
                })
            })
            .collect();
        if let Some(map) = entry["messageTemplates"].as_object() {
            for (variant, template) in map {
                let template = template.as_str().unwrap_or_else(|| {
                    panic!("diagnostics[{i}] (id={id}) messageTemplates.{variant} must be a string")
                });
                for placeholder in extract_template_placeholders(template) {
                    assert!(
                        context_keys.contains(placeholder.as_str()),
                        "diagnostics[{i}] (id={id}) messageTemplates.{variant} references '{{{placeholder}}}' not listed in contextKeys"
                    );
                }
                templates.push_str(&format!(
                    "    (\"{id}\", \"{variant}\") => Some(\"{}\"),\n",
                    escape_rust_string_literal(template)
                ));
            }
        }
    }

    for table in [&mut explain, &mut severity, &mut templates] {
        table.push_str("    _ => None,\n}\n");
    }

    write_out(out_path, "generated_codes.rs", &codes);
    write_out(out_path, "generated_explain.rs", &explain);
    write_out(out_path, "generated_severity.rs", &severity);
    write_out(out_path, "generated_templates.rs", &templates);
}

fn str_field<'a>(entry: &'a serde_json::Value, key: &str, i: usize) -> &'a str {
    entry[key]
        .as_str()
        .unwrap_or_else(|| panic!("diagnostics[{i}] missing `{key}`"))
}

fn write_out(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap_or_else(|e| panic!("failed to write {name}: {e}"));
}

fn escape_rust_string_literal(value: &str) -> String {
    value.chars().flat_map(char::escape_default).collect()
}

fn extract_template_placeholders(template: &str) -> HashSet<String> {
    let mut placeholders = HashSet::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            break;
        };
        let key = after_open[..close].trim();
        if !key.is_empty() {
            placeholders.insert(key.to_string());
        }
        rest = &after_open[close + 1..];
    }
    placeholders
}
