mod lexer;
mod render;

use std::fs;
use std::process;

use anyhow::{Context, Result};
use argspec_core::{
    ArgKind, CommandTables, Diagnostic, Token, TokenKind, ValidationResult, command_name,
    resolve_in, to_diagnostics, unknown_command_diagnostic, validate,
};
use argspec_diagnostics as diag;
use argspec_spec_tables::load_tables_from_str;
use ariadne::Fmt;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::lexer::tokenize;
use crate::render::{Format, has_errors, print_summary, render_diagnostics_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "argspec",
    version,
    about = "Check typed command lines against declarative command specs"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Log validation steps to stderr (same as RUST_LOG=debug).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Validate a command line and report its problems.
    Check {
        /// The command line, as typed.
        line: String,
        /// Path to the command tables (JSON or JSONC).
        #[arg(long)]
        commands: String,
    },

    /// Show what the command line expects next.
    Complete {
        /// The command line, as typed so far.
        line: String,
        /// Path to the command tables (JSON or JSONC).
        #[arg(long)]
        commands: String,
    },

    /// Explain a diagnostic ID (e.g. ARG1001).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let outcome = match cli.cmd {
        Cmd::Check { line, commands } => cmd_check(&line, &commands, format),
        Cmd::Complete { line, commands } => cmd_complete(&line, &commands, format),
        Cmd::Explain { id } => cmd_explain(&id, format),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            report_failure(&err, format);
            process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("argspec_core=debug,argspec_cli=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("argspec_core=warn,argspec_cli=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Report a command failure (bad tables file, unreadable path) in the
/// requested format. JSON failures go to stdout so pipes see one object.
fn report_failure(err: &anyhow::Error, format: Format) {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "success": false,
                "error": "command_failed",
                "message": format!("{err:#}"),
            });
            println!("{out}");
        }
        Format::Pretty => eprintln!("{}: {err:#}", "error".fg(ariadne::Color::Red)),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

/// One validated line: its tokens, tables, and (when resolvable) result.
struct Checked<'t> {
    tokens: Vec<Token>,
    command: Option<&'t str>,
    result: Option<ValidationResult<'t>>,
}

fn check_line<'t>(line: &str, tables: &'t CommandTables) -> Checked<'t> {
    let tokens = tokenize(line);
    let spec = resolve_in(command_name(&tokens), Some(tables));
    debug!(
        tokens = tokens.len(),
        resolved = spec.is_some(),
        "tokenized line"
    );
    let result = spec.map(|cmd| validate(cmd, &tokens));
    Checked {
        command: spec.map(|c| c.name.as_str()),
        tokens,
        result,
    }
}

fn load_tables(path: &str) -> Result<CommandTables> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read command tables '{path}'"))?;
    let tables = load_tables_from_str(&text)
        .with_context(|| format!("failed to load command tables '{path}'"))?;
    debug!(
        path,
        commands = tables.commands.len(),
        "loaded command tables"
    );
    Ok(tables)
}

#[derive(Serialize)]
struct TokenReport<'a> {
    text: &'a str,
    span: diag::Span,
    class: Option<&'static str>,
}

fn token_reports<'a>(checked: &'a Checked<'_>) -> Vec<TokenReport<'a>> {
    checked
        .tokens
        .iter()
        .filter_map(|t| {
            let text = t.text()?;
            let class = match &t.kind {
                TokenKind::Command(_) => Some("command"),
                _ => checked
                    .result
                    .as_ref()
                    .and_then(|r| r.classify(t.id))
                    .map(|c| c.as_str()),
            };
            Some(TokenReport {
                text,
                span: t.span,
                class,
            })
        })
        .collect()
}

fn cmd_check(line: &str, commands: &str, format: Format) -> Result<bool> {
    let tables = load_tables(commands)?;
    let checked = check_line(line, &tables);

    let diagnostics: Vec<Diagnostic> = match &checked.result {
        Some(result) => to_diagnostics(result, &checked.tokens),
        None => checked
            .tokens
            .iter()
            .find_map(|t| match &t.kind {
                TokenKind::Command(name) if !name.is_empty() => {
                    Some(unknown_command_diagnostic(name, Some(t.span)))
                }
                _ => None,
            })
            .into_iter()
            .collect(),
    };
    let ok = !has_errors(&diagnostics);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": ok,
                "command": checked.command,
                "diagnostics": diagnostics,
                "tokens": token_reports(&checked),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_diagnostics_pretty(line, &diagnostics);
            print_summary(&diagnostics);
            if ok && checked.result.is_some() {
                eprintln!("check ok");
            }
        }
    }
    Ok(ok)
}

/// Completion candidates for the line's next value.
///
/// Enum values of the expected kind come first. Unused option aliases
/// follow unless an option value is mandatory.
fn candidates(result: &ValidationResult<'_>) -> Vec<String> {
    let mut out = Vec::new();
    let next = result.next_expectation();
    if let Some(ArgKind::Enum { values }) = next.map(|n| n.kind) {
        out.extend(values.iter().cloned());
    }
    if !next.is_some_and(|n| n.via_option) {
        out.extend(
            result
                .unused_options()
                .flat_map(|o| o.aliases.iter().cloned()),
        );
    }
    out
}

fn cmd_complete(line: &str, commands: &str, format: Format) -> Result<bool> {
    let tables = load_tables(commands)?;
    let checked = check_line(line, &tables);
    let Some(result) = &checked.result else {
        match format {
            Format::Json => {
                let out = serde_json::json!({
                    "command": checked.command,
                    "expectation": null,
                    "candidates": [],
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Format::Pretty => eprintln!("no command spec for this line"),
        }
        return Ok(true);
    };

    let next = result.next_expectation();
    let candidates = candidates(result);
    match format {
        Format::Json => {
            let expectation = next.map(|n| {
                serde_json::json!({
                    "viaOption": n.via_option,
                    "label": n.label,
                    "kind": n.kind,
                    "description": n.kind.describe(),
                })
            });
            let out = serde_json::json!({
                "command": checked.command,
                "expectation": expectation,
                "candidates": candidates,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            match next {
                Some(n) if n.via_option => {
                    println!(
                        "value for {}: {}",
                        n.label.fg(ariadne::Color::Cyan),
                        n.kind.describe()
                    );
                }
                Some(n) => {
                    println!(
                        "argument {}: {}",
                        n.label.fg(ariadne::Color::Cyan),
                        n.kind.describe()
                    );
                }
                None => println!("no further arguments"),
            }
            for c in &candidates {
                println!("  {c}");
            }
        }
    }
    Ok(true)
}

fn cmd_explain(id: &str, format: Format) -> Result<bool> {
    let text = diag::explain(id);
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "severity": diag::default_severity(id),
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output: stdout, not stderr.
            if let Some(text) = text {
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(true)
}
