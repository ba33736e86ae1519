//! Diagnostics for argspec.
//!
//! Provides [`Diagnostic`], [`Severity`], and [`Span`] used to report
//! problems found while validating a command line. Diagnostic codes are
//! defined in the [`codes`] module; their explanations, default severities,
//! and message templates are generated from `spec/diagnostics.jsonc`.

#![warn(missing_docs)]

/// Diagnostic ID constants generated from the catalogue.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the command line is invalid.
    Error,
    /// Warning: the command line may not do what was intended.
    Warn,
    /// Informational note.
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Byte span in the source line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A diagnostic message produced by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"ARG1001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the source line that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling. Keys and values are free-form
    /// strings; `BTreeMap` keeps serialized key order deterministic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Info, message, span)
    }

    /// Build a diagnostic from the catalogue: severity comes from
    /// [`default_severity`] and the message from the `default` template
    /// rendered with `ctx`. The context is attached to the diagnostic.
    ///
    /// Unknown codes fall back to `Error` severity with the code as message.
    pub fn from_catalogue(
        id: &'static str,
        ctx: BTreeMap<String, String>,
        span: Option<Span>,
    ) -> Self {
        let severity = default_severity(id).unwrap_or(Severity::Error);
        let message = message_template(id, "default")
            .map(|t| render_template(t, &ctx))
            .unwrap_or_else(|| id.to_string());
        Self::new(id, severity, message, span).with_context(ctx)
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_explain.rs"))
}

/// Returns the catalogued default severity for a diagnostic code, if known.
pub fn default_severity(id: &str) -> Option<Severity> {
    include!(concat!(env!("OUT_DIR"), "/generated_severity.rs"))
}

/// Returns the message template for a `(code, variant)` pair, if known.
pub fn message_template(id: &str, variant: &str) -> Option<&'static str> {
    include!(concat!(env!("OUT_DIR"), "/generated_templates.rs"))
}

/// Substitute `{key}` placeholders in `template` with values from `ctx`.
///
/// Placeholders without a matching key are left as-is.
pub fn render_template(template: &str, ctx: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) => {
                let key = after_open[..close].trim();
                match ctx.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(&after_open[..close]);
                        out.push('}');
                    }
                }
                rest = &after_open[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ── Span ────────────────────────────────────────────────────────────

    #[test]
    fn span_new_valid() {
        let s = Span::new(5, 10);
        assert_eq!(s.start, 5);
        assert_eq!(s.end, 10);
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn span_empty() {
        let s = Span::empty(7);
        assert!(s.is_empty());
        assert_eq!(s.start, 7);
    }

    #[test]
    #[should_panic(expected = "Span end (3) < start (5)")]
    fn span_new_inverted_panics() {
        Span::new(5, 3);
    }

    // ── Display ─────────────────────────────────────────────────────────

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warn), "warn");
        assert_eq!(format!("{}", Severity::Info), "info");
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error(codes::UNKNOWN_OPTION, "unknown option '-z'", None);
        assert_eq!(format!("{}", d), "error[ARG1001]: unknown option '-z'");
    }

    // ── Catalogue ───────────────────────────────────────────────────────

    #[test]
    fn all_codes_have_explanations_and_severities() {
        let all = [
            codes::UNKNOWN_OPTION,
            codes::REPEATED_OPTION,
            codes::INVALID_OPTION_VALUE,
            codes::INVALID_POSITIONAL_VALUE,
            codes::MISSING_OPTION_VALUE,
            codes::EXCESS_ARGUMENT,
            codes::ATTACHED_EXCESS_ARGUMENT,
            codes::UNKNOWN_COMMAND,
        ];
        for code in &all {
            assert!(explain(code).is_some(), "{code} has no explain() entry");
            assert!(default_severity(code).is_some(), "{code} has no severity");
            assert!(
                message_template(code, "default").is_some(),
                "{code} has no default template"
            );
        }
    }

    #[test]
    fn catalogue_severities() {
        assert_eq!(
            default_severity(codes::EXCESS_ARGUMENT),
            Some(Severity::Error)
        );
        assert_eq!(
            default_severity(codes::MISSING_OPTION_VALUE),
            Some(Severity::Warn)
        );
        assert_eq!(
            default_severity(codes::UNKNOWN_COMMAND),
            Some(Severity::Info)
        );
        assert_eq!(default_severity("ARG9999"), None);
    }

    #[test]
    fn explain_unknown_is_none() {
        let d = Diagnostic::error("UNKNOWN_CODE", "test", None);
        assert!(d.explain().is_none());
    }

    // ── Templates ───────────────────────────────────────────────────────

    #[test]
    fn render_template_substitutes_known_keys() {
        let out = render_template(
            "unknown option '{option}' for command '{command}'",
            &ctx(&[("option", "-z"), ("command", "grep")]),
        );
        assert_eq!(out, "unknown option '-z' for command 'grep'");
    }

    #[test]
    fn render_template_keeps_unknown_and_unclosed_placeholders() {
        let out = render_template("a {missing} b {open", &ctx(&[]));
        assert_eq!(out, "a {missing} b {open");
    }

    #[test]
    fn from_catalogue_uses_severity_and_template() {
        let d = Diagnostic::from_catalogue(
            codes::UNKNOWN_OPTION,
            ctx(&[("option", "-z"), ("command", "cmd")]),
            Some(Span::new(4, 6)),
        );
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.message, "unknown option '-z' for command 'cmd'");
        assert_eq!(d.context.as_ref().unwrap()["option"], "-z");
    }

    // ── Serde ───────────────────────────────────────────────────────────

    #[test]
    fn diagnostic_serde_omits_none_fields() {
        let d = Diagnostic::error(codes::EXCESS_ARGUMENT, "test", None);
        let json = serde_json::to_string(&d).unwrap();
        assert!(
            !json.contains("span"),
            "None span should be omitted: {json}"
        );
        assert!(
            !json.contains("context"),
            "None context should be omitted: {json}"
        );
    }

    #[test]
    fn diagnostic_context_serializes_in_key_order() {
        let d = Diagnostic::error(codes::EXCESS_ARGUMENT, "test", Some(Span::new(0, 5)))
            .with_context(ctx(&[("value", "x"), ("command", "cmd"), ("index", "2")]));
        let json = serde_json::to_string(&d).unwrap();
        let c = json.find("\"command\"").unwrap();
        let i = json.find("\"index\"").unwrap();
        let v = json.find("\"value\"").unwrap();
        assert!(c < i && i < v, "context keys should be sorted: {json}");
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }
}
