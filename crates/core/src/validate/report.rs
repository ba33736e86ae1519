use super::result::{Excess, ValidationResult};
use crate::token::{Token, TokenKind};
use argspec_diagnostics::{Diagnostic, Span, codes};

/// Lower a validation result to diagnostics, in token order.
///
/// `tokens` must be the stream the result was computed from; spans come
/// from the tokens.
pub fn to_diagnostics(result: &ValidationResult<'_>, tokens: &[Token]) -> Vec<Diagnostic> {
    let command = result.command();
    let mut issues = Vec::new();

    for token in tokens {
        let id = token.id;
        let span = Some(token.span);
        match &token.kind {
            TokenKind::Option(name) => {
                if result.is_repeated(id) {
                    let canonical = result
                        .option_for_token(id)
                        .map(|o| o.canonical())
                        .unwrap_or(name.as_str());
                    issues.push(Diagnostic::from_catalogue(
                        codes::REPEATED_OPTION,
                        ctx!(
                            "command" => command.name.as_str(),
                            "option" => name.as_str(),
                            "canonical" => canonical,
                        ),
                        span,
                    ));
                } else if result.is_bad(id) {
                    issues.push(Diagnostic::from_catalogue(
                        codes::UNKNOWN_OPTION,
                        ctx!("command" => command.name.as_str(), "option" => name.as_str()),
                        span,
                    ));
                }
                if let Some(missing) = result.starved_values(id) {
                    issues.push(Diagnostic::from_catalogue(
                        codes::MISSING_OPTION_VALUE,
                        ctx!("option" => name.as_str(), "missing" => missing.to_string()),
                        span,
                    ));
                }
            }
            TokenKind::Argument(text) => {
                if let Some(diag) = argument_diagnostic(result, token, text) {
                    issues.push(diag);
                }
            }
            TokenKind::Command(_) | TokenKind::Whitespace => {}
        }
    }
    issues
}

fn argument_diagnostic(
    result: &ValidationResult<'_>,
    token: &Token,
    text: &str,
) -> Option<Diagnostic> {
    let id = token.id;
    let span = Some(token.span);
    let command = result.command();

    match result.excess_reason(id) {
        Some(Excess::NoPositionalSlot { index }) => {
            return Some(Diagnostic::from_catalogue(
                codes::EXCESS_ARGUMENT,
                ctx!(
                    "command" => command.name.as_str(),
                    "value" => text,
                    "index" => (index + 1).to_string(),
                ),
                span,
            ));
        }
        Some(Excess::Attached { option }) => {
            let option = command.option(option).map_or("", |o| o.canonical());
            return Some(Diagnostic::from_catalogue(
                codes::ATTACHED_EXCESS_ARGUMENT,
                ctx!("option" => option, "value" => text),
                span,
            ));
        }
        None => {}
    }

    if !result.is_bad(id) {
        return None;
    }
    let kind = result.argument_kind_for(id)?.describe();
    if let Some(option) = result.option_for_argument(id) {
        return Some(Diagnostic::from_catalogue(
            codes::INVALID_OPTION_VALUE,
            ctx!("option" => option.canonical(), "value" => text, "kind" => kind),
            span,
        ));
    }
    let index = result.positional_index(id)?;
    let name = command
        .positional_at(index)
        .map_or("argument", |p| p.name.as_str());
    Some(Diagnostic::from_catalogue(
        codes::INVALID_POSITIONAL_VALUE,
        ctx!(
            "name" => name,
            "index" => (index + 1).to_string(),
            "value" => text,
            "kind" => kind,
        ),
        span,
    ))
}

/// The informational diagnostic for a line whose command has no spec.
pub fn unknown_command_diagnostic(name: &str, span: Option<Span>) -> Diagnostic {
    Diagnostic::from_catalogue(codes::UNKNOWN_COMMAND, ctx!("command" => name), span)
}
