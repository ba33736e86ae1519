use crate::token::{Token, TokenKind};
use argspec_spec_tables::{CommandSpec, CommandTables};

/// Find the first command in `candidates` whose name is exactly `typed`.
///
/// An empty or unknown name yields `None`. That is the "validation
/// unavailable" condition, not an error.
pub fn resolve<'c>(typed: &str, candidates: &'c [CommandSpec]) -> Option<&'c CommandSpec> {
    if typed.is_empty() {
        return None;
    }
    candidates.iter().find(|c| c.name == typed)
}

/// Like [`resolve`], for callers that may have neither a typed name nor a
/// loaded table. Uses the tables' name index (same first-match semantics).
pub fn resolve_in<'c>(
    typed: Option<&str>,
    tables: Option<&'c CommandTables>,
) -> Option<&'c CommandSpec> {
    let typed = typed.filter(|t| !t.is_empty())?;
    tables?.command(typed)
}

/// The typed command name: text of the first `Command` token, if any.
pub fn command_name(tokens: &[Token]) -> Option<&str> {
    tokens.iter().find_map(|t| match &t.kind {
        TokenKind::Command(name) => Some(name.as_str()),
        _ => None,
    })
}
