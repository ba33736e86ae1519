//! Shared test helpers for `argspec_core` integration tests.

#![allow(unreachable_pub)]

use argspec_core::{CommandSpec, Token, TokenId, TokenKind};
use argspec_spec_tables::{CommandTables, load_tables_from_str};
use std::sync::LazyLock;

/// Tables loaded once per test binary via LazyLock.
pub static TABLES: LazyLock<CommandTables> = LazyLock::new(|| {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/commands.jsonc");
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    load_tables_from_str(&text)
        .unwrap_or_else(|e| panic!("failed to load {}: {}", path.display(), e))
});

/// The named command from the shared tables.
pub fn command(name: &str) -> &'static CommandSpec {
    TABLES
        .command(name)
        .unwrap_or_else(|| panic!("fixture has no command '{name}'"))
}

/// Id of the first token whose text is `text`.
#[allow(dead_code)]
pub fn id_of(tokens: &[Token], text: &str) -> TokenId {
    tokens
        .iter()
        .find(|t| t.text() == Some(text))
        .map(|t| t.id)
        .unwrap_or_else(|| panic!("no token '{text}' in {tokens:?}"))
}

/// Every option and argument token, the ones the validator classifies.
#[allow(dead_code)]
pub fn classified_tokens(tokens: &[Token]) -> impl Iterator<Item = &Token> {
    tokens
        .iter()
        .filter(|t| matches!(t.kind, TokenKind::Option(_) | TokenKind::Argument(_)))
}
