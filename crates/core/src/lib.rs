//! argspec core library.
//!
//! Validates a tokenized command line against a declarative command spec:
//! which options are unknown or repeated, which values fail their kind,
//! which arguments are excess, which options are still unused, and what
//! the line expects next. The main entry points are [`resolve`] to pick the
//! command spec and [`validate`] / [`validate_line`] to walk the tokens.

#![warn(missing_docs)]

/// Command lookup by typed name.
pub mod resolve;
/// Token stream types consumed by the validator.
pub mod token;
/// The validation engine and its result.
pub mod validate;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Tokens
pub use token::{LineBuilder, Token, TokenId, TokenKind};

// Resolver
pub use resolve::{command_name, resolve, resolve_in};

// Validator
pub use validate::{
    BuiltinKinds, Cancel, Excess, KindCheck, KindRegistry, NextExpectation, TokenClass,
    ValidateError, ValidationResult, Validator, to_diagnostics, unknown_command_diagnostic,
    validate, validate_line,
};

// Diagnostics (re-exported from the diagnostics crate)
pub use argspec_diagnostics::{Diagnostic, Severity, Span, codes};

// Tables (re-exported from the spec-tables crate)
pub use argspec_spec_tables::{
    ArgKind, CommandSpec, CommandTables, OptionArgument, OptionId, OptionSpec, PositionalSpec,
};
