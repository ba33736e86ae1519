//! Command-line validation.
//!
//! [`validate`] walks a token stream once, in order, against a resolved
//! [`CommandSpec`] and returns an immutable [`ValidationResult`]. Defects in
//! the user's line never surface as errors: they become result-set
//! membership (bad, excess) that editors turn into highlighting and
//! diagnostics via [`to_diagnostics`].

use crate::resolve::{command_name, resolve_in};
use crate::token::Token;
use argspec_spec_tables::{CommandSpec, CommandTables};
use std::convert::Infallible;
use thiserror::Error;
use tracing::debug;

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
///
/// ```ignore
/// ctx!("option" => name, "value" => text)
/// ```
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

mod cancel;
mod engine;
mod kinds;
mod report;
mod result;
mod state;

pub use cancel::Cancel;
pub use kinds::{BuiltinKinds, KindCheck, KindRegistry};
pub use report::{to_diagnostics, unknown_command_diagnostic};
pub use result::{Excess, NextExpectation, TokenClass, ValidationResult};

use cancel::Never;
use engine::Walk;

/// Errors from a [`Validator`] run. User-input defects are never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// The cancellation check fired before the walk completed.
    #[error("validation cancelled after {processed} of {total} tokens")]
    Cancelled {
        /// Tokens fully processed before cancellation.
        processed: usize,
        /// Tokens in the stream.
        total: usize,
    },
}

static BUILTIN_KINDS: BuiltinKinds = BuiltinKinds;
static NEVER: Never = Never;

/// Configurable validation: injected kind predicates and cancellation.
///
/// ```
/// use argspec_core::{ArgKind, CommandSpec, KindRegistry, LineBuilder, PositionalSpec, Validator};
///
/// let cmd = CommandSpec::new("serve")
///     .with_positional(PositionalSpec::new("port", ArgKind::Custom { name: "port".into() }));
/// let kinds = KindRegistry::new().with("port", |s| s.parse::<u16>().is_ok());
/// let tokens = LineBuilder::new().command("serve").space().argument("http").tokens();
///
/// let result = Validator::new(&cmd).with_kinds(&kinds).run(&tokens).unwrap();
/// assert!(result.is_bad(tokens[2].id));
/// ```
#[derive(Clone, Copy)]
pub struct Validator<'c, 'a> {
    command: &'c CommandSpec,
    kinds: &'a dyn KindCheck,
    cancel: &'a dyn Cancel,
}

impl<'c, 'a> Validator<'c, 'a> {
    /// Validate against `command` with [`BuiltinKinds`] and no cancellation.
    pub fn new(command: &'c CommandSpec) -> Self {
        Self {
            command,
            kinds: &BUILTIN_KINDS,
            cancel: &NEVER,
        }
    }

    /// Use `kinds` to decide value validity.
    pub fn with_kinds(mut self, kinds: &'a dyn KindCheck) -> Self {
        self.kinds = kinds;
        self
    }

    /// Poll `cancel` before each token.
    pub fn with_cancel(mut self, cancel: &'a dyn Cancel) -> Self {
        self.cancel = cancel;
        self
    }

    /// Walk `tokens`. Fails only if cancelled; no partial result is returned.
    pub fn run(&self, tokens: &[Token]) -> Result<ValidationResult<'c>, ValidateError> {
        let total = tokens.len();
        walk_tokens(self.command, self.kinds, tokens, |processed| {
            if self.cancel.is_cancelled() {
                debug!(processed, "validation cancelled");
                return Err(ValidateError::Cancelled { processed, total });
            }
            Ok(())
        })
    }
}

/// Validate `tokens` against `command` with the built-in kind predicates.
pub fn validate<'c>(command: &'c CommandSpec, tokens: &[Token]) -> ValidationResult<'c> {
    let Ok(result) = walk_tokens(command, &BUILTIN_KINDS, tokens, |_| Ok::<_, Infallible>(()));
    result
}

/// The single pass over `tokens`. `check` runs before each token and may
/// stop the walk.
fn walk_tokens<'c, E>(
    command: &'c CommandSpec,
    kinds: &dyn KindCheck,
    tokens: &[Token],
    mut check: impl FnMut(usize) -> Result<(), E>,
) -> Result<ValidationResult<'c>, E> {
    debug!(command = %command.name, tokens = tokens.len(), "validating");
    let mut walk = Walk::new(command, kinds);
    for (processed, token) in tokens.iter().enumerate() {
        check(processed)?;
        walk.step(token);
    }
    Ok(walk.finish())
}

/// Resolve the line's command in `tables` and validate it.
///
/// Returns `None` when the line has no command word, the tables are
/// unavailable, or no command matches: nothing to report.
pub fn validate_line<'c>(
    tables: Option<&'c CommandTables>,
    tokens: &[Token],
) -> Option<ValidationResult<'c>> {
    let command = resolve_in(command_name(tokens), tables)?;
    Some(validate(command, tokens))
}
