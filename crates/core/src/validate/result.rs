use crate::token::TokenId;
use argspec_spec_tables::{ArgKind, CommandSpec, OptionId, OptionSpec};
use std::collections::{BTreeSet, HashMap, HashSet};

/// What the command line expects immediately after its last token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NextExpectation<'c> {
    /// `true` when the next value is a mandatory argument of an open
    /// option; `false` when it is the next positional argument.
    pub via_option: bool,
    /// Kind the next value will be checked against.
    pub kind: &'c ArgKind,
    /// Display name of the slot: the option's canonical alias or the
    /// positional argument's name.
    pub label: &'c str,
}

/// Why an argument could not be attributed to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Excess {
    /// The command declares no positional argument at `index`.
    NoPositionalSlot {
        /// Positional index the argument would have taken.
        index: usize,
    },
    /// The argument was attached (no whitespace) to an option with no
    /// value slot left.
    Attached {
        /// The option it was attached to.
        option: OptionId,
    },
}

/// Role of a token in the validated line, for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// A known option, used for the first time.
    Option,
    /// An option spelling the command does not declare.
    UnknownOption,
    /// A known option that was already used.
    RepeatedOption,
    /// A valid value consumed by an option.
    OptionArgument,
    /// A valid positional value.
    Positional,
    /// A value that failed its kind (option-owned or positional).
    InvalidValue,
    /// A value with no slot to fill.
    Excess,
}

impl TokenClass {
    /// Short lowercase name, as used in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenClass::Option => "option",
            TokenClass::UnknownOption => "unknownOption",
            TokenClass::RepeatedOption => "repeatedOption",
            TokenClass::OptionArgument => "optionArgument",
            TokenClass::Positional => "positional",
            TokenClass::InvalidValue => "invalidValue",
            TokenClass::Excess => "excess",
        }
    }

    /// Whether tokens of this class are reported as problems.
    pub fn is_problem(self) -> bool {
        !matches!(
            self,
            TokenClass::Option | TokenClass::OptionArgument | TokenClass::Positional
        )
    }
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one token stream against one command.
///
/// Immutable once built. Valid only for the exact token stream it was
/// computed from; recompute on any edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult<'c> {
    pub(super) command: &'c CommandSpec,
    pub(super) bad: HashSet<TokenId>,
    pub(super) repeated: HashSet<TokenId>,
    pub(super) excess: HashMap<TokenId, Excess>,
    pub(super) used: BTreeSet<OptionId>,
    pub(super) option_tokens: HashMap<TokenId, OptionId>,
    pub(super) option_arguments: HashMap<TokenId, OptionId>,
    pub(super) argument_kinds: HashMap<TokenId, &'c ArgKind>,
    pub(super) positions: HashMap<TokenId, usize>,
    pub(super) starved: HashMap<TokenId, u32>,
    pub(super) next: Option<NextExpectation<'c>>,
}

impl<'c> ValidationResult<'c> {
    /// The command this line was validated against.
    pub fn command(&self) -> &'c CommandSpec {
        self.command
    }

    /// Whether the token is an unknown or repeated option, or a value
    /// that failed its kind.
    pub fn is_bad(&self, token: TokenId) -> bool {
        self.bad.contains(&token)
    }

    /// Whether the token is an argument with no slot to fill.
    pub fn is_excess(&self, token: TokenId) -> bool {
        self.excess.contains_key(&token)
    }

    /// Why the token is excess, if it is.
    pub fn excess_reason(&self, token: TokenId) -> Option<Excess> {
        self.excess.get(&token).copied()
    }

    /// Whether the token is a known option that had already been used.
    /// Repeated options are also [bad](Self::is_bad).
    pub fn is_repeated(&self, token: TokenId) -> bool {
        self.repeated.contains(&token)
    }

    /// Options never matched in the line, in declaration order.
    pub fn unused_options(&self) -> impl Iterator<Item = &'c OptionSpec> + '_ {
        self.unused_option_ids()
            .filter_map(|id| self.command.option(id))
    }

    /// Identities of options never matched in the line.
    pub fn unused_option_ids(&self) -> impl Iterator<Item = OptionId> + '_ {
        (0..self.command.options.len())
            .map(OptionId)
            .filter(|id| !self.used.contains(id))
    }

    /// Identities of options matched in the line.
    pub fn used_option_ids(&self) -> impl Iterator<Item = OptionId> + '_ {
        self.used.iter().copied()
    }

    /// The option an argument token was consumed by. `None` for positional,
    /// excess, and non-argument tokens.
    pub fn option_for_argument(&self, token: TokenId) -> Option<&'c OptionSpec> {
        self.option_arguments
            .get(&token)
            .and_then(|&id| self.command.option(id))
    }

    /// The option an option token names, whether first use or repeat.
    /// `None` for unknown spellings.
    pub fn option_for_token(&self, token: TokenId) -> Option<&'c OptionSpec> {
        self.option_tokens
            .get(&token)
            .and_then(|&id| self.command.option(id))
    }

    /// Identity of the option an option token names.
    pub fn option_id_for_token(&self, token: TokenId) -> Option<OptionId> {
        self.option_tokens.get(&token).copied()
    }

    /// The kind an argument token was checked against.
    pub fn argument_kind_for(&self, token: TokenId) -> Option<&'c ArgKind> {
        self.argument_kinds.get(&token).copied()
    }

    /// Positional index taken by an argument token. Excess arguments past
    /// the declared positionals also report the index they would have had.
    pub fn positional_index(&self, token: TokenId) -> Option<usize> {
        self.positions.get(&token).copied()
    }

    /// Number of declared values an option token never received because
    /// another option started first.
    pub fn starved_values(&self, token: TokenId) -> Option<u32> {
        self.starved.get(&token).copied()
    }

    /// What the line expects next, for completion.
    pub fn next_expectation(&self) -> Option<NextExpectation<'c>> {
        self.next
    }

    /// Role of a token, for highlighting. `None` for command and
    /// whitespace tokens and for tokens not in the validated stream.
    pub fn classify(&self, token: TokenId) -> Option<TokenClass> {
        if self.is_excess(token) {
            return Some(TokenClass::Excess);
        }
        if self.option_tokens.contains_key(&token) {
            return Some(if self.is_repeated(token) {
                TokenClass::RepeatedOption
            } else {
                TokenClass::Option
            });
        }
        let checked = self.argument_kinds.contains_key(&token);
        if self.is_bad(token) {
            return Some(if checked {
                TokenClass::InvalidValue
            } else {
                TokenClass::UnknownOption
            });
        }
        if self.option_arguments.contains_key(&token) {
            return Some(TokenClass::OptionArgument);
        }
        checked.then_some(TokenClass::Positional)
    }

    /// Whether any token is bad or excess.
    pub fn has_errors(&self) -> bool {
        !self.bad.is_empty() || !self.excess.is_empty()
    }

    /// Number of bad tokens.
    pub fn bad_count(&self) -> usize {
        self.bad.len()
    }

    /// Number of excess tokens.
    pub fn excess_count(&self) -> usize {
        self.excess.len()
    }
}
