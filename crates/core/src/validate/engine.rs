use super::kinds::KindCheck;
use super::result::{Excess, NextExpectation, ValidationResult};
use super::state::PendingOption;
use crate::token::{Token, TokenId, TokenKind};
use argspec_spec_tables::{ArgKind, CommandSpec, OptionId};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, trace};

/// One pass over one token stream. All mutable state lives here and is
/// dropped (or turned into a [`ValidationResult`]) at the end of the call.
pub(super) struct Walk<'c, 'k> {
    command: &'c CommandSpec,
    kinds: &'k dyn KindCheck,
    /// Aliases of options not used yet. An option leaves this table (under
    /// every alias at once) the first time it is matched.
    unused_aliases: HashMap<&'c str, OptionId>,
    /// Every alias the command declares, for telling repeats from unknowns.
    all_aliases: HashMap<&'c str, OptionId>,
    position: usize,
    pending: PendingOption,

    bad: HashSet<TokenId>,
    repeated: HashSet<TokenId>,
    excess: HashMap<TokenId, Excess>,
    used: BTreeSet<OptionId>,
    option_tokens: HashMap<TokenId, OptionId>,
    option_arguments: HashMap<TokenId, OptionId>,
    argument_kinds: HashMap<TokenId, &'c ArgKind>,
    positions: HashMap<TokenId, usize>,
    starved: HashMap<TokenId, u32>,
}

impl<'c, 'k> Walk<'c, 'k> {
    pub(super) fn new(command: &'c CommandSpec, kinds: &'k dyn KindCheck) -> Self {
        let mut all_aliases = HashMap::new();
        for (i, option) in command.options.iter().enumerate() {
            for alias in &option.aliases {
                // The first option declaring an alias owns it.
                all_aliases.entry(alias.as_str()).or_insert(OptionId(i));
            }
        }
        Self {
            command,
            kinds,
            unused_aliases: all_aliases.clone(),
            all_aliases,
            position: 0,
            pending: PendingOption::Idle,
            bad: HashSet::new(),
            repeated: HashSet::new(),
            excess: HashMap::new(),
            used: BTreeSet::new(),
            option_tokens: HashMap::new(),
            option_arguments: HashMap::new(),
            argument_kinds: HashMap::new(),
            positions: HashMap::new(),
            starved: HashMap::new(),
        }
    }

    pub(super) fn step(&mut self, token: &Token) {
        match &token.kind {
            TokenKind::Option(name) => self.on_option(token.id, name),
            TokenKind::Argument(text) => self.on_argument(token.id, text),
            TokenKind::Whitespace => {
                if self.pending.is_exhausted() {
                    self.pending = PendingOption::Idle;
                }
            }
            TokenKind::Command(_) => {}
        }
    }

    fn on_option(&mut self, id: TokenId, name: &str) {
        let Some(&option) = self.unused_aliases.get(name) else {
            self.bad.insert(id);
            if let Some(&known) = self.all_aliases.get(name) {
                self.repeated.insert(id);
                self.option_tokens.insert(id, known);
                trace!(token = id.0, option = name, "repeated option");
            } else {
                trace!(token = id.0, option = name, "unknown option");
            }
            return;
        };

        let spec = &self.command.options[option.0];
        self.unused_aliases.retain(|_, owner| *owner != option);
        self.used.insert(option);
        self.option_tokens.insert(id, option);

        if let Some((previous, missing)) = self.pending.unfilled() {
            self.starved.insert(previous, missing);
        }
        self.pending = PendingOption::Open {
            option,
            token: id,
            remaining: spec.arity(),
        };
        trace!(token = id.0, option = name, arity = spec.arity(), "option");
    }

    fn on_argument(&mut self, id: TokenId, text: &str) {
        if self.pending.has_slot() {
            let option = self.pending.take_slot();
            self.option_arguments.insert(id, option);
            // An option with a slot always declares an argument kind.
            if let Some(kind) = self.command.options[option.0].kind() {
                self.argument_kinds.insert(id, kind);
                if !self.kinds.is_valid(kind, text) {
                    self.bad.insert(id);
                }
            }
            trace!(token = id.0, option = option.0, "option argument");
            return;
        }

        if let PendingOption::Open { option, .. } = self.pending {
            self.excess.insert(id, Excess::Attached { option });
            self.pending = PendingOption::Idle;
            trace!(
                token = id.0,
                option = option.0,
                "value attached to exhausted option"
            );
            return;
        }

        let index = self.position;
        self.position += 1;
        self.positions.insert(id, index);
        match self.command.positional_at(index) {
            None => {
                self.excess.insert(id, Excess::NoPositionalSlot { index });
                trace!(token = id.0, index, "excess positional");
            }
            Some(positional) => {
                self.argument_kinds.insert(id, &positional.kind);
                if !self.kinds.is_valid(&positional.kind, text) {
                    self.bad.insert(id);
                }
                trace!(token = id.0, index, name = %positional.name, "positional");
            }
        }
    }

    fn next_expectation(&self) -> Option<NextExpectation<'c>> {
        if let PendingOption::Open {
            option,
            remaining,
            ..
        } = self.pending
            && remaining > 0
        {
            let spec = &self.command.options[option.0];
            return spec.kind().map(|kind| NextExpectation {
                via_option: true,
                kind,
                label: spec.canonical(),
            });
        }
        self.command
            .positional_at(self.position)
            .map(|p| NextExpectation {
                via_option: false,
                kind: &p.kind,
                label: &p.name,
            })
    }

    pub(super) fn finish(self) -> ValidationResult<'c> {
        let next = self.next_expectation();
        debug!(
            command = %self.command.name,
            bad = self.bad.len(),
            excess = self.excess.len(),
            used = self.used.len(),
            unused = self.command.options.len() - self.used.len(),
            "validation finished"
        );
        ValidationResult {
            command: self.command,
            bad: self.bad,
            repeated: self.repeated,
            excess: self.excess,
            used: self.used,
            option_tokens: self.option_tokens,
            option_arguments: self.option_arguments,
            argument_kinds: self.argument_kinds,
            positions: self.positions,
            starved: self.starved,
            next,
        }
    }
}
