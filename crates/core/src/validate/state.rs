use crate::token::TokenId;
use argspec_spec_tables::OptionId;

/// What the walk is doing with respect to options.
///
/// `remaining` only ever decreases while an option stays open. The state
/// returns to `Idle` only through the whitespace and excess-argument
/// transitions, or is replaced when another option is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) enum PendingOption {
    /// No option is collecting values.
    #[default]
    Idle,
    /// `option` (spelled by `token`) was matched and may still take
    /// `remaining` values.
    Open {
        option: OptionId,
        token: TokenId,
        remaining: u32,
    },
}

impl PendingOption {
    /// An open option with at least one value slot left.
    pub(super) fn has_slot(&self) -> bool {
        matches!(self, PendingOption::Open { remaining, .. } if *remaining > 0)
    }

    /// An open option whose value slots are used up.
    pub(super) fn is_exhausted(&self) -> bool {
        matches!(self, PendingOption::Open { remaining: 0, .. })
    }

    /// Fill one value slot of the open option and return the option.
    ///
    /// Panics when there is no slot to fill; callers must check
    /// [`has_slot`](Self::has_slot) first.
    pub(super) fn take_slot(&mut self) -> OptionId {
        match self {
            PendingOption::Open {
                option, remaining, ..
            } if *remaining > 0 => {
                *remaining -= 1;
                *option
            }
            other => panic!("option argument consumed with no open slot: {other:?}"),
        }
    }

    /// The open option's token and unfilled slot count, if any slots remain.
    pub(super) fn unfilled(&self) -> Option<(TokenId, u32)> {
        match *self {
            PendingOption::Open {
                token, remaining, ..
            } if remaining > 0 => Some((token, remaining)),
            _ => None,
        }
    }
}
