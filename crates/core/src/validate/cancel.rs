use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation, polled once per token.
pub trait Cancel {
    /// Whether the walk should stop.
    fn is_cancelled(&self) -> bool;
}

impl Cancel for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<F> Cancel for F
where
    F: Fn() -> bool,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct Never;

impl Cancel for Never {
    fn is_cancelled(&self) -> bool {
        false
    }
}
