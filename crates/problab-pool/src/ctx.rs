use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Caller-controlled cancellation and deadline for one pool acquisition,
/// the sync-Rust analogue of a Go `context.Context`. A spin blocks only at
/// pool acquisition; `MachinePool::spin` checks this at the top of every
/// polling iteration so a context canceled before the call ever runs never
/// borrows a machine.
#[derive(Clone, Default)]
pub struct SpinCtx {
    deadline: Option<Instant>,
    canceled: Option<Arc<AtomicBool>>,
}

impl SpinCtx {
    /// No deadline, not cancelable.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            canceled: None,
        }
    }

    pub fn with_cancel_flag(flag: Arc<AtomicBool>) -> Self {
        Self {
            deadline: None,
            canceled: Some(flag),
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
