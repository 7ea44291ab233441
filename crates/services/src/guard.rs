use std::sync::atomic::{AtomicU64, Ordering};

/// Tag handed out when a load starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Tracks which load is current so late responses from superseded loads can
/// be dropped.
///
/// Each quiz host owns one guard. Starting a load bumps the generation; a
/// response is applied only if its generation is still the latest.
#[derive(Debug, Default)]
pub struct LoadGuard {
    current: AtomicU64,
}

impl LoadGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, superseding every earlier one.
    pub fn begin(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current.load(Ordering::SeqCst) == generation.0
    }

    /// Supersede any in-flight load without starting a new one (exit, unmount).
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}
