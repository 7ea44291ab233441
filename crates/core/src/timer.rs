/// A whole-second countdown, ticked from outside.
///
/// The countdown never owns a task; the view that hosts a timed game ticks it
/// once per second and stops ticking when the countdown reports expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    limit: u32,
    remaining: u32,
}

impl Countdown {
    #[must_use]
    pub fn new(limit_secs: u32) -> Self {
        Self {
            limit: limit_secs,
            remaining: limit_secs,
        }
    }

    /// Remove one second. Returns `true` when this tick reached zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.limit - self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    pub fn reset(&mut self) {
        self.remaining = self.limit;
    }

    /// Remaining time as `m:ss`.
    #[must_use]
    pub fn format(&self) -> String {
        format_clock(self.remaining)
    }
}

/// Seconds as `m:ss`.
#[must_use]
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
