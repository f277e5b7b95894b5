use vocab_core::time::format_mm_ss;

/// Below this many seconds the countdown is shown as urgent.
pub const URGENT_THRESHOLD_SECS: u32 = 60;

/// Result of feeding one tick to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown was running, or the session is not in progress.
    Ignored,
    Running { remaining: u32 },
    /// The countdown reached zero on this tick and has stopped.
    Expired,
}

/// A one-second-resolution countdown owned by a single session.
///
/// Once stopped it never resumes; a stopped countdown ignores ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    #[must_use]
    pub fn start(secs: u32) -> Self {
        Self {
            remaining: secs,
            running: secs > 0,
        }
    }

    /// Decrement by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Stop the countdown. Stopping twice is fine.
    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_urgent(&self) -> bool {
        self.remaining < URGENT_THRESHOLD_SECS
    }

    /// Remaining time as `MM:SS`.
    #[must_use]
    pub fn display(&self) -> String {
        format_mm_ss(u64::from(self.remaining))
    }
}
