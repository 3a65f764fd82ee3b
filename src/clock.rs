//! Countdown for the active interval.
//!
//! The clock only counts; it has no notion of wall time. Whoever owns it
//! calls [`SessionClock::tick`] once per elapsed second while it runs.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    remaining_secs: u32,
    total_secs: u32,
    running: bool,
    /// Latched once the countdown reaches zero, cleared on re-arm.
    expired: bool,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub remaining_secs: u32,
    /// True only on the tick that brought the countdown to zero.
    pub reached_zero: bool,
}

impl SessionClock {
    /// Creates an idle clock armed to the given duration.
    pub fn new(total_secs: u32) -> Self {
        Self {
            remaining_secs: total_secs,
            total_secs,
            running: false,
            expired: false,
        }
    }

    /// Sets remaining = total = `total_secs`. Does not change the running flag.
    pub fn arm(&mut self, total_secs: u32) {
        self.remaining_secs = total_secs;
        self.total_secs = total_secs;
        self.expired = false;
    }

    /// Marks the clock as running. Returns false if it already was.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Stops the clock, keeping the remaining time exactly.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stops the clock and re-arms it.
    pub fn reset(&mut self, total_secs: u32) {
        self.pause();
        self.arm(total_secs);
    }

    /// Counts down one second, never below zero.
    pub fn tick(&mut self) -> Tick {
        if self.expired {
            return Tick {
                remaining_secs: 0,
                reached_zero: false,
            };
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.expired = self.remaining_secs == 0;
        Tick {
            remaining_secs: self.remaining_secs,
            reached_zero: self.expired,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }
}
