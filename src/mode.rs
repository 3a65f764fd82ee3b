//! Interval durations and the work/break sequence.

use crate::models::{Mode, Settings};

pub struct ModeController;

impl ModeController {
    /// Length of an interval of the given mode, in seconds.
    pub fn duration_for(mode: Mode, settings: &Settings) -> u32 {
        let minutes = match mode {
            Mode::Work => settings.work_duration,
            Mode::Break => settings.break_duration,
            Mode::LongBreak => settings.long_break_duration,
        };
        minutes.saturating_mul(60)
    }

    /// The mode that follows a completed interval.
    ///
    /// `completed_work_sessions` already includes the session that just
    /// finished. A threshold of zero never yields a long break.
    pub fn next_mode_after_completion(
        current: Mode,
        completed_work_sessions: u32,
        sessions_before_long_break: u32,
    ) -> Mode {
        match current {
            Mode::Work => {
                if sessions_before_long_break > 0
                    && completed_work_sessions % sessions_before_long_break == 0
                {
                    Mode::LongBreak
                } else {
                    Mode::Break
                }
            }
            Mode::Break | Mode::LongBreak => Mode::Work,
        }
    }
}
