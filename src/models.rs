//! Data models for the Pomoclock application.

use serde::{Deserialize, Serialize};

/// The kind of interval currently on the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Focused work interval.
    #[default]
    Work,
    /// Short break between work intervals.
    Break,
    /// Long break after a full cycle of work intervals.
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Work, Mode::Break, Mode::LongBreak];

    /// Human-readable label for menus and notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    /// Stable identifier, matching the persisted/serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Break => "break",
            Self::LongBreak => "long-break",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.key() == key)
    }
}

/// User-configurable settings, persisted under `pomodoroSettings`.
///
/// Values are not validated here. Zero durations are accepted and produce
/// intervals that complete on their first tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Duration of a work session in minutes.
    pub work_duration: u32,
    /// Duration of a short break in minutes.
    pub break_duration: u32,
    /// Duration of a long break in minutes.
    pub long_break_duration: u32,
    /// Number of completed work sessions between long breaks.
    pub sessions_before_long_break: u32,
    /// Whether to play the chime on completion.
    pub sound_enabled: bool,
    /// Whether ambient music plays while the clock runs.
    pub music_enabled: bool,
    /// Key into the track catalog. Stored opaquely.
    pub music_track: String,
    /// Output volume, 0-100.
    pub volume: u8,
    /// Start the break automatically after a work session completes.
    pub auto_start_breaks: bool,
    /// Start work automatically after a break completes.
    pub auto_start_work: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            break_duration: 5,
            long_break_duration: 15,
            sessions_before_long_break: 4,
            sound_enabled: true,
            music_enabled: false,
            music_track: crate::tracks::DEFAULT_TRACK.to_string(),
            volume: 50,
            auto_start_breaks: false,
            auto_start_work: false,
        }
    }
}

/// Cumulative counters, persisted under `pomodoroStats`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    /// Number of completed work sessions.
    pub completed_sessions: u32,
    /// Total minutes of focus time.
    pub total_focus_time: u32,
}

impl Stats {
    /// Records a completed work session of the given length.
    pub fn record_work_session(&mut self, duration_mins: u32) {
        self.completed_sessions = self.completed_sessions.saturating_add(1);
        self.total_focus_time = self.total_focus_time.saturating_add(duration_mins);
    }
}

/// Colour scheme of the tray icon, persisted under `pomodoroTheme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Immutable view of the timer handed to display collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub running: bool,
    pub remaining_secs: u32,
    pub total_secs: u32,
    /// User-facing "current session number", starting at 1.
    pub session_count: u32,
    pub stats: Stats,
}

impl TimerSnapshot {
    /// True when the clock is stopped part-way through an interval.
    pub fn is_paused(&self) -> bool {
        !self.running && self.remaining_secs > 0 && self.remaining_secs < self.total_secs
    }

    /// Returns the progress fraction (0.0 to 1.0) of the current interval.
    pub fn progress_percent(&self) -> f32 {
        if self.total_secs == 0 {
            return 1.0;
        }
        1.0 - (self.remaining_secs as f32 / self.total_secs as f32)
    }
}
