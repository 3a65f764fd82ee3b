//! Wall-clock pump for the orchestrator and tray title formatting.

use crate::models::{Mode, TimerSnapshot};
use std::time::{Duration, Instant};

/// How often the event loop wakes up to feed elapsed time to the orchestrator.
pub const PUMP_INTERVAL: Duration = Duration::from_millis(100);

/// Measures real time between event-loop wakeups.
pub struct Pump {
    last: Instant,
}

impl Pump {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Time since the previous call (or since creation).
    pub fn elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed
    }

    /// When the event loop should wake up next.
    pub fn next_wakeup(&self) -> Instant {
        self.last + PUMP_INTERVAL
    }
}

/// Formats the tray title based on current timer state.
pub fn format_tray_title(state: &TimerSnapshot) -> String {
    let time = format_time(state.remaining_secs);
    if !state.running && !state.is_paused() {
        return match state.mode {
            Mode::Work => "🍅".to_string(),
            Mode::Break | Mode::LongBreak => "☕".to_string(),
        };
    }

    if state.is_paused() {
        return format!("⏸ {}", time);
    }

    match state.mode {
        Mode::Work => format!("🍅 {}", time),
        Mode::Break | Mode::LongBreak => format!("☕ {}", time),
    }
}

/// Formats time in MM:SS format.
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Formats a number of minutes as `"{h}h {m}m"`.
pub fn format_focus_time(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stats;

    fn snapshot(mode: Mode, running: bool, remaining_secs: u32, total_secs: u32) -> TimerSnapshot {
        TimerSnapshot {
            mode,
            running,
            remaining_secs,
            total_secs,
            session_count: 1,
            stats: Stats::default(),
        }
    }

    #[test]
    fn test_format_tray_title_idle() {
        let state = snapshot(Mode::Work, false, 1500, 1500);
        assert_eq!(format_tray_title(&state), "🍅");
    }

    #[test]
    fn test_format_tray_title_idle_break() {
        let state = snapshot(Mode::LongBreak, false, 900, 900);
        assert_eq!(format_tray_title(&state), "☕");
    }

    #[test]
    fn test_format_tray_title_work_running() {
        let state = snapshot(Mode::Work, true, 1432, 1500);
        assert_eq!(format_tray_title(&state), "🍅 23:52");
    }

    #[test]
    fn test_format_tray_title_paused() {
        let state = snapshot(Mode::Work, false, 600, 1500);
        assert_eq!(format_tray_title(&state), "⏸ 10:00");
    }

    #[test]
    fn test_format_tray_title_break_running() {
        let state = snapshot(Mode::Break, true, 272, 300);
        assert_eq!(format_tray_title(&state), "☕ 04:32");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(125), "02:05");
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(3599), "59:59");
        assert_eq!(format_time(6000), "100:00");
    }

    #[test]
    fn test_format_focus_time() {
        assert_eq!(format_focus_time(0), "0h 0m");
        assert_eq!(format_focus_time(25), "0h 25m");
        assert_eq!(format_focus_time(60), "1h 0m");
        assert_eq!(format_focus_time(135), "2h 15m");
    }

    #[test]
    fn test_pump_measures_elapsed() {
        let mut pump = Pump::new();
        std::thread::sleep(Duration::from_millis(5));
        assert!(pump.elapsed() >= Duration::from_millis(5));
        assert!(pump.elapsed() < Duration::from_secs(1));

        let before = Instant::now();
        pump.elapsed();
        assert!(pump.next_wakeup() >= before + PUMP_INTERVAL);
    }
}
