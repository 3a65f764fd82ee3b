//! Desktop notifications for interval completions.

use crate::models::Mode;
use notify_rust::Notification;
use std::thread;
use tracing::warn;

const SUMMARY: &str = "Pomodoro Timer";

/// Message shown when an interval completes, given the mode that follows.
pub fn completion_message(was_work: bool, next: Mode) -> String {
    match (was_work, next) {
        (true, Mode::LongBreak) => "Work session complete! Time for a long break.".to_string(),
        (true, _) => "Work session complete! Time for a break.".to_string(),
        (false, _) => "Break over! Ready to focus again?".to_string(),
    }
}

/// Shows a notification for a finished interval.
/// Runs in a background thread to avoid blocking.
pub fn notify_completion(was_work: bool, next: Mode) {
    let body = completion_message(was_work, next);
    thread::spawn(move || {
        if let Err(e) = Notification::new()
            .summary(SUMMARY)
            .body(&body)
            .sound_name("default")
            .show()
        {
            warn!(error = %e, "failed to show notification");
        }
    });
}
