//! Menu event handling.

use crate::menu::{
    MenuItems, ID_AUTO_BREAKS_TOGGLE, ID_AUTO_WORK_TOGGLE, ID_MUSIC_TOGGLE, ID_QUIT, ID_RESET,
    ID_SKIP, ID_SOUND_TOGGLE, ID_THEME_TOGGLE, ID_TOGGLE, PREFIX_BREAK, PREFIX_LONG, PREFIX_MODE,
    PREFIX_THRESH, PREFIX_TRACK, PREFIX_VOLUME, PREFIX_WORK,
};
use crate::models::Mode;
use crate::orchestrator::SessionOrchestrator;
use crate::persistence::KeyValueStore;
use crate::scheduler::Scheduler;
use crate::tracks;
use muda::MenuEvent;

/// Result of handling a menu event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResult {
    /// Event handled, continue running.
    Continue,
    /// User requested quit.
    Quit,
    /// User flipped the tray theme.
    ThemeToggled,
}

/// A menu click translated into an action on the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Toggle,
    Reset,
    Skip,
    SwitchMode(Mode),
    WorkDuration(u32),
    BreakDuration(u32),
    LongBreakDuration(u32),
    SessionsBeforeLongBreak(u32),
    Volume(u8),
    Track(String),
    ToggleSound,
    ToggleMusic,
    ToggleAutoStartBreaks,
    ToggleAutoStartWork,
    ToggleTheme,
    Quit,
}

impl Command {
    /// Parses a menu item ID. Unknown IDs (e.g. the info rows) yield `None`.
    pub fn parse(id: &str) -> Option<Self> {
        let command = match id {
            ID_TOGGLE => Self::Toggle,
            ID_RESET => Self::Reset,
            ID_SKIP => Self::Skip,
            ID_SOUND_TOGGLE => Self::ToggleSound,
            ID_MUSIC_TOGGLE => Self::ToggleMusic,
            ID_AUTO_BREAKS_TOGGLE => Self::ToggleAutoStartBreaks,
            ID_AUTO_WORK_TOGGLE => Self::ToggleAutoStartWork,
            ID_THEME_TOGGLE => Self::ToggleTheme,
            ID_QUIT => Self::Quit,
            _ => return Self::parse_choice(id),
        };
        Some(command)
    }

    fn parse_choice(id: &str) -> Option<Self> {
        if let Some(key) = id.strip_prefix(PREFIX_MODE) {
            return Mode::from_key(key).map(Self::SwitchMode);
        }
        if let Some(key) = id.strip_prefix(PREFIX_TRACK) {
            return tracks::lookup(key).map(|track| Self::Track(track.key.to_string()));
        }
        if let Some(mins) = parse_suffix(id, PREFIX_WORK) {
            return Some(Self::WorkDuration(mins));
        }
        if let Some(mins) = parse_suffix(id, PREFIX_BREAK) {
            return Some(Self::BreakDuration(mins));
        }
        if let Some(mins) = parse_suffix(id, PREFIX_LONG) {
            return Some(Self::LongBreakDuration(mins));
        }
        if let Some(count) = parse_suffix(id, PREFIX_THRESH) {
            return Some(Self::SessionsBeforeLongBreak(count));
        }
        if let Some(percent) = parse_suffix(id, PREFIX_VOLUME) {
            return u8::try_from(percent.min(100)).ok().map(Self::Volume);
        }
        None
    }
}

fn parse_suffix(id: &str, prefix: &str) -> Option<u32> {
    id.strip_prefix(prefix)?.parse().ok()
}

/// Applies a command to the orchestrator.
pub fn apply_command<S: Scheduler, K: KeyValueStore>(
    orchestrator: &mut SessionOrchestrator<S, K>,
    command: &Command,
) -> EventResult {
    match command {
        Command::Toggle => orchestrator.toggle(),
        Command::Reset => orchestrator.reset(),
        Command::Skip => orchestrator.skip(),
        Command::SwitchMode(mode) => orchestrator.switch_mode(*mode),
        Command::WorkDuration(mins) => orchestrator.update_settings(|s| s.work_duration = *mins),
        Command::BreakDuration(mins) => orchestrator.update_settings(|s| s.break_duration = *mins),
        Command::LongBreakDuration(mins) => {
            orchestrator.update_settings(|s| s.long_break_duration = *mins)
        }
        Command::SessionsBeforeLongBreak(count) => {
            orchestrator.update_settings(|s| s.sessions_before_long_break = *count)
        }
        Command::Volume(percent) => orchestrator.update_settings(|s| s.volume = *percent),
        Command::Track(key) => orchestrator.update_settings(|s| s.music_track = key.clone()),
        Command::ToggleSound => orchestrator.update_settings(|s| s.sound_enabled = !s.sound_enabled),
        Command::ToggleMusic => orchestrator.update_settings(|s| s.music_enabled = !s.music_enabled),
        Command::ToggleAutoStartBreaks => {
            orchestrator.update_settings(|s| s.auto_start_breaks = !s.auto_start_breaks)
        }
        Command::ToggleAutoStartWork => {
            orchestrator.update_settings(|s| s.auto_start_work = !s.auto_start_work)
        }
        Command::ToggleTheme => return EventResult::ThemeToggled,
        Command::Quit => return EventResult::Quit,
    }
    EventResult::Continue
}

/// Handles a menu event and updates the orchestrator accordingly.
pub fn handle_menu_event<S: Scheduler, K: KeyValueStore>(
    orchestrator: &mut SessionOrchestrator<S, K>,
    items: &MenuItems,
    event: MenuEvent,
) -> EventResult {
    let id = event.id().as_ref();
    let Some(command) = Command::parse(id) else {
        return EventResult::Continue;
    };

    let result = apply_command(orchestrator, &command);

    // muda flips check items on click; put mode checks back in line with the
    // orchestrator in case the click was on the already-active mode.
    if let Command::SwitchMode(_) = command {
        let current = orchestrator.snapshot().mode;
        for (&mode, check) in &items.mode_checks {
            check.set_checked(mode == current);
        }
    }

    result
}
