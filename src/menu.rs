//! Menu building and updating for the tray dropdown.

use crate::models::{Mode, Settings, Theme, TimerSnapshot};
use crate::timer::{format_focus_time, format_time};
use crate::tracks::{self, Track};
use chrono::{DateTime, Local};
use muda::accelerator::Accelerator;
use muda::{CheckMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use std::collections::HashMap;
use thiserror::Error;

// Menu item IDs as constants
pub const ID_STATUS: &str = "status";
pub const ID_PROGRESS: &str = "progress";
pub const ID_STATS: &str = "stats";
pub const ID_LAST_COMPLETED: &str = "last_completed";
pub const ID_MUSIC_STATUS: &str = "music_status";
pub const ID_TOGGLE: &str = "toggle";
pub const ID_RESET: &str = "reset";
pub const ID_SKIP: &str = "skip";
pub const ID_SOUND_TOGGLE: &str = "sound_toggle";
pub const ID_MUSIC_TOGGLE: &str = "music_toggle";
pub const ID_AUTO_BREAKS_TOGGLE: &str = "auto_breaks_toggle";
pub const ID_AUTO_WORK_TOGGLE: &str = "auto_work_toggle";
pub const ID_THEME_TOGGLE: &str = "theme_toggle";
pub const ID_QUIT: &str = "quit";

// Prefixes for generated choice items, e.g. "work_25" or "track_lofi"
pub const PREFIX_MODE: &str = "mode_";
pub const PREFIX_WORK: &str = "work_";
pub const PREFIX_BREAK: &str = "break_";
pub const PREFIX_LONG: &str = "long_";
pub const PREFIX_THRESH: &str = "thresh_";
pub const PREFIX_VOLUME: &str = "volume_";
pub const PREFIX_TRACK: &str = "track_";

const WORK_CHOICES: [u32; 6] = [15, 20, 25, 30, 45, 60];
const BREAK_CHOICES: [u32; 4] = [3, 5, 10, 15];
const LONG_CHOICES: [u32; 4] = [10, 15, 20, 30];
const THRESH_CHOICES: [u32; 5] = [2, 3, 4, 5, 6];
const VOLUME_CHOICES: [u32; 5] = [0, 25, 50, 75, 100];

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Menu error: {0}")]
    Muda(#[from] muda::Error),
}

/// A submenu of mutually exclusive numeric choices.
pub struct ChoiceMenu {
    pub submenu: Submenu,
    pub checks: HashMap<u32, CheckMenuItem>,
}

impl ChoiceMenu {
    fn build(
        title: String,
        prefix: &str,
        choices: &[u32],
        current: u32,
        label: impl Fn(u32) -> String,
    ) -> Result<Self, MenuError> {
        let submenu = Submenu::new(title, true);
        let mut checks = HashMap::new();
        for &value in choices {
            let item = CheckMenuItem::with_id(
                MenuId::new(format!("{}{}", prefix, value)),
                label(value),
                true,
                value == current,
                None::<Accelerator>,
            );
            submenu.append(&item)?;
            checks.insert(value, item);
        }
        Ok(Self { submenu, checks })
    }

    /// Moves the checkmark to `current` and retitles the submenu.
    pub fn select(&self, title: String, current: u32) {
        self.submenu.set_text(title);
        for (&value, check) in &self.checks {
            check.set_checked(value == current);
        }
    }
}

/// Holds references to menu items that need dynamic updates.
pub struct MenuItems {
    pub status: MenuItem,
    pub progress: MenuItem,
    pub stats: MenuItem,
    pub last_completed: MenuItem,
    pub music_status: MenuItem,
    pub toggle: MenuItem,
    pub reset: MenuItem,
    pub skip: MenuItem,
    pub mode_checks: HashMap<Mode, CheckMenuItem>,
    pub work: ChoiceMenu,
    pub short_break: ChoiceMenu,
    pub long_break: ChoiceMenu,
    pub threshold: ChoiceMenu,
    pub volume: ChoiceMenu,
    pub track_checks: HashMap<&'static str, CheckMenuItem>,
    pub sound_toggle: CheckMenuItem,
    pub music_toggle: CheckMenuItem,
    pub auto_breaks_toggle: CheckMenuItem,
    pub auto_work_toggle: CheckMenuItem,
    pub theme_toggle: CheckMenuItem,
}

/// Builds the complete menu structure.
pub fn build_menu(
    state: &TimerSnapshot,
    settings: &Settings,
    theme: Theme,
) -> Result<(Menu, MenuItems), MenuError> {
    let menu = Menu::new();

    // Status display (disabled, info only)
    let status = MenuItem::with_id(
        MenuId::new(ID_STATUS),
        format_status(state),
        false, // disabled
        None::<Accelerator>,
    );
    menu.append(&status)?;

    // Progress bar (ASCII)
    let progress = MenuItem::with_id(
        MenuId::new(ID_PROGRESS),
        format_progress(state),
        false,
        None::<Accelerator>,
    );
    menu.append(&progress)?;

    menu.append(&PredefinedMenuItem::separator())?;

    let stats = MenuItem::with_id(
        MenuId::new(ID_STATS),
        format_stats(state),
        false,
        None::<Accelerator>,
    );
    menu.append(&stats)?;

    let last_completed = MenuItem::with_id(
        MenuId::new(ID_LAST_COMPLETED),
        format_last_completed(None),
        false,
        None::<Accelerator>,
    );
    menu.append(&last_completed)?;

    let music_status = MenuItem::with_id(
        MenuId::new(ID_MUSIC_STATUS),
        format_music_status(None),
        false,
        None::<Accelerator>,
    );
    menu.append(&music_status)?;

    menu.append(&PredefinedMenuItem::separator())?;

    // Control buttons
    let toggle = MenuItem::with_id(
        MenuId::new(ID_TOGGLE),
        toggle_label(state),
        true,
        None::<Accelerator>,
    );
    let reset = MenuItem::with_id(MenuId::new(ID_RESET), "↺  Reset", true, None::<Accelerator>);
    let skip = MenuItem::with_id(MenuId::new(ID_SKIP), "⏭  Skip", true, None::<Accelerator>);

    menu.append(&toggle)?;
    menu.append(&reset)?;
    menu.append(&skip)?;

    // Mode switcher
    let mode_sub = Submenu::new("Mode", true);
    let mut mode_checks = HashMap::new();
    for mode in Mode::ALL {
        let item = CheckMenuItem::with_id(
            MenuId::new(format!("{}{}", PREFIX_MODE, mode.key())),
            mode.label(),
            true,
            mode == state.mode,
            None::<Accelerator>,
        );
        mode_sub.append(&item)?;
        mode_checks.insert(mode, item);
    }
    menu.append(&mode_sub)?;

    menu.append(&PredefinedMenuItem::separator())?;

    // Settings submenu
    let settings_menu = Submenu::new("⚙  Settings", true);

    let work = ChoiceMenu::build(
        work_title(settings),
        PREFIX_WORK,
        &WORK_CHOICES,
        settings.work_duration,
        minutes_label,
    )?;
    let short_break = ChoiceMenu::build(
        break_title(settings),
        PREFIX_BREAK,
        &BREAK_CHOICES,
        settings.break_duration,
        minutes_label,
    )?;
    let long_break = ChoiceMenu::build(
        long_break_title(settings),
        PREFIX_LONG,
        &LONG_CHOICES,
        settings.long_break_duration,
        minutes_label,
    )?;
    let threshold = ChoiceMenu::build(
        threshold_title(settings),
        PREFIX_THRESH,
        &THRESH_CHOICES,
        settings.sessions_before_long_break,
        |count| format!("{} sessions", count),
    )?;
    settings_menu.append(&work.submenu)?;
    settings_menu.append(&short_break.submenu)?;
    settings_menu.append(&long_break.submenu)?;
    settings_menu.append(&threshold.submenu)?;

    settings_menu.append(&PredefinedMenuItem::separator())?;

    let auto_breaks_toggle = CheckMenuItem::with_id(
        MenuId::new(ID_AUTO_BREAKS_TOGGLE),
        "Auto-start Breaks",
        true,
        settings.auto_start_breaks,
        None::<Accelerator>,
    );
    settings_menu.append(&auto_breaks_toggle)?;

    let auto_work_toggle = CheckMenuItem::with_id(
        MenuId::new(ID_AUTO_WORK_TOGGLE),
        "Auto-start Work",
        true,
        settings.auto_start_work,
        None::<Accelerator>,
    );
    settings_menu.append(&auto_work_toggle)?;

    settings_menu.append(&PredefinedMenuItem::separator())?;

    let sound_toggle = CheckMenuItem::with_id(
        MenuId::new(ID_SOUND_TOGGLE),
        "Sound Enabled",
        true,
        settings.sound_enabled,
        None::<Accelerator>,
    );
    settings_menu.append(&sound_toggle)?;

    let music_toggle = CheckMenuItem::with_id(
        MenuId::new(ID_MUSIC_TOGGLE),
        "Music Enabled",
        true,
        settings.music_enabled,
        None::<Accelerator>,
    );
    settings_menu.append(&music_toggle)?;

    let track_sub = Submenu::new("Music Track", true);
    let mut track_checks = HashMap::new();
    for track in tracks::CATALOG {
        let item = CheckMenuItem::with_id(
            MenuId::new(format!("{}{}", PREFIX_TRACK, track.key)),
            track.label,
            true,
            track.key == settings.music_track,
            None::<Accelerator>,
        );
        track_sub.append(&item)?;
        track_checks.insert(track.key, item);
    }
    settings_menu.append(&track_sub)?;

    let volume = ChoiceMenu::build(
        volume_title(settings),
        PREFIX_VOLUME,
        &VOLUME_CHOICES,
        u32::from(settings.volume),
        |percent| format!("{}%", percent),
    )?;
    settings_menu.append(&volume.submenu)?;

    menu.append(&settings_menu)?;

    let theme_toggle = CheckMenuItem::with_id(
        MenuId::new(ID_THEME_TOGGLE),
        "Light Theme",
        true,
        theme == Theme::Light,
        None::<Accelerator>,
    );
    menu.append(&theme_toggle)?;

    menu.append(&PredefinedMenuItem::separator())?;

    // Quit
    let quit = MenuItem::with_id(MenuId::new(ID_QUIT), "Quit Pomoclock", true, None::<Accelerator>);
    menu.append(&quit)?;

    let items = MenuItems {
        status,
        progress,
        stats,
        last_completed,
        music_status,
        toggle,
        reset,
        skip,
        mode_checks,
        work,
        short_break,
        long_break,
        threshold,
        volume,
        track_checks,
        sound_toggle,
        music_toggle,
        auto_breaks_toggle,
        auto_work_toggle,
        theme_toggle,
    };

    Ok((menu, items))
}

/// Updates the timer-driven items from a fresh snapshot.
pub fn update_timer_items(items: &MenuItems, state: &TimerSnapshot) {
    items.status.set_text(format_status(state));
    items.progress.set_text(format_progress(state));
    items.stats.set_text(format_stats(state));
    items.toggle.set_text(toggle_label(state));

    for (&mode, check) in &items.mode_checks {
        check.set_checked(mode == state.mode);
    }
}

/// Re-syncs every settings control with the saved settings.
pub fn update_settings_items(items: &MenuItems, settings: &Settings) {
    items.work.select(work_title(settings), settings.work_duration);
    items
        .short_break
        .select(break_title(settings), settings.break_duration);
    items
        .long_break
        .select(long_break_title(settings), settings.long_break_duration);
    items.threshold.select(
        threshold_title(settings),
        settings.sessions_before_long_break,
    );
    items
        .volume
        .select(volume_title(settings), u32::from(settings.volume));

    for (&key, check) in &items.track_checks {
        check.set_checked(key == settings.music_track);
    }

    items.sound_toggle.set_checked(settings.sound_enabled);
    items.music_toggle.set_checked(settings.music_enabled);
    items.auto_breaks_toggle.set_checked(settings.auto_start_breaks);
    items.auto_work_toggle.set_checked(settings.auto_start_work);
}

fn minutes_label(mins: u32) -> String {
    format!("{} min", mins)
}

fn work_title(settings: &Settings) -> String {
    format!("Work: {} min", settings.work_duration)
}

fn break_title(settings: &Settings) -> String {
    format!("Short Break: {} min", settings.break_duration)
}

fn long_break_title(settings: &Settings) -> String {
    format!("Long Break: {} min", settings.long_break_duration)
}

fn threshold_title(settings: &Settings) -> String {
    format!(
        "Long Break After: {} sessions",
        settings.sessions_before_long_break
    )
}

fn volume_title(settings: &Settings) -> String {
    format!("Volume: {}%", settings.volume)
}

/// Label of the primary start/pause action.
pub fn toggle_label(state: &TimerSnapshot) -> &'static str {
    if state.running {
        "⏸  Pause"
    } else if state.is_paused() {
        "▶  Resume"
    } else {
        "▶  Start"
    }
}

/// Formats the status line for the menu.
pub fn format_status(state: &TimerSnapshot) -> String {
    let mode = state.mode.label();
    let time = format_time(state.remaining_secs);
    if state.running {
        format!("⏱  {} - {} remaining", mode, time)
    } else if state.is_paused() {
        format!("⏸  {} - {} (paused)", mode, time)
    } else {
        format!("Ready: {} ({})", mode, time)
    }
}

/// Formats the progress bar for the menu.
pub fn format_progress(state: &TimerSnapshot) -> String {
    let pct = state.progress_percent().clamp(0.0, 1.0);
    let filled = (pct * 20.0).round() as usize;
    let empty = 20 - filled;
    format!(
        "{}{}  {}%",
        "█".repeat(filled),
        "░".repeat(empty),
        (pct * 100.0).round() as u32
    )
}

/// Formats the session number and cumulative stats for the menu.
pub fn format_stats(state: &TimerSnapshot) -> String {
    format!(
        "Session #{}  ·  Completed: {}  ·  Focus: {}",
        state.session_count,
        state.stats.completed_sessions,
        format_focus_time(state.stats.total_focus_time)
    )
}

pub fn format_last_completed(at: Option<DateTime<Local>>) -> String {
    match at {
        Some(at) => format!("Last interval finished at {}", at.format("%H:%M")),
        None => "No intervals finished yet".to_string(),
    }
}

pub fn format_music_status(track: Option<&Track>) -> String {
    match track {
        Some(track) => format!("♪  Playing: {}", track.label),
        None => "♪  Music off".to_string(),
    }
}
