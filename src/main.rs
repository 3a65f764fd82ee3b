//! Pomoclock - a menubar Pomodoro timer.
//!
//! The timer core (clock, mode sequence, orchestrator) knows nothing about
//! the tray. This file wires it to the menubar, the chime, ambient music,
//! and desktop notifications by listening to the orchestrator's events.

use std::sync::mpsc::Receiver;

use chrono::{DateTime, Local};
use muda::MenuEvent;
use thiserror::Error;
use tracing::{debug, info, warn};
use tray_icon::{TrayIcon, TrayIconBuilder};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

mod audio;
mod clock;
mod event;
mod menu;
mod mode;
mod models;
mod notifications;
mod orchestrator;
mod persistence;
mod scheduler;
mod store;
mod timer;
mod tracks;
mod tray;

use audio::{AmbientMusic, AudioPlayer};
use event::EventResult;
use menu::{MenuError, MenuItems};
use models::{Settings, Theme};
use orchestrator::{SessionOrchestrator, TimerEvent};
use persistence::{Database, StorageError};
use scheduler::TimerQueue;
use store::ThemeStore;
use timer::Pump;
use tray::TrayError;

const LOG_ENV: &str = "POMOCLOCK_LOG";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Menu(#[from] MenuError),
    #[error("{0}")]
    Tray(#[from] TrayError),
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

type Orchestrator = SessionOrchestrator<TimerQueue, Database>;

/// Events forwarded into the winit loop so an idle loop wakes on menu clicks.
#[derive(Debug)]
enum UserEvent {
    Menu(MenuEvent),
}

/// Application handler for the winit event loop.
struct Pomoclock {
    orchestrator: Orchestrator,
    timer_rx: Receiver<TimerEvent>,
    pump: Pump,
    tray: Option<TrayIcon>,
    menu_items: MenuItems,
    audio: Option<AudioPlayer>,
    music: AmbientMusic,
    theme: Theme,
    /// Set by `Completed`, consumed by the `ModeChanged` that follows it.
    pending_completion: Option<bool>,
    last_completed: Option<DateTime<Local>>,
}

impl Pomoclock {
    fn new(
        orchestrator: Orchestrator,
        timer_rx: Receiver<TimerEvent>,
        tray: TrayIcon,
        menu_items: MenuItems,
        theme: Theme,
    ) -> Self {
        // Audio is created on the main thread to avoid Send issues
        let audio = match AudioPlayer::new() {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!(error = %e, "audio output unavailable; chime disabled");
                None
            }
        };

        Self {
            orchestrator,
            timer_rx,
            pump: Pump::new(),
            tray: Some(tray),
            menu_items,
            audio,
            music: AmbientMusic::new(),
            theme,
            pending_completion: None,
            last_completed: None,
        }
    }

    fn refresh_display(&self) {
        let state = self.orchestrator.snapshot();
        menu::update_timer_items(&self.menu_items, &state);
        if let Some(ref tray) = self.tray {
            tray.set_title(Some(timer::format_tray_title(&state)));
        }
    }

    fn refresh_icon(&self) {
        let Some(ref tray) = self.tray else {
            return;
        };
        let mode = self.orchestrator.snapshot().mode;
        let result = tray::load_icon(mode, self.theme)
            .and_then(|icon| tray.set_icon(Some(icon)).map_err(TrayError::from));
        if let Err(e) = result {
            warn!(error = %e, "failed to update tray icon");
        }
    }

    fn start_music(&mut self) {
        let settings = self.orchestrator.settings();
        if !settings.music_enabled {
            return;
        }
        let track = self.music.play(&settings.music_track, settings.volume);
        self.menu_items
            .music_status
            .set_text(menu::format_music_status(track));
    }

    fn stop_music(&mut self) {
        self.music.stop();
        self.menu_items
            .music_status
            .set_text(menu::format_music_status(None));
    }

    fn handle_completion(&self, was_work: bool, next: models::Mode) {
        let settings = self.orchestrator.settings();

        if settings.sound_enabled {
            if let Some(ref audio) = self.audio {
                audio.play_chime(settings.volume);
            }
        }

        notifications::notify_completion(was_work, next);
    }

    /// Keeps ambient music in line with edited settings while the clock runs.
    fn apply_music_settings(&mut self, settings: &Settings) {
        if !settings.music_enabled {
            self.stop_music();
            return;
        }
        let playing = self.music.now_playing().map(|track| track.key);
        if self.orchestrator.is_running() && playing != Some(settings.music_track.as_str()) {
            self.start_music();
        }
    }

    fn process_timer_events(&mut self) {
        let mut display_dirty = false;

        while let Ok(event) = self.timer_rx.try_recv() {
            match event {
                TimerEvent::Tick { .. } | TimerEvent::StatsUpdated(_) => {}
                TimerEvent::Started => self.start_music(),
                TimerEvent::Paused | TimerEvent::Reset { .. } => self.stop_music(),
                TimerEvent::Completed { was_work, at } => {
                    self.stop_music();
                    self.pending_completion = Some(was_work);
                    self.last_completed = Some(at);
                    self.menu_items
                        .last_completed
                        .set_text(menu::format_last_completed(self.last_completed));
                }
                TimerEvent::ModeChanged { mode, .. } => {
                    if let Some(was_work) = self.pending_completion.take() {
                        self.handle_completion(was_work, mode);
                    }
                    self.refresh_icon();
                }
                TimerEvent::SettingsSaved(settings) => {
                    menu::update_settings_items(&self.menu_items, &settings);
                    self.apply_music_settings(&settings);
                }
                TimerEvent::AutoStartScheduled { mode, delay_secs } => {
                    debug!(mode = mode.key(), delay_secs, "auto-start scheduled");
                }
            }
            display_dirty = true;
        }

        if display_dirty {
            self.refresh_display();
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = ThemeStore::save(self.orchestrator.storage(), self.theme) {
            warn!(error = %e, "failed to save theme");
        }
        self.menu_items
            .theme_toggle
            .set_checked(self.theme == Theme::Light);
        self.refresh_icon();
    }

    /// Feeds real elapsed time to the orchestrator. Time spent idle is
    /// dropped so a fresh start does not replay it.
    fn pump_clock(&mut self) {
        let elapsed = self.pump.elapsed();
        if !self.orchestrator.is_idle() {
            self.orchestrator.advance(elapsed);
        }
    }

    fn handle_menu_event(&mut self, event_loop: &ActiveEventLoop, event: MenuEvent) {
        let result = event::handle_menu_event(&mut self.orchestrator, &self.menu_items, event);

        match result {
            EventResult::Quit => {
                info!("quitting");
                event_loop.exit();
            }
            EventResult::ThemeToggled => self.toggle_theme(),
            EventResult::Continue => {}
        }
    }
}

impl ApplicationHandler<UserEvent> for Pomoclock {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        // Nothing to do on resume for a tray-only app
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        _event: WindowEvent,
    ) {
        // No window events for a tray-only app
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Menu(event) => {
                // Catch up on due ticks so the click lands after them
                self.pump_clock();
                self.handle_menu_event(event_loop, event);
                self.process_timer_events();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.pump_clock();
        self.process_timer_events();

        if self.orchestrator.is_idle() {
            event_loop.set_control_flow(ControlFlow::Wait);
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.pump.next_wakeup()));
        }
    }
}

fn init_tracing() -> Result<(), AppError> {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

fn run() -> Result<(), AppError> {
    init_tracing()?;

    let db = Database::new()?;
    info!(path = %Database::db_path().display(), "opened storage");
    let theme = ThemeStore::load(&db);

    let mut orchestrator = SessionOrchestrator::new(TimerQueue::new(), db);
    let timer_rx = orchestrator.subscribe();

    // Create event loop (required for tray on macOS)
    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    let proxy = event_loop.create_proxy();
    MenuEvent::set_event_handler(Some(move |event| {
        if proxy.send_event(UserEvent::Menu(event)).is_err() {
            debug!("event loop closed; dropping menu event");
        }
    }));

    let state = orchestrator.snapshot();
    let (built_menu, menu_items) = menu::build_menu(&state, orchestrator.settings(), theme)?;

    let tray = TrayIconBuilder::new()
        .with_menu(Box::new(built_menu))
        .with_icon(tray::load_icon(state.mode, theme)?)
        .with_title(timer::format_tray_title(&state))
        .with_tooltip("Pomoclock - Pomodoro Timer")
        .build()
        .map_err(TrayError::from)?;

    let mut app = Pomoclock::new(orchestrator, timer_rx, tray, menu_items, theme);
    event_loop.run_app(&mut app)?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run()?;
    Ok(())
}
