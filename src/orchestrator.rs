//! Session control: start/pause/reset/skip, completion handling, and
//! auto-start chaining.
//!
//! The orchestrator owns the timer state, settings, and stats. It never
//! touches audio, menus, or notifications; collaborators subscribe to
//! [`TimerEvent`]s instead.

use crate::clock::SessionClock;
use crate::mode::ModeController;
use crate::models::{Mode, Settings, Stats, TimerSnapshot};
use crate::persistence::KeyValueStore;
use crate::scheduler::{Job, JobHandle, Scheduler};
use crate::store::{SettingsStore, StatsStore};
use chrono::{DateTime, Local};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Period of the countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);
/// Delay before an interval starts on its own after the previous one completes.
pub const AUTO_START_DELAY: Duration = Duration::from_secs(3);

/// Events published to display, audio, and notification collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    /// Once per second while running.
    Tick { remaining_secs: u32, total_secs: u32 },
    /// A new mode was entered and the clock re-armed.
    ModeChanged { mode: Mode, total_secs: u32 },
    /// An interval finished, naturally or by skipping.
    Completed { was_work: bool, at: DateTime<Local> },
    /// Stats after a work session was recorded.
    StatsUpdated(Stats),
    Started,
    Paused,
    Reset { remaining_secs: u32, total_secs: u32 },
    /// Settings were edited and saved.
    SettingsSaved(Settings),
    /// The next interval will start on its own after `delay_secs`.
    AutoStartScheduled { mode: Mode, delay_secs: u64 },
}

pub struct SessionOrchestrator<S, K> {
    scheduler: S,
    storage: K,
    settings: Settings,
    stats: Stats,
    mode: Mode,
    clock: SessionClock,
    session_count: u32,
    tick_job: Option<JobHandle>,
    auto_start_job: Option<JobHandle>,
    subscribers: Vec<Sender<TimerEvent>>,
}

impl<S: Scheduler, K: KeyValueStore> SessionOrchestrator<S, K> {
    /// Loads settings and stats from storage and arms a work interval.
    pub fn new(scheduler: S, storage: K) -> Self {
        let settings = SettingsStore::load(&storage);
        let stats = StatsStore::load(&storage);
        let clock = SessionClock::new(ModeController::duration_for(Mode::Work, &settings));

        info!(
            completed_sessions = stats.completed_sessions,
            total_focus_time = stats.total_focus_time,
            "session orchestrator ready"
        );

        Self {
            scheduler,
            storage,
            settings,
            stats,
            mode: Mode::Work,
            clock,
            session_count: 1,
            tick_job: None,
            auto_start_job: None,
            subscribers: Vec::new(),
        }
    }

    /// Registers a new event subscriber.
    pub fn subscribe(&mut self) -> Receiver<TimerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    #[cfg(test)]
    pub fn is_auto_start_pending(&self) -> bool {
        self.auto_start_job.is_some()
    }

    /// True when no tick or auto-start is waiting on the scheduler.
    pub fn is_idle(&self) -> bool {
        self.tick_job.is_none() && self.auto_start_job.is_none()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            running: self.clock.is_running(),
            remaining_secs: self.clock.remaining_secs(),
            total_secs: self.clock.total_secs(),
            session_count: self.session_count,
            stats: self.stats,
        }
    }

    /// Starts the clock. Does nothing if it is already running.
    pub fn start(&mut self) {
        self.cancel_auto_start();
        if !self.clock.start() {
            return;
        }

        self.tick_job = Some(self.scheduler.schedule_every(TICK_PERIOD, Job::Tick));
        debug!(mode = self.mode.key(), remaining = self.clock.remaining_secs(), "started");
        self.emit(TimerEvent::Started);
    }

    /// Stops the clock, keeping the remaining time. Also cancels a pending
    /// auto-start, even when the clock is idle.
    pub fn pause(&mut self) {
        self.cancel_auto_start();
        if !self.clock.is_running() {
            return;
        }

        self.stop_ticking();
        debug!(remaining = self.clock.remaining_secs(), "paused");
        self.emit(TimerEvent::Paused);
    }

    /// Start when idle, pause when running.
    pub fn toggle(&mut self) {
        if self.clock.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Re-arms the current mode's full duration without touching mode or counters.
    pub fn reset(&mut self) {
        self.pause();
        self.clock
            .reset(ModeController::duration_for(self.mode, &self.settings));
        self.emit(TimerEvent::Reset {
            remaining_secs: self.clock.remaining_secs(),
            total_secs: self.clock.total_secs(),
        });
    }

    /// Ends the current interval immediately, running the full completion path.
    pub fn skip(&mut self) {
        self.pause();
        info!(mode = self.mode.key(), "interval skipped");
        self.complete();
    }

    /// Switches to `mode` and arms its duration. Does not start the clock.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.cancel_auto_start();
        if self.clock.is_running() {
            self.reset();
        }

        self.mode = mode;
        let total_secs = ModeController::duration_for(mode, &self.settings);
        self.clock.reset(total_secs);
        debug!(mode = mode.key(), total_secs, "mode changed");
        self.emit(TimerEvent::ModeChanged { mode, total_secs });
    }

    /// Applies a settings edit and persists it.
    ///
    /// A work interval that is not running picks up a changed work duration
    /// right away; every other change applies on the next mode entry.
    pub fn update_settings<F>(&mut self, updater: F)
    where
        F: FnOnce(&mut Settings),
    {
        let previous_work = self.settings.work_duration;
        updater(&mut self.settings);
        if let Err(e) = SettingsStore::save(&self.storage, &self.settings) {
            warn!(error = %e, "failed to save settings");
        }
        self.emit(TimerEvent::SettingsSaved(self.settings.clone()));

        let work_changed = self.settings.work_duration != previous_work;
        if work_changed && self.mode == Mode::Work && !self.clock.is_running() {
            let work_secs = ModeController::duration_for(Mode::Work, &self.settings);
            self.clock.arm(work_secs);
            self.emit(TimerEvent::Reset {
                remaining_secs: work_secs,
                total_secs: work_secs,
            });
        }
    }

    /// Moves time forward, running every job that came due in order.
    pub fn advance(&mut self, elapsed: Duration) {
        let horizon = self.scheduler.now() + elapsed;
        while let Some(job) = self.scheduler.pop_due(horizon) {
            match job {
                Job::Tick => self.on_tick(),
                Job::AutoStart => {
                    self.auto_start_job = None;
                    info!(mode = self.mode.key(), "auto-starting");
                    self.start();
                }
            }
        }
    }

    fn on_tick(&mut self) {
        let tick = self.clock.tick();
        self.emit(TimerEvent::Tick {
            remaining_secs: tick.remaining_secs,
            total_secs: self.clock.total_secs(),
        });

        if tick.reached_zero {
            self.complete();
        }
    }

    /// Shared by natural expiry and [`Self::skip`].
    fn complete(&mut self) {
        self.stop_ticking();

        let was_work = self.mode == Mode::Work;
        self.emit(TimerEvent::Completed {
            was_work,
            at: Local::now(),
        });

        let next = if was_work {
            self.stats.record_work_session(self.settings.work_duration);
            if let Err(e) = StatsStore::save(&self.storage, &self.stats) {
                warn!(error = %e, "failed to save stats");
            }
            self.emit(TimerEvent::StatsUpdated(self.stats));
            info!(
                completed_sessions = self.stats.completed_sessions,
                total_focus_time = self.stats.total_focus_time,
                "work session complete"
            );

            ModeController::next_mode_after_completion(
                self.mode,
                self.stats.completed_sessions,
                self.settings.sessions_before_long_break,
            )
        } else {
            self.session_count = self.session_count.saturating_add(1);
            info!(session = self.session_count, "break complete");
            Mode::Work
        };

        self.switch_mode(next);

        let auto_start = if was_work {
            self.settings.auto_start_breaks
        } else {
            self.settings.auto_start_work
        };
        if auto_start {
            self.auto_start_job = Some(
                self.scheduler
                    .schedule_once(AUTO_START_DELAY, Job::AutoStart),
            );
            self.emit(TimerEvent::AutoStartScheduled {
                mode: next,
                delay_secs: AUTO_START_DELAY.as_secs(),
            });
        }
    }

    fn stop_ticking(&mut self) {
        self.clock.pause();
        if let Some(handle) = self.tick_job.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn cancel_auto_start(&mut self) {
        if let Some(handle) = self.auto_start_job.take() {
            self.scheduler.cancel(handle);
            debug!("pending auto-start cancelled");
        }
    }

    fn emit(&mut self, event: TimerEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}
