//! Cancellable one-shot and repeating jobs on a virtual clock.
//!
//! Nothing here sleeps or spawns threads. The owner moves time forward and
//! pulls due jobs one at a time with [`Scheduler::pop_due`], which lets a
//! job cancel or schedule others before they would fire.

use std::time::Duration;

/// Work the orchestrator can schedule for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// One-second clock tick.
    Tick,
    /// Deferred start after an interval completes.
    AutoStart,
}

/// Identifies a scheduled job for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobHandle(u64);

pub trait Scheduler {
    /// Runs `job` once, `delay` from now.
    fn schedule_once(&mut self, delay: Duration, job: Job) -> JobHandle;
    /// Runs `job` every `period`, first after one period.
    fn schedule_every(&mut self, period: Duration, job: Job) -> JobHandle;
    /// Cancels a job. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: JobHandle);
    /// Current time on the scheduler's clock.
    fn now(&self) -> Duration;
    /// Pops the earliest job due at or before `horizon`, moving the clock to
    /// its deadline. When nothing is due the clock moves to `horizon`.
    fn pop_due(&mut self, horizon: Duration) -> Option<Job>;
}

#[derive(Debug, Clone)]
struct Entry {
    handle: JobHandle,
    due: Duration,
    period: Option<Duration>,
    job: Job,
}

/// In-process [`Scheduler`] backed by a small list of pending entries.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

/// Repeating jobs need a non-zero period or they would fire forever.
const MIN_PERIOD: Duration = Duration::from_millis(1);

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs still waiting to fire.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_scheduled(&self, handle: JobHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    fn push(&mut self, due: Duration, period: Option<Duration>, job: Job) -> JobHandle {
        let handle = JobHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due,
            period,
            job,
        });
        handle
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&mut self, delay: Duration, job: Job) -> JobHandle {
        self.push(self.now + delay, None, job)
    }

    fn schedule_every(&mut self, period: Duration, job: Job) -> JobHandle {
        let period = period.max(MIN_PERIOD);
        self.push(self.now + period, Some(period), job)
    }

    fn cancel(&mut self, handle: JobHandle) {
        self.entries.retain(|entry| entry.handle != handle);
    }

    fn now(&self) -> Duration {
        self.now
    }

    fn pop_due(&mut self, horizon: Duration) -> Option<Job> {
        let next = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= horizon)
            .min_by_key(|(_, entry)| (entry.due, entry.handle))
            .map(|(index, _)| index);

        let Some(index) = next else {
            self.now = self.now.max(horizon);
            return None;
        };

        let Entry {
            due, period, job, ..
        } = self.entries[index];
        self.now = self.now.max(due);
        match period {
            Some(period) => self.entries[index].due = due + period,
            None => {
                self.entries.swap_remove(index);
            }
        }
        Some(job)
    }
}
