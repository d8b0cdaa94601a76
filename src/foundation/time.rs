use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use chrono::{DateTime, Local};

/// Wall-clock instant used for every angle and frame computation.
pub type TimeInstant = DateTime<Local>;

/// Source of real time for the scheduler.
///
/// The production loop uses [`SystemClock`]; tests drive a manual clock whose `sleep` advances
/// `now` instead of blocking.
pub trait Clock {
    fn now(&self) -> TimeInstant;

    fn sleep(&self, dur: Duration);
}

/// Local system time and a real thread sleep.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimeInstant {
        Local::now()
    }

    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Clock that only moves when slept on or advanced by hand.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<TimeInstant>,
    sleeps: AtomicUsize,
}

impl ManualClock {
    pub fn new(start: TimeInstant) -> Self {
        Self {
            now: Mutex::new(start),
            sleeps: AtomicUsize::new(0),
        }
    }

    pub fn advance(&self, dur: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += chrono::TimeDelta::from_std(dur).unwrap_or(chrono::TimeDelta::MAX);
    }

    pub fn set(&self, instant: TimeInstant) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }

    /// Number of `sleep` calls so far.
    pub fn sleep_count(&self) -> usize {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimeInstant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sleep(&self, dur: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.advance(dur);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> TimeInstant {
        (**self).now()
    }

    fn sleep(&self, dur: Duration) {
        (**self).sleep(dur)
    }
}

/// Shared stop flag for the scheduler loop and its wait step.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time.rs"]
mod tests;
