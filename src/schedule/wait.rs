use std::time::Duration;

use crate::foundation::{
    config::ClockConfig,
    time::{CancelToken, Clock, TimeInstant},
};

/// Sleep schedule of [`wait_until`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitPolicy {
    /// One up-front sleep.
    pub coarse: Duration,
    /// Interval between clock reads after the coarse sleep.
    pub fine: Duration,
}

impl WaitPolicy {
    pub fn from_config(cfg: &ClockConfig) -> Self {
        Self {
            coarse: cfg.wait_coarse,
            fine: cfg.wait_fine,
        }
    }
}

/// How a wait ended, with the clock reading at that moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    Reached(TimeInstant),
    Cancelled(TimeInstant),
}

/// Block until `clock` reads at least `target`.
///
/// The clock is re-read after every short sleep instead of trusting one long computed sleep,
/// so drift, suspend, and clock steps are picked up. `Reached` is only returned once the
/// reading is at or past `target`.
pub fn wait_until<C: Clock + ?Sized>(
    clock: &C,
    target: &TimeInstant,
    policy: WaitPolicy,
    cancel: &CancelToken,
) -> WaitOutcome {
    clock.sleep(policy.coarse);
    loop {
        let now = clock.now();
        if now >= *target {
            return WaitOutcome::Reached(now);
        }
        if cancel.is_cancelled() {
            return WaitOutcome::Cancelled(now);
        }
        clock.sleep(policy.fine);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/wait.rs"]
mod tests;
