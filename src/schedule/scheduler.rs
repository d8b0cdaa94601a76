//! The clock's main loop.
//!
//! Every cycle targets the window starting `lookahead` after the reference instant: build
//! that window into the next slot's file, hand the file to the player straight away, then
//! hold until real time reaches the window start. Build and play failures are logged and the
//! cycle carries on; the loop itself never stops on error.

use std::path::PathBuf;

use chrono::TimeDelta;

use crate::{
    encode::ffmpeg::SegmentEncoder,
    foundation::{
        config::ClockConfig,
        time::{CancelToken, Clock, TimeInstant},
    },
    playback::controller::Player,
    schedule::wait::{WaitOutcome, WaitPolicy, wait_until},
    segment::{builder::SegmentBuilder, slots::SlotRing},
};

/// Mutable loop state; owned by the scheduler alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleState {
    /// Reference instant the next window is planned from.
    pub now: TimeInstant,
    pub slots: SlotRing,
}

/// Summary of one cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleReport {
    pub window_start: TimeInstant,
    pub slot: usize,
    pub segment: PathBuf,
    /// Frames were rendered and saved.
    pub built: bool,
    /// The encoder produced a fresh segment.
    pub encoded: bool,
    /// The player acknowledged the play command.
    pub played: bool,
    /// How far past the window start build and play finished, if they overran it.
    pub late_by: Option<TimeDelta>,
    pub wait: WaitOutcome,
}

pub struct Scheduler<C, P, E> {
    clock: C,
    player: P,
    builder: SegmentBuilder<E>,
    cfg: ClockConfig,
    state: ScheduleState,
}

impl<C, P, E> Scheduler<C, P, E>
where
    C: Clock,
    P: Player,
    E: SegmentEncoder,
{
    /// Start planning from the clock's current reading with slot 0.
    pub fn new(clock: C, player: P, builder: SegmentBuilder<E>, cfg: &ClockConfig) -> Self {
        let state = ScheduleState {
            now: clock.now(),
            slots: SlotRing::new(cfg.slot_count),
        };
        Self {
            clock,
            player,
            builder,
            cfg: cfg.clone(),
            state,
        }
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run cycles until `cancel` trips.
    pub fn run(&mut self, cancel: &CancelToken) {
        tracing::info!(start = %self.state.now, "clock loop started");
        while !cancel.is_cancelled() {
            self.step(cancel);
        }
        tracing::info!(now = %self.state.now, "clock loop stopped");
    }

    /// One build, play, wait cycle.
    pub fn step(&mut self, cancel: &CancelToken) -> CycleReport {
        let then = self.state.now + self.cfg.lookahead();
        let slot = self.state.slots.advance();
        let segment = self.cfg.segment_path(slot);

        let (built, encoded) = match self.builder.build(&then, &segment) {
            Ok(report) => (true, report.encoded),
            Err(e) => {
                tracing::error!(error = %e, slot, "segment build failed; playing slot as-is");
                (false, false)
            }
        };

        let played = match self.player.play(&segment) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, segment = %segment.display(), "play command failed");
                false
            }
        };

        let after_play = self.clock.now();
        let late_by = (after_play > then).then(|| after_play - then);
        if let Some(late) = late_by {
            tracing::warn!(
                late_ms = late.num_milliseconds(),
                window = %then,
                "cycle overran its window; display is behind real time"
            );
        }

        let wait = wait_until(
            &self.clock,
            &then,
            WaitPolicy::from_config(&self.cfg),
            cancel,
        );
        if let WaitOutcome::Reached(_) = wait {
            self.state.now = then;
        }

        tracing::info!(slot, window = %then, built, encoded, played, "cycle complete");
        CycleReport {
            window_start: then,
            slot,
            segment,
            built,
            encoded,
            played,
            late_by,
            wait,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
