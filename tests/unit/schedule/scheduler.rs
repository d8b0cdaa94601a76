use std::{cell::RefCell, path::Path, sync::Arc, time::Duration};

use chrono::{Local, TimeZone};

use super::*;
use crate::{
    assets::store::{ClockAssets, PreparedImage},
    encode::ffmpeg::EncodeConfig,
    foundation::{
        config::HandOffsets,
        core::Point,
        error::{ClockError, ClockResult},
        time::ManualClock,
    },
    render::compositor::FrameCompositor,
};

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba.repeat((width * height) as usize)),
    }
}

fn compositor() -> FrameCompositor {
    let assets = ClockAssets {
        hour_hand: solid(6, 2, [0, 0, 255, 255]),
        minute_hand: solid(10, 2, [255, 255, 0, 255]),
        second_hand: solid(12, 2, [0, 255, 0, 255]),
        backdrop_a: solid(16, 16, [255, 0, 0, 255]),
        backdrop_b: solid(16, 16, [0, 0, 255, 255]),
    };
    let offsets = HandOffsets {
        hour: 3.0,
        minute: 6.0,
        second: 6.0,
    };
    FrameCompositor::new(&assets, Point::new(8.0, 8.0), offsets).unwrap()
}

/// Writes the output file, optionally failing or taking `delay` of clock time.
struct ScriptedEncoder<'a> {
    clock: &'a ManualClock,
    delay: Duration,
    fail: bool,
}

impl SegmentEncoder for ScriptedEncoder<'_> {
    fn encode(&self, cfg: &EncodeConfig) -> ClockResult<()> {
        self.clock.advance(self.delay);
        if self.fail {
            return Err(ClockError::encode(Some(1), "scripted failure"));
        }
        std::fs::write(&cfg.out_path, b"segment").map_err(anyhow::Error::from)?;
        Ok(())
    }
}

#[derive(Default)]
struct RecordingPlayer {
    played: RefCell<Vec<PathBuf>>,
    fail: bool,
    cancel_after: Option<(usize, CancelToken)>,
}

impl Player for RecordingPlayer {
    fn configure(&mut self) -> ClockResult<()> {
        Ok(())
    }

    fn play(&mut self, path: &Path) -> ClockResult<()> {
        self.played.borrow_mut().push(path.to_path_buf());
        if let Some((n, token)) = &self.cancel_after {
            if self.played.borrow().len() >= *n {
                token.cancel();
            }
        }
        if self.fail {
            return Err(ClockError::player("mpv is gone"));
        }
        Ok(())
    }
}

fn start() -> TimeInstant {
    Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()
}

fn scheduler<'a>(
    cfg: &ClockConfig,
    clock: &'a ManualClock,
    encoder: ScriptedEncoder<'a>,
    player: RecordingPlayer,
) -> Scheduler<&'a ManualClock, RecordingPlayer, ScriptedEncoder<'a>> {
    let builder = SegmentBuilder::new(compositor(), encoder, cfg);
    Scheduler::new(clock, player, builder, cfg)
}

fn quick_encoder(clock: &ManualClock) -> ScriptedEncoder<'_> {
    ScriptedEncoder {
        clock,
        delay: Duration::from_millis(1500),
        fail: false,
    }
}

#[test]
fn one_cycle_builds_plays_and_advances_by_ten_seconds() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ClockConfig::rooted_at(dir.path());
    let clock = ManualClock::new(start());
    let mut s = scheduler(&cfg, &clock, quick_encoder(&clock), RecordingPlayer::default());
    assert_eq!(s.state().slots.peek(), 0);

    let report = s.step(&CancelToken::new());

    let then = start() + TimeDelta::seconds(10);
    assert_eq!(report.window_start, then);
    assert_eq!(report.slot, 0);
    assert_eq!(report.segment, cfg.segment_path(0));
    assert!(report.built && report.encoded && report.played);
    assert_eq!(report.late_by, None);
    match report.wait {
        WaitOutcome::Reached(at) => assert!(at >= then),
        other => panic!("unexpected {other:?}"),
    }

    for index in 10..20 {
        assert!(cfg.frame_path(index).is_file());
    }
    assert!(cfg.segment_path(0).is_file());
    assert_eq!(*s.player().played.borrow(), vec![cfg.segment_path(0)]);
    assert_eq!(s.state().now, then);
    assert_eq!(s.state().slots.peek(), 1);
    assert!(s.clock().now() >= then);
}

#[test]
fn slots_rotate_through_three_files() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ClockConfig::rooted_at(dir.path());
    let clock = ManualClock::new(start());
    let mut s = scheduler(&cfg, &clock, quick_encoder(&clock), RecordingPlayer::default());

    let cancel = CancelToken::new();
    let slots: Vec<usize> = (0..7).map(|_| s.step(&cancel).slot).collect();
    assert_eq!(slots, vec![0, 1, 2, 0, 1, 2, 0]);
    assert_eq!(s.state().now, start() + TimeDelta::seconds(70));

    let movies = std::fs::read_dir(&cfg.movies_dir).unwrap().count();
    assert_eq!(movies, 3);
}

#[test]
fn encoder_failure_still_plays_and_waits() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ClockConfig::rooted_at(dir.path());
    let clock = ManualClock::new(start());
    let encoder = ScriptedEncoder {
        clock: &clock,
        delay: Duration::from_millis(200),
        fail: true,
    };
    let mut s = scheduler(&cfg, &clock, encoder, RecordingPlayer::default());

    let report = s.step(&CancelToken::new());
    assert!(report.built);
    assert!(!report.encoded);
    assert!(report.played);
    assert!(matches!(report.wait, WaitOutcome::Reached(_)));
    assert_eq!(*s.player().played.borrow(), vec![cfg.segment_path(0)]);
    assert_eq!(s.state().now, start() + TimeDelta::seconds(10));

    // And the next cycle goes ahead as usual.
    assert_eq!(s.step(&CancelToken::new()).slot, 1);
}

#[test]
fn play_failure_is_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ClockConfig::rooted_at(dir.path());
    let clock = ManualClock::new(start());
    let player = RecordingPlayer {
        fail: true,
        ..Default::default()
    };
    let mut s = scheduler(&cfg, &clock, quick_encoder(&clock), player);

    let report = s.step(&CancelToken::new());
    assert!(!report.played);
    assert_eq!(s.state().now, start() + TimeDelta::seconds(10));
}

#[test]
fn build_errors_do_not_stop_the_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = ClockConfig::rooted_at(dir.path());
    // A regular file where the frame directory should be.
    cfg.frames_dir = dir.path().join("blocked");
    std::fs::write(&cfg.frames_dir, b"").unwrap();
    let clock = ManualClock::new(start());
    let mut s = scheduler(&cfg, &clock, quick_encoder(&clock), RecordingPlayer::default());

    let report = s.step(&CancelToken::new());
    assert!(!report.built);
    assert!(report.played);
    assert_eq!(s.state().now, start() + TimeDelta::seconds(10));
}

#[test]
fn slow_encodes_fall_behind_without_catch_up() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ClockConfig::rooted_at(dir.path());
    let clock = ManualClock::new(start());
    let encoder = ScriptedEncoder {
        clock: &clock,
        delay: Duration::from_secs(12),
        fail: false,
    };
    let mut s = scheduler(&cfg, &clock, encoder, RecordingPlayer::default());

    let report = s.step(&CancelToken::new());
    assert_eq!(report.late_by, Some(TimeDelta::seconds(2)));
    // The reference instant still advances by exactly one window.
    assert_eq!(s.state().now, start() + TimeDelta::seconds(10));

    let report = s.step(&CancelToken::new());
    assert_eq!(report.window_start, start() + TimeDelta::seconds(20));
    assert!(report.late_by.unwrap() > TimeDelta::seconds(2));
}

#[test]
fn run_stops_once_cancelled() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ClockConfig::rooted_at(dir.path());
    let clock = ManualClock::new(start());
    let cancel = CancelToken::new();
    let player = RecordingPlayer {
        cancel_after: Some((3, cancel.clone())),
        ..Default::default()
    };
    let mut s = scheduler(&cfg, &clock, quick_encoder(&clock), player);

    s.run(&cancel);
    assert_eq!(s.player().played.borrow().len(), 3);
}
