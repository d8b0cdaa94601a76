//! steamclock keeps a steampunk analog clock running as video, locked to wall-clock time.
//!
//! # Pipeline overview
//!
//! 1. **Angles**: `TimeInstant -> HandAngles`, with the face's fixed stylistic offsets
//! 2. **Compose**: `HandAngles + ClockAssets -> FrameRGBA` by cumulative pivot rotations
//! 3. **Segment**: ten one-second frames -> PNG files -> system `ffmpeg` -> one of three
//!    rotating MP4 slots
//! 4. **Play**: the slot is handed to mpv through a loopback command bus
//! 5. **Wait**: coarse sleep, then fine polling until the window start arrives
//!
//! Every cycle renders the window ten seconds ahead of the reference instant, so the player
//! always has the next segment queued before its time comes. Encoder and player failures are
//! logged and the loop keeps going.
#![forbid(unsafe_code)]

pub mod angle;
pub mod assets;
pub mod encode;
pub mod foundation;
pub mod playback;
pub mod render;
pub mod schedule;
pub mod segment;

pub use angle::hands::{HandAngles, hour_angle, minute_angle, second_angle};
pub use assets::decode::{ArtFormat, decode_image, load_image};
pub use assets::store::{ClockAssets, PreparedImage};
pub use encode::ffmpeg::{
    EncodeConfig, FfmpegCli, SegmentEncoder, ensure_parent_dir, ffmpeg_args,
};
pub use foundation::config::{AssetPaths, ClockConfig, HandOffsets, PIVOT};
pub use foundation::core::{Affine, Canvas, Point, Vec2};
pub use foundation::error::{ClockError, ClockResult};
pub use foundation::time::{CancelToken, Clock, ManualClock, SystemClock, TimeInstant};
pub use playback::bus::CommandBus;
pub use playback::command::{BusReply, BusRequest, LoadMode, PlayerCommand};
pub use playback::controller::{Player, RemotePlayer, connect};
pub use playback::ipc::{MpvIpc, PlayerTarget};
pub use render::compositor::{
    Backdrop, FrameCompositor, HandSizes, HandTransforms, backdrop_for, hand_transforms,
};
pub use render::frame::FrameRGBA;
pub use schedule::scheduler::{CycleReport, ScheduleState, Scheduler};
pub use schedule::wait::{WaitOutcome, WaitPolicy, wait_until};
pub use segment::builder::{SegmentBuilder, SegmentReport};
pub use segment::slots::SlotRing;
