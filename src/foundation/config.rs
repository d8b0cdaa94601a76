//! Fixed runtime parameters.
//!
//! Nothing here is read from flags, files, or the environment: [`ClockConfig::default`] is the
//! single source of truth for the installed display. Tests re-root the filesystem paths into
//! scratch directories with [`ClockConfig::rooted_at`].

use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::foundation::{
    core::Point,
    error::{ClockError, ClockResult},
};

/// Clock pivot in canvas pixels.
pub const PIVOT: Point = Point::new(502.0, 455.0);

/// Horizontal distance from the pivot to the left edge of each hand sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandOffsets {
    /// Hour hand offset in pixels.
    pub hour: f64,
    /// Minute hand offset in pixels.
    pub minute: f64,
    /// Second hand offset in pixels.
    pub second: f64,
}

impl Default for HandOffsets {
    fn default() -> Self {
        Self {
            hour: 14.0,
            minute: 170.0,
            second: 170.0,
        }
    }
}

/// Source artwork locations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    /// Hour hand sprite.
    pub hour_hand: PathBuf,
    /// Minute hand sprite.
    pub minute_hand: PathBuf,
    /// Second hand sprite.
    pub second_hand: PathBuf,
    /// Plate shown while `second % 8 < 4`.
    pub backdrop_a: PathBuf,
    /// Plate shown for the other half of the 8 second cycle.
    pub backdrop_b: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            hour_hand: PathBuf::from("clock/hour.png"),
            minute_hand: PathBuf::from("clock/min.png"),
            second_hand: PathBuf::from("clock/sec.png"),
            backdrop_a: PathBuf::from("clock/left.jpg"),
            backdrop_b: PathBuf::from("clock/right.jpg"),
        }
    }
}

/// Every tunable of the clock loop, fixed at compile time.
#[derive(Clone, Debug, PartialEq)]
pub struct ClockConfig {
    pub assets: AssetPaths,
    /// Directory receiving the per-cycle PNG frames.
    pub frames_dir: PathBuf,
    /// File stem of each frame; the zero-padded index follows it.
    pub frame_stem: String,
    /// Directory receiving the rotating segment files.
    pub movies_dir: PathBuf,
    /// File stem of each segment; the slot number follows it.
    pub movie_stem: String,
    pub movie_ext: String,
    /// Number of rotating segment files kept on disk.
    pub slot_count: usize,
    /// Seconds covered by one segment, one frame per second.
    pub segment_secs: u32,
    /// Index of the first frame file of a segment.
    pub first_frame_index: u32,
    /// Input and output cadence handed to the encoder.
    pub fps: u32,
    pub pivot: Point,
    pub hand_offsets: HandOffsets,
    /// Encoder executable.
    pub encoder_program: PathBuf,
    /// Upper bound on one encoder run before it is killed.
    pub encoder_timeout: Duration,
    /// mpv JSON IPC socket (`--input-ipc-server`).
    pub player_socket: PathBuf,
    /// Loopback address of the player command bus.
    pub bus_addr: SocketAddr,
    /// Read timeout for one command acknowledgement from the bus or the player.
    pub player_timeout: Duration,
    /// Initial sleep of the wait step.
    pub wait_coarse: Duration,
    /// Polling interval of the wait step.
    pub wait_fine: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            frames_dir: PathBuf::from("images"),
            frame_stem: "clock".to_owned(),
            movies_dir: PathBuf::from("movies"),
            movie_stem: "clock_".to_owned(),
            movie_ext: "mp4".to_owned(),
            slot_count: 3,
            segment_secs: 10,
            first_frame_index: 10,
            fps: 1,
            pivot: PIVOT,
            hand_offsets: HandOffsets::default(),
            encoder_program: PathBuf::from("/usr/bin/ffmpeg"),
            encoder_timeout: Duration::from_secs(30),
            player_socket: PathBuf::from("/tmp/mpvsocket"),
            bus_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 9999)),
            player_timeout: Duration::from_secs(2),
            wait_coarse: Duration::from_millis(50),
            wait_fine: Duration::from_millis(1),
        }
    }
}

impl ClockConfig {
    /// Default configuration with every relative filesystem path resolved under `root`.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut cfg = Self::default();
        for p in [
            &mut cfg.assets.hour_hand,
            &mut cfg.assets.minute_hand,
            &mut cfg.assets.second_hand,
            &mut cfg.assets.backdrop_a,
            &mut cfg.assets.backdrop_b,
            &mut cfg.frames_dir,
            &mut cfg.movies_dir,
        ] {
            *p = root.join(&*p);
        }
        cfg
    }

    pub fn validate(&self) -> ClockResult<()> {
        if self.slot_count == 0 {
            return Err(ClockError::config("slot_count must be non-zero"));
        }
        if self.segment_secs == 0 {
            return Err(ClockError::config("segment_secs must be non-zero"));
        }
        if self.fps == 0 {
            return Err(ClockError::config("fps must be non-zero"));
        }
        if self.wait_fine.is_zero() {
            return Err(ClockError::config("wait_fine must be non-zero"));
        }
        if self.player_timeout.is_zero() {
            return Err(ClockError::config("player_timeout must be non-zero"));
        }
        if self.encoder_timeout.is_zero() {
            return Err(ClockError::config("encoder_timeout must be non-zero"));
        }
        if self.encoder_program.as_os_str().is_empty() {
            return Err(ClockError::config("encoder_program must not be empty"));
        }
        if self.frame_stem.is_empty() || self.movie_stem.is_empty() {
            return Err(ClockError::config("frame and movie stems must not be empty"));
        }
        Ok(())
    }

    /// Indices of the frame files making up one segment.
    pub fn frame_indices(&self) -> std::ops::Range<u32> {
        self.first_frame_index..self.first_frame_index + self.segment_secs
    }

    /// `images/clock0010.png` style path of one frame.
    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.frames_dir
            .join(format!("{}{index:04}.png", self.frame_stem))
    }

    /// printf-style pattern matching [`ClockConfig::frame_path`], as the encoder expects it.
    pub fn frame_pattern(&self) -> PathBuf {
        self.frames_dir.join(format!("{}%04d.png", self.frame_stem))
    }

    /// `movies/clock_0.mp4` style path of one slot.
    pub fn segment_path(&self, slot: usize) -> PathBuf {
        self.movies_dir
            .join(format!("{}{slot}.{}", self.movie_stem, self.movie_ext))
    }

    /// Distance between the reference instant and the window a cycle produces.
    pub fn lookahead(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::seconds(i64::from(self.segment_secs))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
