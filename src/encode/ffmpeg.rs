use std::{
    io::{ErrorKind, Read},
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context as _;

use crate::foundation::{
    config::ClockConfig,
    error::{ClockError, ClockResult},
};

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const STDERR_TAIL_CHARS: usize = 500;
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Parameters of one image-sequence to H.264 encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    /// printf-style input pattern, e.g. `images/clock%04d.png`.
    pub frame_pattern: PathBuf,
    pub start_number: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    /// The fixed segment encode for `out_path`.
    pub fn segment(cfg: &ClockConfig, out_path: impl Into<PathBuf>) -> Self {
        Self {
            frame_pattern: cfg.frame_pattern(),
            start_number: cfg.first_frame_index,
            fps: cfg.fps,
            out_path: out_path.into(),
            overwrite: true,
        }
    }

    pub fn validate(&self) -> ClockResult<()> {
        if self.fps == 0 {
            return Err(ClockError::config("encode fps must be non-zero"));
        }
        let path_str = self.out_path.to_string_lossy();
        if path_str.is_empty() {
            return Err(ClockError::config("encode output path must not be empty"));
        }
        if path_str.chars().any(|c| c.is_control()) {
            return Err(ClockError::config(
                "encode output path contains control characters",
            ));
        }
        Ok(())
    }
}

/// Full encoder argument list.
pub fn ffmpeg_args(cfg: &EncodeConfig) -> Vec<String> {
    let fps = cfg.fps.to_string();
    let mut args = vec![
        "-hide_banner".to_owned(),
        "-loglevel".to_owned(),
        "error".to_owned(),
        "-start_number".to_owned(),
        cfg.start_number.to_string(),
        "-r".to_owned(),
        fps.clone(),
        "-i".to_owned(),
        cfg.frame_pattern.to_string_lossy().into_owned(),
        "-c:v".to_owned(),
        "libx264".to_owned(),
        "-vf".to_owned(),
        format!("fps={fps}"),
        "-pix_fmt".to_owned(),
        "yuv420p".to_owned(),
    ];
    args.push(if cfg.overwrite { "-y" } else { "-n" }.to_owned());
    args.push(cfg.out_path.to_string_lossy().into_owned());
    args
}

pub fn ensure_parent_dir(path: &Path) -> ClockResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Assembles the frame files of one segment into a video.
pub trait SegmentEncoder {
    fn encode(&self, cfg: &EncodeConfig) -> ClockResult<()>;
}

/// Runs the system encoder binary once per segment, killing it past the timeout.
#[derive(Clone, Debug)]
pub struct FfmpegCli {
    program: PathBuf,
    timeout: Duration,
}

impl FfmpegCli {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &ClockConfig) -> Self {
        Self::new(&cfg.encoder_program, cfg.encoder_timeout)
    }

    fn wait_bounded(&self, child: &mut std::process::Child) -> ClockResult<Option<ExitStatus>> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(Some(status)),
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(None);
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(ClockError::encode(
                        None,
                        format!("failed waiting for encoder: {e}"),
                    ));
                }
            }
        }
    }
}

impl SegmentEncoder for FfmpegCli {
    fn encode(&self, cfg: &EncodeConfig) -> ClockResult<()> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        let args = ffmpeg_args(cfg);
        tracing::info!("executing: {} {}", self.program.display(), args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    ClockError::encode(
                        None,
                        format!("encoder executable '{}' not found", self.program.display()),
                    )
                } else {
                    ClockError::encode(None, format!("failed to spawn encoder: {e}"))
                }
            })?;

        // Streamed off a detached thread: a forked helper can hold the pipe open long after the
        // encoder itself is gone, so nothing here waits for EOF.
        let (chunk_tx, chunk_rx) = mpsc::channel();
        if let Some(mut pipe) = child.stderr.take() {
            thread::spawn(move || {
                let mut chunk = [0u8; 1024];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            if chunk_tx.send(chunk[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                    }
                }
            });
        }

        let status = self.wait_bounded(&mut child)?;
        let grace = if status.is_some() {
            STDERR_GRACE
        } else {
            Duration::ZERO
        };
        let stderr = collect_stderr(&chunk_rx, grace);
        let stderr_tail = last_n_chars(&String::from_utf8_lossy(&stderr), STDERR_TAIL_CHARS);

        match status {
            Some(status) if status.success() => Ok(()),
            Some(status) => Err(ClockError::encode(
                status.code(),
                format!("encoder exited with status {status}: {stderr_tail}"),
            )),
            None => Err(ClockError::encode(
                None,
                format!(
                    "encoder killed after {:?} writing '{}'",
                    self.timeout,
                    cfg.out_path.display()
                ),
            )),
        }
    }
}

/// Everything the reader thread has sent, waiting at most `grace` for the pipe to close.
fn collect_stderr(rx: &mpsc::Receiver<Vec<u8>>, grace: Duration) -> Vec<u8> {
    let deadline = Instant::now() + grace;
    let mut buf = Vec::new();
    loop {
        buf.extend(rx.try_iter().flatten());
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            return buf;
        }
        match rx.recv_timeout(left) {
            Ok(chunk) => buf.extend(chunk),
            Err(mpsc::RecvTimeoutError::Timeout) => return buf,
            Err(mpsc::RecvTimeoutError::Disconnected) => return buf,
        }
    }
}

fn last_n_chars(s: &str, max_chars: usize) -> String {
    let mut chars = s.chars().collect::<Vec<_>>();
    if chars.len() > max_chars {
        chars = chars[chars.len().saturating_sub(max_chars)..].to_vec();
    }
    chars.into_iter().collect::<String>().trim().to_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
