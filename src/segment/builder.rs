use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::ffmpeg::{EncodeConfig, SegmentEncoder, ensure_parent_dir},
    foundation::{config::ClockConfig, error::ClockResult, time::TimeInstant},
    render::compositor::FrameCompositor,
};

/// What one build left on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentReport {
    /// Frame files in index order.
    pub frames: Vec<PathBuf>,
    pub output: PathBuf,
    /// `false` when the encoder failed and `output` holds whatever the slot had before.
    pub encoded: bool,
}

/// Renders the frames of a window and assembles them into one segment file.
pub struct SegmentBuilder<E> {
    compositor: FrameCompositor,
    encoder: E,
    cfg: ClockConfig,
}

impl<E: SegmentEncoder> SegmentBuilder<E> {
    pub fn new(compositor: FrameCompositor, encoder: E, cfg: &ClockConfig) -> Self {
        Self {
            compositor,
            encoder,
            cfg: cfg.clone(),
        }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Render one frame per second of `[start, start + segment_secs)` into the frame
    /// directory, then encode them into `output`.
    ///
    /// Frame files are overwritten in place on every call. Render and save errors propagate;
    /// encoder errors are logged and reported through [`SegmentReport::encoded`].
    #[tracing::instrument(skip_all, fields(start = %start, output = %output.display()))]
    pub fn build(&self, start: &TimeInstant, output: &Path) -> ClockResult<SegmentReport> {
        std::fs::create_dir_all(&self.cfg.frames_dir).with_context(|| {
            format!(
                "create frame directory '{}'",
                self.cfg.frames_dir.display()
            )
        })?;

        let mut frames = Vec::with_capacity(self.cfg.segment_secs as usize);
        for (offset, index) in self.cfg.frame_indices().enumerate() {
            let instant = *start + chrono::TimeDelta::seconds(offset as i64);
            let frame = self.compositor.render(&instant)?;
            let path = self.cfg.frame_path(index);
            frame.save_png(&path)?;
            tracing::debug!(index, path = %path.display(), "frame written");
            frames.push(path);
        }

        ensure_parent_dir(output)?;
        let encoded = match self.encoder.encode(&EncodeConfig::segment(&self.cfg, output)) {
            Ok(()) => {
                tracing::info!(frames = frames.len(), "segment encoded");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "segment encode failed; slot keeps its previous file");
                false
            }
        };

        Ok(SegmentReport {
            frames,
            output: output.to_path_buf(),
            encoded,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/builder.rs"]
mod tests;
