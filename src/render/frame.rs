use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ClockError, ClockResult};

/// One rendered frame in RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Write the frame as an opaque PNG, flattening any translucency over black.
    pub fn save_png(&self, path: &Path) -> ClockResult<()> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.data.len() != expected {
            return Err(ClockError::render(format!(
                "frame data is {} bytes, expected {expected} for {}x{}",
                self.data.len(),
                self.width,
                self.height
            )));
        }

        let opaque = opaque_over_black(&self.data, self.premultiplied);

        image::save_buffer_with_format(
            path,
            &opaque,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Drop the alpha channel by compositing over black.
///
/// Composited frames sit on an opaque backdrop, so alpha is normally 255 throughout; a
/// translucent backdrop PNG is the only way to get anything else here. Premultiplied color over
/// black is the color itself, so only straight alpha needs scaling.
pub(crate) fn opaque_over_black(rgba: &[u8], premultiplied: bool) -> Vec<u8> {
    let mut out = rgba.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if !premultiplied && a != 255 {
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * a + 127) / 255) as u8;
            }
        }
        px[3] = 255;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
