use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    assets::store::PreparedImage,
    foundation::error::{ClockError, ClockResult},
};

/// Encodings accepted for clock artwork.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtFormat {
    Png,
    Jpeg,
}

impl ArtFormat {
    /// Pick the decoder from the file extension; anything but png/jpg/jpeg is refused.
    pub fn from_path(path: &Path) -> ClockResult<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(ClockError::asset(format!(
                "'{}' must be a png or jpg image",
                path.display()
            ))),
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Read and decode one artwork file.
pub fn load_image(path: &Path) -> ClockResult<PreparedImage> {
    let format = ArtFormat::from_path(path)?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("read clock asset '{}'", path.display()))
        .map_err(|e| ClockError::asset(format!("{e:#}")))?;
    decode_image(&bytes, format)
        .map_err(|e| ClockError::asset(format!("'{}': {e}", path.display())))
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8], format: ArtFormat) -> ClockResult<PreparedImage> {
    let dyn_img = image::load_from_memory_with_format(bytes, format.image_format())
        .context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
