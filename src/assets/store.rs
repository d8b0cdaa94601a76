use std::sync::Arc;

use crate::{
    assets::decode::load_image,
    foundation::{
        config::AssetPaths,
        core::Canvas,
        error::{ClockError, ClockResult},
    },
};

#[derive(Clone, Debug)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// The five pieces of clock artwork, decoded once at startup and never mutated.
#[derive(Clone, Debug)]
pub struct ClockAssets {
    pub hour_hand: PreparedImage,
    pub minute_hand: PreparedImage,
    pub second_hand: PreparedImage,
    pub backdrop_a: PreparedImage,
    pub backdrop_b: PreparedImage,
}

impl ClockAssets {
    /// Load every asset; any failure is fatal to startup.
    pub fn load(paths: &AssetPaths) -> ClockResult<Self> {
        let assets = Self {
            hour_hand: load_image(&paths.hour_hand)?,
            minute_hand: load_image(&paths.minute_hand)?,
            second_hand: load_image(&paths.second_hand)?,
            backdrop_a: load_image(&paths.backdrop_a)?,
            backdrop_b: load_image(&paths.backdrop_b)?,
        };
        assets.canvas()?;
        tracing::info!(
            hour = %paths.hour_hand.display(),
            minute = %paths.minute_hand.display(),
            second = %paths.second_hand.display(),
            "loaded clock assets"
        );
        Ok(assets)
    }

    /// Canvas size, taken from the backdrops. Both plates must agree.
    pub fn canvas(&self) -> ClockResult<Canvas> {
        let (a, b) = (&self.backdrop_a, &self.backdrop_b);
        if (a.width, a.height) != (b.width, b.height) {
            return Err(ClockError::asset(format!(
                "backdrop plates differ in size: {}x{} vs {}x{}",
                a.width, a.height, b.width, b.height
            )));
        }
        Canvas::new(a.width, a.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
