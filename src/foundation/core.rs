use crate::foundation::error::{ClockError, ClockResult};

pub use kurbo::{Affine, Point, Vec2};

/// Output canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Validate the size against what the CPU rasterizer and the yuv420p encoder accept.
    pub fn new(width: u32, height: u32) -> ClockResult<Self> {
        if width == 0 || height == 0 {
            return Err(ClockError::asset("canvas width/height must be non-zero"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(ClockError::asset(format!(
                "canvas {width}x{height} exceeds the rasterizer limit of {}",
                u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    /// Width and height as the rasterizer's native `u16`.
    pub fn dims_u16(self) -> (u16, u16) {
        // Checked in `Canvas::new`.
        (self.width as u16, self.height as u16)
    }

    /// yuv420p needs even dimensions; odd canvases make the encoder fail every cycle.
    pub fn is_yuv420_compatible(self) -> bool {
        self.width.is_multiple_of(2) && self.height.is_multiple_of(2)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
