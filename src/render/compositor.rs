//! CPU compositing of one clock frame.
//!
//! Hands are not rotated individually. The canvas transform is rotated about the pivot by the
//! minute angle and the minute hand is pasted; the transform is then rotated further by the
//! hour/minute difference for the hour hand, and by the second/hour difference for the second
//! hand. Each paste lands in the frame left by the previous rotation.

use std::sync::Arc;

use crate::{
    angle::hands::HandAngles,
    assets::store::{ClockAssets, PreparedImage},
    foundation::{
        config::HandOffsets,
        core::{Affine, Canvas, Point},
        error::{ClockError, ClockResult},
        time::TimeInstant,
    },
    render::frame::FrameRGBA,
};

/// Which backdrop plate a frame is drawn on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backdrop {
    A,
    B,
}

/// Plate A for the first half of every 8 second cycle, plate B for the second half.
pub fn backdrop_for(second: u32) -> Backdrop {
    if second % 8 < 4 { Backdrop::A } else { Backdrop::B }
}

/// Pixel size of the three hand sprites.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandSizes {
    pub hour: (f64, f64),
    pub minute: (f64, f64),
    pub second: (f64, f64),
}

/// Paste transforms of the three hands, in draw order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandTransforms {
    pub minute: Affine,
    pub hour: Affine,
    pub second: Affine,
}

/// Accumulate the three pivot rotations and anchor each hand at its offset left of the pivot.
pub fn hand_transforms(
    angles: HandAngles,
    pivot: Point,
    offsets: &HandOffsets,
    sizes: &HandSizes,
) -> HandTransforms {
    let mut ctm = Affine::IDENTITY;

    ctm = ctm * Affine::rotate_about(angles.minute, pivot);
    let minute = ctm * anchor_left_middle(pivot.x - offsets.minute, pivot.y, sizes.minute);

    ctm = ctm * Affine::rotate_about(angles.hour - angles.minute, pivot);
    let hour = ctm * anchor_left_middle(pivot.x - offsets.hour, pivot.y, sizes.hour);

    ctm = ctm * Affine::rotate_about(angles.second - angles.hour, pivot);
    let second = ctm * anchor_left_middle(pivot.x - offsets.second, pivot.y, sizes.second);

    HandTransforms {
        minute,
        hour,
        second,
    }
}

// Place the image so that its (0, 0.5) anchor sits on (x, y).
fn anchor_left_middle(x: f64, y: f64, (_w, h): (f64, f64)) -> Affine {
    Affine::translate((x, y - 0.5 * h))
}

struct ImagePaint {
    paint: vello_cpu::Image,
    width: f64,
    height: f64,
}

impl ImagePaint {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// Renders frames from a fixed set of artwork.
pub struct FrameCompositor {
    canvas: Canvas,
    pivot: Point,
    offsets: HandOffsets,
    hour_hand: ImagePaint,
    minute_hand: ImagePaint,
    second_hand: ImagePaint,
    backdrop_a: ImagePaint,
    backdrop_b: ImagePaint,
}

impl FrameCompositor {
    /// Convert the decoded artwork into rasterizer paints once, up front.
    pub fn new(assets: &ClockAssets, pivot: Point, offsets: HandOffsets) -> ClockResult<Self> {
        let canvas = assets.canvas()?;
        if !canvas.is_yuv420_compatible() {
            tracing::warn!(
                width = canvas.width,
                height = canvas.height,
                "odd canvas size; yuv420p encoding will fail"
            );
        }
        Ok(Self {
            canvas,
            pivot,
            offsets,
            hour_hand: image_paint(&assets.hour_hand)?,
            minute_hand: image_paint(&assets.minute_hand)?,
            second_hand: image_paint(&assets.second_hand)?,
            backdrop_a: image_paint(&assets.backdrop_a)?,
            backdrop_b: image_paint(&assets.backdrop_b)?,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Render the clock face as it reads at `instant`.
    pub fn render(&self, instant: &TimeInstant) -> ClockResult<FrameRGBA> {
        use chrono::Timelike as _;

        self.render_angles(HandAngles::at(instant), backdrop_for(instant.second()))
    }

    pub fn render_angles(&self, angles: HandAngles, backdrop: Backdrop) -> ClockResult<FrameRGBA> {
        let (w, h) = self.canvas.dims_u16();
        let mut ctx = vello_cpu::RenderContext::new(w, h);

        let plate = match backdrop {
            Backdrop::A => &self.backdrop_a,
            Backdrop::B => &self.backdrop_b,
        };
        fill_image(&mut ctx, plate, Affine::IDENTITY);

        let sizes = HandSizes {
            hour: self.hour_hand.size(),
            minute: self.minute_hand.size(),
            second: self.second_hand.size(),
        };
        let t = hand_transforms(angles, self.pivot, &self.offsets, &sizes);
        fill_image(&mut ctx, &self.minute_hand, t.minute);
        fill_image(&mut ctx, &self.hour_hand, t.hour);
        fill_image(&mut ctx, &self.second_hand, t.second);

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn fill_image(ctx: &mut vello_cpu::RenderContext, image: &ImagePaint, transform: Affine) {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(image.paint.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        image.width,
        image.height,
    ));
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_paint(img: &PreparedImage) -> ClockResult<ImagePaint> {
    let pixmap = image_premul_bytes_to_pixmap(img.rgba8_premul.as_slice(), img.width, img.height)?;
    Ok(ImagePaint {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        width: f64::from(img.width),
        height: f64::from(img.height),
    })
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ClockResult<vello_cpu::Pixmap> {
    let (w, h) = Canvas::new(width, height)
        .map_err(|e| ClockError::render(format!("hand or plate sprite: {e}")))?
        .dims_u16();
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ClockError::render(format!(
            "sprite has {} bytes, expected {width}x{height} rgba8",
            rgba8_premul.len()
        )));
    }

    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
        .collect();
    let translucent = pixels.iter().any(|px| px.a != 255);

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        translucent,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
