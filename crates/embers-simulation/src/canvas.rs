//! A software raster surface that particles can be drawn on.
//!
//! Pixels are sampled at their centres and coloured with plain source-over alpha blending. The
//! canvas has its own coordinate space, "canvas units", which are `scale` times bigger than a
//! pixel. Device space has its origin in the top-left with y increasing downwards. Drawing
//! calls are given in "user space", which is mapped to device space by the current transform.

use glam::{Affine2, Vec2};
use palette::Mix as _;

use crate::colour::Hsla;
use crate::draw::{DrawSurface, Fill};

/// An RGB framebuffer.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Canvas {
    /// Width in pixels
    width: usize,
    /// Height in pixels
    height: usize,
    /// How many canvas units there are per pixel
    scale: f32,
    /// Row-major, starting from the top-left
    pixels: Vec<palette::Srgb>,
    /// Maps user space into device space
    transform: Affine2,
}

impl Canvas {
    /// Create a black canvas.
    #[must_use]
    pub fn new(width: usize, height: usize, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
            pixels: vec![palette::Srgb::new(0.0, 0.0, 0.0); width.saturating_mul(height)],
            transform: Affine2::IDENTITY,
        }
    }

    /// Change the number of pixels. The contents are cleared to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![palette::Srgb::new(0.0, 0.0, 0.0); width.saturating_mul(height)];
    }

    /// Width and height in pixels.
    #[must_use]
    pub const fn pixel_dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// How many canvas units there are per pixel.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// The colour of a single pixel.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<palette::Srgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y.saturating_mul(self.width).saturating_add(x)).copied()
    }

    /// The current mapping from user space to device space.
    #[must_use]
    pub const fn transform(&self) -> Affine2 {
        self.transform
    }

    /// Make y increase upwards for as long as the returned guard lives. The previous transform
    /// is restored when the guard is dropped, however the guard's scope is left.
    pub fn flip_vertical(&mut self) -> TransformGuard<'_> {
        let height = self.dimensions().y;
        let flip = Affine2::from_scale(Vec2::new(1.0, -1.0))
            * Affine2::from_translation(Vec2::new(0.0, -height));
        let previous = self.transform;
        self.transform = previous * flip;
        TransformGuard {
            canvas: self,
            previous,
        }
    }

    /// Visit every pixel whose device-space centre falls within the given device-space bounds,
    /// passing it the pixel's centre in user space.
    fn paint<F>(&mut self, device_min: Vec2, device_max: Vec2, mut colour_at: F)
    where
        F: FnMut(Vec2) -> Option<palette::Srgba>,
    {
        let inverse = self.transform.inverse();
        let (x_start, x_end) = self.pixel_span(device_min.x, device_max.x, self.width);
        let (y_start, y_end) = self.pixel_span(device_min.y, device_max.y, self.height);

        for y in y_start..y_end {
            for x in x_start..x_end {
                let device_point = self.pixel_centre(x, y);
                let user_point = inverse.transform_point2(device_point);
                let Some(colour) = colour_at(user_point) else {
                    continue;
                };
                let index = y.saturating_mul(self.width).saturating_add(x);
                if let Some(pixel) = self.pixels.get_mut(index) {
                    *pixel = pixel.mix(colour.color, colour.alpha.clamp(0.0, 1.0));
                }
            }
        }
    }

    /// The centre of a pixel in device space.
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Pixel coordinates are far smaller than where `f32` loses integer precision"
    )]
    fn pixel_centre(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new((x as f32 + 0.5) * self.scale, (y as f32 + 0.5) * self.scale)
    }

    /// The range of pixel indices whose centres could fall between two device-space positions.
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Values are clamped to the pixel grid before casting"
    )]
    fn pixel_span(&self, min: f32, max: f32, limit: usize) -> (usize, usize) {
        let limit_f32 = limit as f32;
        let start = (min / self.scale - 0.5).ceil().clamp(0.0, limit_f32) as usize;
        let end = ((max / self.scale - 0.5).floor() + 1.0).clamp(0.0, limit_f32) as usize;
        (start, end.max(start))
    }

    /// The device-space bounding box of a user-space rectangle.
    fn device_bounds(&self, user_min: Vec2, user_max: Vec2) -> (Vec2, Vec2) {
        let corners = [
            user_min,
            Vec2::new(user_max.x, user_min.y),
            Vec2::new(user_min.x, user_max.y),
            user_max,
        ]
        .map(|corner| self.transform.transform_point2(corner));
        let min = corners.iter().fold(Vec2::INFINITY, |bound, corner| bound.min(*corner));
        let max = corners
            .iter()
            .fold(Vec2::NEG_INFINITY, |bound, corner| bound.max(*corner));
        (min, max)
    }
}

impl DrawSurface for Canvas {
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Terminal-sized pixel counts fit comfortably in an `f32`"
    )]
    fn dimensions(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.scale
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, fill: &Fill) {
        let user_min = origin.min(origin + size);
        let user_max = origin.max(origin + size);
        let (device_min, device_max) = self.device_bounds(user_min, user_max);
        let is_inside = |point: Vec2| point.cmpge(user_min).all() && point.cmplt(user_max).all();

        match fill {
            Fill::Solid(colour) => {
                let srgba = colour.to_srgba();
                self.paint(device_min, device_max, |point| {
                    is_inside(point).then_some(srgba)
                });
            }
            Fill::Radial(gradient) => {
                if gradient.is_degenerate() {
                    return;
                }
                self.paint(device_min, device_max, |point| {
                    if is_inside(point) {
                        gradient.colour_at(point)
                    } else {
                        None
                    }
                });
            }
        }
    }

    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Hsla) {
        if radius <= 0.0 {
            return;
        }
        let extent = Vec2::splat(radius);
        let (device_min, device_max) = self.device_bounds(centre - extent, centre + extent);
        let srgba = colour.to_srgba();
        self.paint(device_min, device_max, |point| {
            (point.distance(centre) < radius).then_some(srgba)
        });
    }
}

/// Restores a canvas's previous transform when dropped.
#[derive(Debug)]
pub struct TransformGuard<'canvas> {
    /// The canvas being drawn on
    canvas: &'canvas mut Canvas,
    /// The transform from before the guard was created
    previous: Affine2,
}

impl std::ops::Deref for TransformGuard<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl std::ops::DerefMut for TransformGuard<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for TransformGuard<'_> {
    fn drop(&mut self) {
        self.canvas.transform = self.previous;
    }
}
