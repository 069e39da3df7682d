//! The mutable RGB raster every layer draws into.
//!
//! ## Operation mapping
//!
//! | Operation | Implementation |
//! |---|---|
//! | Solid / rounded fills | per-pixel coverage test from [`calculations`](super::calculations) |
//! | Opaque paste | `image::imageops::replace` |
//! | Alpha paste | source alpha used as the mask, blended per pixel |
//! | Encode | `image::codecs::png::PngEncoder`, best compression, adaptive filter |
//!
//! Every drawing call clips to the canvas bounds, so layers may hang off the
//! edges.

use super::calculations::{Rect, blend_over, rounded_rect_contains};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ImageEncoder, ImageResult, Rgb, RgbImage, RgbaImage};
use std::io::Write;

#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// A `width × height` canvas filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, fill),
        }
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// Intersect `rect` with the canvas, as `(x0, y0, x1, y1)` exclusive bounds.
    fn clip(&self, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(self.width() as i32);
        let y1 = rect.bottom().min(self.height() as i32);
        (x0 < x1 && y0 < y1).then_some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb<u8>) {
        let Some((x0, y0, x1, y1)) = self.clip(&rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: u32, color: Rgb<u8>) {
        let Some((x0, y0, x1, y1)) = self.clip(&rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                if rounded_rect_contains(&rect, radius, x as i32, y as i32) {
                    self.image.put_pixel(x, y, color);
                }
            }
        }
    }

    /// Blend `color` into one pixel with `coverage` (0.0-1.0). Off-canvas
    /// coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        if coverage <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        dst.0 = blend_over(dst.0, color.0, coverage);
    }

    /// Composite an RGBA layer at `(x, y)` using its own alpha as the mask.
    pub fn overlay_rgba(&mut self, layer: &RgbaImage, x: i32, y: i32) {
        for (lx, ly, px) in layer.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            if a == 0 {
                continue;
            }
            self.blend_pixel(
                x + lx as i32,
                y + ly as i32,
                Rgb([r, g, b]),
                a as f32 / 255.0,
            );
        }
    }

    /// Paste an image at `(x, y)`.
    ///
    /// Sources with an alpha channel composite through it; opaque sources
    /// replace the covered pixels.
    pub fn paste(&mut self, source: &DynamicImage, x: i32, y: i32) {
        if source.color().has_alpha() {
            self.overlay_rgba(&source.to_rgba8(), x, y);
        } else {
            image::imageops::replace(&mut self.image, &source.to_rgb8(), x as i64, y as i64);
        }
    }

    /// Encode as an RGB8 PNG with maximum compression.
    pub fn write_png<W: Write>(&self, writer: W) -> ImageResult<()> {
        let encoder =
            PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilter::Adaptive);
        encoder.write_image(
            self.image.as_raw(),
            self.width(),
            self.height(),
            image::ExtendedColorType::Rgb8,
        )
    }
}
