//! Background fills.
//!
//! Each style builds the whole buffer in one `RgbImage::from_fn` pass.
//! Channels are truncated after every blend step.

use super::calculations::lerp_rgb;
use crate::config::{BackgroundConfig, BackgroundStyle, ColorConfig};
use image::{Rgb, RgbImage};

pub fn render_background(
    width: u32,
    height: u32,
    background: &BackgroundConfig,
    colors: &ColorConfig,
) -> RgbImage {
    let base = colors.background.0;
    match background.style {
        BackgroundStyle::Flat => RgbImage::from_pixel(width, height, Rgb(base)),
        BackgroundStyle::Gradient => {
            let h_tint = colors.tint_horizontal.0;
            let v_tint = colors.tint_vertical.0;
            RgbImage::from_fn(width, height, |x, y| {
                let fx = x as f32 / width as f32;
                let fy = y as f32 / height as f32;
                let across = lerp_rgb(base, h_tint, fx * background.horizontal_strength);
                Rgb(lerp_rgb(across, v_tint, fy * background.vertical_strength))
            })
        }
        BackgroundStyle::SideTint => {
            let third = (width / 3).max(1);
            let right_start = width * 2 / 3;
            let warm = colors.tint_vertical.0;
            let cool = colors.tint_horizontal.0;
            RgbImage::from_fn(width, height, |x, _| {
                let mut px = base;
                if x < width / 3 {
                    let alpha = background.left_tint_strength * (1.0 - x as f32 / third as f32);
                    px = lerp_rgb(px, warm, alpha);
                }
                if x >= right_start {
                    let alpha = background.right_tint_strength
                        * ((x - right_start) as f32 / third as f32);
                    px = lerp_rgb(px, cool, alpha);
                }
                Rgb(px)
            })
        }
    }
}
