//! Soft drop shadow for the product layer.
//!
//! The shadow is a translucent rounded rect on a transparent RGBA layer,
//! Gaussian-blurred with `image::imageops::blur` and then composited under
//! the product.

use super::calculations::{Rect, rounded_rect_contains};
use crate::config::{Color, ShadowConfig};
use image::{Rgba, RgbaImage};

/// A rendered shadow layer and where it goes on the canvas.
#[derive(Debug, Clone)]
pub struct ShadowLayer {
    pub image: RgbaImage,
    pub x: i32,
    pub y: i32,
}

impl ShadowLayer {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.image.width(), self.image.height())
    }
}

/// Build the shadow for a product placed at `product`.
///
/// The shape is `grow` pixels wider and taller than the product and sits
/// `margin` pixels inside a transparent layer, so the layer is
/// `product + grow + 2 * margin` on each axis. With the stock values and a
/// 380 px product that is a 420 px layer at `(x - 10, y + 10)`.
pub fn render_shadow(product: &Rect, shadow: &ShadowConfig, color: Color) -> ShadowLayer {
    let shape_width = product.width + shadow.grow;
    let shape_height = product.height + shadow.grow;
    let width = shape_width + 2 * shadow.margin;
    let height = shape_height + 2 * shadow.margin;
    let shape = Rect::new(
        shadow.margin as i32,
        shadow.margin as i32,
        shape_width,
        shape_height,
    );

    let [r, g, b] = color.0;
    // Transparent pixels carry the shadow color; blurring only spreads alpha.
    let mut layer = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0]));
    for (x, y, px) in layer.enumerate_pixels_mut() {
        if rounded_rect_contains(&shape, shadow.corner_radius, x as i32, y as i32) {
            *px = Rgba([r, g, b, shadow.opacity]);
        }
    }

    let image = if shadow.blur > 0.0 {
        image::imageops::blur(&layer, shadow.blur)
    } else {
        layer
    };

    ShadowLayer {
        image,
        x: product.x - shadow.margin as i32 + shadow.offset[0],
        y: product.y - shadow.margin as i32 + shadow.offset[1],
    }
}
