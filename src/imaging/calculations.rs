//! Pure calculation functions for layout and color math.
//!
//! All functions here are pure and testable without any I/O or images.

/// An axis-aligned rectangle in canvas pixels. `x`/`y` may be negative or run
/// past the canvas; drawing clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Smallest rect covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, (right - x) as u32, (bottom - y) as u32)
    }
}

/// Scale `source` uniformly so its longer edge becomes `max_size`.
///
/// Smaller sources are scaled up. Each dimension is truncated and kept at
/// least 1 pixel.
///
/// ```text
/// (400, 400) max 380 → (380, 380)
/// (800, 400) max 380 → (380, 190)
/// ```
pub fn fit_longest_edge(source: (u32, u32), max_size: u32) -> (u32, u32) {
    let (w, h) = source;
    let ratio = max_size as f64 / w.max(h).max(1) as f64;
    (scale_dim(w, ratio), scale_dim(h, ratio))
}

/// Scale `source` uniformly to exactly `width` pixels wide.
pub fn fit_width(source: (u32, u32), width: u32) -> (u32, u32) {
    let (w, h) = source;
    let ratio = width as f64 / w.max(1) as f64;
    (width, scale_dim(h, ratio))
}

fn scale_dim(value: u32, ratio: f64) -> u32 {
    ((value as f64 * ratio) as u32).max(1)
}

/// Top coordinate that centers `extent` within `span` (floor division).
pub fn centered(span: u32, extent: u32) -> i32 {
    (span as i32 - extent as i32).div_euclid(2)
}

/// Truncate a float channel to an integer and clamp it to `0..=255`.
pub fn clamp_channel(value: f32) -> u8 {
    (value as i32).clamp(0, 255) as u8
}

/// Move `from` toward `to` by `t` (0.0 = `from`, 1.0 = `to`), per channel.
///
/// Each channel is truncated, so repeated blends match integer pipelines.
pub fn lerp_rgb(from: [u8; 3], to: [u8; 3], t: f32) -> [u8; 3] {
    let mut out = [0u8; 3];
    for i in 0..3 {
        let a = from[i] as f32;
        out[i] = clamp_channel(a + (to[i] as f32 - a) * t);
    }
    out
}

/// Alpha-composite `src` over `dst` with coverage `alpha` (0.0-1.0).
pub fn blend_over(dst: [u8; 3], src: [u8; 3], alpha: f32) -> [u8; 3] {
    let a = alpha.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for i in 0..3 {
        out[i] = (src[i] as f32 * a + dst[i] as f32 * (1.0 - a)).round() as u8;
    }
    out
}

/// Size of a pill that wraps a `text` box with symmetric `padding`.
pub fn pill_size(text: (u32, u32), padding: [u32; 2]) -> (u32, u32) {
    (text.0 + padding[0] * 2, text.1 + padding[1] * 2)
}

/// Corner radius clamped so opposite corners never overlap.
pub fn clamp_radius(radius: u32, width: u32, height: u32) -> u32 {
    radius.min(width / 2).min(height / 2)
}

/// Whether pixel `(px, py)` lies in `rect` with rounded corners of `radius`.
///
/// Tests the pixel center, so edges are hard (no anti-aliasing).
pub fn rounded_rect_contains(rect: &Rect, radius: u32, px: i32, py: i32) -> bool {
    if !rect.contains(px, py) {
        return false;
    }
    let r = clamp_radius(radius, rect.width, rect.height) as f32;
    if r == 0.0 {
        return true;
    }
    let cx = px as f32 + 0.5;
    let cy = py as f32 + 0.5;
    let left = rect.x as f32 + r;
    let right = rect.right() as f32 - r;
    let top = rect.y as f32 + r;
    let bottom = rect.bottom() as f32 - r;

    let dx = if cx < left {
        left - cx
    } else if cx > right {
        cx - right
    } else {
        return true;
    };
    let dy = if cy < top {
        top - cy
    } else if cy > bottom {
        cy - bottom
    } else {
        return true;
    };
    dx * dx + dy * dy <= r * r
}
