//! Shared test utilities for the og-compose test suite.
//!
//! Provides synthetic asset writers and a fixture config that never touches
//! system fonts, so renders are identical on every machine.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let config = fixture_config(tmp.path());
//! write_test_png(&config.product.path, 400, 400, false);
//! let composition = render(&config).unwrap();
//! ```

use crate::config::{ComposerConfig, FontSpec};
use image::{ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// Synthetic assets
// =========================================================================

/// Write a PNG with a position-dependent pattern.
///
/// With `alpha`, the left half is fully transparent and the right half opaque.
pub fn write_test_png(path: &Path, width: u32, height: u32, alpha: bool) {
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::png::PngEncoder::new(writer);
    if alpha {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            let a = if x < width / 2 { 0 } else { 255 };
            Rgba([(x % 256) as u8, (y % 256) as u8, 200, a])
        });
        encoder
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
            .unwrap();
    } else {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        encoder
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
    }
}

/// Write bytes that carry a PNG extension but no image.
pub fn write_corrupt_file(path: &Path) {
    std::fs::write(path, b"\x89PNG\r\n\x1a\nthis is not really a png").unwrap();
}

// =========================================================================
// Fixture config
// =========================================================================

/// Stock `hero` config with every path inside `dir` and fonts pointing at
/// files that do not exist, forcing the built-in face.
///
/// No asset files are written; add them with [`write_test_png`].
pub fn fixture_config(dir: &Path) -> ComposerConfig {
    let mut config = ComposerConfig::default();
    config.output = dir.join("og-image.png");
    config.product.path = dir.join("product.png");
    config.logo.path = dir.join("logo.png");
    let missing = |name: &str, size: f32| FontSpec {
        path: dir.join("fonts").join(name),
        size,
    };
    config.fonts.headline = missing("headline.ttf", 52.0);
    config.fonts.subhead = missing("subhead.ttf", 24.0);
    config.fonts.badge = missing("badge.ttf", 16.0);
    config.fonts.detail = missing("detail.ttf", 18.0);
    config
}
