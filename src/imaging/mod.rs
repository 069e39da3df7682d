//! Raster operations in pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode assets (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Shadow blur | `image::imageops::blur` |
//! | Encode | `PngEncoder`, best compression |
//!
//! The module is split into:
//! - **Calculations**: pure functions for dimension and color math (unit testable)
//! - **Canvas**: the RGB buffer and its drawing primitives
//! - **Background / Shadow**: generated layers
//! - **Assets**: optional source image loading and resizing

pub mod assets;
pub mod background;
pub mod calculations;
pub mod canvas;
pub mod shadow;

pub use calculations::Rect;
pub use canvas::Canvas;
