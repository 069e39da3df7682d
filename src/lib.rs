//! # og-compose
//!
//! Composes the 1200×630 OpenGraph share image for the Lumicello site from a
//! product photo, a logo and a few lines of marketing copy.
//!
//! # Pipeline
//!
//! One run, one canvas, six layers drawn in order:
//!
//! ```text
//! 1. Background   flat | two-axis gradient | side tint
//! 2. Product      scaled to fit, soft drop shadow behind it
//! 3. Logo         scaled to width, right-aligned
//! 4. Text         headline lines, subhead, badge pill, detail line
//! 5. Accent bar   solid strip along the bottom edge
//! 6. Encode       RGB8 PNG, best compression
//! ```
//!
//! Missing product or logo files skip their layer; missing fonts fall back to
//! a built-in face. The run only fails when an asset that exists cannot be
//! decoded, the config is invalid, or the output cannot be written.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `og-image.toml` loading, preset layering, validation, stock config |
//! | [`compose`] | The layer procedure: [`compose::render`], [`compose::compose`], [`compose::inspect`] |
//! | [`imaging`] | Canvas, background, shadow, asset decoding and layout math |
//! | [`text`] | Font loading with per-role fallback, text measuring and drawing |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Everything Is Config
//!
//! Colors, offsets, copy and paths all live in [`config::ComposerConfig`].
//! The two layouts the site has used (`hero` and `compact`) are presets over
//! the same procedure rather than two code paths.
//!
//! ## Deterministic Output
//!
//! The same config and the same asset files produce byte-identical PNGs.
//! Nothing reads the clock, the environment or a random source, and the
//! built-in font makes renders independent of what is installed.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling, blur and PNG encoding use the `image` crate; glyph
//! rasterization uses `rusttype`. No system libraries are needed.

pub mod compose;
pub mod config;
pub mod imaging;
pub mod output;
pub mod text;

#[cfg(test)]
pub(crate) mod test_helpers;
