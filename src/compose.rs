//! The composition procedure.
//!
//! Layers go onto one canvas in a fixed order:
//!
//! ```text
//! background → product shadow → product → logo → text + badge → accent bar → PNG
//! ```
//!
//! [`render`] does everything but the write and returns the canvas with a
//! [`LayerSummary`]; [`compose`] renders and then writes `config.output`.
//!
//! ## Failure semantics
//!
//! | Condition | Outcome |
//! |---|---|
//! | Product or logo file absent | layer skipped, [`LayerOutcome::Skipped`] |
//! | Font file absent or unparsable | built-in face, [`FontOrigin::Builtin`] |
//! | Asset present but undecodable | [`ComposeError::Decode`] |
//! | Output cannot be created or written | [`ComposeError::Write`] / [`ComposeError::Encode`] |
//!
//! Paths are used as given; [`config`](crate::config) loading resolves
//! relative ones beforehand.

use crate::config::{BackgroundStyle, ComposerConfig, ConfigError};
use crate::imaging::assets::{is_present, load_optional, resize_longest_edge, resize_to_width};
use crate::imaging::background::render_background;
use crate::imaging::calculations::{centered, pill_size};
use crate::imaging::shadow::render_shadow;
use crate::imaging::{Canvas, Rect};
use crate::text::{FontOrigin, FontSet, TextBounds, Typeface};
use image::DynamicImage;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// What happened to an optional image layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerOutcome {
    Placed { source: PathBuf, rect: Rect },
    Skipped { source: PathBuf },
}

impl LayerOutcome {
    pub fn rect(&self) -> Option<Rect> {
        match self {
            LayerOutcome::Placed { rect, .. } => Some(*rect),
            LayerOutcome::Skipped { .. } => None,
        }
    }
}

/// Final size and position of the badge pill.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeGeometry {
    pub label: String,
    pub rect: Rect,
    /// Measured ink box of the label.
    pub text: TextBounds,
    pub padding: [u32; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontReport {
    pub role: &'static str,
    pub size: f32,
    pub origin: FontOrigin,
}

impl FontReport {
    fn from_set(fonts: &FontSet) -> Vec<FontReport> {
        fonts
            .roles()
            .into_iter()
            .map(|(role, face)| FontReport {
                role,
                size: face.size(),
                origin: face.origin().clone(),
            })
            .collect()
    }
}

/// Everything a render decided, minus the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSummary {
    pub width: u32,
    pub height: u32,
    pub background: BackgroundStyle,
    pub product: LayerOutcome,
    /// Canvas area covered by the product shadow layer, when drawn.
    pub shadow: Option<Rect>,
    pub logo: LayerOutcome,
    /// `None` when the badge label is empty.
    pub badge: Option<BadgeGeometry>,
    pub accent_bar: Rect,
    pub fonts: Vec<FontReport>,
}

/// A finished canvas that has not been written yet.
#[derive(Debug, Clone)]
pub struct Composition {
    pub canvas: Canvas,
    pub summary: LayerSummary,
}

/// Result of a successful [`compose`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeReport {
    pub output: PathBuf,
    /// Size of the written PNG.
    pub bytes: u64,
    pub summary: LayerSummary,
}

/// Whether an optional asset exists on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCheck {
    pub path: PathBuf,
    pub present: bool,
}

impl AssetCheck {
    fn at(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            present: is_present(path),
        }
    }
}

/// Result of [`inspect`]: what a render would find, without rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub product: AssetCheck,
    pub logo: AssetCheck,
    pub fonts: Vec<FontReport>,
    pub output: PathBuf,
    pub output_dir_exists: bool,
}

fn load_asset(path: &Path) -> Result<Option<DynamicImage>, ComposeError> {
    load_optional(path).map_err(|source| ComposeError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn place_product(
    canvas: &mut Canvas,
    config: &ComposerConfig,
) -> Result<(LayerOutcome, Option<Rect>), ComposeError> {
    let spec = &config.product;
    let Some(source) = load_asset(&spec.path)? else {
        return Ok((
            LayerOutcome::Skipped {
                source: spec.path.clone(),
            },
            None,
        ));
    };
    let product = resize_longest_edge(&source, spec.max_size);
    drop(source);

    let y = spec
        .y
        .unwrap_or_else(|| centered(canvas.height(), product.height()));
    let rect = Rect::new(spec.x, y, product.width(), product.height());

    let shadow = spec.shadow.enabled.then(|| {
        let layer = render_shadow(&rect, &spec.shadow, config.colors.shadow);
        canvas.overlay_rgba(&layer.image, layer.x, layer.y);
        layer.bounds()
    });
    canvas.paste(&product, rect.x, rect.y);

    Ok((
        LayerOutcome::Placed {
            source: spec.path.clone(),
            rect,
        },
        shadow,
    ))
}

fn place_logo(canvas: &mut Canvas, config: &ComposerConfig) -> Result<LayerOutcome, ComposeError> {
    let spec = &config.logo;
    let Some(source) = load_asset(&spec.path)? else {
        return Ok(LayerOutcome::Skipped {
            source: spec.path.clone(),
        });
    };
    let logo = resize_to_width(&source, spec.width);
    let x = canvas.width() as i32 - logo.width() as i32 - spec.margin_right;
    let rect = Rect::new(x, spec.y, logo.width(), logo.height());
    canvas.paste(&logo, rect.x, rect.y);
    Ok(LayerOutcome::Placed {
        source: spec.path.clone(),
        rect,
    })
}

/// Measure the label, size the pill around it, and draw both.
fn draw_badge(canvas: &mut Canvas, config: &ComposerConfig, face: &Typeface) -> Option<BadgeGeometry> {
    let badge = &config.badge;
    if badge.label.is_empty() {
        return None;
    }
    let text = face.measure(&badge.label);
    let (width, height) = pill_size((text.width(), text.height()), badge.padding);
    let rect = Rect::new(config.text.x, badge.y, width, height);

    canvas.fill_rounded_rect(rect, badge.corner_radius, config.colors.badge_fill.rgb());
    face.draw_ink_at(
        canvas,
        rect.x + badge.padding[0] as i32,
        rect.y + badge.padding[1] as i32,
        &badge.label,
        config.colors.badge_text.rgb(),
    );

    Some(BadgeGeometry {
        label: badge.label.clone(),
        rect,
        text,
        padding: badge.padding,
    })
}

fn draw_text(canvas: &mut Canvas, config: &ComposerConfig, fonts: &FontSet) -> Option<BadgeGeometry> {
    let text = &config.text;
    let colors = &config.colors;

    for (i, line) in text.headline.iter().enumerate() {
        let y = text.headline_y + i as i32 * text.headline_line_height;
        fonts
            .headline
            .draw(canvas, text.x, y, line, colors.text_primary.rgb());
    }
    fonts.subhead.draw(
        canvas,
        text.x,
        text.subhead_y,
        &text.subhead,
        colors.text_secondary.rgb(),
    );

    let badge = draw_badge(canvas, config, &fonts.badge);

    let (detail_x, detail_y) = match &badge {
        Some(b) => (
            b.rect.right() + text.detail_gap,
            b.rect.y + b.padding[1] as i32,
        ),
        None => (text.x, config.badge.y),
    };
    fonts.detail.draw(
        canvas,
        detail_x,
        detail_y,
        &text.detail,
        colors.text_secondary.rgb(),
    );

    badge
}

fn accent_bar_rect(config: &ComposerConfig) -> Rect {
    let bar = config.accent_bar.height;
    Rect::new(
        0,
        (config.canvas.height - bar) as i32,
        config.canvas.width,
        bar,
    )
}

/// Compose the image in memory.
pub fn render(config: &ComposerConfig) -> Result<Composition, ComposeError> {
    config.validate()?;
    let (width, height) = (config.canvas.width, config.canvas.height);

    let mut canvas = Canvas::from_image(render_background(
        width,
        height,
        &config.background,
        &config.colors,
    ));
    let fonts = FontSet::load(&config.fonts);

    let (product, shadow) = place_product(&mut canvas, config)?;
    let logo = place_logo(&mut canvas, config)?;
    let badge = draw_text(&mut canvas, config, &fonts);

    let accent_bar = accent_bar_rect(config);
    canvas.fill_rect(accent_bar, config.colors.accent.rgb());

    Ok(Composition {
        canvas,
        summary: LayerSummary {
            width,
            height,
            background: config.background.style,
            product,
            shadow,
            logo,
            badge,
            accent_bar,
            fonts: FontReport::from_set(&fonts),
        },
    })
}

/// Encode `canvas` to `path` and return the written size in bytes.
///
/// The parent directory must exist.
pub fn write_png(canvas: &Canvas, path: &Path) -> Result<u64, ComposeError> {
    let write_err = |source: std::io::Error| ComposeError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    canvas
        .write_png(&mut writer)
        .map_err(|source| ComposeError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    writer.flush().map_err(write_err)?;
    drop(writer);
    Ok(fs::metadata(path).map_err(write_err)?.len())
}

/// Render the image and write it to `config.output`.
pub fn compose(config: &ComposerConfig) -> Result<ComposeReport, ComposeError> {
    let Composition { canvas, summary } = render(config)?;
    let bytes = write_png(&canvas, &config.output)?;
    Ok(ComposeReport {
        output: config.output.clone(),
        bytes,
        summary,
    })
}

/// Report which assets and fonts resolve, without rendering or writing.
pub fn inspect(config: &ComposerConfig) -> Result<Inspection, ComposeError> {
    config.validate()?;
    let output_dir_exists = match config.output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.is_dir(),
        _ => true,
    };
    Ok(Inspection {
        product: AssetCheck::at(&config.product.path),
        logo: AssetCheck::at(&config.logo.path),
        fonts: FontReport::from_set(&FontSet::load(&config.fonts)),
        output: config.output.clone(),
        output_dir_exists,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{fixture_config, write_corrupt_file, write_test_png};
    use image::Rgb;

    #[test]
    fn render_without_assets_skips_both_layers() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        let composition = render(&config).unwrap();
        let summary = &composition.summary;
        assert!(matches!(summary.product, LayerOutcome::Skipped { .. }));
        assert!(matches!(summary.logo, LayerOutcome::Skipped { .. }));
        assert_eq!(summary.shadow, None);
        assert_eq!(composition.canvas.width(), 1200);
        assert_eq!(composition.canvas.height(), 630);
    }

    #[test]
    fn product_is_scaled_and_vertically_centered() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        write_test_png(&config.product.path, 400, 400, false);
        let summary = render(&config).unwrap().summary;
        assert_eq!(summary.product.rect(), Some(Rect::new(60, 125, 380, 380)));
        assert_eq!(summary.shadow, Some(Rect::new(50, 135, 420, 420)));
    }

    #[test]
    fn shadow_shows_right_of_and_below_product() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        write_test_png(&config.product.path, 400, 400, false);
        let canvas = render(&config).unwrap().canvas;
        let background = render_background(1200, 630, &config.background, &config.colors);

        // Product covers x 60..440, y 125..505; the shadow shape reaches x 460, y 545.
        for (x, y) in [(450, 315), (300, 530), (300, 540)] {
            let shaded = canvas.as_image().get_pixel(x, y).0;
            let plain = background.get_pixel(x, y).0;
            assert!(
                shaded.iter().zip(plain).all(|(s, p)| *s <= p) && shaded != plain,
                "({x}, {y}) should be darker than the background: {shaded:?} vs {plain:?}"
            );
        }
    }

    #[test]
    fn product_explicit_y_is_used() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = fixture_config(tmp.path());
        config.product.y = Some(30);
        config.product.shadow.enabled = false;
        write_test_png(&config.product.path, 200, 100, false);
        let summary = render(&config).unwrap().summary;
        assert_eq!(summary.product.rect(), Some(Rect::new(60, 30, 380, 190)));
        assert_eq!(summary.shadow, None);
    }

    #[test]
    fn logo_is_right_aligned_at_target_width() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        write_test_png(&config.logo.path, 440, 120, true);
        let summary = render(&config).unwrap().summary;
        // 1200 - 220 - 80 = 900
        assert_eq!(summary.logo.rect(), Some(Rect::new(900, 40, 220, 60)));
    }

    #[test]
    fn logo_alpha_keeps_background_where_transparent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        write_test_png(&config.logo.path, 440, 120, true);
        let with_logo = render(&config).unwrap().canvas;
        std::fs::remove_file(&config.logo.path).unwrap();
        let without_logo = render(&config).unwrap().canvas;

        // Left half of the logo is fully transparent; far right is opaque.
        let inside_clear = (910, 60);
        let inside_opaque = (1110, 60);
        assert_eq!(
            with_logo.as_image().get_pixel(inside_clear.0, inside_clear.1),
            without_logo.as_image().get_pixel(inside_clear.0, inside_clear.1)
        );
        assert_ne!(
            with_logo.as_image().get_pixel(inside_opaque.0, inside_opaque.1),
            without_logo.as_image().get_pixel(inside_opaque.0, inside_opaque.1)
        );
    }

    #[test]
    fn badge_wraps_measured_label_with_padding() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        let badge = render(&config).unwrap().summary.badge.unwrap();
        assert_eq!(badge.rect.x, 500);
        assert_eq!(badge.rect.y, 375);
        assert_eq!(badge.rect.width, badge.text.width() + 32);
        assert_eq!(badge.rect.height, badge.text.height() + 16);
    }

    #[test]
    fn badge_pill_is_filled_with_badge_color() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        let composition = render(&config).unwrap();
        let rect = composition.summary.badge.unwrap().rect;
        // Inside the left padding, vertically centered: pill fill, never label ink.
        let px = composition
            .canvas
            .as_image()
            .get_pixel((rect.x + 8) as u32, (rect.y + rect.height as i32 / 2) as u32);
        assert_eq!(*px, config.colors.badge_fill.rgb());
    }

    #[test]
    fn empty_badge_label_draws_no_pill() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = fixture_config(tmp.path());
        config.badge.label.clear();
        assert_eq!(render(&config).unwrap().summary.badge, None);
    }

    #[test]
    fn accent_bar_rows_are_exact_accent_color() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        write_test_png(&config.product.path, 400, 400, false);
        let composition = render(&config).unwrap();
        let accent = config.colors.accent.rgb();
        let img = composition.canvas.as_image();
        for y in 622..630 {
            for x in 0..1200 {
                assert_eq!(*img.get_pixel(x, y), accent, "pixel ({x}, {y})");
            }
        }
        assert_ne!(*img.get_pixel(0, 621), accent);
    }

    #[test]
    fn fonts_report_builtin_fallback() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        let summary = render(&config).unwrap().summary;
        assert_eq!(summary.fonts.len(), 4);
        assert!(
            summary
                .fonts
                .iter()
                .all(|f| matches!(f.origin, FontOrigin::Builtin { .. }))
        );
    }

    #[test]
    fn corrupt_product_is_fatal_and_names_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        write_corrupt_file(&config.product.path);
        let err = render(&config).unwrap_err();
        assert!(matches!(err, ComposeError::Decode { .. }));
        assert!(err.to_string().contains("product.png"));
    }

    #[test]
    fn invalid_config_is_rejected_before_rendering() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = fixture_config(tmp.path());
        config.canvas.width = 0;
        assert!(matches!(render(&config), Err(ComposeError::Config(_))));
    }

    #[test]
    fn compose_reports_written_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        let report = compose(&config).unwrap();
        assert_eq!(report.output, config.output);
        assert_eq!(report.bytes, std::fs::metadata(&config.output).unwrap().len());
        assert!(report.bytes > 0);
    }

    #[test]
    fn write_png_missing_directory_is_write_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let canvas = Canvas::new(4, 4, Rgb([0, 0, 0]));
        let path = tmp.path().join("missing").join("out.png");
        let err = write_png(&canvas, &path).unwrap_err();
        assert!(matches!(err, ComposeError::Write { .. }));
        assert!(err.to_string().contains("out.png"));
    }

    #[test]
    fn inspect_and_render_agree_on_directory_asset() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = fixture_config(tmp.path());
        std::fs::create_dir(&config.product.path).unwrap();
        assert!(inspect(&config).unwrap().product.present);
        assert!(matches!(render(&config), Err(ComposeError::Decode { .. })));
    }

    #[test]
    fn inspect_reports_assets_and_output_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = fixture_config(tmp.path());
        write_test_png(&config.logo.path, 10, 10, true);
        config.output = tmp.path().join("nested").join("og.png");
        let inspection = inspect(&config).unwrap();
        assert!(!inspection.product.present);
        assert!(inspection.logo.present);
        assert!(!inspection.output_dir_exists);
        assert_eq!(inspection.fonts.len(), 4);
    }
}
