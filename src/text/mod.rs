//! Text rendering: font loading, measuring and drawing.
//!
//! Each text role (headline, subhead, badge, detail) gets its own
//! [`Typeface`]. Loading never fails: an unreadable or unparsable font file
//! falls back to the built-in [`bitmap`] face and records why in
//! [`FontOrigin::Builtin`].
//!
//! | Face | Crate / function |
//! |---|---|
//! | Outline (TTF/OTF) | `rusttype::Font::layout`, coverage blended per pixel |
//! | Built-in | 5×7 bitmap table, integer scaled |
//!
//! Coordinates passed to [`Typeface::draw`] are the top-left of the line box:
//! outline glyphs sit on a baseline one ascent below `y`.

pub mod bitmap;

use crate::config::{FontSpec, FontsConfig};
use crate::imaging::Canvas;
use bitmap::BitmapFace;
use image::Rgb;
use rusttype::{Font, PositionedGlyph, Scale, point};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
enum FontError {
    #[error("{}: not found", .0.display())]
    NotFound(PathBuf),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: not a usable font file", .0.display())]
    Parse(PathBuf),
}

/// Ink box of a line of text relative to its drawing origin. `right` and
/// `bottom` are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBounds {
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Where a typeface came from.
#[derive(Debug, Clone, PartialEq)]
pub enum FontOrigin {
    File(PathBuf),
    Builtin { reason: String },
}

enum Face {
    Outline(Font<'static>),
    Bitmap(BitmapFace),
}

/// A loaded font at a fixed pixel size.
pub struct Typeface {
    face: Face,
    size: f32,
    origin: FontOrigin,
}

fn read_font(path: &Path) -> Result<Font<'static>, FontError> {
    if !path.exists() {
        return Err(FontError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| FontError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| FontError::Parse(path.to_path_buf()))
}

impl Typeface {
    /// Load `spec`, falling back to the built-in face on any failure.
    pub fn load(spec: &FontSpec) -> Self {
        match read_font(&spec.path) {
            Ok(font) => Self {
                face: Face::Outline(font),
                size: spec.size,
                origin: FontOrigin::File(spec.path.clone()),
            },
            Err(e) => Self::builtin(spec.size, e.to_string()),
        }
    }

    pub fn builtin(size: f32, reason: impl Into<String>) -> Self {
        Self {
            face: Face::Bitmap(BitmapFace::for_size(size)),
            size,
            origin: FontOrigin::Builtin {
                reason: reason.into(),
            },
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn origin(&self) -> &FontOrigin {
        &self.origin
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.origin, FontOrigin::Builtin { .. })
    }

    fn layout(
        font: &Font<'static>,
        size: f32,
        x: f32,
        y: f32,
        text: &str,
    ) -> Vec<PositionedGlyph<'static>> {
        let scale = Scale::uniform(size);
        let ascent = font.v_metrics(scale).ascent;
        font.layout(text, scale, point(x, y + ascent)).collect()
    }

    /// Ink box of `text` drawn at the origin.
    pub fn measure(&self, text: &str) -> TextBounds {
        match &self.face {
            Face::Bitmap(face) => face.measure(text),
            Face::Outline(font) => {
                let mut bounds: Option<TextBounds> = None;
                for glyph in Self::layout(font, self.size, 0.0, 0.0, text) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    let b = bounds.get_or_insert(TextBounds {
                        left: bb.min.x,
                        top: bb.min.y,
                        right: bb.max.x,
                        bottom: bb.max.y,
                    });
                    b.left = b.left.min(bb.min.x);
                    b.top = b.top.min(bb.min.y);
                    b.right = b.right.max(bb.max.x);
                    b.bottom = b.bottom.max(bb.max.y);
                }
                bounds.unwrap_or_default()
            }
        }
    }

    /// Draw `text` with its line box at `(x, y)`.
    pub fn draw(&self, canvas: &mut Canvas, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        match &self.face {
            Face::Bitmap(face) => face.draw(canvas, x, y, text, color),
            Face::Outline(font) => {
                for glyph in Self::layout(font, self.size, x as f32, y as f32, text) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        let (px, py) = (bb.min.x + gx as i32, bb.min.y + gy as i32);
                        canvas.blend_pixel(px, py, color, coverage);
                    });
                }
            }
        }
    }

    /// Draw `text` so its ink box starts exactly at `(x, y)`.
    pub fn draw_ink_at(&self, canvas: &mut Canvas, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        let bounds = self.measure(text);
        self.draw(canvas, x - bounds.left, y - bounds.top, text, color);
    }
}

/// One typeface per text role.
pub struct FontSet {
    pub headline: Typeface,
    pub subhead: Typeface,
    pub badge: Typeface,
    pub detail: Typeface,
}

impl FontSet {
    pub fn load(fonts: &FontsConfig) -> Self {
        Self {
            headline: Typeface::load(&fonts.headline),
            subhead: Typeface::load(&fonts.subhead),
            badge: Typeface::load(&fonts.badge),
            detail: Typeface::load(&fonts.detail),
        }
    }

    pub fn roles(&self) -> [(&'static str, &Typeface); 4] {
        [
            ("headline", &self.headline),
            ("subhead", &self.subhead),
            ("badge", &self.badge),
            ("detail", &self.detail),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(path: &Path, size: f32) -> FontSpec {
        FontSpec {
            path: path.to_path_buf(),
            size,
        }
    }

    #[test]
    fn missing_font_falls_back_to_builtin() {
        let face = Typeface::load(&spec(Path::new("/nonexistent/font.ttf"), 24.0));
        assert!(face.is_builtin());
        assert_eq!(face.size(), 24.0);
        match face.origin() {
            FontOrigin::Builtin { reason } => assert!(reason.contains("not found")),
            other => panic!("expected builtin origin, got {other:?}"),
        }
    }

    #[test]
    fn garbage_font_file_falls_back_to_builtin() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.ttf");
        fs::write(&path, b"definitely not a font").unwrap();
        let face = Typeface::load(&spec(&path, 16.0));
        match face.origin() {
            FontOrigin::Builtin { reason } => assert!(reason.contains("not a usable font")),
            other => panic!("expected builtin origin, got {other:?}"),
        }
    }

    #[test]
    fn font_set_loads_each_role_independently() {
        let fonts = FontsConfig {
            headline: spec(Path::new("/nonexistent/a.ttf"), 52.0),
            subhead: spec(Path::new("/nonexistent/b.ttf"), 24.0),
            badge: spec(Path::new("/nonexistent/c.ttf"), 16.0),
            detail: spec(Path::new("/nonexistent/d.ttf"), 18.0),
        };
        let set = FontSet::load(&fonts);
        let roles: Vec<&str> = set.roles().iter().map(|(r, _)| *r).collect();
        assert_eq!(roles, ["headline", "subhead", "badge", "detail"]);
        assert!(set.roles().iter().all(|(_, f)| f.is_builtin()));
        assert_eq!(set.headline.size(), 52.0);
    }

    #[test]
    fn builtin_measure_grows_with_text() {
        let face = Typeface::builtin(16.0, "test");
        let short = face.measure("LUMIBOX");
        let long = face.measure("LUMIBOX EXTRA");
        assert!(long.width() > short.width());
        assert_eq!(long.height(), short.height());
    }

    #[test]
    fn empty_text_has_empty_bounds() {
        let face = Typeface::builtin(16.0, "test");
        assert!(face.measure("").is_empty());
    }

    const SYSTEM_BADGE_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

    /// The stock badge font, or `None` on machines without DejaVu.
    fn system_face(size: f32) -> Option<Typeface> {
        let path = Path::new(SYSTEM_BADGE_FONT);
        if !path.exists() {
            eprintln!("skipping: {SYSTEM_BADGE_FONT} not installed");
            return None;
        }
        Some(Typeface::load(&spec(path, size)))
    }

    #[test]
    fn outline_font_loads_from_file() {
        let Some(face) = system_face(16.0) else {
            return;
        };
        assert!(!face.is_builtin());
        assert_eq!(face.origin(), &FontOrigin::File(PathBuf::from(SYSTEM_BADGE_FONT)));
    }

    #[test]
    fn outline_measure_grows_with_text() {
        let Some(face) = system_face(16.0) else {
            return;
        };
        let short = face.measure("LUMIBOX");
        let long = face.measure("LUMIBOX EXTRA");
        assert!(!short.is_empty());
        assert!(long.width() > short.width());
    }

    #[test]
    fn outline_ink_stays_inside_measured_box() {
        let Some(face) = system_face(16.0) else {
            return;
        };
        let bg = Rgb([0, 0, 0]);
        let mut canvas = Canvas::new(200, 40, bg);
        let bounds = face.measure("LUMIBOX");
        face.draw_ink_at(&mut canvas, 10, 10, "LUMIBOX", Rgb([255, 255, 255]));

        let mut inked = 0;
        for (x, y, px) in canvas.as_image().enumerate_pixels() {
            if *px != bg {
                inked += 1;
                let (x, y) = (x as i32, y as i32);
                assert!((10..10 + bounds.width() as i32).contains(&x), "x {x}");
                assert!((10..10 + bounds.height() as i32).contains(&y), "y {y}");
            }
        }
        assert!(inked > 0);
    }

    #[test]
    fn draw_ink_at_places_ink_box_at_point() {
        let face = Typeface::builtin(10.0, "test");
        let mut canvas = Canvas::new(30, 20, Rgb([0, 0, 0]));
        face.draw_ink_at(&mut canvas, 4, 5, "I", Rgb([255, 255, 255]));
        // Middle column of 'I' at x = 4 + 2, rows 5..12.
        assert_eq!(canvas.as_image().get_pixel(6, 5).0, [255, 255, 255]);
        assert_eq!(canvas.as_image().get_pixel(6, 11).0, [255, 255, 255]);
        assert_eq!(canvas.as_image().get_pixel(6, 12).0, [0, 0, 0]);
    }
}
