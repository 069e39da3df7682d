//! Composer configuration module.
//!
//! Every literal the image depends on (canvas size, colors, asset paths,
//! layout offsets, fonts and text content) lives in [`ComposerConfig`] and can
//! be overridden from an `og-image.toml` file.
//!
//! ## Layering
//!
//! ```text
//! preset defaults  (hero | compact)
//!        ↓ merge_toml
//! og-image.toml    (sparse user overrides)
//!        ↓ deserialize + validate
//! ComposerConfig
//! ```
//!
//! The `preset` key picks the base layer. `hero` is the large-product layout
//! with the two-axis gradient and drop shadow; `compact` is the smaller,
//! flat-background variant. User files only name the keys they change:
//!
//! ```toml
//! preset = "compact"
//!
//! [badge]
//! label = "LUMIBOX EXTRA"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Relative paths are resolved
//! against the directory holding the config file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "og-image.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
}

// =============================================================================
// Colors
// =============================================================================

/// An opaque sRGB color, written as `#RRGGBB` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn rgb(self) -> image::Rgb<u8> {
        image::Rgb(self.0)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color {s:?}, expected #RRGGBB"));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

/// Named color roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Base canvas color.
    pub background: Color,
    /// Headline text.
    pub text_primary: Color,
    /// Subheadline and detail text.
    pub text_secondary: Color,
    /// Bottom accent bar.
    pub accent: Color,
    /// Badge pill fill.
    pub badge_fill: Color,
    /// Badge label.
    pub badge_text: Color,
    /// Tint blended in along the horizontal axis.
    pub tint_horizontal: Color,
    /// Tint blended in along the vertical axis.
    pub tint_vertical: Color,
    /// Product drop shadow.
    pub shadow: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: Color::new(0xF9, 0xF8, 0xF4),
            text_primary: Color::new(0x1A, 0x2B, 0x4C),
            text_secondary: Color::new(0x5E, 0x6A, 0x71),
            accent: Color::new(0xF2, 0xC9, 0x4C),
            badge_fill: Color::new(0x1A, 0x2B, 0x4C),
            badge_text: Color::new(0xFF, 0xFF, 0xFF),
            tint_horizontal: Color::new(0xE6, 0xEB, 0xE6),
            tint_vertical: Color::new(0xF0, 0xE6, 0xDD),
            shadow: Color::new(0x1A, 0x2B, 0x4C),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Named stock-defaults layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Large product, two-axis gradient, soft shadow.
    #[default]
    Hero,
    /// Smaller product and headline on a flat background.
    Compact,
}

impl Preset {
    pub fn defaults(self) -> ComposerConfig {
        match self {
            Preset::Hero => ComposerConfig::default(),
            Preset::Compact => ComposerConfig::compact(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundStyle {
    /// Base color only.
    Flat,
    /// Horizontal blend toward `tint_horizontal`, then vertical toward `tint_vertical`.
    Gradient,
    /// Left third warmed toward `tint_vertical`, right third toward `tint_horizontal`.
    SideTint,
}

impl fmt::Display for BackgroundStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackgroundStyle::Flat => "flat",
            BackgroundStyle::Gradient => "gradient",
            BackgroundStyle::SideTint => "side-tint",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    pub style: BackgroundStyle,
    /// Weight of the horizontal tint at the right edge (0.0-1.0).
    pub horizontal_strength: f32,
    /// Weight of the vertical tint at the bottom edge (0.0-1.0).
    pub vertical_strength: f32,
    /// `side-tint` only: weight of `tint_vertical` at the left edge.
    pub left_tint_strength: f32,
    /// `side-tint` only: weight of `tint_horizontal` at the right edge.
    pub right_tint_strength: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            style: BackgroundStyle::Gradient,
            horizontal_strength: 0.3,
            vertical_strength: 0.15,
            left_tint_strength: 0.15,
            right_tint_strength: 0.1,
        }
    }
}

/// Soft shadow drawn behind the product image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadowConfig {
    pub enabled: bool,
    /// How much wider and taller the shadow shape is than the product.
    pub grow: u32,
    /// Transparent border around the shape inside the blurred layer.
    pub margin: u32,
    /// `[x, y]` shift of the layer relative to `(product.x - margin, product.y - margin)`.
    pub offset: [i32; 2],
    pub corner_radius: u32,
    /// Gaussian blur sigma.
    pub blur: f32,
    /// Shadow alpha (0-255).
    pub opacity: u8,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            grow: 20,
            margin: 10,
            offset: [0, 20],
            corner_radius: 20,
            blur: 15.0,
            opacity: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductConfig {
    pub path: PathBuf,
    /// Longest edge after scaling.
    pub max_size: u32,
    pub x: i32,
    /// Top edge; omitted means vertically centered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    pub shadow: ShadowConfig,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/images/lumibox/box_0-2.webp"),
            max_size: 380,
            x: 60,
            y: None,
            shadow: ShadowConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoConfig {
    pub path: PathBuf,
    /// Target width; height follows the aspect ratio.
    pub width: u32,
    /// Distance from the logo's right edge to the canvas's right edge.
    pub margin_right: i32,
    pub y: i32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/images/lumicello_logo.png"),
            width: 220,
            margin_right: 80,
            y: 40,
        }
    }
}

/// A font file and its pixel size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontSpec {
    pub path: PathBuf,
    pub size: f32,
}

impl FontSpec {
    fn new(path: &str, size: f32) -> Self {
        Self {
            path: PathBuf::from(path),
            size,
        }
    }
}

const DEJAVU_DIR: &str = "/usr/share/fonts/truetype/dejavu";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    pub headline: FontSpec,
    pub subhead: FontSpec,
    pub badge: FontSpec,
    pub detail: FontSpec,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            headline: FontSpec::new(&format!("{DEJAVU_DIR}/DejaVuSerif-Bold.ttf"), 52.0),
            subhead: FontSpec::new(&format!("{DEJAVU_DIR}/DejaVuSans.ttf"), 24.0),
            badge: FontSpec::new(&format!("{DEJAVU_DIR}/DejaVuSans-Bold.ttf"), 16.0),
            detail: FontSpec::new(&format!("{DEJAVU_DIR}/DejaVuSans.ttf"), 18.0),
        }
    }
}

impl FontsConfig {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FontSpec)> {
        [
            ("headline", &self.headline),
            ("subhead", &self.subhead),
            ("badge", &self.badge),
            ("detail", &self.detail),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// Left edge shared by the headline, subheadline and badge.
    pub x: i32,
    pub headline: Vec<String>,
    pub headline_y: i32,
    pub headline_line_height: i32,
    pub subhead: String,
    pub subhead_y: i32,
    /// Small line drawn to the right of the badge.
    pub detail: String,
    /// Gap between the badge's right edge and the detail line.
    pub detail_gap: i32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            x: 500,
            headline: vec!["Play designed for".to_string(), "every milestone".to_string()],
            headline_y: 180,
            headline_line_height: 60,
            subhead: "Montessori-inspired kits for ages 0-12 months".to_string(),
            subhead_y: 325,
            detail: "18 developmental toys in each box".to_string(),
            detail_gap: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BadgeConfig {
    pub label: String,
    pub y: i32,
    /// `[horizontal, vertical]` padding around the label's ink box.
    pub padding: [u32; 2],
    pub corner_radius: u32,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            label: "LUMIBOX".to_string(),
            y: 375,
            padding: [16, 8],
            corner_radius: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccentBarConfig {
    pub height: u32,
}

impl Default for AccentBarConfig {
    fn default() -> Self {
        Self { height: 8 }
    }
}

/// Everything the composer reads. See the [module docs](self) for layering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposerConfig {
    pub preset: Preset,
    /// Destination of the encoded PNG.
    pub output: PathBuf,
    pub canvas: CanvasConfig,
    pub background: BackgroundConfig,
    pub colors: ColorConfig,
    pub product: ProductConfig,
    pub logo: LogoConfig,
    pub fonts: FontsConfig,
    pub text: TextConfig,
    pub badge: BadgeConfig,
    pub accent_bar: AccentBarConfig,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            preset: Preset::Hero,
            output: PathBuf::from("assets/images/og-image.png"),
            canvas: CanvasConfig::default(),
            background: BackgroundConfig::default(),
            colors: ColorConfig::default(),
            product: ProductConfig::default(),
            logo: LogoConfig::default(),
            fonts: FontsConfig::default(),
            text: TextConfig::default(),
            badge: BadgeConfig::default(),
            accent_bar: AccentBarConfig::default(),
        }
    }
}

impl ComposerConfig {
    /// The compact layout: smaller product and type, flat background, no shadow.
    pub fn compact() -> Self {
        let mut config = Self {
            preset: Preset::Compact,
            ..Self::default()
        };
        config.background.style = BackgroundStyle::Flat;
        config.product.max_size = 280;
        config.product.x = 100;
        config.product.shadow.enabled = false;
        config.logo.width = 180;
        config.logo.margin_right = 60;
        config.fonts.headline.size = 42.0;
        config.fonts.subhead.size = 22.0;
        config.text.x = 440;
        config.text.headline_y = 200;
        config.text.headline_line_height = 50;
        config.text.subhead_y = 315;
        config.badge.y = 365;
        config.accent_bar.height = 6;
        config
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Validation(
                "canvas.width and canvas.height must be non-zero".into(),
            ));
        }
        if self.product.max_size == 0 {
            return Err(ConfigError::Validation(
                "product.max_size must be non-zero".into(),
            ));
        }
        if self.logo.width == 0 {
            return Err(ConfigError::Validation("logo.width must be non-zero".into()));
        }
        for (role, spec) in self.fonts.iter() {
            if !spec.size.is_finite() || spec.size <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "fonts.{role}.size must be a positive number"
                )));
            }
        }
        for (key, value) in [
            ("background.horizontal_strength", self.background.horizontal_strength),
            ("background.vertical_strength", self.background.vertical_strength),
            ("background.left_tint_strength", self.background.left_tint_strength),
            ("background.right_tint_strength", self.background.right_tint_strength),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!("{key} must be 0.0-1.0")));
            }
        }
        if !self.product.shadow.blur.is_finite() || self.product.shadow.blur < 0.0 {
            return Err(ConfigError::Validation(
                "product.shadow.blur must be zero or positive".into(),
            ));
        }
        if self.accent_bar.height == 0 || self.accent_bar.height > self.canvas.height {
            return Err(ConfigError::Validation(
                "accent_bar.height must be between 1 and canvas.height".into(),
            ));
        }
        Ok(())
    }

    /// Rebase every relative path onto `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let rebase = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        rebase(&mut self.output);
        rebase(&mut self.product.path);
        rebase(&mut self.logo.path);
        rebase(&mut self.fonts.headline.path);
        rebase(&mut self.fonts.subhead.path);
        rebase(&mut self.fonts.badge.path);
        rebase(&mut self.fonts.detail.path);
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns a preset's stock defaults as a `toml::Value::Table`.
pub fn stock_defaults_value(preset: Preset) -> toml::Value {
    toml::Value::try_from(preset.defaults()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the defaults of the preset it names, then
/// deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ComposerConfig, ConfigError> {
    let preset = match overlay.as_ref().and_then(|ov| ov.get("preset")) {
        Some(value) => value.clone().try_into::<Preset>()?,
        None => Preset::default(),
    };
    let base = stock_defaults_value(preset);
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ComposerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Parse config text as sparse overrides on top of the stock defaults.
pub fn parse_config(content: &str) -> Result<ComposerConfig, ConfigError> {
    let value: toml::Value = toml::from_str(content)?;
    resolve_config(Some(value))
}

/// Load an explicitly named config file.
///
/// Unlike [`load_config`], a missing file is an error. Paths in the result are
/// resolved against the file's directory.
pub fn load_config_file(path: &Path) -> Result<ComposerConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.resolve_paths(base);
    Ok(config)
}

/// Load `og-image.toml` from `dir`, or the stock defaults when it is absent.
///
/// Paths in the result are resolved against `dir` either way.
pub fn load_config(dir: &Path) -> Result<ComposerConfig, ConfigError> {
    let path = dir.join(DEFAULT_CONFIG_FILE);
    let mut config = if path.exists() {
        parse_config(&fs::read_to_string(&path)?)?
    } else {
        resolve_config(None)?
    };
    config.resolve_paths(dir);
    Ok(config)
}

/// Returns a fully-commented stock `og-image.toml` with the `hero` defaults.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# og-compose configuration
# ========================
# All settings are optional. Values shown below are the `hero` defaults.
# Relative paths resolve against the directory holding this file.
# Unknown keys will cause an error.

# Base layer of defaults: "hero" (large product, gradient, shadow) or
# "compact" (smaller product and type, flat background, no shadow).
preset = "hero"

# Destination of the encoded PNG. The directory must already exist.
output = "assets/images/og-image.png"

[canvas]
width = 1200
height = 630

[background]
# flat | gradient | side-tint
style = "gradient"
horizontal_strength = 0.3   # weight of tint_horizontal at the right edge
vertical_strength = 0.15    # weight of tint_vertical at the bottom edge
left_tint_strength = 0.15   # side-tint: tint_vertical at the left edge
right_tint_strength = 0.1   # side-tint: tint_horizontal at the right edge

[colors]
background = "#F9F8F4"
text_primary = "#1A2B4C"
text_secondary = "#5E6A71"
accent = "#F2C94C"          # bottom accent bar
badge_fill = "#1A2B4C"
badge_text = "#FFFFFF"
tint_horizontal = "#E6EBE6"
tint_vertical = "#F0E6DD"
shadow = "#1A2B4C"

# Product photo. Skipped silently when the file does not exist.
[product]
path = "assets/images/lumibox/box_0-2.webp"
max_size = 380              # longest edge after scaling
x = 60
# y = 125                   # omit to center vertically

[product.shadow]
enabled = true
grow = 20                   # shape is this much wider and taller than the product
margin = 10                 # transparent border around the shape before blurring
offset = [0, 20]
corner_radius = 20
blur = 15.0                 # Gaussian sigma
opacity = 25                # alpha, 0-255

# Logo, right-aligned. Skipped silently when the file does not exist.
[logo]
path = "assets/images/lumicello_logo.png"
width = 220
margin_right = 80
y = 40

# Fonts that fail to load fall back to the built-in bitmap face.
[fonts.headline]
path = "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf"
size = 52.0

[fonts.subhead]
path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
size = 24.0

[fonts.badge]
path = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"
size = 16.0

[fonts.detail]
path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
size = 18.0

[text]
x = 500
headline = ["Play designed for", "every milestone"]
headline_y = 180
headline_line_height = 60
subhead = "Montessori-inspired kits for ages 0-12 months"
subhead_y = 325
detail = "18 developmental toys in each box"
detail_gap = 20             # space between badge and detail line

# Pill-shaped badge; its size follows the measured label.
[badge]
label = "LUMIBOX"
y = 375
padding = [16, 8]
corner_radius = 20

[accent_bar]
height = 8
"##
}
