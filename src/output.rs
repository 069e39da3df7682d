//! CLI output formatting for compose and check.
//!
//! The first lines of a compose run are fixed:
//!
//! ```text
//! OG image created: assets/images/og-image.png
//! File size: 187.3 KB
//! ```
//!
//! After them comes an inventory of what each layer did, indented the same
//! way for both commands:
//!
//! ```text
//! Layers
//!     Background: gradient
//!     Shadow: 420x420 at (50, 135)
//!     Product: 380x380 at (60, 125)
//!         Source: assets/images/lumibox/box_0-2.webp
//!     Logo: skipped (not found)
//!         Source: assets/images/lumicello_logo.png
//!     Badge: "LUMIBOX" 114x30 at (500, 375)
//!     Accent bar: 1200x8 at (0, 622)
//!
//! Fonts
//!     headline 52px: /usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf
//!     badge 16px: built-in (/fonts/x.ttf: not found)
//! ```
//!
//! ## Check
//!
//! ```text
//! Assets
//!     Product: found
//!         Source: assets/images/lumibox/box_0-2.webp
//!     Logo: missing
//!         Source: assets/images/lumicello_logo.png
//!
//! Fonts
//!     ...
//!
//! Output
//!     assets/images/og-image.png
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::compose::{AssetCheck, ComposeReport, FontReport, Inspection, LayerOutcome};
use crate::imaging::Rect;
use crate::text::FontOrigin;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Byte count as kilobytes with one decimal.
fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// `WxH at (x, y)`
fn format_rect(rect: &Rect) -> String {
    format!("{}x{} at ({}, {})", rect.width, rect.height, rect.x, rect.y)
}

fn layer_lines(label: &str, outcome: &LayerOutcome) -> Vec<String> {
    let (status, source) = match outcome {
        LayerOutcome::Placed { source, rect } => (format_rect(rect), source),
        LayerOutcome::Skipped { source } => ("skipped (not found)".to_string(), source),
    };
    vec![
        format!("{}{}: {}", indent(1), label, status),
        format!("{}Source: {}", indent(2), source.display()),
    ]
}

fn asset_lines(label: &str, check: &AssetCheck) -> Vec<String> {
    let status = if check.present { "found" } else { "missing" };
    vec![
        format!("{}{}: {}", indent(1), label, status),
        format!("{}Source: {}", indent(2), check.path.display()),
    ]
}

fn font_lines(fonts: &[FontReport]) -> Vec<String> {
    let mut lines = vec!["Fonts".to_string()];
    for font in fonts {
        let origin = match &font.origin {
            FontOrigin::File(path) => path.display().to_string(),
            FontOrigin::Builtin { reason } => format!("built-in ({reason})"),
        };
        lines.push(format!(
            "{}{} {}px: {}",
            indent(1),
            font.role,
            font.size,
            origin
        ));
    }
    lines
}

/// Format the result of a successful compose.
pub fn format_compose_output(report: &ComposeReport) -> Vec<String> {
    let summary = &report.summary;
    let mut lines = vec![
        format!("OG image created: {}", report.output.display()),
        format!("File size: {}", format_kb(report.bytes)),
        String::new(),
        "Layers".to_string(),
        format!("{}Background: {}", indent(1), summary.background),
    ];

    if let Some(shadow) = &summary.shadow {
        lines.push(format!("{}Shadow: {}", indent(1), format_rect(shadow)));
    }
    lines.extend(layer_lines("Product", &summary.product));
    lines.extend(layer_lines("Logo", &summary.logo));
    match &summary.badge {
        Some(badge) => lines.push(format!(
            "{}Badge: \"{}\" {}",
            indent(1),
            badge.label,
            format_rect(&badge.rect)
        )),
        None => lines.push(format!("{}Badge: none", indent(1))),
    }
    lines.push(format!(
        "{}Accent bar: {}",
        indent(1),
        format_rect(&summary.accent_bar)
    ));

    lines.push(String::new());
    lines.extend(font_lines(&summary.fonts));
    lines
}

/// Print compose output to stdout.
pub fn print_compose_output(report: &ComposeReport) {
    for line in format_compose_output(report) {
        println!("{}", line);
    }
}

/// Format the result of `check`.
pub fn format_check_output(inspection: &Inspection) -> Vec<String> {
    let mut lines = vec!["Assets".to_string()];
    lines.extend(asset_lines("Product", &inspection.product));
    lines.extend(asset_lines("Logo", &inspection.logo));

    lines.push(String::new());
    lines.extend(font_lines(&inspection.fonts));

    lines.push(String::new());
    lines.push("Output".to_string());
    lines.push(format!("{}{}", indent(1), inspection.output.display()));
    if !inspection.output_dir_exists {
        lines.push(format!("{}Directory does not exist", indent(2)));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(inspection: &Inspection) {
    for line in format_check_output(inspection) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
