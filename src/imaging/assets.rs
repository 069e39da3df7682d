//! Optional source images (product photo, logo).
//!
//! An asset that is absent on disk is not an error: callers get `Ok(None)`
//! and skip the layer. An asset that exists but cannot be decoded is.

use super::calculations::{fit_longest_edge, fit_width};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, ImageResult};
use std::path::Path;

/// Whether an optional asset counts as present. Anything that exists does,
/// so a directory at the asset path is reported and then fails to decode.
pub fn is_present(path: &Path) -> bool {
    path.exists()
}

/// Decode `path` if it exists. The file handle is released before returning.
pub fn load_optional(path: &Path) -> ImageResult<Option<DynamicImage>> {
    if !is_present(path) {
        return Ok(None);
    }
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(Some(image))
}

/// Lanczos3 resize so the longer edge becomes `max_size`.
pub fn resize_longest_edge(image: &DynamicImage, max_size: u32) -> DynamicImage {
    let (w, h) = fit_longest_edge((image.width(), image.height()), max_size);
    image.resize_exact(w, h, FilterType::Lanczos3)
}

/// Lanczos3 resize to exactly `width` pixels wide.
pub fn resize_to_width(image: &DynamicImage, width: u32) -> DynamicImage {
    let (w, h) = fit_width((image.width(), image.height()), width);
    image.resize_exact(w, h, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_corrupt_file, write_test_png};

    #[test]
    fn missing_asset_is_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(load_optional(&tmp.path().join("absent.png")).unwrap().is_none());
    }

    #[test]
    fn present_asset_decodes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("product.png");
        write_test_png(&path, 40, 20, false);
        let image = load_optional(&path).unwrap().unwrap();
        assert_eq!((image.width(), image.height()), (40, 20));
    }

    #[test]
    fn format_guessed_from_content() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("product.bin");
        write_test_png(&path, 8, 8, true);
        let image = load_optional(&path).unwrap().unwrap();
        assert!(image.color().has_alpha());
    }

    #[test]
    fn directory_at_asset_path_is_present_and_undecodable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("product.png");
        std::fs::create_dir(&path).unwrap();
        assert!(is_present(&path));
        assert!(load_optional(&path).is_err());
    }

    #[test]
    fn corrupt_asset_is_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("product.png");
        write_corrupt_file(&path);
        assert!(load_optional(&path).is_err());
    }

    #[test]
    fn resize_helpers_hit_target_dimensions() {
        let image = DynamicImage::new_rgb8(400, 200);
        let product = resize_longest_edge(&image, 380);
        assert_eq!((product.width(), product.height()), (380, 190));
        let logo = resize_to_width(&image, 220);
        assert_eq!((logo.width(), logo.height()), (220, 110));
    }
}
