// ficha-cadastro: image loading for the logo and the signature

use std::io::Read;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::signature::SignatureBitmap;

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn fetch(url: &str) -> std::result::Result<Vec<u8>, String> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| format!("Failed to fetch URL: {}", e))?;

    let mut bytes = Vec::new();
    response.into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| format!("Failed to read response: {}", e))?;
    Ok(bytes)
}

/// Reads and decodes an image from a file path or an http(s) URL.
fn load_image(source: &str) -> std::result::Result<DynamicImage, String> {
    let image_bytes = if is_url(source) {
        fetch(source)?
    } else {
        std::fs::read(source).map_err(|e| format!("{}: {}", source, e))?
    };

    let img = image::load_from_memory(&image_bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;
    debug!(source, width = img.width(), height = img.height(), "image decoded");
    Ok(img)
}

pub fn load_logo(source: &str) -> Result<DynamicImage> {
    load_image(source).map_err(|e| {
        warn!(source, error = %e, "logo unavailable");
        AppError::LogoError(e)
    })
}

/// Loads an exported signature. A file with no strokes loads fine and is
/// reported empty by the bitmap itself.
pub fn load_signature(source: &str) -> Result<SignatureBitmap> {
    load_image(source)
        .map(SignatureBitmap::from_image)
        .map_err(|e| {
            warn!(source, error = %e, "signature unavailable");
            AppError::SignatureError(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_missing_logo_is_logo_error() {
        let err = load_logo("/nonexistent/logo.png").unwrap_err();
        assert!(matches!(err, AppError::LogoError(_)));
    }

    #[test]
    fn test_undecodable_signature_is_signature_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sig.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = load_signature(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::SignatureError(_)));
    }

    #[test]
    fn test_signature_round_trips_through_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sig.png");
        let mut img = RgbaImage::from_pixel(30, 10, Rgba([0, 0, 0, 0]));
        img.put_pixel(5, 5, Rgba([0, 0, 0, 255]));
        img.save(&path).unwrap();

        let sig = load_signature(path.to_str().unwrap()).unwrap();
        assert!(!sig.is_empty());
    }
}
