// ficha-cadastro: captured handwritten signature

use image::{DynamicImage, GenericImageView};

/// Channel value at or above which a pixel counts as paper, not ink.
const PAPER_LEVEL: u8 = 250;

/// Bitmap exported by the signature pad. Empty means nothing was drawn.
#[derive(Debug, Clone, Default)]
pub struct SignatureBitmap {
    image: Option<DynamicImage>,
}

/// Bounding box of the inked pixels as `(x, y, width, height)`.
fn ink_bounds(image: &DynamicImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in image.pixels() {
        let [r, g, b, a] = pixel.0;
        let inked = a > 0 && (r < PAPER_LEVEL || g < PAPER_LEVEL || b < PAPER_LEVEL);
        if !inked {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

impl SignatureBitmap {
    pub fn from_image(image: DynamicImage) -> Self {
        Self { image: Some(image) }
    }

    /// True when no stroke has been drawn: no bitmap, or a bitmap with only
    /// transparent or white pixels.
    pub fn is_empty(&self) -> bool {
        self.image.as_ref().and_then(ink_bounds).is_none()
    }

    pub fn clear(&mut self) {
        self.image = None;
    }

    /// The strokes cropped to their bounding box, `None` when empty.
    pub fn trimmed(&self) -> Option<DynamicImage> {
        let image = self.image.as_ref()?;
        let (x, y, w, h) = ink_bounds(image)?;
        Some(image.crop_imm(x, y, w, h))
    }
}
