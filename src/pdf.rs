// ficha-cadastro: printpdf-backed page canvas

use std::io::{BufWriter, Cursor};

use ::image::{DynamicImage, Rgba, RgbImage};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use tracing::debug;

use crate::canvas::{Align, PageCanvas, Paint};
use crate::error::{AppError, Result};
use crate::metrics::{text_width_mm, FontStyle};

/// A4 dimensions in mm
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Line width in points for borders and rules
const OUTLINE_THICKNESS: f32 = 0.57;

pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font_regular: IndirectFontRef,
    font_bold: IndirectFontRef,
    font_size: f32,
    font_style: FontStyle,
    text_gray: u8,
    pages: usize,
}

impl PdfCanvas {
    pub fn new(title: &str) -> Result<Self> {
        let (doc, page1, layer1) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );

        let layer = doc.get_page(page1).get_layer(layer1);

        let font_regular = doc.add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::PdfError(e.to_string()))?;
        let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        Ok(Self {
            doc,
            layer,
            font_regular,
            font_bold,
            font_size: 11.0,
            font_style: FontStyle::Normal,
            text_gray: 0,
            pages: 1,
        })
    }

    /// Converts a top-left based y coordinate to printpdf's bottom-left origin.
    fn flip(y: f32) -> f32 {
        PAGE_HEIGHT_MM - y
    }
}

fn gray(level: u8) -> Color {
    let v = level as f32 / 255.0;
    Color::Rgb(Rgb::new(v, v, v, None))
}

impl PageCanvas for PdfCanvas {
    fn page_size(&self) -> (f32, f32) {
        (PAGE_WIDTH_MM, PAGE_HEIGHT_MM)
    }

    fn add_page(&mut self) {
        let (new_page, new_layer) = self.doc.add_page(
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        self.layer = self.doc.get_page(new_page).get_layer(new_layer);
        self.pages += 1;
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn set_font(&mut self, size_pt: f32, style: FontStyle) {
        self.font_size = size_pt;
        self.font_style = style;
    }

    fn set_text_gray(&mut self, level: u8) {
        self.text_gray = level;
    }

    fn text(&mut self, text: &str, x: f32, y: f32, align: Align) {
        let x = match align {
            Align::Left => x,
            Align::Center => x - text_width_mm(text, self.font_size, self.font_style) / 2.0,
        };
        let font = match self.font_style {
            FontStyle::Normal => &self.font_regular,
            FontStyle::Bold => &self.font_bold,
        };

        self.layer.set_fill_color(gray(self.text_gray));
        self.layer.use_text(text, self.font_size, Mm(x), Mm(Self::flip(y)), font);
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        let top = Self::flip(y);
        let bottom = Self::flip(y + h);
        let points = vec![
            (Point::new(Mm(x), Mm(bottom)), false),
            (Point::new(Mm(x + w), Mm(bottom)), false),
            (Point::new(Mm(x + w), Mm(top)), false),
            (Point::new(Mm(x), Mm(top)), false),
        ];

        if let Some(stroke) = paint.stroke {
            self.layer.set_outline_color(gray(stroke));
            self.layer.set_outline_thickness(OUTLINE_THICKNESS);
        }

        match paint.fill {
            Some(fill) => {
                self.layer.set_fill_color(gray(fill));
                let mode = if paint.stroke.is_some() {
                    PaintMode::FillStroke
                } else {
                    PaintMode::Fill
                };
                self.layer.add_polygon(Polygon {
                    rings: vec![points],
                    mode,
                    winding_order: WindingOrder::NonZero,
                });
            }
            None if paint.stroke.is_some() => {
                self.layer.add_line(Line {
                    points,
                    is_closed: true,
                });
            }
            None => {}
        }
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, gray_level: u8) {
        self.layer.set_outline_color(gray(gray_level));
        self.layer.set_outline_thickness(OUTLINE_THICKNESS);
        let points = vec![
            (Point::new(Mm(x1), Mm(Self::flip(y1))), false),
            (Point::new(Mm(x2), Mm(Self::flip(y2))), false),
        ];
        self.layer.add_line(Line {
            points,
            is_closed: false,
        });
    }

    fn image(&mut self, image: &DynamicImage, x: f32, y: f32, w: f32, h: f32) {
        let rgb_image = flatten_on_white(image);
        let (width_px, height_px) = rgb_image.dimensions();
        if width_px == 0 || height_px == 0 || w <= 0.0 || h <= 0.0 {
            debug!("skipping zero-sized image");
            return;
        }

        let pdf_image = Image::from(ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb_image.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // DPI fixes the width; the vertical scale stretches the natural
        // height at that DPI to the requested one.
        let dpi = (width_px as f32) / (w / 25.4);
        let natural_height_mm = height_px as f32 / dpi * 25.4;

        pdf_image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(Self::flip(y + h))),
                dpi: Some(dpi),
                scale_y: Some(h / natural_height_mm),
                ..Default::default()
            },
        );
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut writer = BufWriter::new(Cursor::new(&mut buf));
            self.doc.save(&mut writer)
                .map_err(|e| AppError::PdfError(e.to_string()))?;
        }
        Ok(buf)
    }
}

/// Composites an image with transparency against a white background.
pub fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let rgba_image = image.to_rgba8();
    let (width_px, height_px) = rgba_image.dimensions();

    let mut rgb_image = RgbImage::new(width_px, height_px);
    for (x, y, pixel) in rgba_image.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let bg = 255.0;
        let out_r = (r as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_g = (g as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_b = (b as f32 * alpha + bg * (1.0 - alpha)) as u8;
        rgb_image.put_pixel(x, y, ::image::Rgb([out_r, out_g, out_b]));
    }
    rgb_image
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::RgbaImage;

    #[test]
    fn test_transparent_pixels_become_white() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        let flat = flatten_on_white(&DynamicImage::ImageRgba8(img));
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_blank_document_serializes() {
        let mut canvas = PdfCanvas::new("Teste").unwrap();
        canvas.set_font(12.0, FontStyle::Bold);
        canvas.text("Olá", 14.0, 20.0, Align::Left);
        canvas.add_page();
        assert_eq!(canvas.page_count(), 2);
        let bytes = canvas.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
