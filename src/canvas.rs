// ficha-cadastro: page-drawing surface used by the layout engine
//
// Coordinates are millimetres from the top-left corner of the current page,
// text `y` is the baseline. Implementations translate to their own origin.

use image::DynamicImage;

use crate::error::Result;
use crate::metrics::FontStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Paint for rectangles. Grey levels are 0 (black) to 255 (white).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub stroke: Option<u8>,
    pub fill: Option<u8>,
}

impl Paint {
    pub const fn fill_and_stroke(fill: u8, stroke: u8) -> Self {
        Self {
            stroke: Some(stroke),
            fill: Some(fill),
        }
    }
}

pub trait PageCanvas {
    /// Page width and height in millimetres.
    fn page_size(&self) -> (f32, f32);

    /// Starts a new page; later drawing goes there.
    fn add_page(&mut self);

    fn page_count(&self) -> usize;

    fn set_font(&mut self, size_pt: f32, style: FontStyle);

    fn set_text_gray(&mut self, level: u8);

    /// Draws one line of text in the current font.
    fn text(&mut self, text: &str, x: f32, y: f32, align: Align);

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint);

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, gray: u8);

    /// Draws `image` stretched to `w` x `h` with its top-left at `(x, y)`.
    fn image(&mut self, image: &DynamicImage, x: f32, y: f32, w: f32, h: f32);

    /// Serializes every page.
    fn finish(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}
