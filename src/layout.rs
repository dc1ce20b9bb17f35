// ficha-cadastro: paginated layout primitives
//
// All measurements are millimetres, font sizes points. The cursor `y` is the
// top of the next block; every block reserves its height through
// `ensure_space` before drawing.

use image::DynamicImage;
use tracing::debug;

use crate::canvas::{Align, PageCanvas, Paint};
use crate::metrics::{wrap_text, FontStyle};

// ============================================================================
// Constants
// ============================================================================

pub const MARGIN_MM: f32 = 14.0;

/// Logo target height; wide logos are clamped to the content width instead.
pub const LOGO_HEIGHT_MM: f32 = 86.0;
/// Aspect ratio assumed when the logo reports a zero dimension.
const LOGO_FALLBACK_RATIO: f32 = 3.0;

const TITLE_FONT_SIZE: f32 = 18.0;
const SECTION_FONT_SIZE: f32 = 12.0;
const LABEL_FONT_SIZE: f32 = 9.0;
const VALUE_FONT_SIZE: f32 = 11.0;
const FOOTER_FONT_SIZE: f32 = 9.0;

/// Card text inset and per-line advances
const CARD_PADDING_MM: f32 = 3.0;
const LABEL_LINE_MM: f32 = 4.0;
const VALUE_LINE_MM: f32 = 5.0;
const LABEL_VALUE_GAP_MM: f32 = 2.0;

/// Space below a row of cards
const ROW_SPACING_MM: f32 = 6.0;
/// Extra room a row reserves beyond its own height
const ROW_SLACK_MM: f32 = 2.0;
const COLUMN_GAP_MM: f32 = 6.0;

const SECTION_BAR_MM: f32 = 9.0;
const SECTION_RESERVE_MM: f32 = 14.0;
const SECTION_ADVANCE_MM: f32 = 13.0;

const SIGNATURE_BOX_MM: f32 = 35.0;
const SIGNATURE_WIDTH_MM: f32 = 90.0;
const SIGNATURE_HEIGHT_MM: f32 = 28.0;

/// Grey levels
const BORDER_GRAY: u8 = 220;
const SECTION_FILL: u8 = 245;
const LABEL_GRAY: u8 = 80;
const FOOTER_GRAY: u8 = 120;

// ============================================================================
// Engine
// ============================================================================

pub struct LayoutEngine<C: PageCanvas> {
    canvas: C,
    y: f32,
    page_width: f32,
    page_height: f32,
}

impl<C: PageCanvas> LayoutEngine<C> {
    pub fn new(canvas: C) -> Self {
        let (page_width, page_height) = canvas.page_size();
        Self {
            canvas,
            y: MARGIN_MM,
            page_width,
            page_height,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * MARGIN_MM
    }

    /// Height between the top and bottom margins.
    fn printable_height(&self) -> f32 {
        self.page_height - 2.0 * MARGIN_MM
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    fn new_page(&mut self) {
        self.canvas.add_page();
        self.y = MARGIN_MM;
    }

    /// Starts a new page when a block of height `needed` would cross the
    /// bottom margin. Returns whether a page was added.
    pub fn ensure_space(&mut self, needed: f32) -> bool {
        if self.y + needed > self.page_height - MARGIN_MM {
            self.new_page();
            debug!(page = self.canvas.page_count(), needed, "page break");
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------------
    // Header
    // ------------------------------------------------------------------------

    /// Centered logo, centered title and a rule across the content width.
    pub fn header(&mut self, logo: &DynamicImage, title: &str) {
        let (logo_w, logo_h) = fit_logo(
            logo.width(),
            logo.height(),
            LOGO_HEIGHT_MM,
            self.content_width(),
        );
        debug!(logo_w, logo_h, "logo scaled");

        self.ensure_space(logo_h);
        let logo_x = (self.page_width - logo_w) / 2.0;
        self.canvas.image(logo, logo_x, self.y, logo_w, logo_h);
        self.y += logo_h + 8.0;

        self.canvas.set_font(TITLE_FONT_SIZE, FontStyle::Bold);
        self.canvas.set_text_gray(10);
        self.canvas.text(title, self.page_width / 2.0, self.y, Align::Center);
        self.y += 6.0;

        self.canvas.line(MARGIN_MM, self.y, self.page_width - MARGIN_MM, self.y, BORDER_GRAY);
        self.y += 10.0;
        self.canvas.set_text_gray(0);
    }

    // ------------------------------------------------------------------------
    // Cards and rows
    // ------------------------------------------------------------------------

    /// One piece of a card: its border, the label when `with_label`, and
    /// the given value lines.
    fn draw_card_chunk(&mut self, card: &CardText, with_label: bool, values: &[String], h: f32) {
        let paint = Paint::fill_and_stroke(255, BORDER_GRAY);
        self.canvas.rect(card.x, self.y, card.w, h, paint);

        let mut value_top = self.y + CARD_PADDING_MM + 4.0;
        if with_label {
            self.canvas.set_font(LABEL_FONT_SIZE, FontStyle::Bold);
            self.canvas.set_text_gray(LABEL_GRAY);
            let label_top = self.y + 6.0;
            for (i, line) in card.label.iter().enumerate() {
                let y = label_top + i as f32 * LABEL_LINE_MM;
                self.canvas.text(line, card.x + CARD_PADDING_MM, y, Align::Left);
            }
            value_top = label_top + card.label.len() as f32 * LABEL_LINE_MM + 4.0;
        }

        self.canvas.set_font(VALUE_FONT_SIZE, FontStyle::Normal);
        self.canvas.set_text_gray(0);
        for (i, line) in values.iter().enumerate() {
            let y = value_top + i as f32 * VALUE_LINE_MM;
            self.canvas.text(line, card.x + CARD_PADDING_MM, y, Align::Left);
        }
    }

    /// Draws cards side by side, all sharing the tallest card's height.
    ///
    /// A row taller than a whole page is split: each page gets a chunk of
    /// every card holding as many value lines as fit, and only the first
    /// chunk carries the labels.
    fn draw_row(&mut self, cards: &[CardText]) {
        let row_h = cards
            .iter()
            .map(|card| card.height(true, card.value.len()))
            .fold(0.0, f32::max);

        if row_h + ROW_SLACK_MM <= self.printable_height() {
            self.ensure_space(row_h + ROW_SLACK_MM);
            for card in cards {
                self.draw_card_chunk(card, true, &card.value, row_h);
            }
            self.y += row_h + ROW_SPACING_MM;
            return;
        }

        debug!(height = row_h, "row split across pages");
        let mut drawn = vec![0usize; cards.len()];
        let mut first = true;
        loop {
            let min_h = cards
                .iter()
                .zip(&drawn)
                .map(|(card, &done)| card.height(first, (card.value.len() - done).min(1)))
                .fold(0.0, f32::max);
            self.ensure_space(min_h + ROW_SLACK_MM);

            let available = self.page_height - MARGIN_MM - ROW_SLACK_MM - self.y;
            let ranges: Vec<(usize, usize)> = cards
                .iter()
                .zip(&drawn)
                .map(|(card, &done)| {
                    let room = available - card.height(first, 0);
                    let fit = ((room / VALUE_LINE_MM) + 1e-3).floor().max(1.0) as usize;
                    (done, (done + fit).min(card.value.len()))
                })
                .collect();

            let chunk_h = cards
                .iter()
                .zip(&ranges)
                .map(|(card, &(start, end))| card.height(first, end - start))
                .fold(0.0, f32::max);
            for (card, &(start, end)) in cards.iter().zip(&ranges) {
                self.draw_card_chunk(card, first, &card.value[start..end], chunk_h);
            }
            for (done, &(_, end)) in drawn.iter_mut().zip(&ranges) {
                *done = end;
            }
            self.y += chunk_h;
            first = false;

            if cards.iter().zip(&drawn).all(|(card, &done)| done >= card.value.len()) {
                self.y += ROW_SPACING_MM;
                break;
            }
            self.new_page();
        }
    }

    /// Two cards side by side sharing the taller card's height.
    pub fn two_column_row(&mut self, left: (&str, &str), right: (&str, &str)) {
        let col_w = (self.content_width() - COLUMN_GAP_MM) / 2.0;
        let right_x = MARGIN_MM + col_w + COLUMN_GAP_MM;
        self.draw_row(&[
            CardText::new(MARGIN_MM, col_w, left.0, left.1),
            CardText::new(right_x, col_w, right.0, right.1),
        ]);
    }

    /// One card spanning the content width.
    pub fn full_row(&mut self, label: &str, value: &str) {
        let w = self.content_width();
        self.draw_row(&[CardText::new(MARGIN_MM, w, label, value)]);
    }

    /// Shaded bar with a bold title.
    pub fn section_title(&mut self, title: &str) {
        self.ensure_space(SECTION_RESERVE_MM);

        let w = self.content_width();
        let paint = Paint::fill_and_stroke(SECTION_FILL, BORDER_GRAY);
        self.canvas.rect(MARGIN_MM, self.y, w, SECTION_BAR_MM, paint);
        self.canvas.set_font(SECTION_FONT_SIZE, FontStyle::Bold);
        self.canvas.set_text_gray(20);
        self.canvas.text(title, MARGIN_MM + 3.0, self.y + 6.5, Align::Left);
        self.canvas.set_text_gray(0);

        self.y += SECTION_ADVANCE_MM;
    }

    /// Bordered box with the signature centered inside at a fixed size.
    pub fn signature_box(&mut self, signature: &DynamicImage) {
        self.ensure_space(SIGNATURE_BOX_MM + 10.0);

        let w = self.content_width();
        let paint = Paint::fill_and_stroke(255, BORDER_GRAY);
        self.canvas.rect(MARGIN_MM, self.y, w, SIGNATURE_BOX_MM, paint);

        let sig_x = MARGIN_MM + (w - SIGNATURE_WIDTH_MM) / 2.0;
        let sig_y = self.y + (SIGNATURE_BOX_MM - SIGNATURE_HEIGHT_MM) / 2.0;
        self.canvas.image(signature, sig_x, sig_y, SIGNATURE_WIDTH_MM, SIGNATURE_HEIGHT_MM);

        self.y += SIGNATURE_BOX_MM + 8.0;
    }

    /// Small grey line inside the bottom margin of the current page.
    pub fn footer(&mut self, text: &str) {
        self.canvas.set_font(FOOTER_FONT_SIZE, FontStyle::Normal);
        self.canvas.set_text_gray(FOOTER_GRAY);
        self.canvas.text(text, MARGIN_MM, self.page_height - MARGIN_MM + 6.0, Align::Left);
        self.canvas.set_text_gray(0);
    }
}

/// A card's wrapped label and value at its position in the row.
struct CardText {
    x: f32,
    w: f32,
    label: Vec<String>,
    value: Vec<String>,
}

impl CardText {
    fn new(x: f32, w: f32, label: &str, value: &str) -> Self {
        Self {
            x,
            w,
            label: wrap_label(label, w),
            value: wrap_value(value, w),
        }
    }

    /// Height of a chunk holding `value_lines` lines, with or without the label.
    fn height(&self, with_label: bool, value_lines: usize) -> f32 {
        let label = if with_label {
            self.label.len() as f32 * LABEL_LINE_MM + LABEL_VALUE_GAP_MM
        } else {
            0.0
        };
        CARD_PADDING_MM + label + value_lines as f32 * VALUE_LINE_MM + CARD_PADDING_MM
    }
}

fn wrap_label(label: &str, w: f32) -> Vec<String> {
    wrap_text(label, w - 2.0 * CARD_PADDING_MM, LABEL_FONT_SIZE, FontStyle::Bold)
}

fn wrap_value(value: &str, w: f32) -> Vec<String> {
    wrap_text(value, w - 2.0 * CARD_PADDING_MM, VALUE_FONT_SIZE, FontStyle::Normal)
}

/// Height of a card of width `w` once label and value are wrapped.
pub fn measure_card_height(label: &str, value: &str, w: f32) -> f32 {
    let card = CardText::new(0.0, w, label, value);
    card.height(true, card.value.len())
}

/// Scales a `width_px` x `height_px` logo to `target_h`, preserving aspect
/// ratio, then clamps the width to `max_w` when it would overflow.
pub fn fit_logo(width_px: u32, height_px: u32, target_h: f32, max_w: f32) -> (f32, f32) {
    let ratio = if width_px == 0 || height_px == 0 {
        LOGO_FALLBACK_RATIO
    } else {
        width_px as f32 / height_px as f32
    };

    let mut logo_h = target_h;
    let mut logo_w = logo_h * ratio;
    if logo_w > max_w {
        logo_w = max_w;
        logo_h = logo_w / ratio;
    }
    (logo_w, logo_h)
}
