// ficha-cadastro: Helvetica text measurement and word wrap
//
// Widths come from the standard Type 1 AFM files (units per 1000 em) for the
// printable ASCII range. Accented Latin letters are measured as their base
// letter, which matches the AFM for every accent used in pt-BR.

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Widths for U+0020..=U+007E, Helvetica.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0 - ?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @ - O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P - _
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // ` - o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p - ~
];

/// Widths for U+0020..=U+007E, Helvetica-Bold.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0 - ?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @ - O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P - _
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // ` - o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p - ~
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
}

fn base_letter(c: char) -> char {
    match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Ç' => 'C',
        'ç' => 'c',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ñ' => 'N',
        'ñ' => 'n',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ý' => 'Y',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

fn glyph_width(c: char, style: FontStyle) -> u16 {
    let table = match style {
        FontStyle::Normal => &HELVETICA,
        FontStyle::Bold => &HELVETICA_BOLD,
    };
    match base_letter(c) {
        '—' => 1000,
        '–' => 556,
        c @ ' '..='~' => table[c as usize - 0x20],
        // Unknown glyphs get the width of a digit
        _ => 556,
    }
}

/// Rendered width of `text` in millimetres.
pub fn text_width_mm(text: &str, size_pt: f32, style: FontStyle) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c, style) as u32).sum();
    units as f32 / 1000.0 * size_pt * PT_TO_MM
}

/// Splits `text` into lines no wider than `max_width_mm`.
///
/// Explicit newlines always break. Words wider than a whole line are broken
/// between characters. Empty input yields a single empty line so callers
/// can always count on at least one line.
pub fn wrap_text(text: &str, max_width_mm: f32, size_pt: f32, style: FontStyle) -> Vec<String> {
    let space = text_width_mm(" ", size_pt, style);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_width = text_width_mm(word, size_pt, style);

            if !current.is_empty() && current_width + space + word_width <= max_width_mm {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if word_width <= max_width_mm {
                current.push_str(word);
                current_width = word_width;
            } else {
                let mut pieces = break_word(word, max_width_mm, size_pt, style);
                // Keep the tail open so following words can join it
                current = pieces.pop().unwrap_or_default();
                current_width = text_width_mm(&current, size_pt, style);
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    lines
}

fn break_word(word: &str, max_width_mm: f32, size_pt: f32, style: FontStyle) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0;

    for c in word.chars() {
        let w = text_width_mm(c.encode_utf8(&mut [0; 4]), size_pt, style);
        if !piece.is_empty() && width + w > max_width_mm {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += w;
    }
    pieces.push(piece);
    pieces
}
