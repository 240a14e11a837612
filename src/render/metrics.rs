//! Glyph widths for the standard Helvetica faces.
//!
//! Widths are in thousandths of the font size, taken from the Adobe AFM files
//! for the printable ASCII range and the WinAnsi punctuation block. Latin-1
//! letters with diacritics use the width of their base letter.

use super::canvas::Font;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const DEFAULT_WIDTH: u16 = 556;
const DEGREE_WIDTH: u16 = 400;

fn base_letter(c: char) -> char {
    match c {
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ñ' => 'N',
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

/// Regular and bold widths of the glyphs WinAnsi places in 0x80..=0x9F.
fn punctuation_widths(c: char) -> Option<(u16, u16)> {
    let widths = match c {
        '€' | 'ƒ' | '†' | '‡' | '–' => (556, 556),
        '‚' | '‘' | '’' => (222, 278),
        '„' | '“' | '”' => (333, 500),
        '…' | '‰' | 'Œ' | '—' | '™' => (1000, 1000),
        'ˆ' | '‹' | '›' | '˜' => (333, 333),
        'Š' | 'Ÿ' => (667, 667),
        'Ž' => (611, 611),
        '•' => (350, 350),
        'š' => (500, 556),
        'œ' => (944, 944),
        'ž' => (500, 500),
        _ => return None,
    };
    Some(widths)
}

fn glyph_width(font: Font, c: char) -> u16 {
    if c == '°' || c == 'º' {
        return DEGREE_WIDTH;
    }
    if let Some((regular, bold)) = punctuation_widths(c) {
        return match font {
            Font::Regular => regular,
            Font::Bold => bold,
        };
    }
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    let code = base_letter(c) as u32;
    if (32..=126).contains(&code) {
        table[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Width of `text` in points when set in `font` at `size`.
pub fn string_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(font, c))).sum();
    units as f32 * size / 1000.0
}
