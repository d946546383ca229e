use std::sync::OnceLock;

use crate::error::Error;
use crate::geometry::pt_to_mm;

/// Metrics for one of the built-in (non-embedded) PDF fonts.
#[derive(Debug)]
pub struct FontFace {
    pub base_font: &'static str,
    widths_1000: Vec<f32>, // WinAnsi 32..=255
    cap_height_1000: f32,
}

impl FontFace {
    /// Width of a single character in 1000-units. Characters WinAnsi cannot
    /// encode are dropped when drawing, so they measure as zero.
    pub fn char_width_1000(&self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub fn text_width_1000(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.char_width_1000(ch)).sum()
    }
}

/// A face at a point size. All measurements come back in millimeters.
#[derive(Clone, Copy, Debug)]
pub struct Font {
    pub face: &'static FontFace,
    pub size: f32, // points
}

impl Font {
    pub fn new(name: &str, size: f32) -> Result<Self, Error> {
        Ok(Font {
            face: lookup(name)?,
            size,
        })
    }

    pub fn with_size(self, size: f32) -> Self {
        Font { size, ..self }
    }

    pub fn text_width(&self, text: &str) -> f32 {
        pt_to_mm(self.face.text_width_1000(text) * self.size / 1000.0)
    }

    pub fn space_width(&self) -> f32 {
        pt_to_mm(self.face.char_width_1000(' ') * self.size / 1000.0)
    }

    pub fn cap_height(&self) -> f32 {
        pt_to_mm(self.face.cap_height_1000 * self.size / 1000.0)
    }
}

static HELVETICA: OnceLock<FontFace> = OnceLock::new();
static HELVETICA_BOLD: OnceLock<FontFace> = OnceLock::new();
static COURIER: OnceLock<FontFace> = OnceLock::new();
static COURIER_BOLD: OnceLock<FontFace> = OnceLock::new();

/// Resolve a base-14 font name to its metrics.
pub fn lookup(name: &str) -> Result<&'static FontFace, Error> {
    let face = match name {
        "Helvetica" => HELVETICA.get_or_init(|| FontFace {
            base_font: "Helvetica",
            widths_1000: winansi_widths(&HELVETICA_ASCII),
            cap_height_1000: 718.0,
        }),
        "Helvetica-Bold" => HELVETICA_BOLD.get_or_init(|| FontFace {
            base_font: "Helvetica-Bold",
            widths_1000: winansi_widths(&HELVETICA_BOLD_ASCII),
            cap_height_1000: 718.0,
        }),
        "Courier" => COURIER.get_or_init(|| FontFace {
            base_font: "Courier",
            widths_1000: vec![600.0; 224],
            cap_height_1000: 562.0,
        }),
        "Courier-Bold" => COURIER_BOLD.get_or_init(|| FontFace {
            base_font: "Courier-Bold",
            widths_1000: vec![600.0; 224],
            cap_height_1000: 562.0,
        }),
        _ => return Err(Error::Measurement(name.to_string())),
    };
    Ok(face)
}

// AFM advance widths for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Expand an ASCII table to the full WinAnsi range. Accented Latin-1 letters
/// take the width of their base letter; the rest are approximated.
fn winansi_widths(ascii: &[u16; 95]) -> Vec<f32> {
    let ascii_w = |c: char| ascii[(c as usize) - 32] as f32;
    (32u8..=255u8)
        .map(|b| match b {
            32..=126 => ascii[(b - 32) as usize] as f32,
            0xA0 => ascii_w(' '),
            0x85 | 0x97 | 0x89 => 1000.0, // ellipsis, em dash, per mille
            0x91 | 0x92 | 0x82 => ascii_w('\''),
            0x93 | 0x94 | 0x84 => ascii_w('"'),
            0x95 => 350.0, // bullet
            0x96 => 556.0, // en dash
            _ => match latin1_base(winansi_to_char(b)) {
                Some(base) => ascii_w(base),
                None => 556.0,
            },
        })
        .collect()
}

fn latin1_base(c: char) -> Option<char> {
    let base = match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'Š' => 'S',
        'š' => 's',
        'Ž' => 'Z',
        'ž' => 'z',
        '¿' => '?',
        '¡' => '!',
        'º' | '°' => 'o',
        'ª' => 'a',
        _ => return None,
    };
    Some(base)
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}', // bullet
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Control characters and anything outside WinAnsi are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_font_is_a_measurement_error() {
        assert!(matches!(lookup("Comic Sans"), Err(Error::Measurement(_))));
    }

    #[test]
    fn accented_letters_measure_like_their_base() {
        let face = lookup("Helvetica").unwrap();
        assert_eq!(face.char_width_1000('é'), face.char_width_1000('e'));
        assert_eq!(face.char_width_1000('Ñ'), face.char_width_1000('N'));
    }

    #[test]
    fn unencodable_chars_are_dropped_and_weightless() {
        let face = lookup("Helvetica").unwrap();
        assert_eq!(to_winansi_bytes("a\u{4E2D}b"), b"ab".to_vec());
        assert_eq!(face.char_width_1000('\u{4E2D}'), 0.0);
    }
}
