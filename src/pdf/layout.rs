use crate::error::Error;
use crate::fonts::Font;
use crate::model::{Align, TextStyle};

use super::surface::Surface;

// Absorbs float noise when a line is filled exactly to the limit.
const WIDTH_EPSILON: f32 = 0.001;

/// Resolved fonts and spacing for one document.
#[derive(Clone, Copy, Debug)]
pub struct TypeSet {
    pub regular: Font,
    pub bold: Font,
    pub line_height: f32, // mm
    pub padding: f32,     // mm
}

impl TypeSet {
    pub fn new(style: &TextStyle) -> Result<Self, Error> {
        if style.font_size <= 0.0 || style.line_height <= 0.0 || style.padding < 0.0 {
            return Err(Error::InvalidDocument(format!(
                "text style needs a positive size and line height (got {}pt / {}mm, padding {}mm)",
                style.font_size, style.line_height, style.padding
            )));
        }
        Ok(TypeSet {
            regular: Font::new(&style.font, style.font_size)?,
            bold: Font::new(&style.bold_font, style.font_size)?,
            line_height: style.line_height,
            padding: style.padding,
        })
    }

    pub fn lines_height(&self, count: usize) -> f32 {
        count as f32 * self.line_height
    }
}

/// Break `text` into lines no wider than `max_width` (mm).
///
/// Words are separated by whitespace and `\n` forces a break. An empty input
/// yields one empty line so blank fields still reserve their row. A single
/// word wider than `max_width` is kept whole on its own line and overflows.
pub fn wrap(text: &str, max_width: f32, font: Font) -> Vec<String> {
    let space_w = font.space_width();
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_w = 0.0f32;

        for word in paragraph.split_whitespace() {
            let ww = font.text_width(word);
            if ww > max_width + WIDTH_EPSILON {
                log::debug!("word {word:?} ({ww:.1}mm) is wider than its {max_width:.1}mm line");
            }
            if current.is_empty() {
                current.push_str(word);
                current_w = ww;
            } else if current_w + space_w + ww > max_width + WIDTH_EPSILON {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_w = ww;
            } else {
                current.push(' ');
                current.push_str(word);
                current_w += space_w + ww;
            }
        }
        lines.push(current);
    }

    lines
}

/// Baseline offset inside a line box: caps are centered vertically.
pub fn baseline_offset(font: Font, line_height: f32) -> f32 {
    (line_height + font.cap_height()) / 2.0
}

/// Paint pre-wrapped lines starting at `top`, one `line_height` apart,
/// aligned inside `[x, x + width]`.
pub fn draw_lines(
    surface: &mut dyn Surface,
    lines: &[String],
    x: f32,
    top: f32,
    width: f32,
    align: Align,
    font: Font,
    line_height: f32,
) {
    let offset = baseline_offset(font, line_height);
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let line_x = match align {
            Align::Left => x,
            Align::Center => x + (width - surface.measure(line, font)) / 2.0,
            Align::Right => x + width - surface.measure(line, font),
        };
        surface.text(line_x, top + i as f32 * line_height + offset, line, font);
    }
}
