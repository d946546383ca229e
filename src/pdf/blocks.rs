use crate::error::Error;
use crate::geometry::Point;
use crate::model::{Align, Block, CheckboxGroup, LabeledLine, Spacer, Table, TextBox};

use super::layout::{TypeSet, draw_lines, wrap};
use super::surface::{Paint, Surface};
use super::table::TableLayout;

pub const BORDER_WIDTH: f32 = 0.2; // mm
pub const CHECKBOX_SIZE: f32 = 3.5; // mm
/// Distance from a checkbox's left edge to its label, checked or not.
pub const CHECKBOX_LABEL_OFFSET: f32 = CHECKBOX_SIZE + 2.0;
const CHECK_MARK_INSET: f32 = 0.7;
const LABEL_GAP: f32 = 2.0;
const UNDERLINE_DROP: f32 = 0.8;

/// Height/paint contract shared by every block. `required_height` never
/// touches a surface; `paint` draws from the same wrapped lines.
pub trait BlockLayout {
    fn required_height(&self, width: f32, ts: &TypeSet) -> f32;
    fn paint(&self, surface: &mut dyn Surface, at: Point, width: f32, ts: &TypeSet);
}

/// Reject shapes no width can lay out.
pub(crate) fn validate(block: &Block, width: f32) -> Result<(), Error> {
    match block {
        Block::LabeledLine(line) => {
            if line.label_width < 0.0 || line.label_width >= width {
                return Err(Error::InvalidDocument(format!(
                    "label width {:.1}mm of {:?} leaves no room in a {width:.1}mm line",
                    line.label_width, line.label
                )));
            }
        }
        Block::TextBox(tb) => {
            if tb.width.is_some_and(|w| w <= 2.0 * LABEL_GAP) {
                return Err(Error::InvalidDocument(format!(
                    "text box {:?} is too narrow",
                    tb.label
                )));
            }
        }
        Block::CheckboxGroup(group) => {
            if group.columns == 0 {
                return Err(Error::InvalidDocument(
                    "checkbox group needs at least one column".into(),
                ));
            }
        }
        Block::Table(table) => TableLayout::validate(table, width)?,
        Block::Spacer(spacer) => {
            if spacer.height < 0.0 {
                return Err(Error::InvalidDocument("spacer height is negative".into()));
            }
        }
    }
    Ok(())
}

impl BlockLayout for LabeledLine {
    fn required_height(&self, width: f32, ts: &TypeSet) -> f32 {
        let (label, value) = self.lines(width, ts);
        ts.lines_height(label.len().max(value.len()))
    }

    fn paint(&self, surface: &mut dyn Surface, at: Point, width: f32, ts: &TypeSet) {
        let (label, value) = self.lines(width, ts);
        let value_x = at.x + self.label_width;
        let value_w = width - self.label_width;
        draw_lines(surface, &label, at.x, at.y, self.label_width, Align::Left, ts.bold, ts.line_height);
        draw_lines(surface, &value, value_x, at.y, value_w, Align::Left, ts.regular, ts.line_height);
        if self.underline {
            for i in 0..value.len() {
                let y = at.y + (i + 1) as f32 * ts.line_height - UNDERLINE_DROP;
                surface.line(value_x, y, at.x + width, y, BORDER_WIDTH);
            }
        }
    }
}

impl LabeledLine {
    fn lines(&self, width: f32, ts: &TypeSet) -> (Vec<String>, Vec<String>) {
        let label_w = (self.label_width - LABEL_GAP).max(0.0);
        let label = wrap(&self.label, label_w, ts.bold);
        let value = wrap(&self.value, width - self.label_width, ts.regular);
        (label, value)
    }
}

impl BlockLayout for TextBox {
    fn required_height(&self, width: f32, ts: &TypeSet) -> f32 {
        let (label, _, box_h, _) = self.measure(width, ts);
        ts.lines_height(label.len()) + box_h
    }

    fn paint(&self, surface: &mut dyn Surface, at: Point, width: f32, ts: &TypeSet) {
        let (label, lines, box_h, box_w) = self.measure(width, ts);
        let label_h = ts.lines_height(label.len());
        draw_lines(surface, &label, at.x, at.y, box_w, Align::Left, ts.bold, ts.line_height);
        let box_top = at.y + label_h;
        surface.rect(at.x, box_top, box_w, box_h, Paint::Stroke(BORDER_WIDTH));
        draw_lines(
            surface,
            &lines,
            at.x + ts.padding,
            box_top + ts.padding,
            box_w - 2.0 * ts.padding,
            Align::Left,
            ts.regular,
            ts.line_height,
        );
    }
}

impl TextBox {
    /// (label lines, text lines, box height, box width). The box grows past
    /// its declared height rather than clip text.
    fn measure(&self, width: f32, ts: &TypeSet) -> (Vec<String>, Vec<String>, f32, f32) {
        let box_w = self.width.map_or(width, |w| w.min(width));
        let label = if self.label.trim().is_empty() {
            Vec::new()
        } else {
            wrap(&self.label, box_w, ts.bold)
        };
        let lines = wrap(&self.text, box_w - 2.0 * ts.padding, ts.regular);
        let content_h = ts.lines_height(lines.len()) + 2.0 * ts.padding;
        let box_h = self.height.map_or(content_h, |h| h.max(content_h));
        (label, lines, box_h, box_w)
    }
}

impl BlockLayout for CheckboxGroup {
    fn required_height(&self, width: f32, ts: &TypeSet) -> f32 {
        let (label, rows) = self.layout(width, ts);
        ts.lines_height(label.len()) + rows.iter().map(|r| r.height).sum::<f32>()
    }

    fn paint(&self, surface: &mut dyn Surface, at: Point, width: f32, ts: &TypeSet) {
        let (label, rows) = self.layout(width, ts);
        draw_lines(surface, &label, at.x, at.y, width, Align::Left, ts.bold, ts.line_height);

        let col_w = width / self.columns.max(1) as f32;
        let mut y = at.y + ts.lines_height(label.len());
        for row in &rows {
            for (col, (option_idx, lines)) in row.cells.iter().enumerate() {
                let option = &self.options[*option_idx];
                let box_x = at.x + col as f32 * col_w;
                let box_y = y + (ts.line_height - CHECKBOX_SIZE) / 2.0;
                surface.rect(box_x, box_y, CHECKBOX_SIZE, CHECKBOX_SIZE, Paint::Stroke(BORDER_WIDTH));
                if option.checked {
                    paint_check_mark(surface, box_x, box_y);
                }
                draw_lines(
                    surface,
                    lines,
                    box_x + CHECKBOX_LABEL_OFFSET,
                    y,
                    col_w - CHECKBOX_LABEL_OFFSET,
                    Align::Left,
                    ts.regular,
                    ts.line_height,
                );
            }
            y += row.height;
        }
    }
}

struct CheckboxRow {
    height: f32,
    cells: Vec<(usize, Vec<String>)>,
}

impl CheckboxGroup {
    fn layout(&self, width: f32, ts: &TypeSet) -> (Vec<String>, Vec<CheckboxRow>) {
        let label = match &self.label {
            Some(l) if !l.trim().is_empty() => wrap(l, width, ts.bold),
            _ => Vec::new(),
        };
        let columns = self.columns.max(1);
        let label_w = (width / columns as f32 - CHECKBOX_LABEL_OFFSET - LABEL_GAP).max(0.0);
        let rows = self
            .options
            .iter()
            .enumerate()
            .collect::<Vec<_>>()
            .chunks(columns)
            .map(|chunk| {
                let cells: Vec<(usize, Vec<String>)> = chunk
                    .iter()
                    .map(|(i, opt)| (*i, wrap(&opt.label, label_w, ts.regular)))
                    .collect();
                let tallest = cells.iter().map(|(_, l)| l.len()).max().unwrap_or(1);
                CheckboxRow {
                    height: ts.lines_height(tallest),
                    cells,
                }
            })
            .collect();
        (label, rows)
    }
}

/// A stroked cross inside the box; no glyph, so no encoding concerns.
fn paint_check_mark(surface: &mut dyn Surface, x: f32, y: f32) {
    let (x1, y1) = (x + CHECK_MARK_INSET, y + CHECK_MARK_INSET);
    let (x2, y2) = (x + CHECKBOX_SIZE - CHECK_MARK_INSET, y + CHECKBOX_SIZE - CHECK_MARK_INSET);
    surface.line(x1, y1, x2, y2, 0.35);
    surface.line(x1, y2, x2, y1, 0.35);
}

impl BlockLayout for Spacer {
    fn required_height(&self, _width: f32, _ts: &TypeSet) -> f32 {
        self.height
    }

    fn paint(&self, _surface: &mut dyn Surface, _at: Point, _width: f32, _ts: &TypeSet) {}
}

/// How a block enters the paginating walk: tables are split into header and
/// row units, everything else is placed whole.
pub(crate) enum Shape<'a> {
    Table(&'a Table),
    Single(&'a dyn BlockLayout),
}

pub(crate) fn shape(block: &Block) -> Shape<'_> {
    match block {
        Block::LabeledLine(b) => Shape::Single(b),
        Block::TextBox(b) => Shape::Single(b),
        Block::CheckboxGroup(b) => Shape::Single(b),
        Block::Spacer(b) => Shape::Single(b),
        Block::Table(t) => Shape::Table(t),
    }
}
