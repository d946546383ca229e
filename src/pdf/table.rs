use crate::error::Error;
use crate::geometry::Point;
use crate::model::{RowHeight, Table};

use super::blocks::BORDER_WIDTH;
use super::layout::{TypeSet, draw_lines, wrap};
use super::surface::{Paint, Surface};

const WIDTH_TOLERANCE: f32 = 0.5; // mm
const HEADER_FILL: f32 = 0.9;

pub(crate) struct RowLayout {
    pub(crate) height: f32,
    cells: Vec<Vec<String>>,
}

/// A table with its rows already filtered and measured. Every pass paints
/// from the same `RowLayout`s, so row heights cannot drift between passes.
pub(crate) struct TableLayout<'a> {
    table: &'a Table,
    col_x: Vec<f32>,
    header: Option<RowLayout>,
    rows: Vec<RowLayout>,
}

impl<'a> TableLayout<'a> {
    pub(crate) fn validate(table: &Table, width: f32) -> Result<(), Error> {
        if table.columns.is_empty() {
            return Err(Error::InvalidDocument("table has no columns".into()));
        }
        if let Some(col) = table.columns.iter().find(|c| c.width <= 0.0) {
            return Err(Error::InvalidDocument(format!(
                "column {:?} has non-positive width {}",
                col.header, col.width
            )));
        }
        let total: f32 = table.columns.iter().map(|c| c.width).sum();
        if (total - width).abs() > WIDTH_TOLERANCE {
            return Err(Error::InvalidDocument(format!(
                "column widths sum to {total:.1}mm but the content width is {width:.1}mm"
            )));
        }
        match table.row_height {
            RowHeight::Fixed(h) | RowHeight::Auto { min: h } if h < 0.0 || !h.is_finite() => {
                return Err(Error::InvalidDocument(format!("invalid row height {h}")));
            }
            RowHeight::Fixed(h) if h == 0.0 => {
                return Err(Error::InvalidDocument("fixed row height is zero".into()));
            }
            _ => {}
        }
        if let Some((i, row)) = table
            .rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() > table.columns.len())
        {
            return Err(Error::InvalidDocument(format!(
                "row {i} has {} cells but the table has {} columns",
                row.len(),
                table.columns.len()
            )));
        }
        Ok(())
    }

    pub(crate) fn new(table: &'a Table, rows: &[&[String]], ts: &TypeSet) -> Self {
        let mut col_x = Vec::with_capacity(table.columns.len());
        let mut x = 0.0f32;
        for col in &table.columns {
            col_x.push(x);
            x += col.width;
        }

        let header = if table.has_header() {
            let cells: Vec<String> = table.columns.iter().map(|c| c.header.clone()).collect();
            Some(Self::measure_row(table, &cells, ts, true))
        } else {
            None
        };
        let rows = rows
            .iter()
            .map(|cells| Self::measure_row(table, cells, ts, false))
            .collect();

        TableLayout {
            table,
            col_x,
            header,
            rows,
        }
    }

    fn measure_row(table: &Table, cells: &[String], ts: &TypeSet, bold: bool) -> RowLayout {
        let font = if bold { ts.bold } else { ts.regular };
        let cells: Vec<Vec<String>> = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let text = cells.get(i).map(String::as_str).unwrap_or("");
                wrap(text, (col.width - 2.0 * ts.padding).max(0.0), font)
            })
            .collect();
        let tallest = cells.iter().map(|l| l.len()).max().unwrap_or(1);
        let content_h = ts.lines_height(tallest) + 2.0 * ts.padding;
        let height = match table.row_height {
            RowHeight::Fixed(h) => h,
            RowHeight::Auto { min } => content_h.max(min),
        };
        RowLayout { height, cells }
    }

    pub(crate) fn has_header(&self) -> bool {
        self.header.is_some()
    }

    pub(crate) fn header_height(&self) -> f32 {
        self.header.as_ref().map_or(0.0, |h| h.height)
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn row_height(&self, row: usize) -> f32 {
        self.rows[row].height
    }

    pub(crate) fn paint_header(&self, surface: &mut dyn Surface, at: Point, ts: &TypeSet) {
        if let Some(header) = &self.header {
            self.paint_row_layout(surface, header, at, ts, true);
        }
    }

    pub(crate) fn paint_row(&self, surface: &mut dyn Surface, row: usize, at: Point, ts: &TypeSet) {
        self.paint_row_layout(surface, &self.rows[row], at, ts, false);
    }

    fn paint_row_layout(
        &self,
        surface: &mut dyn Surface,
        row: &RowLayout,
        at: Point,
        ts: &TypeSet,
        header: bool,
    ) {
        let font = if header { ts.bold } else { ts.regular };
        // Fixed rows draw only the lines that fit.
        let visible = (((row.height - 2.0 * ts.padding) / ts.line_height) + 1e-3)
            .floor()
            .max(1.0) as usize;

        for ((col, lines), x_off) in self.table.columns.iter().zip(&row.cells).zip(&self.col_x) {
            let x = at.x + x_off;
            if header {
                surface.rect(x, at.y, col.width, row.height, Paint::Fill(HEADER_FILL));
            }
            surface.rect(x, at.y, col.width, row.height, Paint::Stroke(BORDER_WIDTH));
            let shown = &lines[..lines.len().min(visible)];
            if shown.len() < lines.len() {
                log::debug!(
                    "table cell truncated to {} of {} lines by fixed row height {:.1}mm",
                    shown.len(),
                    lines.len(),
                    row.height
                );
            }
            draw_lines(
                surface,
                shown,
                x + ts.padding,
                at.y + ts.padding,
                col.width - 2.0 * ts.padding,
                col.align,
                font,
                ts.line_height,
            );
        }
    }
}
