use crate::error::Error;
use crate::filter::{RowFilter, filter_rows_checked};
use crate::geometry::{PageGeometry, Point};
use crate::model::Document;

use super::blocks::{BlockLayout, Shape, shape, validate};
use super::chrome::chrome_height;
use super::layout::{TypeSet, draw_lines, wrap};
use super::surface::Surface;
use super::table::TableLayout;

const HEADING_GAP: f32 = 1.5; // mm below a section heading
pub(crate) const BLOCK_GAP: f32 = 2.0; // mm between consecutive blocks

/// What one placed unit is, for placement records.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnitKind {
    Heading { section: usize },
    Block { kind: &'static str },
    TableHeader { table: usize },
    TableRow { table: usize, row: usize },
}

/// The smallest piece the walk places. Tables contribute one unit per row
/// (plus their header); every other block is a single unit.
pub(crate) struct Unit<'a> {
    pub(crate) kind: UnitKind,
    pub(crate) source: Source<'a>,
    pub(crate) height: f32,
    /// Height that must fit for the unit to stay on the current page. Larger
    /// than `height` when the unit keeps with what follows it.
    pub(crate) break_height: f32,
    /// Space left below the unit when the next unit stays on the same page.
    pub(crate) gap_after: f32,
    /// Never break before this unit. Set on a table's first row when header
    /// and row cannot share any page, so the header is not stranded alone.
    pub(crate) glued: bool,
}

pub(crate) enum Source<'a> {
    Heading(Vec<String>),
    Block(&'a dyn BlockLayout),
    TableHeader(usize),
    TableRow(usize, usize),
}

/// A validated, filtered and fully measured document. Both passes walk the
/// same `Prepared`, so they cannot disagree about rows or heights.
pub(crate) struct Prepared<'a> {
    pub(crate) doc: &'a Document,
    pub(crate) geometry: PageGeometry,
    pub(crate) ts: TypeSet,
    pub(crate) tables: Vec<TableLayout<'a>>,
    pub(crate) units: Vec<Unit<'a>>,
}

impl<'a> Prepared<'a> {
    pub(crate) fn new(doc: &'a Document, filter: &dyn RowFilter) -> Result<Self, Error> {
        let geometry = PageGeometry::new(&doc.page, doc.limits, chrome_height(&doc.chrome))?;
        let ts = TypeSet::new(&doc.style)?;
        let width = geometry.content_width();
        let largest_page = geometry.usable_height(1).max(geometry.usable_height(2));

        let mut tables = Vec::new();
        let mut units: Vec<Unit<'a>> = Vec::new();

        for (si, section) in doc.sections.iter().enumerate() {
            if let Some(heading) = section.heading.as_deref().filter(|h| !h.trim().is_empty()) {
                let lines = wrap(heading, width, ts.bold);
                let height = ts.lines_height(lines.len());
                units.push(Unit {
                    kind: UnitKind::Heading { section: si },
                    source: Source::Heading(lines),
                    height,
                    break_height: height,
                    gap_after: HEADING_GAP,
                    glued: false,
                });
            }

            for block in &section.blocks {
                validate(block, width)?;
                match shape(block) {
                    Shape::Table(table) => {
                        let ti = tables.len();
                        let rows = filter_rows_checked(ti, &table.rows, filter)?;
                        let layout = TableLayout::new(table, &rows, &ts);
                        let first_unit = units.len();
                        if layout.has_header() {
                            let h = layout.header_height();
                            units.push(Unit {
                                kind: UnitKind::TableHeader { table: ti },
                                source: Source::TableHeader(ti),
                                height: h,
                                break_height: h,
                                gap_after: 0.0,
                                glued: false,
                            });
                        }
                        for ri in 0..layout.row_count() {
                            let h = layout.row_height(ri);
                            let glued = ri == 0
                                && layout.has_header()
                                && layout.header_height() + h > largest_page;
                            if glued {
                                log::debug!(
                                    "table {ti}: header and first row ({:.1}mm) fit no page; placing them together",
                                    layout.header_height() + h
                                );
                            }
                            units.push(Unit {
                                kind: UnitKind::TableRow { table: ti, row: ri },
                                source: Source::TableRow(ti, ri),
                                height: h,
                                break_height: h,
                                gap_after: 0.0,
                                glued,
                            });
                        }
                        if units.len() > first_unit {
                            if let Some(last) = units.last_mut() {
                                last.gap_after = BLOCK_GAP;
                            }
                        }
                        tables.push(layout);
                    }
                    Shape::Single(layout) => {
                        let h = layout.required_height(width, &ts);
                        units.push(Unit {
                            kind: UnitKind::Block { kind: block.kind() },
                            source: Source::Block(layout),
                            height: h,
                            break_height: h,
                            gap_after: BLOCK_GAP,
                            glued: false,
                        });
                    }
                }
            }
        }

        keep_with_next(&mut units);

        Ok(Prepared {
            doc,
            geometry,
            ts,
            tables,
            units,
        })
    }

    pub(crate) fn paint_unit(&self, unit: &Unit<'_>, surface: &mut dyn Surface, at: Point) {
        let width = self.geometry.content_width();
        match &unit.source {
            Source::Heading(lines) => draw_lines(
                surface,
                lines,
                at.x,
                at.y,
                width,
                crate::model::Align::Left,
                self.ts.bold,
                self.ts.line_height,
            ),
            Source::Block(block) => block.paint(surface, at, width, &self.ts),
            Source::TableHeader(ti) => self.tables[*ti].paint_header(surface, at, &self.ts),
            Source::TableRow(ti, ri) => self.tables[*ti].paint_row(surface, *ri, at, &self.ts),
        }
    }

    /// The header to repeat when `unit` opens a page partway through a table.
    pub(crate) fn continued_table(&self, unit: &Unit<'_>) -> Option<usize> {
        match unit.source {
            Source::TableRow(ti, _) if self.tables[ti].has_header() => Some(ti),
            _ => None,
        }
    }
}

/// Headings keep with the next unit; table headers keep with their first row.
/// Walks backwards so a heading followed by a table header carries both.
fn keep_with_next(units: &mut [Unit<'_>]) {
    for i in (0..units.len().saturating_sub(1)).rev() {
        let keeps = match (&units[i].source, &units[i + 1].source) {
            (Source::Heading(_), _) => true,
            (Source::TableHeader(a), Source::TableRow(b, _)) => a == b,
            _ => false,
        };
        if keeps {
            units[i].break_height = units[i].height + units[i].gap_after + units[i + 1].break_height;
        }
    }
}
