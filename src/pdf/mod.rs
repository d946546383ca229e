//! The paginating walk.
//!
//! `compose` is the only place page breaks are decided. It runs twice per
//! export: once against a [`NullSurface`] with a placeholder total just to
//! learn how many pages there are, then against the real surface with that
//! total, so "Page 1 of N" is right on the very first page.

pub mod blocks;
pub mod chrome;
pub mod layout;
mod plan;
pub mod surface;
mod table;

use crate::error::{Error, LayoutWarning};
use crate::filter::RowFilter;
use crate::geometry::Point;
use crate::model::Document;

use chrome::{ChromeContext, paint_footer, paint_header};
use surface::{NullSurface, PdfInfo, PdfSurface, Surface};

pub(crate) use plan::Prepared;
pub use plan::UnitKind;

// Float slack when comparing a cursor with the top of the content area.
const TOP_EPSILON: f32 = 0.01;
// Float slack before a unit ending at the bottom limit counts as overflow.
const OVERFLOW_EPSILON: f32 = 0.001;

/// Position of the next unit: a page and a y within it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutCursor {
    pub page_index: usize,
    pub y: f32,
}

impl LayoutCursor {
    pub fn start(top: f32) -> Self {
        LayoutCursor { page_index: 1, y: top }
    }

    pub fn advance(self, height: f32) -> Self {
        LayoutCursor {
            y: self.y + height,
            ..self
        }
    }

    pub fn next_page(self, top: f32) -> Self {
        LayoutCursor {
            page_index: self.page_index + 1,
            y: top,
        }
    }
}

/// Where one unit landed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub y: f32,
    pub height: f32,
    pub kind: UnitKind,
}

/// Result of one walk.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    pub pages: usize,
    pub placements: Vec<Placement>,
    pub warnings: Vec<LayoutWarning>,
}

impl Composition {
    pub fn placements_on(&self, page: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.page == page)
    }

    /// Data rows of the given table (by document order) placed on `page`.
    pub fn table_rows_on(&self, page: usize, table: usize) -> usize {
        self.placements_on(page)
            .filter(|p| matches!(p.kind, UnitKind::TableRow { table: t, .. } if t == table))
            .count()
    }
}

/// Walk every unit of `prepared` onto `surface`, painting chrome that claims
/// `total_pages` pages.
pub(crate) fn compose(
    prepared: &Prepared<'_>,
    surface: &mut dyn Surface,
    total_pages: usize,
) -> Result<Composition, Error> {
    let geometry = &prepared.geometry;
    let chrome = &prepared.doc.chrome;
    let ts = &prepared.ts;
    let x = geometry.content_left();

    if surface.page_count() != 0 {
        return Err(Error::SurfaceNotEmpty(surface.page_count()));
    }

    let mut cursor = LayoutCursor::start(geometry.content_top(1));
    let mut gap = 0.0f32;
    let mut placements = Vec::with_capacity(prepared.units.len());
    let mut warnings = Vec::new();

    surface.new_page();
    paint_header(surface, geometry, &ChromeContext::new(chrome, 1, total_pages), ts);

    for unit in &prepared.units {
        let top = geometry.content_top(cursor.page_index);
        let at_top = cursor.y <= top + TOP_EPSILON;
        let limit = geometry.bottom_limit(cursor.page_index);

        if !at_top && !unit.glued && cursor.y + gap + unit.break_height > limit {
            paint_footer(surface, geometry, &ChromeContext::new(chrome, cursor.page_index, total_pages), ts);
            cursor = cursor.next_page(geometry.content_top(cursor.page_index + 1));
            gap = 0.0;
            surface.new_page();
            paint_header(surface, geometry, &ChromeContext::new(chrome, cursor.page_index, total_pages), ts);
            log::debug!("page break before {:?} -> page {}", unit.kind, cursor.page_index);

            if let Some(ti) = prepared.continued_table(unit) {
                let table = &prepared.tables[ti];
                if table.header_height() + unit.height > geometry.usable_height(cursor.page_index) {
                    log::debug!("table {ti}: header not repeated, the row needs the whole page");
                } else {
                    table.paint_header(surface, Point::new(x, cursor.y), ts);
                    placements.push(Placement {
                        page: cursor.page_index,
                        y: cursor.y,
                        height: table.header_height(),
                        kind: UnitKind::TableHeader { table: ti },
                    });
                    cursor = cursor.advance(table.header_height());
                }
            }
        } else if !at_top {
            cursor = cursor.advance(gap);
        }

        let limit = geometry.bottom_limit(cursor.page_index);
        if cursor.y + unit.height > limit + OVERFLOW_EPSILON {
            let warning = LayoutWarning::Overflow {
                page: cursor.page_index,
                block: unit_label(&unit.kind),
                height: unit.height,
                available: limit - cursor.y,
            };
            log::warn!("{warning}");
            warnings.push(warning);
        }

        log::debug!(
            "place {:?} page={} y={:.2} h={:.2}",
            unit.kind,
            cursor.page_index,
            cursor.y,
            unit.height
        );
        prepared.paint_unit(unit, surface, Point::new(x, cursor.y));
        placements.push(Placement {
            page: cursor.page_index,
            y: cursor.y,
            height: unit.height,
            kind: unit.kind,
        });
        cursor = cursor.advance(unit.height);
        gap = unit.gap_after;
    }

    paint_footer(surface, geometry, &ChromeContext::new(chrome, cursor.page_index, total_pages), ts);
    debug_assert_eq!(surface.page_count(), cursor.page_index);

    Ok(Composition {
        pages: cursor.page_index,
        placements,
        warnings,
    })
}

fn unit_label(kind: &UnitKind) -> &'static str {
    match kind {
        UnitKind::Heading { .. } => "Heading",
        UnitKind::Block { kind } => *kind,
        UnitKind::TableHeader { .. } => "TableHeader",
        UnitKind::TableRow { .. } => "TableRow",
    }
}

/// Counting pass: the page count, with nothing materialized.
pub(crate) fn simulate(prepared: &Prepared<'_>) -> Result<Composition, Error> {
    compose(prepared, &mut NullSurface::new(), 1)
}

/// Counting pass followed by the final pass onto `surface`.
pub(crate) fn render_onto(
    prepared: &Prepared<'_>,
    surface: &mut dyn Surface,
) -> Result<Composition, Error> {
    let simulated = simulate(prepared)?;
    let rendered = compose(prepared, surface, simulated.pages)?;
    if rendered.pages != simulated.pages || rendered.placements != simulated.placements {
        return Err(Error::PaginationDrift {
            simulated: simulated.pages,
            rendered: rendered.pages,
        });
    }
    Ok(rendered)
}

/// Both passes, producing PDF bytes.
pub(crate) fn render(doc: &Document, filter: &dyn RowFilter) -> Result<(Vec<u8>, Composition), Error> {
    let t0 = std::time::Instant::now();
    let prepared = Prepared::new(doc, filter)?;
    let t_prepare = t0.elapsed();

    let mut surface = PdfSurface::new(prepared.geometry.width, prepared.geometry.height);
    let composition = render_onto(&prepared, &mut surface)?;
    let t_layout = t0.elapsed();

    let bytes = surface.finish(&PdfInfo {
        title: doc.chrome.title.clone(),
        subject: doc.chrome.document_code.clone(),
    });
    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: prepare={:.1}ms, layout={:.1}ms, assembly={:.1}ms ({} page(s), {} unit(s))",
        t_prepare.as_secs_f64() * 1000.0,
        (t_layout - t_prepare).as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
        composition.pages,
        prepared.units.len(),
    );

    Ok((bytes, composition))
}
