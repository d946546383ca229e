//! Paginated paper-form layout.
//!
//! A [`Document`] is a list of sections holding labeled lines, text boxes,
//! checkbox groups and tables. Rendering walks the blocks twice: a counting
//! pass on a surface that draws nothing, then the real pass onto a PDF, so the
//! "Page i of N" label in the repeated header is correct everywhere.

pub mod error;
pub mod filter;
pub mod fonts;
pub mod geometry;
pub mod model;
pub mod output;
pub mod pdf;

pub use error::{Error, LayoutWarning};
pub use filter::{BlankCells, KeepAll, RowFilter};
pub use model::Document;
pub use pdf::{Composition, LayoutCursor, Placement, UnitKind};

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Instant;

use pdf::surface::Surface;

/// A finished export: the PDF and what the walk reported about it.
#[derive(Clone, Debug)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub pages: usize,
    pub file_name: String,
    pub warnings: Vec<LayoutWarning>,
}

/// Render with the default blank-row filter.
pub fn render(doc: &Document) -> Result<Export, Error> {
    render_with(doc, &BlankCells)
}

pub fn render_with(doc: &Document, filter: &dyn RowFilter) -> Result<Export, Error> {
    let (bytes, composition) = pdf::render(doc, filter)?;
    Ok(Export {
        bytes,
        pages: composition.pages,
        file_name: output::export_file_name(&doc.chrome),
        warnings: composition.warnings,
    })
}

/// Run only the counting pass.
pub fn count_pages(doc: &Document, filter: &dyn RowFilter) -> Result<usize, Error> {
    let prepared = pdf::Prepared::new(doc, filter)?;
    Ok(pdf::simulate(&prepared)?.pages)
}

/// Both passes onto a fresh caller-supplied surface, e.g. a `RecordingSurface`.
/// A surface that already holds pages is `Error::SurfaceNotEmpty`.
pub fn render_to_surface(
    doc: &Document,
    filter: &dyn RowFilter,
    surface: &mut dyn Surface,
) -> Result<Composition, Error> {
    let prepared = pdf::Prepared::new(doc, filter)?;
    pdf::render_onto(&prepared, surface)
}

/// Render and write `<CODE>-<Version>-<Title>.pdf` into `dir`.
pub fn export_to_dir(
    doc: &Document,
    filter: &dyn RowFilter,
    dir: &Path,
) -> Result<(PathBuf, Export), Error> {
    let t0 = Instant::now();

    let export = render_with(doc, filter)?;
    let t_render = t0.elapsed();

    let path = output::write_artifact(dir, &export.file_name, &export.bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes, {} page(s))",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        export.bytes.len(),
        export.pages,
    );

    Ok((path, export))
}

/// Run a whole export on its own thread. Dropping the handle's result
/// discards the export; nothing is written until rendering has succeeded.
pub fn export_in_background<F>(
    doc: Document,
    dir: PathBuf,
    filter: F,
) -> JoinHandle<Result<(PathBuf, Export), Error>>
where
    F: RowFilter + Send + 'static,
{
    std::thread::spawn(move || export_to_dir(&doc, &filter, &dir))
}

/// Parse a JSON document and render it.
pub fn render_json(json: &str) -> Result<Export, Error> {
    let doc: Document = serde_json::from_str(json)?;
    render(&doc)
}
