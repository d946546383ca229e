use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No metrics for the requested font. Layout cannot proceed without them.
    #[error("no metrics for font {0:?}")]
    Measurement(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The blank-row predicate answered differently for the same row.
    #[error("row filter is not deterministic: table {table}, row {row}")]
    InconsistentRowFilter { table: usize, row: usize },

    /// The counting pass and the final pass placed content differently.
    #[error("pagination drift: simulated {simulated} page(s), rendered {rendered}")]
    PaginationDrift { simulated: usize, rendered: usize },

    /// Layout opens its own pages and needs a surface that has none yet.
    #[error("surface already holds {0} page(s)")]
    SurfaceNotEmpty(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Non-fatal layout problems. The document is still produced.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutWarning {
    /// A unit runs past the bottom limit of `page`: it is taller than the
    /// `available` space left where it was placed, even after a page break.
    Overflow {
        page: usize,
        block: &'static str,
        height: f32,
        available: f32,
    },
}

impl std::fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutWarning::Overflow {
                page,
                block,
                height,
                available,
            } => write!(
                f,
                "{block} on page {page} is {height:.1}mm tall but only {available:.1}mm remain"
            ),
        }
    }
}
