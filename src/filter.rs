//! Blank-row elision for tables.
//!
//! Rows are filtered once, before anything is measured, so the counting pass
//! and the final pass always see the same rows.

use crate::error::Error;

/// Decides whether a table row carries no data.
pub trait RowFilter {
    fn is_blank(&self, row: &[String]) -> bool;
}

impl<F> RowFilter for F
where
    F: Fn(&[String]) -> bool,
{
    fn is_blank(&self, row: &[String]) -> bool {
        self(row)
    }
}

/// A row is blank when every cell is empty or whitespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlankCells;

impl RowFilter for BlankCells {
    fn is_blank(&self, row: &[String]) -> bool {
        row.iter().all(|cell| cell.trim().is_empty())
    }
}

/// Keeps every row.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepAll;

impl RowFilter for KeepAll {
    fn is_blank(&self, _row: &[String]) -> bool {
        false
    }
}

pub fn filter_rows<'a>(rows: &'a [Vec<String>], filter: &dyn RowFilter) -> Vec<&'a [String]> {
    rows.iter()
        .map(Vec::as_slice)
        .filter(|row| !filter.is_blank(row))
        .collect()
}

/// Filter and then ask the predicate again; a predicate that changes its mind
/// would let two passes disagree about which rows exist.
pub(crate) fn filter_rows_checked<'a>(
    table: usize,
    rows: &'a [Vec<String>],
    filter: &dyn RowFilter,
) -> Result<Vec<&'a [String]>, Error> {
    let mut kept = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let blank = filter.is_blank(row);
        if filter.is_blank(row) != blank {
            return Err(Error::InconsistentRowFilter { table, row: i });
        }
        if !blank {
            kept.push(row.as_slice());
        }
    }
    if kept.len() < rows.len() {
        log::debug!("table {table}: dropped {} blank row(s) of {}", rows.len() - kept.len(), rows.len());
    }
    Ok(kept)
}
