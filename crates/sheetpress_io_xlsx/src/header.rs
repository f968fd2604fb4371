//! Header resolution: the first surviving row becomes column labels.

use crate::spec::{EnumCellValue, SpecHeader, TypeRow};
use crate::util::{create_header_placeholder, is_blank_header_cell};

/// Split `rows` into a resolved header and the remaining data rows.
///
/// Returns `None` when `rows` is empty; callers treat that as "nothing to
/// format" rather than an error.
pub fn resolve_header(rows: Vec<TypeRow>, prefix: &str) -> Option<(SpecHeader, Vec<TypeRow>)> {
    let mut iter_rows = rows.into_iter();
    let row_header = iter_rows.next()?;
    let header = derive_header(&row_header, prefix);
    let data_rows: Vec<TypeRow> = iter_rows.collect();

    log::debug!(
        "Resolved header with {} columns ({} placeholders), {} data rows",
        header.column_count(),
        header.cols_idx_placeholder.len(),
        data_rows.len()
    );
    Some((header, data_rows))
}

/// Convert one row into header names, synthesizing `"{prefix} {n}"` for
/// blank cells.
pub fn derive_header(row: &[EnumCellValue], prefix: &str) -> SpecHeader {
    let mut names = Vec::with_capacity(row.len());
    let mut cols_idx_placeholder = Vec::new();

    for (n_idx_col, value) in row.iter().enumerate() {
        if is_blank_header_cell(value) {
            names.push(create_header_placeholder(prefix, n_idx_col));
            cols_idx_placeholder.push(n_idx_col);
        } else {
            names.push(value.to_text().trim().to_string());
        }
    }

    SpecHeader {
        names,
        cols_idx_placeholder,
    }
}
