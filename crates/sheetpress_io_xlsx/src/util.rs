//! Stateless helper utilities used by the format pipeline.

use std::sync::LazyLock;

use regex::Regex;

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::{EnumCellValue, TypeRow};

static RE_WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));

////////////////////////////////////////////////////////////////////////////////
// #region TextNormalization

/// Trim `text` and collapse every internal whitespace run to one space.
pub fn normalize_cell_text(text: &str) -> String {
    RE_WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Normalize string cells; other variants pass through unchanged.
pub fn normalize_cell_value(value: EnumCellValue) -> EnumCellValue {
    match value {
        EnumCellValue::String(s) => EnumCellValue::String(normalize_cell_text(&s)),
        other => other,
    }
}

/// Character count of the cell's text representation.
pub fn count_cell_chars(value: &EnumCellValue) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(s) => s.chars().count(),
        other => other.to_text().chars().count(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BlankPredicates

/// A cell is blank when it is `None` or its text is whitespace-only.
pub fn is_blank_cell(value: &EnumCellValue) -> bool {
    match value {
        EnumCellValue::None => true,
        EnumCellValue::String(s) => s.trim().is_empty(),
        other => other.to_text().trim().is_empty(),
    }
}

/// A row is blank when every cell is blank. A zero-length row is blank.
pub fn is_blank_row(row: &[EnumCellValue]) -> bool {
    row.iter().all(is_blank_cell)
}

/// A header cell needs a placeholder when its trimmed text is empty.
pub fn is_blank_header_cell(value: &EnumCellValue) -> bool {
    value.to_text().trim().is_empty()
}

/// Placeholder header name for zero-based column `idx_col` (`"Column 1"`, ...).
pub fn create_header_placeholder(prefix: &str, idx_col: usize) -> String {
    format!("{prefix} {}", idx_col + 1)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RowShaping

/// Right-pad `row` with `None` up to `n_cols`. Longer rows are returned
/// unchanged.
pub fn pad_row(row: &[EnumCellValue], n_cols: usize) -> TypeRow {
    let mut l_row = row.to_vec();
    if l_row.len() < n_cols {
        l_row.resize(n_cols, EnumCellValue::None);
    }
    l_row
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
