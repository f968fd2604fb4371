//! `sheetpress_io_xlsx` v1:
//! Rust-side spreadsheet reformatting engine.
//!
//! Stages run in order, each owning one module:
//! - `reader`   : row extraction from sheet 0 (normalize, drop blank rows)
//! - `header`   : header resolution with placeholder names
//! - `layout`   : per-column width estimation
//! - `writer`   : styled single-sheet workbook builder
//! - `pipeline` : one-call entry points (`path -> path`, `bytes -> bytes`)
//!
//! Shared pieces:
//! - `conf`  : constants and default presets
//! - `spec`  : specs/models/options/report
//! - `error` : error type and kinds
//! - `util`  : pure helper functions
pub mod conf;
pub mod error;
pub mod header;
pub mod layout;
pub mod pipeline;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use conf::{
    N_HEIGHT_EXCEL_ROW_MAX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL, derive_default_format_options, derive_default_xlsx_formats,
};
pub use error::{EnumFormatErrorKind, XlsxFormatError, XlsxFormatResult};
pub use header::resolve_header;
pub use layout::plan_column_layout;
pub use pipeline::{format_xlsx, format_xlsx_bytes, validate_format_options};
pub use reader::{read_rows_from_bytes, read_rows_from_path};
pub use spec::{
    EnumCellValue, EnumFormatOutcome, SpecAutofitCellsPolicy, SpecCellFormat, SpecColumnLayout,
    SpecHeader, SpecRowExtraction, SpecXlsxFormatOptions, SpecXlsxFormatReport, TypeRow,
};
pub use util::sanitize_sheet_name;
pub use writer::{build_workbook, save_workbook_to_buffer};
