//! XLSX writer kernel that builds the styled single-sheet output workbook.

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};

use crate::conf::{N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::error::{XlsxFormatError, XlsxFormatResult};
use crate::spec::{
    EnumCellValue, SpecCellFormat, SpecColumnLayout, SpecHeader, SpecXlsxFormatOptions,
    SpecXlsxFormatReport, TypeRow,
};
use crate::util::{pad_row, sanitize_sheet_name};

/// Target label used in errors for in-memory output.
pub const C_TARGET_BUFFER: &str = "<buffer>";

/// Rows above the scrolling pane (the header).
const N_ROWS_FROZEN: u32 = 1;
/// Columns left of the scrolling pane.
const N_COLS_FROZEN: u16 = 0;

/// Build the output workbook: one sheet, header row styled and frozen,
/// data rows padded to the header width with body style on every cell.
///
/// Nothing is written to disk; see [`save_workbook_to_buffer`].
pub fn build_workbook(
    header: &SpecHeader,
    data_rows: &[TypeRow],
    layout: &SpecColumnLayout,
    options: &SpecXlsxFormatOptions,
    report: &mut SpecXlsxFormatReport,
) -> XlsxFormatResult<Workbook> {
    let n_cols = header.column_count();
    if n_cols > N_NCOLS_EXCEL_MAX {
        return Err(XlsxFormatError::write(
            C_TARGET_BUFFER,
            format!("{n_cols} columns exceed the Excel limit of {N_NCOLS_EXCEL_MAX}."),
        ));
    }
    if data_rows.len() >= N_NROWS_EXCEL_MAX {
        return Err(XlsxFormatError::write(
            C_TARGET_BUFFER,
            format!(
                "{} data rows plus header exceed the Excel limit of {N_NROWS_EXCEL_MAX}.",
                data_rows.len()
            ),
        ));
    }
    if layout.widths.len() != n_cols {
        return Err(XlsxFormatError::write(
            C_TARGET_BUFFER,
            format!(
                "column layout has {} widths for {n_cols} header columns.",
                layout.widths.len()
            ),
        ));
    }

    let fmt_header = derive_rust_xlsx_format(&options.fmt_header);
    let fmt_body = derive_rust_xlsx_format(&options.fmt_body);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sanitize_sheet_name(&options.sheet_name, "_"))
        .map_err(derive_xlsx_error)?;

    for (n_idx_col, n_width) in layout.widths.iter().enumerate() {
        worksheet
            .set_column_width(cast_col_num(n_idx_col)?, *n_width)
            .map_err(derive_xlsx_error)?;
    }

    write_header(worksheet, header, &fmt_header, options.height_header_row)?;
    worksheet
        .set_freeze_panes(N_ROWS_FROZEN, N_COLS_FROZEN)
        .map_err(derive_xlsx_error)?;

    let mut n_rows_overwide = 0usize;
    for (n_idx_row, row) in data_rows.iter().enumerate() {
        if row.len() > n_cols {
            n_rows_overwide += 1;
        }
        let l_row_padded = pad_row(row, n_cols);
        for (n_idx_col, value) in l_row_padded.iter().take(n_cols).enumerate() {
            write_cell_with_format(worksheet, n_idx_row + 1, n_idx_col, value, &fmt_body)?;
        }
    }

    if n_rows_overwide > 0 {
        let c_msg = format!("Dropped cells beyond column {n_cols} in {n_rows_overwide} data rows.");
        log::warn!("{c_msg}");
        report.warn(c_msg);
    }

    Ok(workbook)
}

/// Serialize a built workbook to XLSX bytes.
pub fn save_workbook_to_buffer(workbook: &mut Workbook) -> XlsxFormatResult<Vec<u8>> {
    workbook.save_to_buffer().map_err(derive_xlsx_error)
}

fn write_header(
    worksheet: &mut Worksheet,
    header: &SpecHeader,
    fmt_header: &Format,
    height_header_row: f64,
) -> XlsxFormatResult<()> {
    for (n_idx_col, name) in header.names.iter().enumerate() {
        worksheet
            .write_string_with_format(0, cast_col_num(n_idx_col)?, name, fmt_header)
            .map_err(derive_xlsx_error)?;
    }
    worksheet
        .set_row_height(0, height_header_row)
        .map_err(derive_xlsx_error)?;
    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> XlsxFormatResult<()> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::String(val) => {
            worksheet
                .write_string_with_format(n_row, n_col, val, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::Number(val) if !val.is_finite() => {
            worksheet
                .write_string_with_format(n_row, n_col, convert_nan_inf_to_str(*val), format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::Number(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error)?;
        }
        EnumCellValue::Boolean(val) => {
            worksheet
                .write_boolean_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error)?;
        }
    }
    Ok(())
}

/// Excel cannot store `NaN`/`Inf`; they are written as text.
fn convert_nan_inf_to_str(x: f64) -> &'static str {
    if x.is_nan() {
        "NaN"
    } else if x.is_sign_positive() {
        "Inf"
    } else {
        "-Inf"
    }
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(val.as_str());
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(val.as_str());
    }

    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "center_across" => Some(FormatAlign::CenterAcross),
        "distributed" => Some(FormatAlign::Distributed),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        "vjustify" | "vertical_justify" => Some(FormatAlign::VerticalJustify),
        "vdistributed" | "vertical_distributed" => Some(FormatAlign::VerticalDistributed),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> XlsxFormatResult<u32> {
    u32::try_from(value).map_err(|_| {
        XlsxFormatError::write(C_TARGET_BUFFER, format!("row index overflow: {value}"))
    })
}

fn cast_col_num(value: usize) -> XlsxFormatResult<u16> {
    u16::try_from(value).map_err(|_| {
        XlsxFormatError::write(C_TARGET_BUFFER, format!("column index overflow: {value}"))
    })
}

fn derive_xlsx_error(err: XlsxError) -> XlsxFormatError {
    XlsxFormatError::write(C_TARGET_BUFFER, format!("xlsx write error: {err}"))
}
