//! One-call format pipeline: extract, resolve header, plan layout, build.
//!
//! A run with no usable rows short-circuits to a verbatim copy of the input.

use std::path::Path;

use sheetpress_io_fs::{SpecPersistOptions, copy_file_atomic, write_file_atomic};

use crate::conf::N_HEIGHT_EXCEL_ROW_MAX;
use crate::error::{XlsxFormatError, XlsxFormatResult};
use crate::header::resolve_header;
use crate::layout::{plan_column_layout, validate_policy_autofit};
use crate::reader::{read_rows_from_bytes, read_rows_from_path};
use crate::spec::{
    EnumFormatOutcome, SpecRowExtraction, SpecXlsxFormatOptions, SpecXlsxFormatReport,
};
use crate::writer::{build_workbook, save_workbook_to_buffer};

/// Stage result shared by the path and bytes entry points.
enum EnumFormatStage {
    /// No usable rows; the caller reproduces the input unchanged.
    Copy(SpecXlsxFormatReport),
    /// Serialized output workbook.
    Build(Vec<u8>, SpecXlsxFormatReport),
}

/// Reformat the workbook at `path_file_in` into `path_file_out`.
///
/// The output is replaced atomically. When sheet 0 has no usable rows the
/// output is a byte-identical copy of the input.
pub fn format_xlsx<P, Q>(
    path_file_in: P,
    path_file_out: Q,
    options: &SpecXlsxFormatOptions,
) -> XlsxFormatResult<SpecXlsxFormatReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_file_in = path_file_in.as_ref();
    let path_file_out = path_file_out.as_ref();
    let c_target = path_file_out.display().to_string();
    validate_format_options(options)?;

    log::debug!(
        "Formatting {} -> {}",
        path_file_in.display(),
        path_file_out.display()
    );
    let extraction = read_rows_from_path(path_file_in)?;
    let options_persist = SpecPersistOptions::default();

    let report = match run_format_stages(extraction, options)? {
        EnumFormatStage::Copy(report) => {
            copy_file_atomic(path_file_in, path_file_out, &options_persist)
                .map_err(|err| XlsxFormatError::write(&c_target, err))?;
            report
        }
        EnumFormatStage::Build(v_bytes, report) => {
            write_file_atomic(path_file_out, &v_bytes, &options_persist)
                .map_err(|err| XlsxFormatError::write(&c_target, err))?;
            report
        }
    };

    log::info!("{} target={c_target}", report);
    Ok(report)
}

/// Reformat an in-memory workbook.
///
/// Returns the input bytes unchanged when sheet 0 has no usable rows.
pub fn format_xlsx_bytes(
    v_bytes_in: &[u8],
    options: &SpecXlsxFormatOptions,
) -> XlsxFormatResult<(Vec<u8>, SpecXlsxFormatReport)> {
    validate_format_options(options)?;

    let extraction = read_rows_from_bytes(v_bytes_in)?;
    let (v_bytes_out, report) = match run_format_stages(extraction, options)? {
        EnumFormatStage::Copy(report) => (v_bytes_in.to_vec(), report),
        EnumFormatStage::Build(v_bytes, report) => (v_bytes, report),
    };

    log::info!("{} bytes_out={}", report, v_bytes_out.len());
    Ok((v_bytes_out, report))
}

/// Reject options that would produce an invalid workbook, before any I/O.
pub fn validate_format_options(options: &SpecXlsxFormatOptions) -> XlsxFormatResult<()> {
    validate_policy_autofit(&options.policy_autofit)?;

    let n_height = options.height_header_row;
    if !n_height.is_finite() || n_height <= 0.0 || n_height > N_HEIGHT_EXCEL_ROW_MAX {
        return Err(XlsxFormatError::InvalidOptions(format!(
            "height_header_row must be in (0, {N_HEIGHT_EXCEL_ROW_MAX}], got {n_height}."
        )));
    }
    if options.header_placeholder_prefix.trim().is_empty() {
        return Err(XlsxFormatError::InvalidOptions(
            "header_placeholder_prefix must not be blank.".to_string(),
        ));
    }
    Ok(())
}

fn run_format_stages(
    extraction: SpecRowExtraction,
    options: &SpecXlsxFormatOptions,
) -> XlsxFormatResult<EnumFormatStage> {
    let SpecRowExtraction {
        rows,
        n_rows_scanned,
        n_rows_blank_dropped,
        ..
    } = extraction;

    let mut report = SpecXlsxFormatReport::new(EnumFormatOutcome::Copied);
    report.n_rows_scanned = n_rows_scanned;
    report.n_rows_blank_dropped = n_rows_blank_dropped;

    if rows.is_empty() {
        log::debug!("No usable rows in {n_rows_scanned} scanned; copying input");
        return Ok(EnumFormatStage::Copy(report));
    }
    let Some((header, data_rows)) = resolve_header(rows, &options.header_placeholder_prefix)
    else {
        return Ok(EnumFormatStage::Copy(report));
    };

    let layout = plan_column_layout(&header, &data_rows, &options.policy_autofit);

    report.outcome = EnumFormatOutcome::Formatted;
    report.n_rows_data = data_rows.len();

    let mut workbook = build_workbook(&header, &data_rows, &layout, options, &mut report)?;
    let v_bytes = save_workbook_to_buffer(&mut workbook)?;

    report.header = header.names;
    report.cols_idx_placeholder = header.cols_idx_placeholder;
    report.widths = layout.widths;
    Ok(EnumFormatStage::Build(v_bytes, report))
}
