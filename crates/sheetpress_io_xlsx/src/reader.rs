//! Row extraction from the first sheet of an input workbook.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};

use crate::error::{XlsxFormatError, XlsxFormatResult};
use crate::spec::{EnumCellValue, SpecRowExtraction, TypeRow};
use crate::util::{is_blank_row, normalize_cell_value};

/// Source label used in errors for in-memory input.
pub const C_SOURCE_BYTES: &str = "<bytes>";

/// Read normalized, non-blank rows from sheet 0 of the workbook at `path_file_in`.
///
/// Format is detected from the extension (xlsx, xlsm, xlsb, xls, ods), with
/// content sniffing as fallback. The file handle is released before return.
pub fn read_rows_from_path<P>(path_file_in: P) -> XlsxFormatResult<SpecRowExtraction>
where
    P: AsRef<Path>,
{
    let path_file_in = path_file_in.as_ref();
    let c_source = path_file_in.display().to_string();

    let mut workbook =
        open_workbook_auto(path_file_in).map_err(|err| XlsxFormatError::read(&c_source, err))?;
    let range = read_first_sheet_range(&mut workbook, &c_source)?;
    Ok(extract_rows_from_range(&range))
}

/// Read normalized, non-blank rows from sheet 0 of an in-memory workbook.
pub fn read_rows_from_bytes(v_bytes: &[u8]) -> XlsxFormatResult<SpecRowExtraction> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(v_bytes))
        .map_err(|err| XlsxFormatError::read(C_SOURCE_BYTES, err))?;
    let range = read_first_sheet_range(&mut workbook, C_SOURCE_BYTES)?;
    Ok(extract_rows_from_range(&range))
}

fn read_first_sheet_range<RS>(
    workbook: &mut Sheets<RS>,
    c_source: &str,
) -> XlsxFormatResult<Range<Data>>
where
    RS: Read + Seek,
{
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(err)) => Err(XlsxFormatError::read(c_source, err)),
        None => Err(XlsxFormatError::read(c_source, "workbook contains no sheets")),
    }
}

/// Turn a sheet range into positional rows, dropping blank ones.
///
/// The used range may start right of column A; leading cells are padded so
/// row positions match sheet columns.
pub fn extract_rows_from_range(range: &Range<Data>) -> SpecRowExtraction {
    let n_col_offset = range.start().map_or(0, |(_, col)| col as usize);
    let n_cols_sheet = if range.is_empty() {
        0
    } else {
        n_col_offset + range.width()
    };

    let mut extraction = SpecRowExtraction {
        n_cols_sheet,
        ..Default::default()
    };

    for row_raw in range.rows() {
        extraction.n_rows_scanned += 1;

        let mut l_row: TypeRow = Vec::with_capacity(n_cols_sheet);
        l_row.resize(n_col_offset, EnumCellValue::None);
        l_row.extend(
            row_raw
                .iter()
                .map(convert_data_to_cell_value)
                .map(normalize_cell_value),
        );
        l_row.resize(n_cols_sheet, EnumCellValue::None);

        if is_blank_row(&l_row) {
            extraction.n_rows_blank_dropped += 1;
            continue;
        }
        extraction.rows.push(l_row);
    }

    log::debug!(
        "Extracted {} rows ({} scanned, {} blank) across {} columns",
        extraction.rows.len(),
        extraction.n_rows_scanned,
        extraction.n_rows_blank_dropped,
        extraction.n_cols_sheet
    );
    extraction
}

/// Map a reader cell onto the pipeline's cell model.
///
/// Date-times keep their serial number; ISO texts and cell errors become
/// strings. The serial is written back as a plain number, so date columns are
/// sized by the digits of the serial (`45293` is 5 chars) rather than by a
/// rendered date like `2024-01-02`, and their date number format is not kept.
pub fn convert_data_to_cell_value(data: &Data) -> EnumCellValue {
    match data {
        Data::Empty => EnumCellValue::None,
        Data::String(val) => EnumCellValue::String(val.clone()),
        Data::Float(val) => EnumCellValue::Number(*val),
        Data::Int(val) => EnumCellValue::Number(*val as f64),
        Data::Bool(val) => EnumCellValue::Boolean(*val),
        Data::DateTime(val) => EnumCellValue::Number(val.as_f64()),
        Data::DateTimeIso(val) => EnumCellValue::String(val.clone()),
        Data::DurationIso(val) => EnumCellValue::String(val.clone()),
        Data::Error(err) => EnumCellValue::String(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use tempfile::TempDir;

    use super::*;
    use crate::error::EnumFormatErrorKind;
    use crate::test_support::{cell, write_fixture_xlsx, write_fixture_xlsx_at};

    #[test]
    fn test_read_rows_normalizes_text_and_drops_blank_rows() {
        let tmp = TempDir::new().expect("tempdir");
        let path_in = tmp.path().join("in.xlsx");
        write_fixture_xlsx(
            &path_in,
            &[
                vec![cell("  Name "), EnumCellValue::None, cell("Amount")],
                vec![cell("   "), EnumCellValue::None, cell("\t")],
                vec![cell("  Alice  "), cell("Eng   Team"), EnumCellValue::Number(100.5)],
                vec![EnumCellValue::None, EnumCellValue::Boolean(false), EnumCellValue::None],
            ],
        );

        let extraction = read_rows_from_path(&path_in).expect("read rows");
        assert_eq!(extraction.n_rows_scanned, 4);
        assert_eq!(extraction.n_rows_blank_dropped, 1);
        assert_eq!(extraction.n_cols_sheet, 3);
        assert_eq!(extraction.rows.len(), 3);

        assert_eq!(extraction.rows[0][0], cell("Name"));
        assert_eq!(extraction.rows[0][2], cell("Amount"));
        assert_eq!(
            extraction.rows[1],
            vec![cell("Alice"), cell("Eng Team"), EnumCellValue::Number(100.5)]
        );
        assert_eq!(extraction.rows[2][1], EnumCellValue::Boolean(false));
        assert!(extraction.rows.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_read_rows_keeps_absolute_column_positions() {
        let tmp = TempDir::new().expect("tempdir");
        let path_in = tmp.path().join("offset.xlsx");
        write_fixture_xlsx_at(
            &path_in,
            2,
            1,
            &[vec![cell("A"), cell("B")], vec![cell("x"), cell("y")]],
        );

        let extraction = read_rows_from_path(&path_in).expect("read rows");
        assert_eq!(extraction.n_cols_sheet, 3);
        assert_eq!(
            extraction.rows[0],
            vec![EnumCellValue::None, cell("A"), cell("B")]
        );
        assert_eq!(
            extraction.rows[1],
            vec![EnumCellValue::None, cell("x"), cell("y")]
        );
    }

    #[test]
    fn test_read_rows_from_bytes_matches_path_reader() {
        let tmp = TempDir::new().expect("tempdir");
        let path_in = tmp.path().join("in.xlsx");
        write_fixture_xlsx(&path_in, &[vec![cell("h1"), cell("h2")], vec![cell(" v ")]]);

        let v_bytes = fs::read(&path_in).expect("read fixture");
        let extraction_bytes = read_rows_from_bytes(&v_bytes).expect("read bytes");
        let extraction_path = read_rows_from_path(&path_in).expect("read path");
        assert_eq!(extraction_bytes, extraction_path);
        assert_eq!(extraction_bytes.rows[1][0], cell("v"));
    }

    #[test]
    fn test_read_rows_empty_sheet_yields_no_rows() {
        let tmp = TempDir::new().expect("tempdir");
        let path_in = tmp.path().join("empty.xlsx");
        write_fixture_xlsx(&path_in, &[]);

        let extraction = read_rows_from_path(&path_in).expect("read rows");
        assert!(extraction.rows.is_empty());
        assert_eq!(extraction.n_rows_blank_dropped, 0);
    }

    #[test]
    fn test_read_rows_rejects_non_spreadsheet_input() {
        let tmp = TempDir::new().expect("tempdir");
        let path_in = tmp.path().join("bad.xlsx");
        fs::write(&path_in, b"this is not a workbook").expect("write bad file");

        let err = read_rows_from_path(&path_in).expect_err("corrupt input");
        assert_eq!(err.kind(), EnumFormatErrorKind::Read);

        let err = read_rows_from_bytes(b"garbage").expect_err("corrupt bytes");
        assert_eq!(err.kind(), EnumFormatErrorKind::Read);
    }

    #[test]
    fn test_read_rows_missing_file_is_read_error() {
        let tmp = TempDir::new().expect("tempdir");
        let err = read_rows_from_path(tmp.path().join("missing.xlsx")).expect_err("missing");
        assert_eq!(err.kind(), EnumFormatErrorKind::Read);
    }

    #[test]
    fn test_convert_data_maps_reader_cells() {
        assert_eq!(convert_data_to_cell_value(&Data::Empty), EnumCellValue::None);
        assert_eq!(
            convert_data_to_cell_value(&Data::Int(7)),
            EnumCellValue::Number(7.0)
        );
        assert_eq!(
            convert_data_to_cell_value(&Data::Bool(true)),
            EnumCellValue::Boolean(true)
        );
        assert_eq!(
            convert_data_to_cell_value(&Data::DateTimeIso("2024-01-02".to_string())),
            cell("2024-01-02")
        );
    }

    #[test]
    fn test_convert_data_keeps_date_serial_as_number() {
        let data = Data::DateTime(ExcelDateTime::new(
            45293.5,
            ExcelDateTimeType::DateTime,
            false,
        ));
        let value = convert_data_to_cell_value(&data);
        assert_eq!(value, EnumCellValue::Number(45293.5));
        assert_eq!(value.to_text(), "45293.5");
    }
}
