//! Fixture helpers shared by unit tests.

use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;

use crate::spec::EnumCellValue;

pub(crate) fn cell(text: &str) -> EnumCellValue {
    EnumCellValue::String(text.to_string())
}

/// Write `rows` into sheet 0 of a new workbook, starting at A1.
pub(crate) fn write_fixture_xlsx(path: &Path, rows: &[Vec<EnumCellValue>]) {
    write_fixture_xlsx_at(path, 0, 0, rows);
}

/// Write `rows` into sheet 0 of a new workbook, starting at
/// (`n_row_start`, `n_col_start`). `None` cells are left unwritten.
pub(crate) fn write_fixture_xlsx_at(
    path: &Path,
    n_row_start: u32,
    n_col_start: u16,
    rows: &[Vec<EnumCellValue>],
) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (n_idx_row, row) in rows.iter().enumerate() {
        let n_row = n_row_start + n_idx_row as u32;
        for (n_idx_col, value) in row.iter().enumerate() {
            let n_col = n_col_start + n_idx_col as u16;
            match value {
                EnumCellValue::None => {}
                EnumCellValue::String(val) => {
                    worksheet
                        .write_string(n_row, n_col, val)
                        .expect("write string");
                }
                EnumCellValue::Number(val) => {
                    worksheet
                        .write_number(n_row, n_col, *val)
                        .expect("write number");
                }
                EnumCellValue::Boolean(val) => {
                    worksheet
                        .write_boolean(n_row, n_col, *val)
                        .expect("write boolean");
                }
            }
        }
    }

    workbook.save(path).expect("save fixture");
}

/// Read sheet 0 back as raw reader rows.
pub(crate) fn read_back_rows(path: &Path) -> Vec<Vec<Data>> {
    let mut workbook = open_workbook_auto(path).expect("open output");
    let range = workbook
        .worksheet_range_at(0)
        .expect("sheet 0 exists")
        .expect("sheet 0 readable");
    range.rows().map(|row| row.to_vec()).collect()
}

/// Name of sheet 0.
pub(crate) fn read_back_sheet_name(path: &Path) -> String {
    let workbook = open_workbook_auto(path).expect("open output");
    workbook.sheet_names()[0].clone()
}

/// Text of each reader cell, with `Data::Empty` as `""`.
pub(crate) fn derive_row_texts(row: &[Data]) -> Vec<String> {
    row.iter()
        .map(|data| match data {
            Data::Empty => String::new(),
            Data::String(val) => val.clone(),
            other => other.to_string(),
        })
        .collect()
}

/// Raw XML of one part (e.g. `xl/styles.xml`) of a serialized workbook.
pub(crate) fn read_zip_part(v_bytes: &[u8], c_part: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(v_bytes)).expect("open xlsx zip");
    let mut file_part = archive.by_name(c_part).expect("xlsx part exists");
    let mut c_xml = String::new();
    file_part.read_to_string(&mut c_xml).expect("read xlsx part");
    c_xml
}
