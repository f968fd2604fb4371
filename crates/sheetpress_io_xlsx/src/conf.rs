//! XLSX constants and default preset factories.

use std::collections::BTreeMap;

use crate::spec::{SpecAutofitCellsPolicy, SpecCellFormat, SpecXlsxFormatOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Excel column width upper limit, in character units.
pub const N_WIDTH_EXCEL_COLUMN_MAX: f64 = 255.0;
/// Excel row height upper limit, in points.
pub const N_HEIGHT_EXCEL_ROW_MAX: f64 = 409.0;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Narrowest emitted column width.
pub const N_WIDTH_CELL_MIN: f64 = 10.0;
/// Widest emitted column width.
pub const N_WIDTH_CELL_MAX: f64 = 60.0;
/// Width units per character of cell text.
pub const N_WIDTH_PER_CHAR: f64 = 1.1;
/// Width units added after scaling.
pub const N_WIDTH_CELL_PADDING: f64 = 2.0;

/// Header row height in points.
pub const N_HEIGHT_HEADER_ROW: f64 = 22.0;
/// Prefix of synthesized header names (`"Column 3"`).
pub const C_HEADER_PLACEHOLDER_PREFIX: &str = "Column";
/// Name of the single output sheet.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";

/// Header fill color.
pub const C_COLOR_HEADER_BG: &str = "#EEEEEE";
/// Header text color.
pub const C_COLOR_HEADER_FONT: &str = "#000000";

/// Canonical format preset keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFmtKey {
    /// Header row cell format.
    Header,
    /// Data row cell format.
    Body,
}

impl EnumFmtKey {
    /// Preset map key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Body => "body",
        }
    }
}

/// Build the header row preset: bold, centered, wrapped, light-gray fill.
pub fn derive_default_header_format() -> SpecCellFormat {
    derive_base_format().with_(SpecCellFormat {
        bold: Some(true),
        align: Some("center".to_string()),
        valign: Some("vcenter".to_string()),
        bg_color: Some(C_COLOR_HEADER_BG.to_string()),
        font_color: Some(C_COLOR_HEADER_FONT.to_string()),
        ..Default::default()
    })
}

/// Build the data row preset: left/top aligned, wrapped, default colors.
pub fn derive_default_body_format() -> SpecCellFormat {
    derive_base_format().with_(SpecCellFormat {
        align: Some("left".to_string()),
        valign: Some("top".to_string()),
        ..Default::default()
    })
}

fn derive_base_format() -> SpecCellFormat {
    SpecCellFormat {
        text_wrap: Some(true),
        ..Default::default()
    }
}

/// Build default named format presets keyed by [`EnumFmtKey::as_str`].
pub fn derive_default_xlsx_formats() -> BTreeMap<String, SpecCellFormat> {
    let mut dict_fmt = BTreeMap::new();
    dict_fmt.insert(
        EnumFmtKey::Header.as_str().to_string(),
        derive_default_header_format(),
    );
    dict_fmt.insert(
        EnumFmtKey::Body.as_str().to_string(),
        derive_default_body_format(),
    );
    dict_fmt
}

/// Build the default autofit policy (`chars * 1.1 + 2`, clamped to `[10, 60]`).
pub fn derive_default_autofit_policy() -> SpecAutofitCellsPolicy {
    SpecAutofitCellsPolicy {
        width_cell_min: N_WIDTH_CELL_MIN,
        width_cell_max: N_WIDTH_CELL_MAX,
        width_per_char: N_WIDTH_PER_CHAR,
        width_cell_padding: N_WIDTH_CELL_PADDING,
    }
}

/// Build default format options from the named presets and constants.
pub fn derive_default_format_options() -> SpecXlsxFormatOptions {
    let mut dict_fmt = derive_default_xlsx_formats();
    SpecXlsxFormatOptions {
        sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
        height_header_row: N_HEIGHT_HEADER_ROW,
        header_placeholder_prefix: C_HEADER_PLACEHOLDER_PREFIX.to_string(),
        policy_autofit: derive_default_autofit_policy(),
        fmt_header: dict_fmt
            .remove(EnumFmtKey::Header.as_str())
            .unwrap_or_else(derive_default_header_format),
        fmt_body: dict_fmt
            .remove(EnumFmtKey::Body.as_str())
            .unwrap_or_else(derive_default_body_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_formats_cover_header_and_body() {
        let dict_fmt = derive_default_xlsx_formats();
        assert_eq!(dict_fmt.len(), 2);

        let fmt_header = &dict_fmt["header"];
        assert_eq!(fmt_header.bold, Some(true));
        assert_eq!(fmt_header.align.as_deref(), Some("center"));
        assert_eq!(fmt_header.valign.as_deref(), Some("vcenter"));
        assert_eq!(fmt_header.text_wrap, Some(true));
        assert_eq!(fmt_header.bg_color.as_deref(), Some("#EEEEEE"));
        assert_eq!(fmt_header.font_color.as_deref(), Some("#000000"));

        let fmt_body = &dict_fmt["body"];
        assert_eq!(fmt_body.bold, None);
        assert_eq!(fmt_body.align.as_deref(), Some("left"));
        assert_eq!(fmt_body.valign.as_deref(), Some("top"));
        assert_eq!(fmt_body.text_wrap, Some(true));
        assert_eq!(fmt_body.bg_color, None);
        assert_eq!(fmt_body.font_color, None);
    }

    #[test]
    fn test_default_options_match_constants() {
        let options = derive_default_format_options();
        assert_eq!(options.sheet_name, C_SHEET_NAME_DEFAULT);
        assert_eq!(options.height_header_row, N_HEIGHT_HEADER_ROW);
        assert_eq!(options.policy_autofit, derive_default_autofit_policy());
        assert_eq!(options.policy_autofit.width_cell_min, 10.0);
        assert_eq!(options.policy_autofit.width_cell_max, 60.0);
    }

    #[test]
    fn test_default_options_take_presets_from_format_map() {
        let options = derive_default_format_options();
        let dict_fmt = derive_default_xlsx_formats();
        assert_eq!(options.fmt_header, dict_fmt[EnumFmtKey::Header.as_str()]);
        assert_eq!(options.fmt_body, dict_fmt[EnumFmtKey::Body.as_str()]);
        assert_eq!(options, SpecXlsxFormatOptions::default());
        assert_eq!(SpecAutofitCellsPolicy::default(), derive_default_autofit_policy());
    }
}
