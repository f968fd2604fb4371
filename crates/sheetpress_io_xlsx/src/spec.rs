//! Shared XLSX models: cell values, formats, options and the run report.

use std::fmt;

use crate::conf::{derive_default_autofit_policy, derive_default_format_options};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueModel

/// Normalized cell value flowing through the format pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
}

impl EnumCellValue {
    /// Text representation used for blank tests, header names and width
    /// estimation. `None` renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
        }
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for EnumCellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// One positional row; column index equals vector index.
pub type TypeRow = Vec<EnumCellValue>;

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellFormatModel

/// Cell appearance descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Background fill color.
    pub bg_color: Option<String>,
    /// Font color.
    pub font_color: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            text_wrap: other.text_wrap.or(self.text_wrap),
            bg_color: other.bg_color.clone().or_else(|| self.bg_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StageOutputs

/// Row Extractor output: non-blank, normalized rows of sheet 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecRowExtraction {
    /// Surviving rows, each padded to `n_cols_sheet`.
    pub rows: Vec<TypeRow>,
    /// Raw rows seen in the sheet's used area.
    pub n_rows_scanned: usize,
    /// Rows removed as blank.
    pub n_rows_blank_dropped: usize,
    /// Declared column count of the sheet, counted from column A.
    pub n_cols_sheet: usize,
}

/// Resolved header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecHeader {
    /// Display names; none is empty, duplicates allowed.
    pub names: Vec<String>,
    /// Zero-based indices whose names were synthesized.
    pub cols_idx_placeholder: Vec<usize>,
}

impl SpecHeader {
    /// Number of output columns, fixed for the rest of the run.
    pub fn column_count(&self) -> usize {
        self.names.len()
    }
}

/// Per-column display widths, one per header column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecColumnLayout {
    /// Width per column in Excel character units.
    pub widths: Vec<f64>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatOptions

/// Autofit policy: `clamp(max_chars * width_per_char + width_cell_padding,
/// width_cell_min, width_cell_max)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecAutofitCellsPolicy {
    /// Minimum final width.
    pub width_cell_min: f64,
    /// Maximum final width.
    pub width_cell_max: f64,
    /// Width units per character.
    pub width_per_char: f64,
    /// Width padding added after scaling.
    pub width_cell_padding: f64,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        derive_default_autofit_policy()
    }
}

/// Options for one format run.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecXlsxFormatOptions {
    /// Output sheet name, sanitized before use.
    pub sheet_name: String,
    /// Header row height in points.
    pub height_header_row: f64,
    /// Prefix of synthesized header names.
    pub header_placeholder_prefix: String,
    /// Column width inference policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
    /// Format applied to every header cell.
    pub fmt_header: SpecCellFormat,
    /// Format applied to every data cell.
    pub fmt_body: SpecCellFormat,
}

impl Default for SpecXlsxFormatOptions {
    fn default() -> Self {
        derive_default_format_options()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportModel

/// Terminal state of one format run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFormatOutcome {
    /// A styled workbook was built and written.
    Formatted,
    /// No usable rows; the input was copied verbatim.
    Copied,
}

impl EnumFormatOutcome {
    /// Lower-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formatted => "formatted",
            Self::Copied => "copied",
        }
    }
}

/// Per-run report.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecXlsxFormatReport {
    /// How the run finished.
    pub outcome: EnumFormatOutcome,
    /// Raw rows seen in the input sheet.
    pub n_rows_scanned: usize,
    /// Rows removed as blank.
    pub n_rows_blank_dropped: usize,
    /// Data rows written below the header.
    pub n_rows_data: usize,
    /// Resolved header names (empty when copied).
    pub header: Vec<String>,
    /// Header indices that received a placeholder name.
    pub cols_idx_placeholder: Vec<usize>,
    /// Emitted column widths.
    pub widths: Vec<f64>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxFormatReport {
    /// Empty report for `outcome`.
    pub fn new(outcome: EnumFormatOutcome) -> Self {
        Self {
            outcome,
            n_rows_scanned: 0,
            n_rows_blank_dropped: 0,
            n_rows_data: 0,
            header: Vec::new(),
            cols_idx_placeholder: Vec::new(),
            widths: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Number of output columns.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} outcome={} scanned={} blank={} rows={} cols={} placeholders={} warnings={}",
            self.outcome.as_str(),
            self.n_rows_scanned,
            self.n_rows_blank_dropped,
            self.n_rows_data,
            self.column_count(),
            self.cols_idx_placeholder.len(),
            self.warnings.len()
        )
    }
}

impl fmt::Display for SpecXlsxFormatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[FORMAT]"))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
