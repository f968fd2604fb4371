use std::collections::BTreeMap;

use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyAny, PyBytes};
use sheetpress_io_xlsx::conf::derive_default_format_options;
use sheetpress_io_xlsx::spec::{
    EnumFormatOutcome, SpecCellFormat, SpecXlsxFormatOptions, SpecXlsxFormatReport,
};
use sheetpress_io_xlsx::{
    EnumFormatErrorKind, XlsxFormatError, format_xlsx as rs_format_xlsx,
    format_xlsx_bytes as rs_format_xlsx_bytes,
};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "sheetpress.xlsx.format.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

#[pyclass(name = "ReportFormat")]
#[derive(Debug, Clone)]
struct PyReportFormat {
    #[pyo3(get)]
    outcome: String,
    #[pyo3(get)]
    cnt_scanned: usize,
    #[pyo3(get)]
    cnt_blank_dropped: usize,
    #[pyo3(get)]
    cnt_rows: usize,
    #[pyo3(get)]
    header: Vec<String>,
    #[pyo3(get)]
    cols_placeholder: Vec<usize>,
    #[pyo3(get)]
    widths: Vec<f64>,
    #[pyo3(get)]
    warnings: Vec<String>,
    #[pyo3(get)]
    if_copied: bool,
    summary: String,
}

impl From<SpecXlsxFormatReport> for PyReportFormat {
    fn from(report: SpecXlsxFormatReport) -> Self {
        let summary = report.format("[FORMAT]");
        Self {
            outcome: report.outcome.as_str().to_string(),
            cnt_scanned: report.n_rows_scanned,
            cnt_blank_dropped: report.n_rows_blank_dropped,
            cnt_rows: report.n_rows_data,
            header: report.header,
            cols_placeholder: report.cols_idx_placeholder,
            widths: report.widths,
            warnings: report.warnings,
            if_copied: report.outcome == EnumFormatOutcome::Copied,
            summary,
        }
    }
}

#[pymethods]
impl PyReportFormat {
    #[getter]
    fn column_count(&self) -> usize {
        self.header.len()
    }

    #[getter]
    fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    fn to_dict(&self) -> BTreeMap<String, usize> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_blank_dropped".to_string(), self.cnt_blank_dropped);
        dict_counts.insert("cnt_rows".to_string(), self.cnt_rows);
        dict_counts.insert("cnt_columns".to_string(), self.column_count());
        dict_counts.insert("cnt_placeholders".to_string(), self.cols_placeholder.len());
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count());
        dict_counts
    }

    #[pyo3(signature = (prefix = "[FORMAT]"))]
    fn format(&self, prefix: &str) -> String {
        match self.summary.strip_prefix("[FORMAT]") {
            Some(rest) => format!("{prefix}{rest}"),
            None => self.summary.clone(),
        }
    }

    fn __str__(&self) -> String {
        self.summary.clone()
    }
}

fn map_format_error(exception: XlsxFormatError) -> PyErr {
    let c_message = exception.to_string();
    match exception.kind() {
        EnumFormatErrorKind::Read | EnumFormatErrorKind::InvalidOptions => {
            PyValueError::new_err(c_message)
        }
        EnumFormatErrorKind::Write => PyOSError::new_err(c_message),
    }
}

fn parse_spec_cell_format(obj: Option<&Bound<'_, PyAny>>) -> PyResult<Option<SpecCellFormat>> {
    let Some(obj) = obj else {
        return Ok(None);
    };
    if obj.is_none() {
        return Ok(None);
    }

    Ok(Some(SpecCellFormat {
        font_name: extract_optional_attr::<String>(obj, "font_name")?,
        font_size: extract_optional_attr::<i64>(obj, "font_size")?,
        bold: extract_optional_attr::<bool>(obj, "bold")?,
        italic: extract_optional_attr::<bool>(obj, "italic")?,
        align: extract_optional_attr::<String>(obj, "align")?,
        valign: extract_optional_attr::<String>(obj, "valign")?,
        text_wrap: extract_optional_attr::<bool>(obj, "text_wrap")?,
        bg_color: extract_optional_attr::<String>(obj, "bg_color")?,
        font_color: extract_optional_attr::<String>(obj, "font_color")?,
    }))
}

fn extract_optional_attr<T>(obj: &Bound<'_, PyAny>, attr: &str) -> PyResult<Option<T>>
where
    for<'a> T: FromPyObject<'a>,
{
    if !obj.hasattr(attr)? {
        return Ok(None);
    }
    let val = obj.getattr(attr)?;
    if val.is_none() {
        return Ok(None);
    }
    Ok(Some(val.extract::<T>()?))
}

/// Keyword overrides shared by both entry points.
struct SpecFormatOverrides<'a, 'py> {
    sheet_name: Option<String>,
    height_header_row: Option<f64>,
    header_placeholder_prefix: Option<String>,
    width_cell_min: Option<f64>,
    width_cell_max: Option<f64>,
    width_per_char: Option<f64>,
    width_cell_padding: Option<f64>,
    fmt_header: Option<&'a Bound<'py, PyAny>>,
    fmt_body: Option<&'a Bound<'py, PyAny>>,
}

impl SpecFormatOverrides<'_, '_> {
    /// Overlay the supplied overrides onto the default options.
    fn derive_options(self) -> PyResult<SpecXlsxFormatOptions> {
        let mut options = derive_default_format_options();

        if let Some(v) = self.sheet_name {
            options.sheet_name = v;
        }
        if let Some(v) = self.height_header_row {
            options.height_header_row = v;
        }
        if let Some(v) = self.header_placeholder_prefix {
            options.header_placeholder_prefix = v;
        }
        if let Some(v) = self.width_cell_min {
            options.policy_autofit.width_cell_min = v;
        }
        if let Some(v) = self.width_cell_max {
            options.policy_autofit.width_cell_max = v;
        }
        if let Some(v) = self.width_per_char {
            options.policy_autofit.width_per_char = v;
        }
        if let Some(v) = self.width_cell_padding {
            options.policy_autofit.width_cell_padding = v;
        }
        if let Some(fmt) = parse_spec_cell_format(self.fmt_header)? {
            options.fmt_header = options.fmt_header.merge(&fmt);
        }
        if let Some(fmt) = parse_spec_cell_format(self.fmt_body)? {
            options.fmt_body = options.fmt_body.merge(&fmt);
        }

        Ok(options)
    }
}

#[pyfunction(name = "format_xlsx")]
#[pyo3(signature = (
    file_in,
    file_out,
    sheet_name = None,
    height_header_row = None,
    header_placeholder_prefix = None,
    width_cell_min = None,
    width_cell_max = None,
    width_per_char = None,
    width_cell_padding = None,
    fmt_header = None,
    fmt_body = None
))]
#[allow(clippy::too_many_arguments)]
fn format_xlsx_py(
    py: Python<'_>,
    file_in: String,
    file_out: String,
    sheet_name: Option<String>,
    height_header_row: Option<f64>,
    header_placeholder_prefix: Option<String>,
    width_cell_min: Option<f64>,
    width_cell_max: Option<f64>,
    width_per_char: Option<f64>,
    width_cell_padding: Option<f64>,
    fmt_header: Option<&Bound<'_, PyAny>>,
    fmt_body: Option<&Bound<'_, PyAny>>,
) -> PyResult<PyReportFormat> {
    let spec_options = SpecFormatOverrides {
        sheet_name,
        height_header_row,
        header_placeholder_prefix,
        width_cell_min,
        width_cell_max,
        width_per_char,
        width_cell_padding,
        fmt_header,
        fmt_body,
    }
    .derive_options()?;

    let report_format = py.allow_threads(|| rs_format_xlsx(file_in, file_out, &spec_options));
    let report_format = report_format.map_err(map_format_error)?;
    Ok(PyReportFormat::from(report_format))
}

#[pyfunction(name = "format_xlsx_bytes")]
#[pyo3(signature = (
    data,
    sheet_name = None,
    height_header_row = None,
    header_placeholder_prefix = None,
    width_cell_min = None,
    width_cell_max = None,
    width_per_char = None,
    width_cell_padding = None,
    fmt_header = None,
    fmt_body = None
))]
#[allow(clippy::too_many_arguments)]
fn format_xlsx_bytes_py<'py>(
    py: Python<'py>,
    data: &[u8],
    sheet_name: Option<String>,
    height_header_row: Option<f64>,
    header_placeholder_prefix: Option<String>,
    width_cell_min: Option<f64>,
    width_cell_max: Option<f64>,
    width_per_char: Option<f64>,
    width_cell_padding: Option<f64>,
    fmt_header: Option<&Bound<'py, PyAny>>,
    fmt_body: Option<&Bound<'py, PyAny>>,
) -> PyResult<(Bound<'py, PyBytes>, PyReportFormat)> {
    let spec_options = SpecFormatOverrides {
        sheet_name,
        height_header_row,
        header_placeholder_prefix,
        width_cell_min,
        width_cell_max,
        width_per_char,
        width_cell_padding,
        fmt_header,
        fmt_body,
    }
    .derive_options()?;

    let result_format = py.allow_threads(|| rs_format_xlsx_bytes(data, &spec_options));
    let (v_bytes_out, report_format) = result_format.map_err(map_format_error)?;
    Ok((
        PyBytes::new(py, &v_bytes_out),
        PyReportFormat::from(report_format),
    ))
}

#[pymodule]
fn _sheetpress_io_xlsx_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyReportFormat>()?;
    module.add_function(wrap_pyfunction!(format_xlsx_py, module)?)?;
    module.add_function(wrap_pyfunction!(format_xlsx_bytes_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
