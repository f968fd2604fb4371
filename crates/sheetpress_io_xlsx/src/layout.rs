//! Column width estimation from header and data text.

use crate::conf::N_WIDTH_EXCEL_COLUMN_MAX;
use crate::error::{XlsxFormatError, XlsxFormatResult};
use crate::spec::{SpecAutofitCellsPolicy, SpecColumnLayout, SpecHeader, TypeRow};
use crate::util::count_cell_chars;

/// Compute one display width per header column.
///
/// Cells beyond the header width are ignored; short rows contribute 0 for
/// their absent columns.
pub fn plan_column_layout(
    header: &SpecHeader,
    data_rows: &[TypeRow],
    policy: &SpecAutofitCellsPolicy,
) -> SpecColumnLayout {
    let widths = derive_max_chars_by_col(header, data_rows)
        .into_iter()
        .map(|n_chars_max| calculate_column_width(n_chars_max, policy))
        .collect();
    SpecColumnLayout { widths }
}

/// Maximum character count per column over the header and all data rows.
pub fn derive_max_chars_by_col(header: &SpecHeader, data_rows: &[TypeRow]) -> Vec<usize> {
    let n_cols = header.column_count();
    let mut l_max_chars: Vec<usize> = header
        .names
        .iter()
        .map(|name| name.chars().count())
        .collect();

    for row in data_rows {
        for (n_idx_col, value) in row.iter().take(n_cols).enumerate() {
            l_max_chars[n_idx_col] = usize::max(l_max_chars[n_idx_col], count_cell_chars(value));
        }
    }

    l_max_chars
}

/// `clamp(n_chars_max * width_per_char + width_cell_padding, min, max)`.
pub fn calculate_column_width(n_chars_max: usize, policy: &SpecAutofitCellsPolicy) -> f64 {
    let n_width_raw = n_chars_max as f64 * policy.width_per_char + policy.width_cell_padding;
    f64::min(
        policy.width_cell_max,
        f64::max(policy.width_cell_min, n_width_raw),
    )
}

/// Reject policies that would produce invalid or unbounded widths.
pub fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> XlsxFormatResult<()> {
    let l_fields = [
        ("width_cell_min", policy_autofit.width_cell_min),
        ("width_cell_max", policy_autofit.width_cell_max),
        ("width_per_char", policy_autofit.width_per_char),
        ("width_cell_padding", policy_autofit.width_cell_padding),
    ];
    for (c_name, n_value) in l_fields {
        if !n_value.is_finite() {
            return Err(XlsxFormatError::InvalidOptions(format!(
                "policy_autofit.{c_name} must be finite."
            )));
        }
    }

    if policy_autofit.width_cell_min <= 0.0 {
        return Err(XlsxFormatError::InvalidOptions(
            "policy_autofit.width_cell_min must be > 0.".to_string(),
        ));
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(XlsxFormatError::InvalidOptions(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        ));
    }
    if policy_autofit.width_cell_max > N_WIDTH_EXCEL_COLUMN_MAX {
        return Err(XlsxFormatError::InvalidOptions(format!(
            "policy_autofit.width_cell_max must be <= {N_WIDTH_EXCEL_COLUMN_MAX}."
        )));
    }
    if policy_autofit.width_per_char < 0.0 || policy_autofit.width_cell_padding < 0.0 {
        return Err(XlsxFormatError::InvalidOptions(
            "policy_autofit.width_per_char and width_cell_padding must be >= 0.".to_string(),
        ));
    }
    Ok(())
}
