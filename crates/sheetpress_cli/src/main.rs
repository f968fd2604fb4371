//! `sheetpress` CLI: reformat one spreadsheet into a styled single-sheet XLSX.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sheetpress_io_xlsx::conf::derive_default_format_options;
use sheetpress_io_xlsx::{
    EnumFormatErrorKind, SpecXlsxFormatOptions, SpecXlsxFormatReport, XlsxFormatError,
    format_xlsx,
};

const N_EXIT_FAILURE: u8 = 1;
const N_EXIT_BAD_INPUT: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "sheetpress")]
#[command(
    version,
    about = "Reformat a raw spreadsheet into a clean single-sheet XLSX"
)]
struct Cli {
    /// Input spreadsheet (xlsx, xlsm, xlsb, xls, ods)
    input: PathBuf,

    /// Output XLSX file, replaced if it exists
    output: PathBuf,

    /// Output sheet name
    #[arg(long)]
    sheet_name: Option<String>,

    /// Narrowest column width
    #[arg(long)]
    width_min: Option<f64>,

    /// Widest column width
    #[arg(long)]
    width_max: Option<f64>,

    /// Header row height in points
    #[arg(long)]
    header_height: Option<f64>,

    /// Prefix for names of blank header cells
    #[arg(long)]
    placeholder_prefix: Option<String>,
}

impl Cli {
    fn derive_options(&self) -> SpecXlsxFormatOptions {
        let mut options = derive_default_format_options();
        if let Some(v) = &self.sheet_name {
            options.sheet_name = v.clone();
        }
        if let Some(v) = self.width_min {
            options.policy_autofit.width_cell_min = v;
        }
        if let Some(v) = self.width_max {
            options.policy_autofit.width_cell_max = v;
        }
        if let Some(v) = self.header_height {
            options.height_header_row = v;
        }
        if let Some(v) = &self.placeholder_prefix {
            options.header_placeholder_prefix = v.clone();
        }
        options
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            println!("{report}");
            for c_warning in &report.warnings {
                eprintln!("warning: {c_warning}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(derive_exit_code(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<SpecXlsxFormatReport> {
    let options = cli.derive_options();
    log::debug!("Resolved options: {options:?}");
    format_xlsx(&cli.input, &cli.output, &options)
        .with_context(|| describe_run(&cli.input, &cli.output))
}

fn describe_run(path_in: &Path, path_out: &Path) -> String {
    format!(
        "Failed to format {} into {}",
        path_in.display(),
        path_out.display()
    )
}

/// `2` for unreadable input, `1` for everything else.
fn derive_exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<XlsxFormatError>().map(XlsxFormatError::kind) {
        Some(EnumFormatErrorKind::Read) => N_EXIT_BAD_INPUT,
        _ => N_EXIT_FAILURE,
    }
}
