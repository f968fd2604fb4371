//! Format pipeline error types.

use thiserror::Error;

/// Result type for format pipeline operations.
pub type XlsxFormatResult<T> = std::result::Result<T, XlsxFormatError>;

/// Coarse error classification for callers mapping failures to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFormatErrorKind {
    /// Input could not be opened or parsed ("bad input").
    Read,
    /// Output could not be created or serialized ("server error").
    Write,
    /// Options rejected before any I/O.
    InvalidOptions,
}

/// Errors that terminate one format run.
#[derive(Debug, Error)]
pub enum XlsxFormatError {
    /// Input spreadsheet cannot be opened or parsed, or sheet 0 is missing.
    #[error("Failed to read spreadsheet {source_desc}: {message}")]
    Read {
        /// Input path, or `<bytes>` for in-memory input.
        source_desc: String,
        /// Underlying error text.
        message: String,
    },

    /// Output workbook cannot be created or serialized.
    #[error("Failed to write spreadsheet {target}: {message}")]
    Write {
        /// Output path, or `<buffer>` for in-memory output.
        target: String,
        /// Underlying error text.
        message: String,
    },

    /// Format options failed validation.
    #[error("Invalid format options: {0}")]
    InvalidOptions(String),
}

impl XlsxFormatError {
    /// Classification of this error.
    pub fn kind(&self) -> EnumFormatErrorKind {
        match self {
            Self::Read { .. } => EnumFormatErrorKind::Read,
            Self::Write { .. } => EnumFormatErrorKind::Write,
            Self::InvalidOptions(_) => EnumFormatErrorKind::InvalidOptions,
        }
    }

    pub(crate) fn read(source_desc: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Read {
            source_desc: source_desc.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(target: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Write {
            target: target.into(),
            message: err.to_string(),
        }
    }
}
