use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// The input table could not be read or parsed.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input is not valid {encoding}: {reason}")]
    Decode {
        encoding: &'static str,
        reason: String,
    },

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("input has no header row")]
    MissingHeader,

    #[error("duplicate column name '{0}'")]
    DuplicateHeader(String),

    #[error("input has a header but no data rows")]
    NoRows,

    #[error("column '{column}' has {len} values, expected {expected}")]
    RaggedColumn {
        column: String,
        len: usize,
        expected: usize,
    },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// An extraction plan asked for a column the table does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{plan} plan needs {required} columns and expects the {role} in column {index}, \
     but the table only has {available} column(s)"
)]
pub struct OutOfRangeError {
    pub plan: &'static str,
    /// Number of columns the whole schema needs.
    pub required: usize,
    pub role: String,
    pub index: usize,
    pub available: usize,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("cannot write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },

    #[error("interactive display failed: {0}")]
    Display(String),
}
