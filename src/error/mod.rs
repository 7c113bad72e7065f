//! Error handling for the survey chart pipeline.

use arrow::error::ArrowError;

/// Errors that can occur while loading, joining or rendering survey data
#[derive(Debug, thiserror::Error)]
pub enum SurveyChartError {
    /// Error opening or reading an input file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading or processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// A required column is missing from an input table
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { column: String, table: String },

    /// A column could not be read as the expected type
    #[error("Column '{column}' could not be read as {expected}")]
    TypeMismatch { column: String, expected: String },
}

/// Alias for Result with `SurveyChartError`
pub type Result<T> = std::result::Result<T, SurveyChartError>;
