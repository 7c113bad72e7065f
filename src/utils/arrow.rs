//! Utilities for working with Arrow arrays.
//!
//! Everything in the survey tables is treated as text: the helpers here
//! extract a column as a `StringArray`, casting from whatever type the CSV
//! schema inference picked (respondent ids often infer as integers).

use arrow::array::{Array, StringArray};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{Result, SurveyChartError};

/// Get a column from a record batch as a `StringArray`.
///
/// The column is cast to Utf8 first when it has any other type; nulls are
/// preserved through the cast.
///
/// # Errors
///
/// * `ColumnNotFound` if the batch has no column with this name
/// * `TypeMismatch` if the column cannot be represented as strings
pub fn string_column(batch: &RecordBatch, column: &str, table: &str) -> Result<StringArray> {
    let idx = batch.schema().index_of(column).map_err(|_| {
        SurveyChartError::ColumnNotFound {
            column: column.to_string(),
            table: table.to_string(),
        }
    })?;

    let array = batch.column(idx);
    let array = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        cast(array.as_ref(), &DataType::Utf8).map_err(|_| SurveyChartError::TypeMismatch {
            column: column.to_string(),
            expected: "Utf8".to_string(),
        })?
    };

    array
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| SurveyChartError::TypeMismatch {
            column: column.to_string(),
            expected: "StringArray".to_string(),
        })
}

/// Read one row of a string column; null or empty values become `None`.
#[must_use]
pub fn opt_value(array: &StringArray, row: usize) -> Option<String> {
    if row < array.len() && !array.is_null(row) {
        let value = array.value(row);
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}
