//! CSV file loading utilities
//!
//! Each input table is read into a single Arrow record batch. Schemas are
//! inferred from the file (with header); downstream code reads every column
//! as text via [`crate::utils::arrow::string_column`].

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;
use log::debug;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::utils::arrow::{opt_value, string_column};

/// Category name -> free-text annotation, used as a title suffix.
pub type InsightMap = FxHashMap<String, String>;

/// Open a file with a context-rich error when it does not exist
fn open_input(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )
        .into());
    }
    Ok(File::open(path)?)
}

/// Read a CSV file (with header) into a single record batch
pub fn read_csv(path: &Path) -> Result<RecordBatch> {
    let mut file = open_input(path)?;

    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, None)?;
    file.rewind()?;
    let schema = Arc::new(schema);

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;

    let batch = if batches.is_empty() {
        RecordBatch::new_empty(schema)
    } else {
        concat_batches(&schema, &batches)?
    };

    debug!("Read {} rows from {}", batch.num_rows(), path.display());
    Ok(batch)
}

/// Load an insight table (`cat`, `insight` columns) into an [`InsightMap`].
///
/// Rows with a null category name are skipped; a null insight maps to an
/// empty annotation.
pub fn load_insights(path: &Path) -> Result<InsightMap> {
    let batch = read_csv(path)?;
    let table = path.display().to_string();

    let cats = string_column(&batch, "cat", &table)?;
    let insights = string_column(&batch, "insight", &table)?;

    let mut map = InsightMap::default();
    for row in 0..batch.num_rows() {
        if let Some(cat) = opt_value(&cats, row) {
            map.insert(cat, opt_value(&insights, row).unwrap_or_default());
        }
    }

    debug!("Loaded {} insight annotations from {}", map.len(), table);
    Ok(map)
}
