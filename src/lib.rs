//! A Rust library for building salary-breakdown charts from survey response
//! tables: left-joins the response tables on the respondent id, aggregates
//! per-category counts over a fixed ordinal salary domain, and renders
//! interactive stacked-bar HTML figures with a category dropdown.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod error;
pub mod loader;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{Cardinality, CategorySpec, ChartConfig, SALARY_ORDER, SalaryOrder};
pub use error::{Result, SurveyChartError};

// Aggregation
pub use aggregate::{CountRow, CountTable, Respondent, count_tables, join_tables};

// Loading
pub use loader::{InsightMap, load_insights, read_csv};

// Chart construction
pub use chart::{build_figure, visibility_masks, write_outputs};

// Arrow types
pub use arrow::record_batch::RecordBatch;
