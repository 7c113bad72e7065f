//! Join and aggregation for survey response tables.
//!
//! The primary table carries one row per respondent with the salary bucket
//! and the single-response demographic fields. The two side tables carry one
//! row per (respondent, selected value) pair. [`join_tables`] left-joins the
//! side tables onto the primary table; the counting functions then build one
//! [`CountTable`] per configured category.
//!
//! Two counting semantics exist, per category cardinality:
//! single-response categories count distinct respondents, multi-response
//! categories count raw mentions (one per side-table row).

use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use log::warn;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::{Cardinality, CategorySpec, ChartConfig, SalaryOrder};
use crate::error::Result;
use crate::utils::arrow::{opt_value, string_column};

/// One respondent after the left join.
///
/// A respondent missing from a side table simply has no mentions for that
/// category; the row is never lost.
#[derive(Debug, Clone, Default)]
pub struct Respondent {
    pub resp_id: String,
    pub salary: Option<String>,
    /// Single-response value per category name; absent means missing
    pub singles: FxHashMap<&'static str, String>,
    /// Multi-response mentions per category name
    pub mentions: FxHashMap<&'static str, Vec<String>>,
}

/// One aggregated (salary bucket, category value, count) row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRow {
    pub salary: String,
    pub value: String,
    pub count: u64,
}

/// Aggregated counts for one category, sorted by (salary order, value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable {
    pub category: String,
    pub rows: Vec<CountRow>,
}

impl CountTable {
    /// Distinct category values, lexicographically sorted over their string
    /// form. This determines trace, stacking and legend order.
    #[must_use]
    pub fn distinct_values(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| r.value.as_str())
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Salary buckets and counts for one category value, in salary order.
    #[must_use]
    pub fn series_for(&self, value: &str) -> (Vec<String>, Vec<u64>) {
        self.rows
            .iter()
            .filter(|r| r.value == value)
            .map(|r| (r.salary.clone(), r.count))
            .unzip()
    }
}

/// Left-join the two side tables onto the primary table.
///
/// The primary table is the base: every primary row with a respondent id
/// becomes a [`Respondent`]. Side-table rows whose id does not appear in
/// the primary table are dropped.
///
/// # Errors
///
/// Fails if `resp_id` is missing from any table, if `salary` or a
/// configured demographic column is missing from the primary table, or if
/// a side table lacks its category value column.
pub fn join_tables(
    primary: &RecordBatch,
    sides: &[(CategorySpec, &RecordBatch)],
    config: &ChartConfig,
) -> Result<Vec<Respondent>> {
    let ids = string_column(primary, "resp_id", "primary")?;
    let salaries = string_column(primary, "salary", "primary")?;
    let single_columns = config
        .single_categories
        .iter()
        .map(|spec| Ok((spec.name, string_column(primary, spec.name, "primary")?)))
        .collect::<Result<Vec<_>>>()?;

    let mut respondents = Vec::with_capacity(primary.num_rows());
    let mut by_id: FxHashMap<String, Vec<usize>> = FxHashMap::default();

    for row in 0..primary.num_rows() {
        let Some(resp_id) = opt_value(&ids, row) else {
            warn!("Primary table row {row} has no respondent id, skipping");
            continue;
        };

        let mut respondent = Respondent {
            resp_id: resp_id.clone(),
            salary: opt_value(&salaries, row),
            ..Respondent::default()
        };
        for (name, column) in &single_columns {
            if let Some(value) = opt_value(column, row) {
                respondent.singles.insert(name, value);
            }
        }

        by_id.entry(resp_id).or_default().push(respondents.len());
        respondents.push(respondent);
    }

    for (spec, batch) in sides {
        let side_ids = string_column(batch, "resp_id", spec.name)?;
        let values = string_column(batch, spec.name, spec.name)?;

        for row in 0..batch.num_rows() {
            let (Some(resp_id), Some(value)) =
                (opt_value(&side_ids, row), opt_value(&values, row))
            else {
                continue;
            };
            // Left join: side rows without a primary match are dropped
            if let Some(indices) = by_id.get(&resp_id) {
                for &idx in indices {
                    respondents[idx]
                        .mentions
                        .entry(spec.name)
                        .or_default()
                        .push(value.clone());
                }
            }
        }
    }

    Ok(respondents)
}

/// Count distinct respondents per (salary bucket, category value).
///
/// Rows with a missing salary or a missing category value are excluded.
#[must_use]
pub fn count_single(
    respondents: &[Respondent],
    spec: &CategorySpec,
    order: &SalaryOrder,
) -> CountTable {
    let mut groups: FxHashMap<(String, String), FxHashSet<&str>> = FxHashMap::default();
    for respondent in respondents {
        let (Some(salary), Some(value)) =
            (respondent.salary.as_ref(), respondent.singles.get(spec.name))
        else {
            continue;
        };
        groups
            .entry((salary.clone(), value.clone()))
            .or_default()
            .insert(respondent.resp_id.as_str());
    }

    into_table(
        spec.name,
        groups.into_iter().map(|(key, ids)| (key, ids.len() as u64)),
        order,
    )
}

/// Count raw mentions per (salary bucket, category value).
///
/// One respondent may contribute several mentions, so per-bucket totals may
/// exceed the respondent count. Each category is counted against its own
/// side-table rows only.
#[must_use]
pub fn count_mentions(
    respondents: &[Respondent],
    spec: &CategorySpec,
    order: &SalaryOrder,
) -> CountTable {
    let mut groups: FxHashMap<(String, String), u64> = FxHashMap::default();
    for respondent in respondents {
        let Some(salary) = respondent.salary.as_ref() else {
            continue;
        };
        for value in respondent.mentions.get(spec.name).into_iter().flatten() {
            *groups.entry((salary.clone(), value.clone())).or_insert(0) += 1;
        }
    }

    into_table(spec.name, groups, order)
}

/// Build the count tables for a list of categories, in list order,
/// dispatching on cardinality.
#[must_use]
pub fn count_tables(
    respondents: &[Respondent],
    categories: &[CategorySpec],
    order: &SalaryOrder,
) -> Vec<CountTable> {
    categories
        .iter()
        .map(|spec| match spec.cardinality {
            Cardinality::Single => count_single(respondents, spec, order),
            Cardinality::Multi => count_mentions(respondents, spec, order),
        })
        .collect()
}

fn into_table(
    category: &str,
    counts: impl IntoIterator<Item = ((String, String), u64)>,
    order: &SalaryOrder,
) -> CountTable {
    let mut rows: Vec<CountRow> = counts
        .into_iter()
        .map(|((salary, value), count)| CountRow {
            salary,
            value,
            count,
        })
        .collect();
    rows.sort_by(|a, b| {
        order
            .sort_key(&a.salary)
            .cmp(&order.sort_key(&b.salary))
            .then_with(|| a.value.cmp(&b.value))
    });
    CountTable {
        category: category.to_string(),
        rows,
    }
}
