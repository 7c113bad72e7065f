//! Static configuration for the chart pipeline.
//!
//! Everything here is fixed at startup and read-only for the rest of the
//! run: the ordinal salary domain, the category lists and their labels.

/// The fixed ordinal salary domain, in axis order. Not alphabetic; the
/// labels must be used verbatim.
pub const SALARY_ORDER: [&str; 13] = [
    "15K or less",
    "15K+ to 25K",
    "25K+ to 35K",
    "35K+ to 45K",
    "45K+ to 55K",
    "55K+ to 65K",
    "65K+ to 75K",
    "75K+ to 85K",
    "85K+ to 95K",
    "95K+ to 100K",
    "a. 100K+ to 125K",
    "b. 125K+ to 250K",
    "c. 250K+",
];

/// Total order over salary bucket labels.
///
/// Labels outside the 13-value domain are kept rather than dropped; they
/// sort after the domain, lexicographically among themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalaryOrder;

impl SalaryOrder {
    #[must_use]
    pub fn labels(&self) -> &'static [&'static str] {
        &SALARY_ORDER
    }

    /// Position of a label within the fixed domain, `None` if out of domain.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<usize> {
        SALARY_ORDER.iter().position(|l| *l == label)
    }

    /// Sort key placing domain labels first in domain order, then
    /// out-of-domain labels lexicographically.
    #[must_use]
    pub fn sort_key<'a>(&self, label: &'a str) -> (usize, &'a str) {
        match self.position(label) {
            Some(idx) => (idx, ""),
            None => (SALARY_ORDER.len(), label),
        }
    }
}

/// How many values a respondent may contribute to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one value per respondent (demographic fields)
    Single,
    /// One row per selected value (multi-select tool fields)
    Multi,
}

/// One configured category: its column name, display label and cardinality.
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub name: &'static str,
    pub label: &'static str,
    pub cardinality: Cardinality,
}

impl CategorySpec {
    const fn single(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            cardinality: Cardinality::Single,
        }
    }

    const fn multi(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            cardinality: Cardinality::Multi,
        }
    }
}

/// Configuration for one pipeline run, constructed once at startup.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Ordinal salary domain used for grouping and the x axis
    pub salary_order: SalaryOrder,
    /// Single-response demographic categories, in dropdown order
    pub single_categories: Vec<CategorySpec>,
    /// Multi-response tool/skill categories, in dropdown order
    pub multi_categories: Vec<CategorySpec>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            salary_order: SalaryOrder,
            single_categories: vec![
                CategorySpec::single("age_grp", "Age Group"),
                CategorySpec::single("careerstg", "Career Stage"),
                CategorySpec::single("datarole_grpd", "Datarole Group"),
                CategorySpec::single("educstat", "Education Status"),
                CategorySpec::single("employertype", "Employer Type"),
                CategorySpec::single("gender", "Gender"),
                CategorySpec::single("industry", "Industry"),
                CategorySpec::single("sitework", "Site Work"),
            ],
            multi_categories: vec![
                CategorySpec::multi("generaltools", "General Tools"),
                CategorySpec::multi("whatused", "Skills"),
            ],
        }
    }
}
