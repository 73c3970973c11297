//! Materialized row values used for detection and in-memory sorting.

use std::collections::{BTreeMap, HashMap};

/// Raw cell values of the rows the caller has materialized, keyed by
/// underlying row index and then column id.
///
/// Only the rows the caller chose to load are present; with an external
/// pager this is usually a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryValues {
    rows: BTreeMap<usize, HashMap<String, String>>,
}

impl InMemoryValues {
    /// Create an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows in order, starting at underlying row 0.
    pub fn from_rows<I, R, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let values = row.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
                (index, values)
            })
            .collect();
        Self { rows }
    }

    /// Record the value of one cell.
    pub fn insert(
        &mut self,
        row_index: usize,
        column_id: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.rows
            .entry(row_index)
            .or_default()
            .insert(column_id.into(), value.into());
    }

    /// Value of one cell.
    pub fn get(&self, row_index: usize, column_id: &str) -> Option<&str> {
        self.rows
            .get(&row_index)
            .and_then(|row| row.get(column_id))
            .map(String::as_str)
    }

    /// Values of one row.
    pub fn row(&self, row_index: usize) -> Option<&HashMap<String, String>> {
        self.rows.get(&row_index)
    }

    /// Iterate rows in ascending underlying index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &HashMap<String, String>)> {
        self.rows.iter().map(|(index, row)| (*index, row))
    }

    /// Non-empty values of a column, in row order.
    pub fn column_sample(&self, column_id: &str) -> Vec<&str> {
        self.rows
            .values()
            .filter_map(|row| row.get(column_id))
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .collect()
    }

    /// Number of materialized rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are materialized.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
