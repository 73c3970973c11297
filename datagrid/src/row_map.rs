//! Row index map: visible row position to underlying row index.
//!
//! In-memory sorting never reorders the caller's data. It produces a
//! permutation that the renderer consults whenever it resolves which
//! underlying row a visible position shows.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::InMemoryLevel;
use crate::error::panic_message;
use crate::schema::{ComparatorFn, Schema, SchemaRegistry};
use crate::sorting::{SortDirection, SortState};
use crate::values::InMemoryValues;

/// Permutation from visible row position to underlying row index.
///
/// The map covers the materialized rows only: the i-th materialized key in
/// ascending order shows the i-th row of the sorted order. Every position
/// outside that key set resolves to itself, so a sample of a single page
/// reorders that page and leaves the rest of the grid in place.
///
/// An identity map stores nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowIndexMap {
    map: Option<Entries>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entries {
    /// Materialized positions, ascending.
    keys: Arc<[usize]>,
    /// Underlying row shown at `keys[i]`.
    sorted: Arc<[usize]>,
}

impl RowIndexMap {
    /// The identity map.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build from an explicit permutation of `0..indices.len()`.
    pub fn from_indices(indices: Vec<usize>) -> Self {
        let keys = (0..indices.len()).collect::<Vec<_>>();
        Self::from_sorted_keys(keys, indices)
    }

    /// `keys` must be ascending and `sorted` a reordering of it.
    fn from_sorted_keys(keys: Vec<usize>, sorted: Vec<usize>) -> Self {
        debug_assert_eq!(keys.len(), sorted.len());
        Self {
            map: Some(Entries {
                keys: keys.into(),
                sorted: sorted.into(),
            }),
        }
    }

    /// Whether no remapping is active.
    pub fn is_identity(&self) -> bool {
        self.map.is_none()
    }

    /// Explicit mapping for a position, if one exists.
    pub fn lookup(&self, visible_row: usize) -> Option<usize> {
        let entries = self.map.as_ref()?;
        let slot = entries.keys.binary_search(&visible_row).ok()?;
        entries.sorted.get(slot).copied()
    }

    /// Underlying row index for a visible position.
    pub fn underlying(&self, visible_row: usize) -> usize {
        self.lookup(visible_row).unwrap_or(visible_row)
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, |m| m.keys.len())
    }

    /// Whether the map has no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Underlying rows of the explicit entries, in visible order.
    pub fn as_slice(&self) -> &[usize] {
        self.map.as_ref().map_or(&[][..], |m| &m.sorted[..])
    }

    /// Build the map for a sort state.
    ///
    /// Returns the identity map unless `level` sorts in memory and `sort` is
    /// non-empty. Otherwise every materialized row is stable-sorted by the
    /// sort columns in priority order, each compared with the comparator of
    /// its resolved schema. Missing values compare as empty strings. The
    /// sorted rows are laid back over the materialized positions.
    ///
    /// A panicking comparator abandons the sort and yields the identity map.
    pub fn build(
        level: InMemoryLevel,
        sort: &SortState,
        values: &InMemoryValues,
        schema: &Schema,
        registry: &SchemaRegistry,
    ) -> Self {
        if !level.sorts() || sort.is_empty() {
            return Self::identity();
        }

        let keys: Vec<(&str, SortDirection, ComparatorFn)> = sort
            .columns()
            .iter()
            .map(|c| {
                let comparator = registry.comparator_for(schema.column_type(&c.id));
                (c.id.as_str(), c.direction, comparator)
            })
            .collect();

        let mut snapshot: Vec<(usize, &HashMap<String, String>)> = values.iter().collect();
        let positions: Vec<usize> = snapshot.iter().map(|(index, _)| *index).collect();

        let sorted = panic::catch_unwind(AssertUnwindSafe(|| {
            snapshot.sort_by(|(_, a), (_, b)| {
                for (column_id, direction, comparator) in &keys {
                    let a = a.get(*column_id).map_or("", String::as_str);
                    let b = b.get(*column_id).map_or("", String::as_str);
                    let ordering = comparator(a, b, *direction);
                    if ordering.is_ne() {
                        return ordering;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }));

        if let Err(payload) = sorted {
            log::warn!(
                "row map: comparator panicked, showing unsorted rows: {}",
                panic_message(&payload)
            );
            return Self::identity();
        }

        log::debug!(
            "row map: rebuilt {} rows by [{}]",
            snapshot.len(),
            sort.columns()
                .iter()
                .map(|c| format!("{} {}", c.id, c.direction))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Self::from_sorted_keys(
            positions,
            snapshot.into_iter().map(|(index, _)| index).collect(),
        )
    }
}
