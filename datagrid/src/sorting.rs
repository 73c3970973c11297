//! Sort state: an ordered list of sorted columns.
//!
//! Every operation returns a new [`SortState`]; the grid never mutates the
//! caller's state in place. The caller applies the result and hands it back
//! on the next update pass.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Sort direction for a single column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Apply this direction to an ascending ordering.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// One entry of a sort state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortColumn {
    pub id: String,
    pub direction: SortDirection,
}

impl SortColumn {
    /// Create an entry.
    pub fn new(id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            id: id.into(),
            direction,
        }
    }

    /// Ascending entry.
    pub fn asc(id: impl Into<String>) -> Self {
        Self::new(id, SortDirection::Asc)
    }

    /// Descending entry.
    pub fn desc(id: impl Into<String>) -> Self {
        Self::new(id, SortDirection::Desc)
    }
}

/// Ordered sort columns, highest priority first.
///
/// Column ids are unique within a state. Cloning is cheap; the entries are
/// shared and never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SortColumn>", into = "Vec<SortColumn>")]
pub struct SortState {
    columns: Arc<[SortColumn]>,
}

impl From<Vec<SortColumn>> for SortState {
    fn from(columns: Vec<SortColumn>) -> Self {
        Self::new(columns)
    }
}

impl From<SortState> for Vec<SortColumn> {
    fn from(state: SortState) -> Self {
        state.columns.to_vec()
    }
}

impl SortState {
    /// Build a state from entries. Later duplicates of an id are dropped.
    pub fn new(columns: impl IntoIterator<Item = SortColumn>) -> Self {
        let mut seen = HashSet::new();
        let columns: Vec<SortColumn> = columns
            .into_iter()
            .filter(|c| seen.insert(c.id.clone()))
            .collect();
        Self {
            columns: columns.into(),
        }
    }

    /// An empty state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Entries in priority order.
    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    /// Number of sorted columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no column is sorted.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column in the state.
    pub fn position(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// Whether a column is sorted.
    pub fn contains(&self, column_id: &str) -> bool {
        self.position(column_id).is_some()
    }

    /// Direction of a sorted column.
    pub fn direction(&self, column_id: &str) -> Option<SortDirection> {
        self.columns
            .iter()
            .find(|c| c.id == column_id)
            .map(|c| c.direction)
    }

    /// Whether two states share the same storage.
    pub fn ptr_eq(&self, other: &SortState) -> bool {
        Arc::ptr_eq(&self.columns, &other.columns)
    }

    fn with_columns(columns: Vec<SortColumn>) -> Self {
        Self {
            columns: columns.into(),
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Flip the direction of a sorted column, keeping its position.
    ///
    /// Returns an equal state when the column is not sorted.
    pub fn toggle_direction(&self, column_id: &str) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                if c.id == column_id {
                    SortColumn::new(c.id.clone(), c.direction.toggled())
                } else {
                    c.clone()
                }
            })
            .collect();
        Self::with_columns(columns)
    }

    /// Append a column sorted ascending. No-op when already sorted.
    pub fn add_column(&self, column_id: &str) -> Self {
        let mut columns = self.columns.to_vec();
        if !self.contains(column_id) {
            columns.push(SortColumn::asc(column_id));
        }
        Self::with_columns(columns)
    }

    /// Remove a column, preserving the order of the others.
    pub fn remove_column(&self, column_id: &str) -> Self {
        let columns = self
            .columns
            .iter()
            .filter(|c| c.id != column_id)
            .cloned()
            .collect();
        Self::with_columns(columns)
    }

    /// Move the entry at `from` to `to`, shifting the entries in between.
    ///
    /// Returns `None` when either index is out of range.
    pub fn reorder(&self, from: usize, to: usize) -> Option<Self> {
        if from >= self.columns.len() || to >= self.columns.len() {
            return None;
        }
        let mut columns = self.columns.to_vec();
        let moved = columns.remove(from);
        columns.insert(to, moved);
        Some(Self::with_columns(columns))
    }

    /// Remove every entry.
    pub fn clear_all(&self) -> Self {
        Self::empty()
    }

    /// Drop entries whose column is not in `valid_ids`.
    ///
    /// Returns `Cow::Borrowed(self)` when nothing was removed, so callers can
    /// tell whether a change notification is due.
    pub fn prune_missing<'a, I, S>(&'a self, valid_ids: I) -> Cow<'a, SortState>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let valid: HashSet<String> = valid_ids
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        if self.columns.iter().all(|c| valid.contains(&c.id)) {
            return Cow::Borrowed(self);
        }
        let columns = self
            .columns
            .iter()
            .filter(|c| valid.contains(&c.id))
            .cloned()
            .collect();
        Cow::Owned(Self::with_columns(columns))
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Receives the next sort state. The grid never applies it itself.
pub type SortCallback = Arc<dyn Fn(SortState) + Send + Sync>;

/// Controlled sorting: the caller's current state plus its change callback.
#[derive(Clone)]
pub struct Sorting {
    columns: SortState,
    on_sort: SortCallback,
}

impl Sorting {
    pub fn new<F>(columns: SortState, on_sort: F) -> Self
    where
        F: Fn(SortState) + Send + Sync + 'static,
    {
        Self {
            columns,
            on_sort: Arc::new(on_sort),
        }
    }

    /// The caller's current state.
    pub fn columns(&self) -> &SortState {
        &self.columns
    }

    /// Copy carrying a newer caller state and the same callback.
    pub fn with_columns(&self, columns: SortState) -> Self {
        Self {
            columns,
            on_sort: Arc::clone(&self.on_sort),
        }
    }

    /// Hand a proposed state to the caller.
    pub fn notify(&self, next: SortState) {
        log::debug!("sorting: proposing {} sorted columns", next.len());
        (self.on_sort)(next);
    }

    /// Propose a state without entries for columns outside `valid_ids`.
    ///
    /// Notifies at most once and only when something was pruned. Returns
    /// whether a notification was sent.
    pub fn prune_to<I, S>(&self, valid_ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.columns.prune_missing(valid_ids) {
            Cow::Borrowed(_) => false,
            Cow::Owned(pruned) => {
                log::debug!(
                    "sorting: pruning {} stale columns",
                    self.columns.len() - pruned.len()
                );
                self.notify(pruned);
                true
            }
        }
    }
}

impl fmt::Debug for Sorting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sorting")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(entries: &[(&str, SortDirection)]) -> SortState {
        SortState::new(entries.iter().map(|(id, d)| SortColumn::new(*id, *d)))
    }

    fn ids(state: &SortState) -> Vec<&str> {
        state.columns().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_toggle_direction_keeps_position() {
        let s = state(&[("a", SortDirection::Asc), ("b", SortDirection::Asc)]);
        let toggled = s.toggle_direction("b");
        assert_eq!(ids(&toggled), vec!["a", "b"]);
        assert_eq!(toggled.direction("b"), Some(SortDirection::Desc));
        assert_eq!(toggled.direction("a"), Some(SortDirection::Asc));
    }

    #[test]
    fn test_toggle_direction_twice_round_trips() {
        let s = state(&[("a", SortDirection::Desc)]);
        assert_eq!(s.toggle_direction("a").toggle_direction("a"), s);
    }

    #[test]
    fn test_toggle_direction_absent_is_noop() {
        let s = state(&[("a", SortDirection::Asc)]);
        assert_eq!(s.toggle_direction("zzz"), s);
    }

    #[test]
    fn test_add_column_appends_ascending() {
        let s = state(&[("a", SortDirection::Desc)]).add_column("b");
        assert_eq!(ids(&s), vec!["a", "b"]);
        assert_eq!(s.direction("b"), Some(SortDirection::Asc));
        assert_eq!(s.add_column("a"), s);
    }

    #[test]
    fn test_remove_column_preserves_order() {
        let s = state(&[
            ("a", SortDirection::Asc),
            ("b", SortDirection::Asc),
            ("c", SortDirection::Asc),
        ]);
        assert_eq!(ids(&s.remove_column("b")), vec!["a", "c"]);
        assert_eq!(s.remove_column("zzz"), s);
    }

    #[test]
    fn test_reorder_moves_entry() {
        let s = state(&[
            ("a", SortDirection::Asc),
            ("b", SortDirection::Asc),
            ("c", SortDirection::Asc),
        ]);
        assert_eq!(ids(&s.reorder(0, 2).unwrap()), vec!["b", "c", "a"]);
        assert_eq!(ids(&s.reorder(2, 0).unwrap()), vec!["c", "a", "b"]);
        assert_eq!(s.reorder(1, 1).unwrap(), s);
        assert!(s.reorder(0, 3).is_none());
        assert!(s.reorder(5, 0).is_none());
    }

    #[test]
    fn test_clear_all() {
        assert!(state(&[("a", SortDirection::Asc)]).clear_all().is_empty());
    }

    #[test]
    fn test_prune_missing_borrowed_when_unchanged() {
        let s = state(&[("a", SortDirection::Asc)]);
        let pruned = s.prune_missing(["a", "b"]);
        assert!(matches!(pruned, Cow::Borrowed(_)));
        assert!(pruned.ptr_eq(&s));
    }

    #[test]
    fn test_prune_missing_is_idempotent() {
        let s = state(&[("a", SortDirection::Asc), ("b", SortDirection::Desc)]);
        let first = s.prune_missing(["a"]).into_owned();
        assert_eq!(ids(&first), vec!["a"]);
        let second = first.prune_missing(["a"]);
        assert!(matches!(second, Cow::Borrowed(_)));
        assert!(second.ptr_eq(&first));
    }

    #[test]
    fn test_new_drops_duplicate_ids() {
        let s = state(&[("a", SortDirection::Asc), ("a", SortDirection::Desc)]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.direction("a"), Some(SortDirection::Asc));
    }

    #[test]
    fn test_serde_shape() {
        let s = state(&[("a", SortDirection::Desc)]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"[{"id":"a","direction":"desc"}]"#);
        let back: SortState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_prune_to_notifies_once_when_changed() {
        use std::sync::Mutex;

        let seen: Arc<Mutex<Vec<SortState>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let sorting = Sorting::new(
            state(&[("a", SortDirection::Asc), ("b", SortDirection::Asc)]),
            move |next| sink.lock().unwrap().push(next),
        );

        assert!(!sorting.prune_to(["a", "b", "c"]));
        assert!(sorting.prune_to(["a", "c"]));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(ids(&seen[0]), vec!["a"]);
    }
}
