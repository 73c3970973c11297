//! Column declarations, widths and visibility.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::FALLBACK_COLUMN_WIDTH;
use crate::schema::ColumnType;

// =============================================================================
// ColumnDefinition
// =============================================================================

/// A data column declaration.
///
/// The `id` is the stable identity of the column; reordering a column list
/// changes display order only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Unique identifier for this column.
    pub id: String,
    /// Declared schema. When set, detection is skipped for this column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<ColumnType>,
    /// Whether cells open an expansion popover. Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expandable: Option<bool>,
    /// Header text. Falls back to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl ColumnDefinition {
    /// Create a column with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema: None,
            is_expandable: None,
            display: None,
        }
    }

    /// Declare the schema for this column.
    pub fn schema(mut self, column_type: ColumnType) -> Self {
        self.schema = Some(column_type);
        self
    }

    /// Set whether cells of this column can be expanded.
    pub fn expandable(mut self, expandable: bool) -> Self {
        self.is_expandable = Some(expandable);
        self
    }

    /// Set the header text.
    pub fn display(mut self, text: impl Into<String>) -> Self {
        self.display = Some(text.into());
        self
    }

    /// Header text for this column.
    pub fn header(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.id)
    }

    /// Resolved expandability.
    pub fn expandable_or_default(&self) -> bool {
        self.is_expandable.unwrap_or(true)
    }
}

// =============================================================================
// ControlColumn
// =============================================================================

/// A fixed, non-data column (row selector, action buttons).
///
/// Control columns are placed before (leading) or after (trailing) the data
/// columns and never take part in sorting or schema detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlColumn {
    /// Unique identifier, must not collide with data column ids.
    pub id: String,
    /// Fixed width.
    pub width: u32,
}

impl ControlColumn {
    /// Create a control column.
    pub fn new(id: impl Into<String>, width: u32) -> Self {
        Self {
            id: id.into(),
            width,
        }
    }
}

// =============================================================================
// ColumnWidths
// =============================================================================

/// Explicit per-column widths, keyed by column id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnWidths(HashMap<String, u32>);

impl ColumnWidths {
    /// Create an empty width map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width of a column, returning the updated map.
    pub fn with(mut self, column_id: impl Into<String>, width: u32) -> Self {
        self.0.insert(column_id.into(), width);
        self
    }

    /// Set the width of a column.
    pub fn set(&mut self, column_id: impl Into<String>, width: u32) {
        self.0.insert(column_id.into(), width);
    }

    /// Explicit width for a column, if any.
    pub fn get(&self, column_id: &str) -> Option<u32> {
        self.0.get(column_id).copied()
    }

    /// Resolve the width of a column: explicit width, then the configured
    /// default, then [`FALLBACK_COLUMN_WIDTH`].
    pub fn resolve(&self, column_id: &str, default_width: Option<u32>) -> u32 {
        self.get(column_id)
            .filter(|w| *w > 0)
            .or(default_width)
            .unwrap_or(FALLBACK_COLUMN_WIDTH)
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for ColumnWidths {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, w)| (k.into(), w)).collect())
    }
}

// =============================================================================
// ColumnVisibility
// =============================================================================

/// Which declared columns are shown, and in what order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnVisibility {
    /// Visible column ids in display order.
    pub visible_columns: Vec<String>,
}

impl ColumnVisibility {
    /// Create a visibility set from ids in display order.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            visible_columns: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Apply to a declared column list.
    ///
    /// Unknown ids are skipped; declared columns not listed are hidden.
    pub fn apply(&self, columns: &[ColumnDefinition]) -> Vec<ColumnDefinition> {
        self.visible_columns
            .iter()
            .filter_map(|id| columns.iter().find(|c| &c.id == id).cloned())
            .collect()
    }

    /// Swap the display positions of two visible columns.
    ///
    /// Returns `None` when either id is not visible.
    pub fn switch_column_pos(&self, source_id: &str, destination_id: &str) -> Option<Self> {
        let source = self.visible_columns.iter().position(|id| id == source_id)?;
        let destination = self
            .visible_columns
            .iter()
            .position(|id| id == destination_id)?;
        let mut visible_columns = self.visible_columns.clone();
        visible_columns.swap(source, destination);
        Some(Self { visible_columns })
    }

    /// Hide or show a column. Shown columns are appended at the end.
    pub fn set_visible(&self, column_id: &str, visible: bool) -> Self {
        let mut visible_columns: Vec<String> = self
            .visible_columns
            .iter()
            .filter(|id| id.as_str() != column_id)
            .cloned()
            .collect();
        if visible {
            match self.visible_columns.iter().position(|id| id == column_id) {
                Some(pos) => visible_columns.insert(pos, column_id.to_string()),
                None => visible_columns.push(column_id.to_string()),
            }
        }
        Self { visible_columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_resolution_order() {
        let widths = ColumnWidths::new().with("a", 250);
        assert_eq!(widths.resolve("a", Some(80)), 250);
        assert_eq!(widths.resolve("b", Some(80)), 80);
        assert_eq!(widths.resolve("b", None), FALLBACK_COLUMN_WIDTH);
    }

    #[test]
    fn test_zero_width_falls_through() {
        let widths = ColumnWidths::new().with("a", 0);
        assert_eq!(widths.resolve("a", None), FALLBACK_COLUMN_WIDTH);
    }

    #[test]
    fn test_expandable_default() {
        assert!(ColumnDefinition::new("a").expandable_or_default());
        assert!(!ColumnDefinition::new("a").expandable(false).expandable_or_default());
    }

    #[test]
    fn test_visibility_orders_and_filters() {
        let columns = vec![
            ColumnDefinition::new("a"),
            ColumnDefinition::new("b"),
            ColumnDefinition::new("c"),
        ];
        let visibility = ColumnVisibility::new(["c", "a", "missing"]);
        let ids: Vec<_> = visibility.apply(&columns).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_switch_column_pos() {
        let visibility = ColumnVisibility::new(["a", "b", "c"]);
        let switched = visibility.switch_column_pos("a", "c").unwrap();
        assert_eq!(switched.visible_columns, vec!["c", "b", "a"]);
        assert!(visibility.switch_column_pos("a", "z").is_none());
    }

    #[test]
    fn test_set_visible_round_trip() {
        let visibility = ColumnVisibility::new(["a", "b"]);
        let hidden = visibility.set_visible("a", false);
        assert_eq!(hidden.visible_columns, vec!["b"]);
        let shown = hidden.set_visible("a", true);
        assert_eq!(shown.visible_columns, vec!["b", "a"]);
    }
}
