//! Column sorting popover: turns user gestures into sort proposals.
//!
//! The controller owns only popover visibility and the field-picker query.
//! Sort state stays with the caller; every gesture computes the next state
//! from the caller's current one and hands it to the sort callback once.

mod filter;

pub use filter::{FieldMatch, fuzzy_filter};

use crate::column::ColumnDefinition;
use crate::schema::{Schema, SchemaRegistry};
use crate::sorting::{SortDirection, SortState, Sorting};

/// Empty state shown when nothing is sorted.
pub const NO_FIELDS_SORTED: &str = "Currently no fields are sorted";
/// Title of the field picker.
pub const PICK_FIELDS_LABEL: &str = "Pick fields to sort by";
/// Label of the button that clears the sort.
pub const CLEAR_ALL_LABEL: &str = "Clear all";

/// Visibility of the sort popover and its nested field picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PopoverState {
    #[default]
    Closed,
    Open {
        field_picker_open: bool,
    },
}

/// Interaction state of one sort popover.
#[derive(Debug, Clone, Default)]
pub struct ColumnSorting {
    popover: PopoverState,
    field_query: String,
}

impl ColumnSorting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PopoverState {
        self.popover
    }

    pub fn is_open(&self) -> bool {
        matches!(self.popover, PopoverState::Open { .. })
    }

    pub fn is_field_picker_open(&self) -> bool {
        matches!(
            self.popover,
            PopoverState::Open {
                field_picker_open: true
            }
        )
    }

    // -------------------------------------------------------------------------
    // Popover visibility
    // -------------------------------------------------------------------------

    /// Open or close the main popover. Closing also closes the field picker.
    pub fn toggle_popover(&mut self) {
        self.popover = match self.popover {
            PopoverState::Closed => PopoverState::Open {
                field_picker_open: false,
            },
            PopoverState::Open { .. } => PopoverState::Closed,
        };
    }

    /// Close the main popover and the field picker with it.
    pub fn close_popover(&mut self) {
        self.popover = PopoverState::Closed;
    }

    /// Open or close the field picker. The picker lives inside the main
    /// popover, so this does nothing while the popover is closed.
    pub fn toggle_field_picker(&mut self) {
        if let PopoverState::Open { field_picker_open } = self.popover {
            self.popover = PopoverState::Open {
                field_picker_open: !field_picker_open,
            };
        }
    }

    pub fn close_field_picker(&mut self) {
        if self.is_open() {
            self.popover = PopoverState::Open {
                field_picker_open: false,
            };
        }
    }

    /// Current field-picker search text.
    pub fn field_query(&self) -> &str {
        &self.field_query
    }

    pub fn set_field_query(&mut self, query: impl Into<String>) {
        self.field_query = query.into();
    }

    // -------------------------------------------------------------------------
    // Sort gestures
    // -------------------------------------------------------------------------

    /// Pick an inactive field: sort by it ascending, then close the picker.
    pub fn select_field(&mut self, sorting: &Sorting, column_id: &str) -> SortState {
        let next = sorting.columns().add_column(column_id);
        sorting.notify(next.clone());
        self.close_field_picker();
        next
    }

    /// Stop sorting by a field.
    pub fn remove_field(&self, sorting: &Sorting, column_id: &str) -> SortState {
        let next = sorting.columns().remove_column(column_id);
        sorting.notify(next.clone());
        next
    }

    /// Flip the direction of a sorted field.
    pub fn toggle_direction(&self, sorting: &Sorting, column_id: &str) -> SortState {
        let next = sorting.columns().toggle_direction(column_id);
        sorting.notify(next.clone());
        next
    }

    /// Set the direction of a sorted field.
    pub fn set_direction(
        &self,
        sorting: &Sorting,
        column_id: &str,
        direction: SortDirection,
    ) -> SortState {
        let current = sorting.columns();
        let next = if current.direction(column_id) == Some(direction.toggled()) {
            current.toggle_direction(column_id)
        } else {
            current.clone()
        };
        sorting.notify(next.clone());
        next
    }

    /// Commit a drag of the sorted field at `source` onto `destination`.
    ///
    /// A missing or out-of-range destination commits nothing and does not
    /// notify.
    pub fn drag_end(
        &self,
        sorting: &Sorting,
        source: usize,
        destination: Option<usize>,
    ) -> Option<SortState> {
        let Some(destination) = destination else {
            log::debug!("column sorting: drag from {source} dropped outside the list");
            return None;
        };
        let Some(next) = sorting.columns().reorder(source, destination) else {
            log::debug!(
                "column sorting: ignoring drag {source} -> {destination} over {} fields",
                sorting.columns().len()
            );
            return None;
        };
        sorting.notify(next.clone());
        Some(next)
    }

    /// Remove every sorted field.
    pub fn clear_all(&self, sorting: &Sorting) -> SortState {
        let next = sorting.columns().clear_all();
        sorting.notify(next.clone());
        next
    }

    // -------------------------------------------------------------------------
    // View model
    // -------------------------------------------------------------------------

    /// Build what the popover should display.
    ///
    /// `columns` is the visible column list; sorted fields that are not in it
    /// are left out.
    pub fn view(
        &self,
        columns: &[ColumnDefinition],
        sort: &SortState,
        schema: &Schema,
        registry: &SchemaRegistry,
    ) -> SortPopoverView {
        let sorted_fields: Vec<SortedField> = sort
            .columns()
            .iter()
            .filter_map(|entry| {
                let column = columns.iter().find(|c| c.id == entry.id)?;
                let details = registry.details_for(schema.column_type(&entry.id));
                Some(SortedField {
                    id: entry.id.clone(),
                    display: column.header().to_string(),
                    direction: entry.direction,
                    sort_text_asc: details.sort_text_asc,
                    sort_text_desc: details.sort_text_desc,
                    icon: details.icon,
                    color: details.color,
                })
            })
            .collect();

        let inactive: Vec<&ColumnDefinition> =
            columns.iter().filter(|c| !sort.contains(&c.id)).collect();
        let labels: Vec<&str> = inactive.iter().map(|c| c.header()).collect();
        let available_fields = fuzzy_filter(&self.field_query, &labels)
            .into_iter()
            .map(|m| {
                let column = inactive[m.index];
                let details = registry.details_for(schema.column_type(&column.id));
                AvailableField {
                    id: column.id.clone(),
                    display: column.header().to_string(),
                    icon: details.icon,
                    color: details.color,
                }
            })
            .collect();

        let count = sorted_fields.len();
        SortPopoverView {
            button_label: match count {
                0 => "Sort fields".to_string(),
                1 => "1 field sorted".to_string(),
                n => format!("{n} fields sorted"),
            },
            is_active: count > 0,
            is_open: self.is_open(),
            field_picker_open: self.is_field_picker_open(),
            empty_message: (count == 0).then_some(NO_FIELDS_SORTED),
            sorted_fields,
            available_fields,
        }
    }
}

/// A sorted field row in the popover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedField {
    pub id: String,
    pub display: String,
    pub direction: SortDirection,
    pub sort_text_asc: String,
    pub sort_text_desc: String,
    pub icon: String,
    pub color: String,
}

/// An inactive field offered by the field picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableField {
    pub id: String,
    pub display: String,
    pub icon: String,
    pub color: String,
}

/// Everything the sort popover displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPopoverView {
    pub button_label: String,
    /// Whether any field is sorted.
    pub is_active: bool,
    pub is_open: bool,
    pub field_picker_open: bool,
    pub sorted_fields: Vec<SortedField>,
    pub empty_message: Option<&'static str>,
    pub available_fields: Vec<AvailableField>,
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::schema::{ColumnType, SchemaEntry};
    use crate::sorting::SortColumn;

    fn recording(columns: SortState) -> (Sorting, Arc<Mutex<Vec<SortState>>>) {
        let seen: Arc<Mutex<Vec<SortState>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let sorting = Sorting::new(columns, move |next| sink.lock().unwrap().push(next));
        (sorting, seen)
    }

    fn ids(state: &SortState) -> Vec<&str> {
        state.columns().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_popover_transitions() {
        let mut ui = ColumnSorting::new();
        assert_eq!(ui.state(), PopoverState::Closed);

        ui.toggle_field_picker();
        assert_eq!(ui.state(), PopoverState::Closed);

        ui.toggle_popover();
        assert_eq!(
            ui.state(),
            PopoverState::Open {
                field_picker_open: false
            }
        );
        ui.toggle_field_picker();
        assert!(ui.is_field_picker_open());

        ui.toggle_popover();
        assert_eq!(ui.state(), PopoverState::Closed);
        ui.toggle_popover();
        assert!(!ui.is_field_picker_open());
    }

    #[test]
    fn test_select_field_adds_and_closes_picker() {
        let (sorting, seen) = recording(SortState::new([SortColumn::desc("a")]));
        let mut ui = ColumnSorting::new();
        ui.toggle_popover();
        ui.toggle_field_picker();

        let next = ui.select_field(&sorting, "b");

        assert_eq!(ids(&next), vec!["a", "b"]);
        assert_eq!(next.direction("b"), Some(SortDirection::Asc));
        assert!(ui.is_open());
        assert!(!ui.is_field_picker_open());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_each_gesture_notifies_once() {
        let (sorting, seen) =
            recording(SortState::new([SortColumn::asc("a"), SortColumn::asc("b")]));
        let ui = ColumnSorting::new();

        ui.toggle_direction(&sorting, "a");
        ui.remove_field(&sorting, "b");
        ui.drag_end(&sorting, 0, Some(1));
        ui.clear_all(&sorting);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0].direction("a"), Some(SortDirection::Desc));
        assert_eq!(ids(&seen[1]), vec!["a"]);
        assert_eq!(ids(&seen[2]), vec!["b", "a"]);
        assert!(seen[3].is_empty());
    }

    #[test]
    fn test_gestures_do_not_apply_state() {
        let (sorting, _) = recording(SortState::new([SortColumn::asc("a")]));
        let ui = ColumnSorting::new();
        ui.toggle_direction(&sorting, "a");
        assert_eq!(sorting.columns().direction("a"), Some(SortDirection::Asc));
    }

    #[test]
    fn test_drag_without_destination_is_noop() {
        let (sorting, seen) =
            recording(SortState::new([SortColumn::asc("a"), SortColumn::asc("b")]));
        let ui = ColumnSorting::new();
        assert!(ui.drag_end(&sorting, 0, None).is_none());
        assert!(ui.drag_end(&sorting, 0, Some(9)).is_none());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_set_direction() {
        let (sorting, seen) = recording(SortState::new([SortColumn::asc("a")]));
        let ui = ColumnSorting::new();
        let next = ui.set_direction(&sorting, "a", SortDirection::Desc);
        assert_eq!(next.direction("a"), Some(SortDirection::Desc));
        let same = ui.set_direction(&sorting, "a", SortDirection::Asc);
        assert_eq!(&same, sorting.columns());
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_view_model() {
        let columns = vec![
            ColumnDefinition::new("price").schema(ColumnType::Numeric),
            ColumnDefinition::new("name").display("Full name"),
            ColumnDefinition::new("created"),
        ];
        let schema: Schema = [SchemaEntry::declared("price", ColumnType::Numeric)]
            .into_iter()
            .collect();
        let registry = SchemaRegistry::new();
        let mut ui = ColumnSorting::new();

        let empty = ui.view(&columns, &SortState::empty(), &schema, &registry);
        assert_eq!(empty.button_label, "Sort fields");
        assert!(!empty.is_active);
        assert_eq!(empty.empty_message, Some(NO_FIELDS_SORTED));
        assert_eq!(empty.available_fields.len(), 3);

        let sort = SortState::new([SortColumn::desc("price"), SortColumn::asc("gone")]);
        ui.set_field_query("full");
        let view = ui.view(&columns, &sort, &schema, &registry);
        assert_eq!(view.button_label, "1 field sorted");
        assert!(view.is_active);
        assert_eq!(view.empty_message, None);
        assert_eq!(view.sorted_fields.len(), 1);
        assert_eq!(view.sorted_fields[0].sort_text_asc, "Low-High");
        assert_eq!(view.sorted_fields[0].sort_text_desc, "High-Low");
        assert_eq!(view.sorted_fields[0].icon, "number");
        let available: Vec<&str> = view.available_fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(available, vec!["name"]);
        assert_eq!(view.available_fields[0].icon, "string");
    }

    #[test]
    fn test_button_label_plural() {
        let columns = vec![ColumnDefinition::new("a"), ColumnDefinition::new("b")];
        let sort = SortState::new([SortColumn::asc("a"), SortColumn::asc("b")]);
        let view =
            ColumnSorting::new().view(&columns, &sort, &Schema::new(), &SchemaRegistry::new());
        assert_eq!(view.button_label, "2 fields sorted");
        assert!(view.available_fields.is_empty());
    }
}
