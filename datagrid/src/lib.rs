//! Virtualized data grid engine.
//!
//! Resolves column schemas, sorts materialized rows through an index map
//! without reordering the caller's data, slices pages, and plans which cells
//! of a very large grid a viewport actually instantiates.

pub mod column;
pub mod column_sorting;
pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod pagination;
pub mod popover;
pub mod row_map;
pub mod schema;
pub mod sorting;
pub mod values;
pub mod window;

pub use column::{ColumnDefinition, ColumnVisibility, ColumnWidths, ControlColumn};
pub use column_sorting::{ColumnSorting, PopoverState, SortPopoverView};
pub use config::{GridConfig, InMemoryLevel};
pub use error::{GridError, Result};
pub use grid::{DataGrid, GridSnapshot};
pub use pagination::{Pagination, VisibleWindow};
pub use popover::{PopoverContent, PopoverFormatters};
pub use row_map::RowIndexMap;
pub use schema::{ColumnType, Schema, SchemaDescriptor, SchemaEntry, SchemaRegistry};
pub use sorting::{SortColumn, SortDirection, SortState, Sorting};
pub use values::InMemoryValues;
pub use window::{CellContext, CellValueProvider, RenderedGrid, Viewport};
