//! The data grid: owns the inputs of one grid, keeps the derived schema and
//! row map current, and plans which cells a viewport instantiates.

use std::sync::Arc;

use crate::column::{ColumnDefinition, ColumnWidths, ControlColumn};
use crate::config::GridConfig;
use crate::error::Result;
use crate::layout::ColumnLayout;
use crate::pagination::{self, Pagination, VisibleWindow};
use crate::popover::PopoverFormatters;
use crate::row_map::RowIndexMap;
use crate::schema::{Schema, SchemaDescriptor, SchemaRegistry};
use crate::sorting::Sorting;
use crate::values::InMemoryValues;
use crate::window::{
    CellContext, CellRect, CellValueProvider, ColumnKind, HeaderCell, RenderedCell, RenderedGrid,
    Viewport, visible_span,
};

/// A column of the logical grid: leading controls, data columns, trailing
/// controls.
#[derive(Debug, Clone)]
struct LogicalColumn {
    id: String,
    kind: ColumnKind,
    width: u32,
    /// Index into the data columns for [`ColumnKind::Data`].
    data_index: Option<usize>,
}

/// Derived structures of one update pass.
///
/// Never mutated; a later pass that needs different values builds new ones.
#[derive(Debug, Clone)]
pub struct GridSnapshot {
    pub schema: Arc<Schema>,
    pub row_map: RowIndexMap,
    pub window: VisibleWindow,
}

/// A virtualized data grid.
///
/// Sort and pagination state are controlled by the caller: the grid reads
/// them, proposes changes through the sort callback, and waits for the
/// caller to hand back the state it wants applied.
#[derive(Debug)]
pub struct DataGrid {
    config: GridConfig,
    registry: SchemaRegistry,
    formatters: PopoverFormatters,

    columns: Vec<ColumnDefinition>,
    leading: Vec<ControlColumn>,
    trailing: Vec<ControlColumn>,
    widths: ColumnWidths,
    row_count: usize,
    values: InMemoryValues,
    sorting: Option<Sorting>,
    pagination: Option<Pagination>,
    footer_visible: bool,
    /// Whether the caller has supplied a column set yet.
    columns_set: bool,

    logical: Vec<LogicalColumn>,
    layout: ColumnLayout,
    schema: Arc<Schema>,
    row_map: RowIndexMap,
    schema_dirty: bool,
    row_map_dirty: bool,
}

impl DataGrid {
    /// Create an empty grid. Fails when the config is invalid.
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let registry = SchemaRegistry::new().threshold(config.detection_threshold);
        Ok(Self {
            config,
            registry,
            formatters: PopoverFormatters::new(),
            columns: Vec::new(),
            leading: Vec::new(),
            trailing: Vec::new(),
            widths: ColumnWidths::new(),
            row_count: 0,
            values: InMemoryValues::new(),
            sorting: None,
            pagination: None,
            footer_visible: false,
            columns_set: false,
            logical: Vec::new(),
            layout: ColumnLayout::new(),
            schema: Arc::new(Schema::new()),
            row_map: RowIndexMap::identity(),
            schema_dirty: false,
            row_map_dirty: false,
        })
    }

    /// Register custom schemas. They take precedence over the built-ins.
    pub fn with_schema_detectors(mut self, detectors: Vec<SchemaDescriptor>) -> Self {
        self.registry =
            SchemaRegistry::with_custom(detectors).threshold(self.config.detection_threshold);
        self.schema_dirty = true;
        self
    }

    /// Replace the popover formatters.
    pub fn with_popover_formatters(mut self, formatters: PopoverFormatters) -> Self {
        self.formatters = formatters;
        self
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn formatters(&self) -> &PopoverFormatters {
        &self.formatters
    }

    /// Visible data columns in display order.
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn sorting(&self) -> Option<&Sorting> {
        self.sorting.as_ref()
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    /// Replace the visible data columns.
    ///
    /// Sorted columns that are no longer visible are pruned through the sort
    /// callback, with a single notification.
    pub fn set_columns(&mut self, columns: Vec<ColumnDefinition>) {
        self.columns = columns;
        self.columns_set = true;
        self.rebuild_columns();
        self.schema_dirty = true;
        self.prune_sorting();
    }

    /// Replace the control columns placed before and after the data columns.
    pub fn set_control_columns(
        &mut self,
        leading: Vec<ControlColumn>,
        trailing: Vec<ControlColumn>,
    ) {
        self.leading = leading;
        self.trailing = trailing;
        self.rebuild_columns();
    }

    pub fn set_column_widths(&mut self, widths: ColumnWidths) {
        self.widths = widths;
        self.rebuild_columns();
    }

    pub fn set_row_count(&mut self, row_count: usize) {
        self.row_count = row_count;
    }

    /// Replace the materialized row values.
    pub fn set_in_memory_values(&mut self, values: InMemoryValues) {
        self.values = values;
        self.schema_dirty = true;
    }

    /// Replace the controlled sort state. Once columns have been supplied,
    /// entries for columns that are not visible are pruned through the sort
    /// callback.
    pub fn set_sorting(&mut self, sorting: Option<Sorting>) {
        self.sorting = sorting;
        self.row_map_dirty = true;
        self.prune_sorting();
    }

    pub fn set_pagination(&mut self, pagination: Option<Pagination>) {
        self.pagination = pagination;
    }

    /// Reserve a footer band and render footer cells.
    pub fn set_footer_visible(&mut self, visible: bool) {
        self.footer_visible = visible;
    }

    fn prune_sorting(&self) {
        if !self.columns_set {
            return;
        }
        if let Some(sorting) = &self.sorting {
            sorting.prune_to(self.columns.iter().map(|c| c.id.as_str()));
        }
    }

    fn rebuild_columns(&mut self) {
        let default_width = self.config.default_column_width;
        let leading = self.leading.iter().map(|c| LogicalColumn {
            id: c.id.clone(),
            kind: ColumnKind::LeadingControl,
            width: c.width,
            data_index: None,
        });
        let data = self.columns.iter().enumerate().map(|(i, c)| LogicalColumn {
            id: c.id.clone(),
            kind: ColumnKind::Data,
            width: self.widths.resolve(&c.id, default_width),
            data_index: Some(i),
        });
        let trailing = self.trailing.iter().map(|c| LogicalColumn {
            id: c.id.clone(),
            kind: ColumnKind::TrailingControl,
            width: c.width,
            data_index: None,
        });
        self.logical = leading.chain(data).chain(trailing).collect();
        self.layout.reset_after_column(0);
    }

    // -------------------------------------------------------------------------
    // Derived state
    // -------------------------------------------------------------------------

    /// Recompute whatever the inputs changed since the last pass.
    pub fn refresh(&mut self) {
        if self.schema_dirty {
            self.schema = Arc::new(self.registry.resolve_columns(
                &self.columns,
                Some(&self.values),
                self.config.in_memory,
            ));
            self.schema_dirty = false;
            self.row_map_dirty = true;
        }
        if self.row_map_dirty {
            self.row_map = match &self.sorting {
                Some(sorting) => RowIndexMap::build(
                    self.config.in_memory,
                    sorting.columns(),
                    &self.values,
                    &self.schema,
                    &self.registry,
                ),
                None => RowIndexMap::identity(),
            };
            self.row_map_dirty = false;
        }
    }

    /// Derived structures for the current inputs.
    pub fn snapshot(&mut self) -> GridSnapshot {
        self.refresh();
        GridSnapshot {
            schema: Arc::clone(&self.schema),
            row_map: self.row_map.clone(),
            window: self.visible_window(),
        }
    }

    /// Rows shown on the current page.
    pub fn visible_window(&self) -> VisibleWindow {
        pagination::slice(self.row_count, self.pagination.as_ref())
    }

    /// Number of logical columns, control columns included.
    pub fn column_count(&self) -> usize {
        self.logical.len()
    }

    /// Width of a logical column.
    pub fn column_width(&self, column_index: usize) -> Option<u32> {
        self.logical.get(column_index).map(|c| c.width)
    }

    /// Left offset of a logical column within the content.
    pub fn column_offset(&mut self, column_index: usize) -> u64 {
        let logical = &self.logical;
        self.layout
            .column_offset(column_index, |i| logical.get(i).map_or(0, |c| c.width))
    }

    fn footer_height(&self) -> u32 {
        if self.footer_visible {
            self.config.footer_height
        } else {
            0
        }
    }

    fn body_height(&self, viewport: &Viewport) -> u64 {
        u64::from(
            viewport
                .height
                .saturating_sub(self.config.header_height)
                .saturating_sub(self.footer_height()),
        )
    }

    /// Total scrollable size: every column, and the header, page rows,
    /// footer and horizontal scrollbar stacked.
    pub fn content_size(&mut self) -> (u64, u64) {
        let logical = &self.logical;
        let width = self
            .layout
            .total_width(logical.len(), |i| logical[i].width);
        let rows = self.visible_window().len() as u64;
        let height = u64::from(self.config.header_height)
            + rows * u64::from(self.config.row_height)
            + u64::from(self.footer_height())
            + u64::from(self.config.scrollbar_size);
        (width, height)
    }

    /// Viewport scrolled just enough to show a cell fully.
    ///
    /// `visible_row_index` is the row's position within the current page.
    pub fn scroll_to_cell(
        &mut self,
        viewport: &Viewport,
        visible_row_index: usize,
        column_index: usize,
    ) -> Viewport {
        let row_height = u64::from(self.config.row_height);
        let top = visible_row_index as u64 * row_height;
        let scroll_top = scroll_into_view(
            viewport.scroll_top,
            self.body_height(viewport),
            top,
            top + row_height,
        );

        let scroll_left = match self.column_width(column_index) {
            Some(width) => {
                let left = self.column_offset(column_index);
                scroll_into_view(
                    viewport.scroll_left,
                    u64::from(viewport.width),
                    left,
                    left + u64::from(width),
                )
            }
            None => viewport.scroll_left,
        };

        viewport.scrolled_to(scroll_left, scroll_top)
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Instantiate the cells intersecting a viewport.
    ///
    /// Body cells are fetched by underlying row index; header and footer
    /// cells stay in their bands regardless of the vertical scroll offset.
    pub fn render<P: CellValueProvider>(
        &mut self,
        viewport: &Viewport,
        provider: &P,
    ) -> RenderedGrid<P::Output> {
        self.refresh();

        let window = self.visible_window();
        let header_height = self.config.header_height;
        let row_height = self.config.row_height;
        let body_height = self.body_height(viewport);

        let rows = visible_span(
            viewport.scroll_top,
            body_height,
            u64::from(row_height),
            window.len(),
            self.config.overscan_rows,
        );

        let column_count = self.logical.len();
        let columns = {
            let logical = &self.logical;
            let width_of = |i: usize| logical[i].width;
            let total_width = self.layout.total_width(column_count, width_of);
            let last_px = viewport
                .scroll_left
                .saturating_add(u64::from(viewport.width.saturating_sub(1)));
            match (
                self.layout
                    .column_at_offset(viewport.scroll_left, column_count, width_of),
                self.layout.column_at_offset(last_px, column_count, width_of),
            ) {
                (Some(first), Some(last))
                    if viewport.width > 0 && viewport.scroll_left < total_width =>
                {
                    let overscan = self.config.overscan_columns;
                    first.saturating_sub(overscan)..(last + 1 + overscan).min(column_count)
                }
                _ => 0..0,
            }
        };

        let lefts: Vec<i64> = columns
            .clone()
            .map(|c| offset_in_viewport(self.column_offset(c), viewport.scroll_left))
            .collect();

        log::trace!(
            "render: rows {:?} of {}, columns {:?} of {}",
            rows,
            window.len(),
            columns,
            column_count
        );

        let sort = self.sorting.as_ref().map(Sorting::columns);
        let header = columns
            .clone()
            .zip(&lefts)
            .map(|(c, &left)| {
                let column = &self.logical[c];
                let definition = column.data_index.map(|i| &self.columns[i]);
                HeaderCell {
                    column_index: c,
                    column_id: column.id.clone(),
                    display: definition.map_or(column.id.as_str(), |d| d.header()).to_string(),
                    kind: column.kind,
                    column_type: definition
                        .and_then(|_| self.schema.column_type(&column.id))
                        .cloned(),
                    sort: definition.and_then(|_| {
                        let sort = sort?;
                        Some((sort.position(&column.id)?, sort.direction(&column.id)?))
                    }),
                    rect: CellRect {
                        left,
                        top: 0,
                        width: column.width,
                        height: header_height,
                    },
                }
            })
            .collect();

        let mut cells = Vec::with_capacity(rows.len() * columns.len());
        for position in rows.clone() {
            let row_index = self.row_map.underlying(window.absolute(position));
            let top = i64::from(header_height)
                + offset_in_viewport(position as u64 * u64::from(row_height), viewport.scroll_top);
            for (c, &left) in columns.clone().zip(&lefts) {
                let rect = CellRect {
                    left,
                    top,
                    width: self.logical[c].width,
                    height: row_height,
                };
                let context = self.cell_context(c, row_index, position, rect);
                let value = provider.render_cell_value(&context);
                cells.push(RenderedCell {
                    row_index,
                    visible_row_index: position,
                    column_index: c,
                    column_id: context.column_id.to_string(),
                    rect,
                    value,
                });
            }
        }

        let mut footer = Vec::new();
        if self.footer_visible {
            let content_rows = window.len() as u64 * u64::from(row_height);
            let top = i64::from(header_height)
                + i64::try_from(content_rows.min(body_height)).unwrap_or(i64::MAX);
            let footer_row = window.len();
            for (c, &left) in columns.clone().zip(&lefts) {
                let rect = CellRect {
                    left,
                    top,
                    width: self.logical[c].width,
                    height: self.config.footer_height,
                };
                let context = self.cell_context(c, footer_row, footer_row, rect);
                if let Some(value) = provider.render_footer_value(&context) {
                    footer.push(RenderedCell {
                        row_index: footer_row,
                        visible_row_index: footer_row,
                        column_index: c,
                        column_id: context.column_id.to_string(),
                        rect,
                        value,
                    });
                }
            }
        }

        let (content_width, content_height) = self.content_size();
        RenderedGrid {
            header,
            cells,
            footer,
            rows,
            columns,
            content_width,
            content_height,
        }
    }

    fn cell_context(
        &self,
        column_index: usize,
        row_index: usize,
        visible_row_index: usize,
        rect: CellRect,
    ) -> CellContext<'_> {
        let column = &self.logical[column_index];
        let definition = column.data_index.map(|i| &self.columns[i]);
        let column_type = definition.and_then(|_| self.schema.column_type(&column.id));
        CellContext {
            row_index,
            visible_row_index,
            column_index,
            column_id: &column.id,
            kind: column.kind,
            column_type,
            is_expandable: definition.is_some_and(ColumnDefinition::expandable_or_default),
            popover: self.formatters.resolve(column_type),
            rect,
        }
    }
}

fn offset_in_viewport(content_offset: u64, scroll: u64) -> i64 {
    let offset = i128::from(content_offset) - i128::from(scroll);
    i64::try_from(offset).unwrap_or(if offset < 0 { i64::MIN } else { i64::MAX })
}

/// Smallest change of `scroll` that brings `[start, end)` inside an extent.
fn scroll_into_view(scroll: u64, extent: u64, start: u64, end: u64) -> u64 {
    if start < scroll {
        start
    } else if end > scroll.saturating_add(extent) {
        end.saturating_sub(extent).min(start)
    } else {
        scroll
    }
}
