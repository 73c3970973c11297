//! Render plan types: viewport, cell coordinates and the cell callbacks.

use std::ops::Range;

use crate::popover::PopoverFormatterFn;
use crate::schema::ColumnType;
use crate::sorting::SortDirection;

/// The grid's outer box and its scroll offsets, in pixels.
///
/// `height` covers the header band, the body and the footer band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scroll_left: u64,
    pub scroll_top: u64,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Copy scrolled to the given offsets.
    pub fn scrolled_to(&self, scroll_left: u64, scroll_top: u64) -> Self {
        Self {
            scroll_left,
            scroll_top,
            ..*self
        }
    }
}

/// Placement of a cell relative to the viewport's top-left corner.
///
/// Partially scrolled-out cells have negative coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellRect {
    pub left: i64,
    pub top: i64,
    pub width: u32,
    pub height: u32,
}

/// Where a logical column comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    LeadingControl,
    Data,
    TrailingControl,
}

/// Everything a cell callback needs to render one cell.
pub struct CellContext<'a> {
    /// Underlying row index. Use this to fetch data.
    pub row_index: usize,
    /// Position of the row within the current page. Use this for focus and
    /// row numbering.
    pub visible_row_index: usize,
    /// Index into the logical columns, control columns included.
    pub column_index: usize,
    pub column_id: &'a str,
    pub kind: ColumnKind,
    pub column_type: Option<&'a ColumnType>,
    pub is_expandable: bool,
    /// Formatter for the expansion popover of this cell.
    pub popover: &'a PopoverFormatterFn,
    pub rect: CellRect,
}

impl std::fmt::Debug for CellContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellContext")
            .field("row_index", &self.row_index)
            .field("visible_row_index", &self.visible_row_index)
            .field("column_index", &self.column_index)
            .field("column_id", &self.column_id)
            .field("kind", &self.kind)
            .field("column_type", &self.column_type)
            .field("is_expandable", &self.is_expandable)
            .field("rect", &self.rect)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Providers
// =============================================================================

/// Produces the rendered value of instantiated cells.
///
/// Called once per instantiated cell; implementations must not depend on
/// being called in any particular order. Any `Fn(&CellContext) -> R`
/// closure is a provider without a footer.
pub trait CellValueProvider {
    type Output;

    fn render_cell_value(&self, cell: &CellContext<'_>) -> Self::Output;

    /// Value of the footer cell of a column, when footers are shown.
    fn render_footer_value(&self, _cell: &CellContext<'_>) -> Option<Self::Output> {
        None
    }

    /// Attach a footer value provider.
    fn with_footer<F>(self, footer: F) -> WithFooter<Self, F>
    where
        Self: Sized,
        F: Fn(&CellContext<'_>) -> Self::Output,
    {
        WithFooter { cells: self, footer }
    }
}

impl<F, R> CellValueProvider for F
where
    F: Fn(&CellContext<'_>) -> R,
{
    type Output = R;

    fn render_cell_value(&self, cell: &CellContext<'_>) -> R {
        self(cell)
    }
}

/// A cell provider paired with a footer provider.
pub struct WithFooter<C, F> {
    cells: C,
    footer: F,
}

impl<C, F> CellValueProvider for WithFooter<C, F>
where
    C: CellValueProvider,
    F: Fn(&CellContext<'_>) -> C::Output,
{
    type Output = C::Output;

    fn render_cell_value(&self, cell: &CellContext<'_>) -> C::Output {
        self.cells.render_cell_value(cell)
    }

    fn render_footer_value(&self, cell: &CellContext<'_>) -> Option<C::Output> {
        Some((self.footer)(cell))
    }
}

// =============================================================================
// Render output
// =============================================================================

/// A header cell. Header cells stay in the top band while the body scrolls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column_index: usize,
    pub column_id: String,
    pub display: String,
    pub kind: ColumnKind,
    pub column_type: Option<ColumnType>,
    /// Priority and direction when the column is sorted.
    pub sort: Option<(usize, SortDirection)>,
    pub rect: CellRect,
}

/// A body or footer cell together with its rendered value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell<R> {
    pub row_index: usize,
    pub visible_row_index: usize,
    pub column_index: usize,
    pub column_id: String,
    pub rect: CellRect,
    pub value: R,
}

/// The cells instantiated for one viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGrid<R> {
    pub header: Vec<HeaderCell>,
    /// Body cells, row-major.
    pub cells: Vec<RenderedCell<R>>,
    pub footer: Vec<RenderedCell<R>>,
    /// Rendered row positions within the page.
    pub rows: Range<usize>,
    /// Rendered logical column indices.
    pub columns: Range<usize>,
    pub content_width: u64,
    pub content_height: u64,
}

impl<R> RenderedGrid<R> {
    /// Body cell at a page position and column, if it was rendered.
    pub fn cell(&self, visible_row_index: usize, column_index: usize) -> Option<&RenderedCell<R>> {
        self.cells.iter().find(|c| {
            c.visible_row_index == visible_row_index && c.column_index == column_index
        })
    }
}

/// Indices of fixed-size items intersecting `[offset, offset + extent)`,
/// widened by `overscan` on both sides and clamped to `count`.
pub fn visible_span(
    offset: u64,
    extent: u64,
    item_size: u64,
    count: usize,
    overscan: usize,
) -> Range<usize> {
    if count == 0 || extent == 0 || item_size == 0 {
        return 0..0;
    }
    let to_index = |px: u64| usize::try_from(px / item_size).unwrap_or(usize::MAX);
    let first = to_index(offset).min(count - 1);
    let last = to_index(offset.saturating_add(extent - 1)).min(count - 1);
    first.saturating_sub(overscan)..last.saturating_add(1 + overscan).min(count)
}
