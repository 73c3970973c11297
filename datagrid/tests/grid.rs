use std::sync::{Arc, Mutex};

use datagrid::pagination::slice;
use datagrid::{
    CellContext, ColumnDefinition, ColumnSorting, ColumnVisibility, DataGrid, GridConfig,
    InMemoryLevel, InMemoryValues, Pagination, SortColumn, SortState, Sorting, Viewport,
    VisibleWindow,
};

fn columns(ids: &[&str]) -> Vec<ColumnDefinition> {
    ids.iter().map(|id| ColumnDefinition::new(*id)).collect()
}

fn recording(state: SortState) -> (Sorting, Arc<Mutex<Vec<SortState>>>) {
    let seen: Arc<Mutex<Vec<SortState>>> = Arc::default();
    let sink = Arc::clone(&seen);
    (Sorting::new(state, move |next| sink.lock().unwrap().push(next)), seen)
}

fn sorted_ids(state: &SortState) -> Vec<&str> {
    state.columns().iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn test_hiding_sorted_column_prunes_once() {
    let mut grid = DataGrid::new(GridConfig::new()).unwrap();
    grid.set_columns(columns(&["A", "B", "C"]));
    let (sorting, seen) = recording(SortState::new([SortColumn::asc("A"), SortColumn::asc("B")]));
    grid.set_sorting(Some(sorting));
    assert!(seen.lock().unwrap().is_empty());

    grid.set_columns(columns(&["A", "C"]));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(sorted_ids(&seen[0]), vec!["A"]);
}

#[test]
fn test_applied_prune_does_not_notify_again() {
    let mut grid = DataGrid::new(GridConfig::new()).unwrap();
    grid.set_columns(columns(&["A", "C"]));
    let (sorting, seen) = recording(SortState::new([SortColumn::asc("A"), SortColumn::asc("B")]));
    grid.set_sorting(Some(sorting));
    assert_eq!(seen.lock().unwrap().len(), 1);

    let pruned = seen.lock().unwrap()[0].clone();
    let applied = grid.sorting().unwrap().with_columns(pruned);
    grid.set_sorting(Some(applied));
    grid.set_columns(columns(&["A", "C"]));

    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn test_sorting_before_columns_waits_for_columns() {
    let mut grid = DataGrid::new(GridConfig::new()).unwrap();
    let (sorting, seen) = recording(SortState::new([SortColumn::asc("a")]));
    grid.set_sorting(Some(sorting));
    grid.set_columns(columns(&["a"]));

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(sorted_ids(grid.sorting().unwrap().columns()), vec!["a"]);
}

#[test]
fn test_sorting_before_columns_prunes_on_columns() {
    let mut grid = DataGrid::new(GridConfig::new()).unwrap();
    let (sorting, seen) = recording(SortState::new([SortColumn::asc("a"), SortColumn::desc("b")]));
    grid.set_sorting(Some(sorting));
    assert!(seen.lock().unwrap().is_empty());

    grid.set_columns(columns(&["a"]));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(sorted_ids(&seen[0]), vec!["a"]);
}

#[test]
fn test_visibility_drives_pruning() {
    let declared = columns(&["A", "B", "C"]);
    let visibility = ColumnVisibility::new(["A", "B", "C"]);
    let mut grid = DataGrid::new(GridConfig::new()).unwrap();
    grid.set_columns(visibility.apply(&declared));
    let (sorting, seen) = recording(SortState::new([SortColumn::desc("B")]));
    grid.set_sorting(Some(sorting));

    let swapped = visibility.switch_column_pos("A", "C").unwrap();
    grid.set_columns(swapped.apply(&declared));
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(grid.columns()[0].id, "C");

    grid.set_columns(swapped.set_visible("B", false).apply(&declared));
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_empty());
}

#[test]
fn test_short_final_page() {
    let page = Pagination::new(2, 100).unwrap();
    assert_eq!(
        slice(250, Some(&page)),
        VisibleWindow {
            start_row: 200,
            end_row: 250
        }
    );
}

#[test]
fn test_sort_gesture_round_trip_through_caller() {
    let mut grid = DataGrid::new(
        GridConfig::new()
            .in_memory(InMemoryLevel::Sorting)
            .overscan(0, 0),
    )
    .unwrap();
    grid.set_columns(columns(&["name"]));
    grid.set_row_count(3);
    grid.set_in_memory_values(InMemoryValues::from_rows([
        [("name", "carol")],
        [("name", "alice")],
        [("name", "bob")],
    ]));
    let (sorting, seen) = recording(SortState::empty());
    grid.set_sorting(Some(sorting));

    let mut ui = ColumnSorting::new();
    ui.toggle_popover();
    ui.toggle_field_picker();
    ui.select_field(grid.sorting().unwrap(), "name");

    let next = seen.lock().unwrap().last().cloned().unwrap();
    let applied = grid.sorting().unwrap().with_columns(next);
    grid.set_sorting(Some(applied));

    let viewport = Viewport::new(100, 37 + 34 * 3);
    let names = grid.render(&viewport, &|cell: &CellContext<'_>| cell.row_index);
    let order: Vec<usize> = names.cells.iter().map(|c| c.value).collect();
    assert_eq!(order, vec![1, 2, 0]);

    ui.toggle_direction(grid.sorting().unwrap(), "name");
    let next = seen.lock().unwrap().last().cloned().unwrap();
    let applied = grid.sorting().unwrap().with_columns(next);
    grid.set_sorting(Some(applied));

    let names = grid.render(&viewport, &|cell: &CellContext<'_>| cell.row_index);
    let order: Vec<usize> = names.cells.iter().map(|c| c.value).collect();
    assert_eq!(order, vec![0, 2, 1]);
}

#[test]
fn test_million_rows_instantiate_only_viewport() {
    let mut grid = DataGrid::new(GridConfig::new()).unwrap();
    grid.set_columns(columns(&["a", "b", "c", "d", "e", "f", "g", "h"]));
    grid.set_row_count(1_000_000);

    let viewport = Viewport::new(300, 600).scrolled_to(250, 34 * 500_000);
    let rendered = grid.render(&viewport, &|cell: &CellContext<'_>| cell.row_index);

    assert!(rendered.cells.len() <= rendered.rows.len() * rendered.columns.len());
    assert!(rendered.rows.len() < 25);
    assert!(rendered.columns.len() <= 6);
    assert!(rendered.rows.contains(&500_000));
    assert_eq!(rendered.content_height, 37 + 34 * 1_000_000 + 15);
}

fn sorted_paged_grid(row_count: usize, values: InMemoryValues) -> DataGrid {
    let mut grid = DataGrid::new(
        GridConfig::new()
            .in_memory(InMemoryLevel::Sorting)
            .overscan(0, 0),
    )
    .unwrap();
    grid.set_columns(columns(&["a"]));
    grid.set_row_count(row_count);
    grid.set_in_memory_values(values);
    grid.set_sorting(Some(Sorting::new(SortState::new([SortColumn::asc("a")]), |_| {})));
    grid
}

fn page_rows(grid: &mut DataGrid, page_index: usize) -> Vec<usize> {
    grid.set_pagination(Some(Pagination::new(page_index, 3).unwrap()));
    let rendered = grid.render(&Viewport::new(100, 37 + 34 * 3), &|cell: &CellContext<'_>| {
        cell.row_index
    });
    rendered.cells.iter().map(|c| c.value).collect()
}

#[test]
fn test_sorted_pages_follow_sorted_order() {
    let letters = ["i", "h", "g", "f", "e", "d", "c", "b", "a"];
    let values = InMemoryValues::from_rows(letters.iter().map(|v| [("a", *v)]));
    let mut grid = sorted_paged_grid(9, values);

    assert_eq!(page_rows(&mut grid, 0), vec![8, 7, 6]);
    assert_eq!(page_rows(&mut grid, 1), vec![5, 4, 3]);
    assert_eq!(page_rows(&mut grid, 2), vec![2, 1, 0]);
}

#[test]
fn test_single_materialized_page_sorts_in_place() {
    let mut values = InMemoryValues::new();
    values.insert(3, "a", "c");
    values.insert(4, "a", "b");
    values.insert(5, "a", "a");
    let mut grid = sorted_paged_grid(6, values);

    let first = page_rows(&mut grid, 0);
    let second = page_rows(&mut grid, 1);
    assert_eq!(first, vec![0, 1, 2]);
    assert_eq!(second, vec![5, 4, 3]);

    let mut all = [first, second].concat();
    all.sort_unstable();
    assert_eq!(all, (0..6).collect::<Vec<_>>());
}
