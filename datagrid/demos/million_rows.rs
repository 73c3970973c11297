//! Million Rows Example
//!
//! Demonstrates windowed rendering of a large grid:
//! - One million rows, of which only a small sample is materialized and sorted
//! - Renders a few viewports as plain text, one grid cell per character cell
//! - Logs schema detection and row-map rebuilds to `million_rows.log`

use std::fs::File;

use datagrid::{
    CellContext, ColumnDefinition, ColumnType, ColumnWidths, ControlColumn, DataGrid, GridConfig,
    InMemoryLevel, InMemoryValues, Pagination, SchemaDescriptor, SortColumn, SortState, Sorting,
    Viewport,
};
use simplelog::{Config, LevelFilter, WriteLogger};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ROWS: usize = 1_000_000;
const SAMPLE: usize = 2_000;

fn city(row: usize) -> &'static str {
    ["Zürich", "東京", "Lagos", "São Paulo", "Oslo", "Mumbai"][row % 6]
}

fn value(row: usize, column_id: &str) -> String {
    match column_id {
        "id" => row.to_string(),
        "price" => format!("${}.{:02}", (row * 7919) % 1000, row % 100),
        "city" => city(row).to_string(),
        "active" => (row % 3 == 0).to_string(),
        "tier" => ["gold", "silver", "bronze"][row % 3].to_string(),
        _ => String::new(),
    }
}

/// Truncate or pad to an exact display width.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

fn print_grid(grid: &mut DataGrid, viewport: &Viewport) {
    let rendered = grid.render(viewport, &|cell: &CellContext<'_>| match cell.column_id {
        "select" => "[ ]".to_string(),
        id => value(cell.row_index, id),
    });

    let header: String = rendered
        .header
        .iter()
        .map(|h| {
            let marker = match h.sort {
                Some((_, direction)) => format!(" ({direction})"),
                None => String::new(),
            };
            fit(&format!("{}{}", h.display, marker), h.rect.width as usize / 8)
        })
        .collect::<Vec<_>>()
        .join("|");
    println!("{header}");
    println!("{}", "-".repeat(header.width()));

    for row in rendered.rows.clone() {
        let line: String = rendered
            .cells
            .iter()
            .filter(|c| c.visible_row_index == row)
            .map(|c| fit(&c.value, c.rect.width as usize / 8))
            .collect::<Vec<_>>()
            .join("|");
        println!("{line}");
    }
    println!(
        "rows {:?}, columns {:?}, {} cells instantiated, content {}x{}\n",
        rendered.rows,
        rendered.columns,
        rendered.cells.len(),
        rendered.content_width,
        rendered.content_height
    );
}

fn main() -> datagrid::Result<()> {
    if let Ok(log_file) = File::create("million_rows.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let tier = SchemaDescriptor::new(ColumnType::custom("tier"), |v| {
        if matches!(v, "gold" | "silver" | "bronze") { 1.0 } else { 0.0 }
    })
    .comparator(|a, b, direction| {
        let rank = |v: &str| match v {
            "gold" => 0,
            "silver" => 1,
            _ => 2,
        };
        direction.apply(rank(a).cmp(&rank(b)))
    })
    .sort_text("Gold-Bronze", "Bronze-Gold")
    .icon("starFilled");

    let config = GridConfig::new().in_memory(InMemoryLevel::Sorting);
    let mut grid = DataGrid::new(config)?.with_schema_detectors(vec![tier]);

    let columns = ["id", "price", "city", "active", "tier"];
    grid.set_columns(columns.iter().map(|id| ColumnDefinition::new(*id)).collect());
    grid.set_control_columns(vec![ControlColumn::new("select", 32)], Vec::new());
    grid.set_column_widths(ColumnWidths::new().with("id", 64).with("city", 96));
    grid.set_row_count(ROWS);

    let mut values = InMemoryValues::new();
    for row in 0..SAMPLE {
        for id in columns {
            values.insert(row, id, value(row, id));
        }
    }
    grid.set_in_memory_values(values);

    let snapshot = grid.snapshot();
    for id in columns {
        println!(
            "{id}: {}",
            snapshot
                .schema
                .column_type(id)
                .map_or("untyped".to_string(), |t| t.to_string())
        );
    }
    println!();

    let viewport = Viewport::new(640, 37 + 34 * 8);
    print_grid(&mut grid, &viewport);
    print_grid(&mut grid, &viewport.scrolled_to(0, 34 * 654_321));

    grid.set_sorting(Some(Sorting::new(
        SortState::new([SortColumn::asc("tier"), SortColumn::desc("price")]),
        |next| log::info!("sort proposed: {next:?}"),
    )));
    grid.set_pagination(Some(Pagination::new(0, 100)?));
    print_grid(&mut grid, &viewport);

    Ok(())
}
