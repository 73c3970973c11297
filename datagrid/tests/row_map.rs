use datagrid::{
    ColumnDefinition, ColumnType, InMemoryLevel, InMemoryValues, RowIndexMap, Schema,
    SchemaEntry, SchemaRegistry, SortColumn, SortState,
};

fn build(sort: &SortState, values: &InMemoryValues, schema: &Schema) -> RowIndexMap {
    RowIndexMap::build(
        InMemoryLevel::Sorting,
        sort,
        values,
        schema,
        &SchemaRegistry::new(),
    )
}

#[test]
fn test_all_equal_rows_keep_snapshot_order() {
    let values = InMemoryValues::from_rows((0..50).map(|_| [("a", "same"), ("b", "same")]));
    let sort = SortState::new([SortColumn::desc("a"), SortColumn::asc("b")]);

    let map = build(&sort, &values, &Schema::new());

    let expected: Vec<usize> = (0..50).collect();
    assert_eq!(map.as_slice(), expected.as_slice());
}

#[test]
fn test_two_column_sort() {
    let rows = [
        ("2", "x"),
        ("1", "a"),
        ("2", "z"),
        ("1", "c"),
        ("2", "y"),
        ("1", "b"),
    ];
    let values = InMemoryValues::from_rows(rows.iter().map(|(a, b)| [("A", *a), ("B", *b)]));
    let sort = SortState::new([SortColumn::asc("A"), SortColumn::desc("B")]);

    let map = build(&sort, &values, &Schema::new());

    let ordered: Vec<(&str, &str)> = map.as_slice().iter().map(|&i| rows[i]).collect();
    assert_eq!(
        ordered,
        vec![
            ("1", "c"),
            ("1", "b"),
            ("1", "a"),
            ("2", "z"),
            ("2", "y"),
            ("2", "x"),
        ]
    );
}

#[test]
fn test_numeric_schema_sorts_by_value() {
    let columns = vec![ColumnDefinition::new("n").schema(ColumnType::Numeric)];
    let values = InMemoryValues::from_rows([[("n", "3")], [("n", "10")], [("n", "2")]]);
    let registry = SchemaRegistry::new();
    let schema = registry.resolve_columns(&columns, Some(&values), InMemoryLevel::Sorting);
    let sort = SortState::new([SortColumn::asc("n")]);

    let map = RowIndexMap::build(InMemoryLevel::Sorting, &sort, &values, &schema, &registry);

    assert_eq!(map.as_slice(), &[2, 0, 1]);
}

#[test]
fn test_rebuild_discards_previous_map() {
    let values = InMemoryValues::from_rows([[("a", "b")], [("a", "c")], [("a", "a")]]);
    let schema: Schema = [SchemaEntry::declared("a", ColumnType::String)]
        .into_iter()
        .collect();

    let asc = build(&SortState::new([SortColumn::asc("a")]), &values, &schema);
    let desc = build(&SortState::new([SortColumn::desc("a")]), &values, &schema);

    assert_eq!(asc.as_slice(), &[2, 0, 1]);
    assert_eq!(desc.as_slice(), &[1, 0, 2]);
}
