use morphchart_data_core::{
    AggregatorKind, ColumnIndex, DataCube, DataTable, MultiIndex, SeriesIndex, TableSpec,
};
use morphchart_test_fixtures::tables;

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn music() -> DataTable {
    let spec: TableSpec = tables::load("music").expect("music fixture");
    DataTable::from_spec(&spec).expect("music table")
}

fn finite_sum(table: &DataTable, column: ColumnIndex) -> f64 {
    table
        .rows()
        .filter_map(|row| row.value(column))
        .filter(|v| v.is_finite())
        .sum()
}

#[test]
fn every_dimension_subset_conserves_totals() {
    let table = music();
    let genre = table.column("Genre").unwrap();
    let year = table.column("Year").unwrap();
    let format = table.column("Format").unwrap();
    let sales = table.series("Sales").unwrap();
    let count = table.series("count(Sales)").unwrap();
    let expected = finite_sum(&table, sales.column);

    let subsets: Vec<Vec<ColumnIndex>> = vec![
        vec![],
        vec![genre],
        vec![year],
        vec![genre, year],
        vec![format, genre],
        vec![genre, year, format],
    ];
    for dims in subsets {
        let cube = DataCube::build(&table, &dims, &[sales, count]).unwrap();
        approx(cube.total(sales).unwrap().value(), expected, 1e-9);
        // each row lands in exactly one cell
        let rows: usize = cube.iter().map(|(_, cell)| cell.row_count()).sum();
        assert_eq!(rows, table.row_count(), "dims={dims:?}");
        assert_eq!(
            cube.total(count).unwrap().value() as usize,
            table.row_count()
        );
        assert!(cube.len() <= table.row_count());
    }
}

#[test]
fn sparse_cube_skips_empty_categories() {
    let labels = ["A", "B", "C"];
    let values: Vec<&str> = (0..100).map(|i| labels[i % 3]).collect();
    let mut table = DataTable::new();
    let dim = table
        .add_dimension_with_categories("Kind", &["A", "B", "C", "D"], &values)
        .unwrap();
    table
        .add_measure("Weight", "kg", &vec![1.0; values.len()])
        .unwrap();
    let weight = table.series("Weight").unwrap();

    let cube = DataCube::build(&table, &[dim], &[weight]).unwrap();
    assert_eq!(cube.sizes(), &[4]);
    assert_eq!(cube.len(), 3);
    assert!(cube.cell(&MultiIndex(vec![3])).is_none());
    assert_eq!(cube.value(&MultiIndex(vec![3]), weight), None);
    assert_eq!(cube.value(&MultiIndex(vec![0]), weight), Some(34.0));
}

#[test]
fn aggregators_over_fixture() {
    let table = music();
    let genre = table.column("Genre").unwrap();
    let sales_col = table.column("Sales").unwrap();
    let series = |agg| SeriesIndex::measure(sales_col, agg);
    let distinct_years = table.series("distinct(Year)").unwrap();
    let measures = [
        series(AggregatorKind::Sum),
        series(AggregatorKind::Min),
        series(AggregatorKind::Max),
        series(AggregatorKind::Mean),
        distinct_years,
    ];
    let cube = DataCube::build(&table, &[genre], &measures).unwrap();

    // Rock: 8.0, 7.5 and one missing value
    let rock = MultiIndex(vec![1]);
    approx(cube.value(&rock, series(AggregatorKind::Sum)).unwrap(), 15.5, 1e-9);
    approx(cube.value(&rock, series(AggregatorKind::Min)).unwrap(), 7.5, 1e-9);
    approx(cube.value(&rock, series(AggregatorKind::Max)).unwrap(), 8.0, 1e-9);
    approx(cube.value(&rock, series(AggregatorKind::Mean)).unwrap(), 7.75, 1e-9);
    assert_eq!(cube.value(&rock, distinct_years), Some(3.0));
}

#[test]
fn cells_iterate_in_canonical_order() {
    let table = music();
    let genre = table.column("Genre").unwrap();
    let year = table.column("Year").unwrap();
    let cube = DataCube::build(&table, &[year, genre], &[]).unwrap();
    let indices: Vec<&MultiIndex> = cube.iter().map(|(idx, _)| idx).collect();
    let mut sorted = indices.clone();
    sorted.sort();
    assert_eq!(indices, sorted);
    assert_eq!(cube.dimensions(), &[genre, year]);
}
