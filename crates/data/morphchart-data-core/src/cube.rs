//! Sparse aggregation cube over the dimensions and measures in use.
//!
//! Only index combinations that occur in at least one row get a cell, so the
//! cell count is bounded by the row count and never by the product of the
//! category counts.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::aggregator::Aggregator;
use crate::column::ColumnIndex;
use crate::error::DataError;
use crate::series::SeriesIndex;
use crate::table::DataTable;

/// One category index per cube dimension, in cube dimension order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiIndex(pub Vec<usize>);

/// A single (dimension, category) coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SliceIndex {
    pub column: ColumnIndex,
    pub value: usize,
}

/// Coordinates over a subset of the dimensions, sorted by column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubSliceIndex(pub Vec<SliceIndex>);

impl SubSliceIndex {
    pub fn new(mut slices: Vec<SliceIndex>) -> Self {
        slices.sort();
        Self(slices)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SliceIndex> {
        self.0.iter()
    }

    pub fn get(&self, column: ColumnIndex) -> Option<usize> {
        self.0
            .iter()
            .find(|s| s.column == column)
            .map(|s| s.value)
    }

    /// Keep only the coordinates on `columns`.
    pub fn restricted(&self, columns: &[ColumnIndex]) -> Self {
        Self(
            self.0
                .iter()
                .filter(|s| columns.contains(&s.column))
                .copied()
                .collect(),
        )
    }
}

#[derive(Clone, Debug)]
pub struct CubeCell {
    aggregators: Vec<Aggregator>,
    rows: usize,
}

impl CubeCell {
    fn new(measures: &[SeriesIndex]) -> Self {
        Self {
            aggregators: measures
                .iter()
                .filter_map(|m| m.aggregator())
                .map(Aggregator::new)
                .collect(),
            rows: 0,
        }
    }

    pub fn aggregator(&self, position: usize) -> Option<&Aggregator> {
        self.aggregators.get(position)
    }

    /// Rows that fell into this cell.
    pub fn row_count(&self) -> usize {
        self.rows
    }
}

#[derive(Clone, Debug)]
pub struct DataCube {
    dimensions: Vec<ColumnIndex>,
    measures: Vec<SeriesIndex>,
    sizes: Vec<usize>,
    cells: BTreeMap<MultiIndex, CubeCell>,
    rows: usize,
}

impl DataCube {
    /// Fold every table row into its cell. The configuration is validated in
    /// full before any row is read.
    pub fn build(
        table: &DataTable,
        dimensions: &[ColumnIndex],
        measures: &[SeriesIndex],
    ) -> Result<Self, DataError> {
        let mut dimensions = dimensions.to_vec();
        dimensions.sort();
        dimensions.dedup();
        let mut sizes = Vec::with_capacity(dimensions.len());
        for &dim in &dimensions {
            let info = table.info(dim)?;
            if !info.is_dimension() {
                return Err(DataError::NotADimension {
                    column: info.name().to_string(),
                });
            }
            sizes.push(info.category_count());
        }

        let mut measures = measures.to_vec();
        measures.sort();
        measures.dedup();
        for m in &measures {
            let info = table.info(m.column)?;
            let Some(aggregator) = m.aggregator() else {
                return Err(DataError::InvalidSeries {
                    reference: info.name().to_string(),
                    reason: "dimension used as a measure".to_string(),
                });
            };
            if !aggregator.accepts(info.kind()) {
                return Err(DataError::IncompatibleAggregator {
                    aggregator,
                    column: info.name().to_string(),
                    kind: info.kind(),
                });
            }
        }

        let dim_values: Vec<&[f64]> = dimensions
            .iter()
            .map(|&d| table.column_values(d))
            .collect();
        let measure_values: Vec<&[f64]> = measures
            .iter()
            .map(|m| table.column_values(m.column))
            .collect();

        let mut cells: BTreeMap<MultiIndex, CubeCell> = BTreeMap::new();
        let mut skipped = 0usize;
        for row in 0..table.row_count() {
            let index = MultiIndex(dim_values.iter().map(|col| col[row] as usize).collect());
            let cell = cells
                .entry(index)
                .or_insert_with(|| CubeCell::new(&measures));
            cell.rows += 1;
            for (agg, values) in cell.aggregators.iter_mut().zip(&measure_values) {
                if !values[row].is_finite() {
                    skipped += 1;
                }
                agg.add(values[row]);
            }
        }
        if skipped > 0 {
            warn!("cube: {skipped} non-finite measure value(s) left out of sums and extrema");
        }

        debug!(
            "cube: {} dimension(s), {} measure(s), {} cell(s) from {} row(s)",
            dimensions.len(),
            measures.len(),
            cells.len(),
            table.row_count()
        );

        Ok(Self {
            dimensions,
            measures,
            sizes,
            cells,
            rows: table.row_count(),
        })
    }

    pub fn dimensions(&self) -> &[ColumnIndex] {
        &self.dimensions
    }

    pub fn measures(&self) -> &[SeriesIndex] {
        &self.measures
    }

    /// Category count of each dimension, in cube order.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn dimension_position(&self, column: ColumnIndex) -> Option<usize> {
        self.dimensions.iter().position(|&d| d == column)
    }

    pub fn measure_position(&self, measure: SeriesIndex) -> Option<usize> {
        self.measures.iter().position(|&m| m == measure)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, index: &MultiIndex) -> Option<&CubeCell> {
        self.cells.get(index)
    }

    /// Aggregate value of `measure` at `index`; `None` when the cell is absent
    /// or the measure is not part of the cube.
    pub fn value(&self, index: &MultiIndex, measure: SeriesIndex) -> Option<f64> {
        let pos = self.measure_position(measure)?;
        self.cells.get(index)?.aggregator(pos).map(Aggregator::value)
    }

    /// Occupied cells in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&MultiIndex, &CubeCell)> {
        self.cells.iter()
    }

    /// Coordinates of `index` restricted to `columns`. Columns that are not
    /// cube dimensions are ignored.
    pub fn sub_slice(&self, index: &MultiIndex, columns: &[ColumnIndex]) -> SubSliceIndex {
        SubSliceIndex::new(
            self.dimensions
                .iter()
                .zip(&index.0)
                .filter(|(d, _)| columns.contains(d))
                .map(|(&column, &value)| SliceIndex { column, value })
                .collect(),
        )
    }

    /// Coordinates of `index` over every cube dimension.
    pub fn slice(&self, index: &MultiIndex) -> SubSliceIndex {
        self.sub_slice(index, &self.dimensions)
    }

    /// Merge of every cell's aggregate for `measure`.
    pub fn total(&self, measure: SeriesIndex) -> Option<Aggregator> {
        let pos = self.measure_position(measure)?;
        let kind = measure.aggregator()?;
        let mut total = Aggregator::new(kind);
        for cell in self.cells.values() {
            if let Some(agg) = cell.aggregator(pos) {
                total.merge(agg);
            }
        }
        Some(total)
    }
}
