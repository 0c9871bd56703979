//! Columnar data table.
//!
//! Dimension cells are stored as dense category indices (as `f64`) so that the
//! cube can fold every column through the same path. Measure cells are plain
//! numbers; NaN marks a missing value.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::aggregator::AggregatorKind;
use crate::column::{ColumnIndex, ColumnInfo, ColumnKind};
use crate::error::DataError;
use crate::series::{split_reference, SeriesIndex, SeriesKind};

#[derive(Clone, Debug, Default)]
pub struct DataTable {
    infos: Vec<ColumnInfo>,
    columns: Vec<Vec<f64>>,
    by_name: HashMap<String, ColumnIndex>,
    rows: usize,
}

/// Borrowed view over one table row.
#[derive(Copy, Clone, Debug)]
pub struct Row<'a> {
    table: &'a DataTable,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value(&self, column: ColumnIndex) -> Option<f64> {
        self.table.value(self.index, column)
    }

    /// Cell rendered as text (category label or number).
    pub fn text(&self, column: ColumnIndex) -> Option<String> {
        let info = self.table.get_info(column)?;
        self.value(column).map(|v| info.format(v))
    }
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dimension column. Categories are registered in first-seen order.
    pub fn add_dimension<S: AsRef<str>>(
        &mut self,
        name: &str,
        values: &[S],
    ) -> Result<ColumnIndex, DataError> {
        self.add_dimension_with_categories::<S, S>(name, &[], values)
    }

    /// Like [`DataTable::add_dimension`], with `categories` registered up
    /// front. Declared categories need not occur in any row.
    pub fn add_dimension_with_categories<C: AsRef<str>, S: AsRef<str>>(
        &mut self,
        name: &str,
        categories: &[C],
        values: &[S],
    ) -> Result<ColumnIndex, DataError> {
        self.check_new_column(name, values.len())?;
        let mut info = ColumnInfo::dimension(name);
        for category in categories {
            info.intern(category.as_ref());
        }
        let column = values
            .iter()
            .map(|label| info.intern(label.as_ref()) as f64)
            .collect();
        Ok(self.push_column(info, column))
    }

    pub fn add_measure(
        &mut self,
        name: &str,
        unit: &str,
        values: &[f64],
    ) -> Result<ColumnIndex, DataError> {
        self.check_new_column(name, values.len())?;
        let mut info = ColumnInfo::measure(name, unit);
        for &v in values {
            info.observe(v);
        }
        Ok(self.push_column(info, values.to_vec()))
    }

    /// Append one row given as text cells in column order. Measure cells must
    /// parse as numbers; an empty measure cell is stored as missing.
    pub fn push_row<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<(), DataError> {
        if cells.len() != self.infos.len() {
            return Err(DataError::RowWidthMismatch {
                expected: self.infos.len(),
                actual: cells.len(),
            });
        }
        let mut parsed = Vec::with_capacity(cells.len());
        for (info, cell) in self.infos.iter().zip(cells) {
            let text = cell.as_ref().trim();
            let value = match info.kind() {
                ColumnKind::Dimension => None,
                ColumnKind::Measure if text.is_empty() => Some(f64::NAN),
                ColumnKind::Measure => {
                    Some(text.parse::<f64>().map_err(|_| DataError::InvalidNumber {
                        column: info.name().to_string(),
                        value: text.to_string(),
                    })?)
                }
            };
            parsed.push(value);
        }
        for ((info, column), (cell, value)) in self
            .infos
            .iter_mut()
            .zip(self.columns.iter_mut())
            .zip(cells.iter().zip(parsed))
        {
            let stored = match value {
                Some(v) => {
                    info.observe(v);
                    v
                }
                None => info.intern(cell.as_ref().trim()) as f64,
            };
            column.push(stored);
        }
        self.rows += 1;
        Ok(())
    }

    fn check_new_column(&self, name: &str, len: usize) -> Result<(), DataError> {
        if self.by_name.contains_key(name) {
            return Err(DataError::DuplicateColumn {
                name: name.to_string(),
            });
        }
        if !self.infos.is_empty() && len != self.rows {
            return Err(DataError::ColumnLengthMismatch {
                name: name.to_string(),
                expected: self.rows,
                actual: len,
            });
        }
        Ok(())
    }

    fn push_column(&mut self, info: ColumnInfo, values: Vec<f64>) -> ColumnIndex {
        let idx = ColumnIndex(self.infos.len());
        self.rows = values.len();
        self.by_name.insert(info.name().to_string(), idx);
        self.infos.push(info);
        self.columns.push(values);
        idx
    }

    pub fn column(&self, name: &str) -> Result<ColumnIndex, DataError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| DataError::UnknownColumn {
                name: name.to_string(),
            })
    }

    pub fn info(&self, column: ColumnIndex) -> Result<&ColumnInfo, DataError> {
        self.get_info(column).ok_or(DataError::ColumnOutOfRange {
            index: column.0,
            count: self.infos.len(),
        })
    }

    pub fn get_info(&self, column: ColumnIndex) -> Option<&ColumnInfo> {
        self.infos.get(column.0)
    }

    pub fn infos(&self) -> impl Iterator<Item = (ColumnIndex, &ColumnInfo)> {
        self.infos
            .iter()
            .enumerate()
            .map(|(i, info)| (ColumnIndex(i), info))
    }

    pub fn column_count(&self) -> usize {
        self.infos.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn value(&self, row: usize, column: ColumnIndex) -> Option<f64> {
        self.columns.get(column.0)?.get(row).copied()
    }

    /// Cell text: category label or formatted number.
    pub fn cell(&self, row: usize, column: ColumnIndex) -> Option<String> {
        self.row(row)?.text(column)
    }

    pub(crate) fn column_values(&self, column: ColumnIndex) -> &[f64] {
        self.columns
            .get(column.0)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.rows).then_some(Row { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.rows).map(move |index| Row { table: self, index })
    }

    /// Resolve `Name` or `agg(Name)` to a series. A bare dimension is used as a
    /// dimension; a bare measure is summed.
    pub fn series(&self, reference: &str) -> Result<SeriesIndex, DataError> {
        let (agg, name) = split_reference(reference).map_err(|reason| {
            DataError::InvalidSeries {
                reference: reference.to_string(),
                reason,
            }
        })?;
        let column = self.column(name)?;
        let info = self.info(column)?;
        match agg {
            None => Ok(SeriesIndex::default_for(column, info.kind())),
            Some(agg) => {
                let aggregator: AggregatorKind = agg.parse()?;
                if !aggregator.accepts(info.kind()) {
                    return Err(DataError::IncompatibleAggregator {
                        aggregator,
                        column: info.name().to_string(),
                        kind: info.kind(),
                    });
                }
                Ok(SeriesIndex::measure(column, aggregator))
            }
        }
    }

    /// Display name of a series, the inverse of [`DataTable::series`].
    pub fn series_name(&self, series: SeriesIndex) -> String {
        let name = self
            .get_info(series.column)
            .map_or("?", ColumnInfo::name);
        match series.kind {
            SeriesKind::Dimension => name.to_string(),
            SeriesKind::Measure(agg) => format!("{agg}({name})"),
        }
    }

    pub fn from_spec(spec: &TableSpec) -> Result<Self, DataError> {
        let mut table = Self::new();
        for dim in &spec.dimensions {
            table.add_dimension_with_categories(&dim.name, &dim.categories, &dim.values)?;
        }
        for measure in &spec.measures {
            let values: Vec<f64> = measure
                .values
                .iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            table.add_measure(&measure.name, &measure.unit, &values)?;
        }
        Ok(table)
    }
}

/// Serializable column-wise table description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    #[serde(default)]
    pub dimensions: Vec<DimensionSpec>,
    #[serde(default)]
    pub measures: Vec<MeasureSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub name: String,
    /// Categories registered ahead of the values, in this order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    pub values: Vec<String>,
}

/// `null` entries are missing values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasureSpec {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub values: Vec<Option<f64>>,
}
