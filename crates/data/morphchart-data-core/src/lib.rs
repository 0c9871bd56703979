//! morphchart-data-core: typed columnar table and the aggregation cube built over it.
//!
//! Rows of a [`DataTable`] are folded into a sparse [`DataCube`] whose cells are
//! addressed by a [`MultiIndex`] over the dimensions in use. Every cell carries one
//! [`Aggregator`] per measure in use.

pub mod aggregator;
pub mod column;
pub mod cube;
pub mod error;
pub mod series;
pub mod table;

pub use aggregator::{Aggregator, AggregatorKind};
pub use column::{ColumnIndex, ColumnInfo, ColumnKind};
pub use cube::{CubeCell, DataCube, MultiIndex, SliceIndex, SubSliceIndex};
pub use error::DataError;
pub use series::{SeriesIndex, SeriesKind};
pub use table::{DataTable, DimensionSpec, MeasureSpec, Row, TableSpec};
