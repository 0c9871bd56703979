//! Error types for table construction and cube configuration.

use thiserror::Error;

use crate::aggregator::AggregatorKind;
use crate::column::ColumnKind;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DataError {
    #[error("unknown column '{name}'")]
    UnknownColumn { name: String },

    #[error("column index {index} out of range (table has {count} columns)")]
    ColumnOutOfRange { index: usize, count: usize },

    #[error("column '{name}' already exists")]
    DuplicateColumn { name: String },

    #[error("column '{name}' has {actual} values, table has {expected} rows")]
    ColumnLengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("row has {actual} cells, table has {expected} columns")]
    RowWidthMismatch { expected: usize, actual: usize },

    #[error("invalid number '{value}' for measure '{column}'")]
    InvalidNumber { column: String, value: String },

    #[error("unknown aggregator '{name}'")]
    UnknownAggregator { name: String },

    #[error("aggregator {aggregator:?} cannot be applied to {kind:?} column '{column}'")]
    IncompatibleAggregator {
        aggregator: AggregatorKind,
        column: String,
        kind: ColumnKind,
    },

    #[error("column '{column}' is not a dimension")]
    NotADimension { column: String },

    #[error("invalid series reference '{reference}': {reason}")]
    InvalidSeries { reference: String, reason: String },
}
