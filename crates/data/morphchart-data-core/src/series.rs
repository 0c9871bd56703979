//! Series references: a column plus the role it plays on a channel.

use serde::{Deserialize, Serialize};

use crate::aggregator::AggregatorKind;
use crate::column::{ColumnIndex, ColumnKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Dimension,
    Measure(AggregatorKind),
}

/// Unit of channel assignment. Ordering is by column first, which is the
/// canonical dimension order shared by the cube and the marker generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesIndex {
    pub column: ColumnIndex,
    pub kind: SeriesKind,
}

impl SeriesIndex {
    pub fn dimension(column: ColumnIndex) -> Self {
        Self {
            column,
            kind: SeriesKind::Dimension,
        }
    }

    pub fn measure(column: ColumnIndex, aggregator: AggregatorKind) -> Self {
        Self {
            column,
            kind: SeriesKind::Measure(aggregator),
        }
    }

    #[inline]
    pub fn is_dimension(&self) -> bool {
        self.kind == SeriesKind::Dimension
    }

    #[inline]
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, SeriesKind::Measure(_))
    }

    pub fn aggregator(&self) -> Option<AggregatorKind> {
        match self.kind {
            SeriesKind::Measure(agg) => Some(agg),
            SeriesKind::Dimension => None,
        }
    }

    /// Default role for a bare column reference.
    pub fn default_for(column: ColumnIndex, kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Dimension => Self::dimension(column),
            ColumnKind::Measure => Self::measure(column, AggregatorKind::Sum),
        }
    }
}

/// Split `agg(Name)` into its parts; a bare `Name` yields no aggregator.
pub(crate) fn split_reference(reference: &str) -> Result<(Option<&str>, &str), String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err("empty reference".to_string());
    }
    match trimmed.find('(') {
        None => Ok((None, trimmed)),
        Some(open) => {
            let inner = trimmed[open + 1..]
                .strip_suffix(')')
                .ok_or_else(|| "missing closing parenthesis".to_string())?;
            let agg = trimmed[..open].trim();
            let name = inner.trim();
            if agg.is_empty() || name.is_empty() {
                return Err("expected agg(Name)".to_string());
            }
            Ok((Some(agg), name))
        }
    }
}
