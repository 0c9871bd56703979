//! Running aggregates folded per cube cell.
//!
//! Every kind is commutative and associative, so the fold order over rows does
//! not affect the result and partial aggregates can be merged.

use std::fmt;
use std::str::FromStr;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::column::ColumnKind;
use crate::error::DataError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatorKind {
    Sum,
    Count,
    Min,
    Max,
    Mean,
    Distinct,
    Exists,
}

impl AggregatorKind {
    pub const ALL: [AggregatorKind; 7] = [
        AggregatorKind::Sum,
        AggregatorKind::Count,
        AggregatorKind::Min,
        AggregatorKind::Max,
        AggregatorKind::Mean,
        AggregatorKind::Distinct,
        AggregatorKind::Exists,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AggregatorKind::Sum => "sum",
            AggregatorKind::Count => "count",
            AggregatorKind::Min => "min",
            AggregatorKind::Max => "max",
            AggregatorKind::Mean => "mean",
            AggregatorKind::Distinct => "distinct",
            AggregatorKind::Exists => "exists",
        }
    }

    /// Whether this aggregate is defined over a column of `kind`.
    /// Distinct needs a finite category set; numeric folds need numbers.
    pub fn accepts(self, kind: ColumnKind) -> bool {
        match self {
            AggregatorKind::Count | AggregatorKind::Exists => true,
            AggregatorKind::Distinct => kind == ColumnKind::Dimension,
            AggregatorKind::Sum
            | AggregatorKind::Min
            | AggregatorKind::Max
            | AggregatorKind::Mean => kind == ColumnKind::Measure,
        }
    }
}

impl fmt::Display for AggregatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregatorKind {
    type Err = DataError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggregatorKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| DataError::UnknownAggregator {
                name: s.to_string(),
            })
    }
}

/// Accumulates (count, sum, min, max) plus the distinct category set when the
/// kind needs it.
#[derive(Clone, Debug)]
pub struct Aggregator {
    kind: AggregatorKind,
    count: u64,
    finite: u64,
    sum: f64,
    min: f64,
    max: f64,
    distinct: Option<HashSet<u64>>,
}

impl Aggregator {
    pub fn new(kind: AggregatorKind) -> Self {
        Self {
            kind,
            count: 0,
            finite: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            distinct: (kind == AggregatorKind::Distinct).then(HashSet::new),
        }
    }

    pub fn kind(&self) -> AggregatorKind {
        self.kind
    }

    /// Number of rows folded in, finite or not.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn add(&mut self, value: f64) {
        self.count += 1;
        if !value.is_finite() {
            return;
        }
        self.finite += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        if let Some(set) = self.distinct.as_mut() {
            set.insert(value as u64);
        }
    }

    /// Fold another partial aggregate of the same kind into this one.
    pub fn merge(&mut self, other: &Aggregator) {
        self.count += other.count;
        self.finite += other.finite;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        if let (Some(set), Some(theirs)) = (self.distinct.as_mut(), other.distinct.as_ref()) {
            set.extend(theirs.iter().copied());
        }
    }

    /// Final aggregate value. Min, max and mean of nothing finite are 0.
    pub fn value(&self) -> f64 {
        match self.kind {
            AggregatorKind::Sum => self.sum,
            AggregatorKind::Count => self.count as f64,
            AggregatorKind::Min if self.finite > 0 => self.min,
            AggregatorKind::Max if self.finite > 0 => self.max,
            AggregatorKind::Mean if self.finite > 0 => self.sum / self.finite as f64,
            AggregatorKind::Min | AggregatorKind::Max | AggregatorKind::Mean => 0.0,
            AggregatorKind::Distinct => self.distinct.as_ref().map_or(0, HashSet::len) as f64,
            AggregatorKind::Exists => {
                if self.count > 0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}
