//! Column metadata: dimension categories or measure unit and extent.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Dimension,
    Measure,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnIndex(pub usize);

/// Per-column metadata. Dimension values are stored in the table as dense
/// category indices; `categories` maps them back to labels in first-seen order.
#[derive(Clone, Debug)]
pub struct ColumnInfo {
    name: String,
    kind: ColumnKind,
    unit: String,
    categories: Vec<String>,
    lookup: HashMap<String, usize>,
    min: f64,
    max: f64,
}

impl ColumnInfo {
    pub fn dimension(name: impl Into<String>) -> Self {
        Self::new(name.into(), ColumnKind::Dimension, String::new())
    }

    pub fn measure(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(name.into(), ColumnKind::Measure, unit.into())
    }

    fn new(name: String, kind: ColumnKind, unit: String) -> Self {
        Self {
            name,
            kind,
            unit,
            categories: Vec::new(),
            lookup: HashMap::new(),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn is_dimension(&self) -> bool {
        self.kind == ColumnKind::Dimension
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn category_index(&self, label: &str) -> Option<usize> {
        self.lookup.get(label).copied()
    }

    pub fn category_label(&self, index: usize) -> Option<&str> {
        self.categories.get(index).map(String::as_str)
    }

    /// Extent of the finite values seen so far; `None` for dimensions or when
    /// nothing finite was added.
    pub fn range(&self) -> Option<(f64, f64)> {
        if self.kind == ColumnKind::Measure && self.min <= self.max {
            Some((self.min, self.max))
        } else {
            None
        }
    }

    /// Category index of `label`, registering it on first sight.
    pub(crate) fn intern(&mut self, label: &str) -> usize {
        if let Some(&idx) = self.lookup.get(label) {
            return idx;
        }
        let idx = self.categories.len();
        self.categories.push(label.to_string());
        self.lookup.insert(label.to_string(), idx);
        idx
    }

    pub(crate) fn observe(&mut self, value: f64) {
        if value.is_finite() {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    /// Human-readable cell text: the category label for dimensions, the number
    /// for measures.
    pub fn format(&self, value: f64) -> String {
        match self.kind {
            ColumnKind::Dimension => self
                .category_label(value as usize)
                .unwrap_or_default()
                .to_string(),
            ColumnKind::Measure => value.to_string(),
        }
    }
}
