//! Declarative chart description, resolved against a table into [`Options`].

use anyhow::{Context, Result};
use indexmap::IndexMap;
use morphchart_chart_core::{ChannelId, ChannelRange, Options, Orientation, ShapeType};
use morphchart_data_core::DataTable;
use serde::{Deserialize, Serialize};

/// JSON form of a chart:
///
/// ```json
/// { "geometry": "rectangle", "channels": { "x": ["Genre"], "y": ["Sales"] },
///   "ranges": { "y": { "min": "auto", "max": "110%" } } }
/// ```
///
/// Channel entries are series references (`Name` or `agg(Name)`), applied in
/// the listed order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSpec {
    pub geometry: ShapeType,
    pub orientation: Orientation,
    pub split: bool,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub channels: IndexMap<ChannelId, Vec<String>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub ranges: IndexMap<ChannelId, ChannelRange>,
}

impl ChartSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid chart spec")
    }

    pub fn resolve(&self, table: &DataTable) -> Result<Options> {
        let mut options = Options::new(self.geometry);
        options.orientation = self.orientation;
        // splitting only applies to areas
        options.split = self.split && self.geometry == ShapeType::Area;
        for (&channel, references) in &self.channels {
            for reference in references {
                let series = table
                    .series(reference)
                    .with_context(|| format!("channel '{channel}'"))?;
                options
                    .add_series(channel, series, None)
                    .with_context(|| format!("channel '{channel}': cannot add '{reference}'"))?;
            }
        }
        for (&channel, range) in &self.ranges {
            options.channels.get_mut(channel).range = *range;
        }
        Ok(options)
    }
}
