//! Visual channels and the series assigned to them.

use std::fmt;
use std::str::FromStr;

use log::warn;
use morphchart_data_core::{ColumnIndex, SeriesIndex};
use serde::{Deserialize, Serialize};

use crate::error::ChartError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelId {
    X,
    Y,
    Color,
    Lightness,
    Size,
    Label,
}

impl ChannelId {
    pub const ALL: [ChannelId; 6] = [
        ChannelId::X,
        ChannelId::Y,
        ChannelId::Color,
        ChannelId::Lightness,
        ChannelId::Size,
        ChannelId::Label,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ChannelId::X => "x",
            ChannelId::Y => "y",
            ChannelId::Color => "color",
            ChannelId::Lightness => "lightness",
            ChannelId::Size => "size",
            ChannelId::Label => "label",
        }
    }

    pub fn is_axis(self) -> bool {
        matches!(self, ChannelId::X | ChannelId::Y)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelId {
    type Err = ChartError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelId::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ChartError::UnknownChannel {
                name: s.to_string(),
            })
    }
}

/// One end of a channel range. `Percent` is relative to the automatic extent:
/// 0% is its minimum, 100% its maximum.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChannelExtrema {
    #[default]
    Auto,
    Value(f64),
    Percent(f64),
}

impl ChannelExtrema {
    fn resolve(self, auto: f64, (lo, hi): (f64, f64)) -> f64 {
        match self {
            ChannelExtrema::Auto => auto,
            ChannelExtrema::Value(v) => v,
            ChannelExtrema::Percent(p) => lo + (hi - lo) * p / 100.0,
        }
    }
}

impl fmt::Display for ChannelExtrema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelExtrema::Auto => f.write_str("auto"),
            ChannelExtrema::Value(v) => write!(f, "{v}"),
            ChannelExtrema::Percent(p) => write!(f, "{p}%"),
        }
    }
}

impl FromStr for ChannelExtrema {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "auto" {
            return Ok(ChannelExtrema::Auto);
        }
        let parse = |t: &str| {
            t.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid range value '{s}'"))
        };
        match s.strip_suffix('%') {
            Some(p) => parse(p).map(ChannelExtrema::Percent),
            None => parse(s).map(ChannelExtrema::Value),
        }
    }
}

impl TryFrom<String> for ChannelExtrema {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ChannelExtrema> for String {
    fn from(e: ChannelExtrema) -> Self {
        e.to_string()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelRange {
    #[serde(default)]
    pub min: ChannelExtrema,
    #[serde(default)]
    pub max: ChannelExtrema,
}

impl ChannelRange {
    /// Apply the policy to an automatically computed extent. Inverted ends
    /// are swapped; a policy that collapses the range to a point falls back
    /// to `auto`.
    pub fn resolve(&self, auto: (f64, f64)) -> (f64, f64) {
        let lo = self.min.resolve(auto.0, auto);
        let hi = self.max.resolve(auto.1, auto);
        if lo < hi {
            (lo, hi)
        } else if lo > hi {
            warn!("range {} .. {} is inverted, swapping ends", self.min, self.max);
            (hi, lo)
        } else {
            warn!("range {} .. {} is empty, using {:?}", self.min, self.max, auto);
            auto
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub series: Vec<SeriesIndex>,
    #[serde(default)]
    pub range: ChannelRange,
}

impl Channel {
    pub fn new(id: ChannelId) -> Self {
        Self {
            id,
            series: Vec::new(),
            range: ChannelRange::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn is_series_used(&self, series: SeriesIndex) -> bool {
        self.series.contains(&series)
    }

    /// The single measure on this channel, if any.
    pub fn measure(&self) -> Option<SeriesIndex> {
        self.series.iter().copied().find(SeriesIndex::is_measure)
    }

    /// Dimension columns in canonical (column) order.
    pub fn dimensions(&self) -> Vec<ColumnIndex> {
        let mut dims: Vec<ColumnIndex> = self
            .series
            .iter()
            .filter(|s| s.is_dimension())
            .map(|s| s.column)
            .collect();
        dims.sort();
        dims.dedup();
        dims
    }

    pub fn has_dimensions(&self) -> bool {
        self.series.iter().any(SeriesIndex::is_dimension)
    }
}

/// All channels, one slot per [`ChannelId`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channels {
    channels: [Channel; 6],
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            channels: ChannelId::ALL.map(Channel::new),
        }
    }
}

impl Channels {
    pub fn get(&self, id: ChannelId) -> &Channel {
        &self.channels[id.index()]
    }

    pub fn get_mut(&mut self, id: ChannelId) -> &mut Channel {
        &mut self.channels[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    pub fn is_series_used(&self, series: SeriesIndex) -> bool {
        self.channels.iter().any(|c| c.is_series_used(series))
    }

    /// Number of channels holding `series`.
    pub fn count(&self, series: SeriesIndex) -> usize {
        self.channels
            .iter()
            .filter(|c| c.is_series_used(series))
            .count()
    }

    /// Every dimension column on any channel, sorted and deduplicated.
    pub fn dimensions(&self) -> Vec<ColumnIndex> {
        let mut dims: Vec<ColumnIndex> = self
            .channels
            .iter()
            .flat_map(|c| c.dimensions())
            .collect();
        dims.sort();
        dims.dedup();
        dims
    }

    pub fn measures(&self) -> Vec<SeriesIndex> {
        let mut measures: Vec<SeriesIndex> =
            self.channels.iter().filter_map(Channel::measure).collect();
        measures.sort();
        measures.dedup();
        measures
    }
}
