//! Chart options: shape, orientation, split flag and channel assignments.

use std::fmt;
use std::str::FromStr;

use morphchart_data_core::SeriesIndex;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelId, Channels};
use crate::error::ChartError;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Line,
    Area,
}

impl ShapeType {
    pub const ALL: [ShapeType; 4] = [
        ShapeType::Rectangle,
        ShapeType::Circle,
        ShapeType::Line,
        ShapeType::Area,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Circle => "circle",
            ShapeType::Line => "line",
            ShapeType::Area => "area",
        }
    }

    /// Rectangles and areas span from a baseline; circles and lines are points.
    pub fn is_extended(self) -> bool {
        matches!(self, ShapeType::Rectangle | ShapeType::Area)
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeType {
    type Err = ChartError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| ChartError::InvalidValue {
                path: "geometry".to_string(),
                value: s.to_string(),
            })
    }
}

/// Which axis is the main (categorical grouping) axis. Horizontal puts it on x.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl FromStr for Orientation {
    type Err = ChartError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            _ => Err(ChartError::InvalidValue {
                path: "orientation".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    pub shape: ShapeType,
    pub orientation: Orientation,
    pub split: bool,
    pub channels: Channels,
}

impl Options {
    pub fn new(shape: ShapeType) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    pub fn main_axis_type(&self) -> ChannelId {
        if self.is_horizontal() {
            ChannelId::X
        } else {
            ChannelId::Y
        }
    }

    pub fn sub_axis_type(&self) -> ChannelId {
        if self.is_horizontal() {
            ChannelId::Y
        } else {
            ChannelId::X
        }
    }

    pub fn main_axis(&self) -> &Channel {
        self.channels.get(self.main_axis_type())
    }

    pub fn sub_axis(&self) -> &Channel {
        self.channels.get(self.sub_axis_type())
    }

    /// The other axis of an axis channel.
    pub fn sub_axis_of(&self, channel: ChannelId) -> Option<ChannelId> {
        match channel {
            ChannelId::X => Some(ChannelId::Y),
            ChannelId::Y => Some(ChannelId::X),
            _ => None,
        }
    }

    /// Rectangles and areas stack along the sub axis unless split.
    pub fn is_stacked(&self) -> bool {
        self.shape.is_extended() && !self.split
    }

    pub fn validate_add(
        &self,
        channel: ChannelId,
        series: SeriesIndex,
        pos: Option<usize>,
    ) -> Result<(), ChartError> {
        let target = self.channels.get(channel);
        if target.is_series_used(series) {
            return Err(ChartError::SeriesAlreadyOnChannel { channel, series });
        }
        if series.is_measure() {
            if let Some(existing) = target.measure() {
                return Err(ChartError::ChannelMeasureOccupied { channel, existing });
            }
            if self.shape == ShapeType::Area && channel == ChannelId::Size {
                return Err(ChartError::UnsupportedChannel {
                    shape: self.shape,
                    channel,
                });
            }
        }
        if let Some(pos) = pos {
            if pos > target.series.len() {
                return Err(ChartError::PositionOutOfRange {
                    channel,
                    pos,
                    len: target.series.len(),
                });
            }
        }
        Ok(())
    }

    pub fn validate_delete(&self, channel: ChannelId, series: SeriesIndex) -> Result<(), ChartError> {
        if !self.channels.get(channel).is_series_used(series) {
            return Err(ChartError::SeriesNotOnChannel { channel, series });
        }
        Ok(())
    }

    pub fn validate_shape(&self, shape: ShapeType) -> Result<(), ChartError> {
        if shape == ShapeType::Area && self.channels.get(ChannelId::Size).measure().is_some() {
            return Err(ChartError::UnsupportedChannel {
                shape,
                channel: ChannelId::Size,
            });
        }
        Ok(())
    }

    pub fn add_series(
        &mut self,
        channel: ChannelId,
        series: SeriesIndex,
        pos: Option<usize>,
    ) -> Result<(), ChartError> {
        self.validate_add(channel, series, pos)?;
        let list = &mut self.channels.get_mut(channel).series;
        match pos {
            Some(pos) => list.insert(pos, series),
            None => list.push(series),
        }
        Ok(())
    }

    pub fn delete_series(&mut self, channel: ChannelId, series: SeriesIndex) -> Result<(), ChartError> {
        self.validate_delete(channel, series)?;
        self.channels
            .get_mut(channel)
            .series
            .retain(|&s| s != series);
        Ok(())
    }

    pub fn set_shape(&mut self, shape: ShapeType) -> Result<(), ChartError> {
        self.validate_shape(shape)?;
        self.shape = shape;
        Ok(())
    }
}
