//! Errors raised while configuring channels or generating markers.

use morphchart_data_core::{DataError, SeriesIndex};
use thiserror::Error;

use crate::channel::ChannelId;
use crate::options::ShapeType;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ChartError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("unknown channel '{name}'")]
    UnknownChannel { name: String },

    #[error("series {series:?} is already on channel {channel}")]
    SeriesAlreadyOnChannel {
        channel: ChannelId,
        series: SeriesIndex,
    },

    #[error("series {series:?} is not on channel {channel}")]
    SeriesNotOnChannel {
        channel: ChannelId,
        series: SeriesIndex,
    },

    #[error("channel {channel} already holds measure {existing:?}")]
    ChannelMeasureOccupied {
        channel: ChannelId,
        existing: SeriesIndex,
    },

    #[error("a measure on channel {channel} is not supported for {shape} markers")]
    UnsupportedChannel { shape: ShapeType, channel: ChannelId },

    #[error("position {pos} out of range for channel {channel} with {len} series")]
    PositionOutOfRange {
        channel: ChannelId,
        pos: usize,
        len: usize,
    },

    #[error("duplicate marker identity {id} in {context}")]
    IdentityCollision { context: &'static str, id: String },

    #[error("unknown option path '{path}'")]
    InvalidPath { path: String },

    #[error("invalid value '{value}' for option '{path}'")]
    InvalidValue { path: String, value: String },
}
