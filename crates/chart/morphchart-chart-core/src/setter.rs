//! The channel-mutation contract and a setter that records keyframe cuts.

use log::trace;
use morphchart_data_core::SeriesIndex;

use crate::channel::{ChannelId, ChannelRange};
use crate::error::ChartError;
use crate::options::{Options, Orientation, ShapeType};

/// Mutation API over [`Options`]. `on_finished` marks a cut: the options as
/// they stand are a complete, renderable intermediate state.
pub trait OptionsSetter {
    fn options(&self) -> &Options;

    fn add_series(
        &mut self,
        channel: ChannelId,
        series: SeriesIndex,
        pos: Option<usize>,
    ) -> Result<(), ChartError>;

    fn delete_series(&mut self, channel: ChannelId, series: SeriesIndex) -> Result<(), ChartError>;

    fn set_splitted(&mut self, split: bool);

    fn set_shape(&mut self, shape: ShapeType) -> Result<(), ChartError>;

    fn set_orientation(&mut self, orientation: Orientation);

    fn set_range(&mut self, channel: ChannelId, range: ChannelRange);

    fn on_finished(&mut self);
}

/// Applies edits to a working copy of the options and snapshots it at every
/// cut.
#[derive(Clone, Debug)]
pub struct KeyframeRecorder {
    current: Options,
    keyframes: Vec<Options>,
}

impl KeyframeRecorder {
    pub fn new(initial: Options) -> Self {
        Self {
            current: initial,
            keyframes: Vec::new(),
        }
    }

    /// Cuts recorded so far.
    pub fn boundaries(&self) -> usize {
        self.keyframes.len()
    }

    pub fn keyframes(&self) -> &[Options] {
        &self.keyframes
    }

    /// Every recorded cut followed by the final state. The final state is
    /// left out when nothing changed after the last cut.
    pub fn into_keyframes(self) -> Vec<Options> {
        let mut keyframes = self.keyframes;
        if keyframes.last() != Some(&self.current) {
            keyframes.push(self.current);
        }
        keyframes
    }
}

impl OptionsSetter for KeyframeRecorder {
    fn options(&self) -> &Options {
        &self.current
    }

    fn add_series(
        &mut self,
        channel: ChannelId,
        series: SeriesIndex,
        pos: Option<usize>,
    ) -> Result<(), ChartError> {
        trace!("add {series:?} to {channel}");
        self.current.add_series(channel, series, pos)
    }

    fn delete_series(&mut self, channel: ChannelId, series: SeriesIndex) -> Result<(), ChartError> {
        trace!("delete {series:?} from {channel}");
        self.current.delete_series(channel, series)
    }

    fn set_splitted(&mut self, split: bool) {
        self.current.split = split;
    }

    fn set_shape(&mut self, shape: ShapeType) -> Result<(), ChartError> {
        self.current.set_shape(shape)
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        self.current.orientation = orientation;
    }

    fn set_range(&mut self, channel: ChannelId, range: ChannelRange) {
        self.current.channels.get_mut(channel).range = range;
    }

    fn on_finished(&mut self) {
        trace!("keyframe cut #{}", self.keyframes.len() + 1);
        self.keyframes.push(self.current.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphchart_data_core::ColumnIndex;

    #[test]
    fn final_state_follows_cuts() {
        let d = SeriesIndex::dimension(ColumnIndex(0));
        let mut rec = KeyframeRecorder::new(Options::default());
        rec.add_series(ChannelId::Y, d, None).unwrap();
        rec.on_finished();
        rec.add_series(ChannelId::X, d, None).unwrap();
        assert_eq!(rec.boundaries(), 1);
        let frames = rec.into_keyframes();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].channels.get(ChannelId::Y).is_series_used(d));
        assert!(!frames[0].channels.get(ChannelId::X).is_series_used(d));
        assert!(frames[1].channels.get(ChannelId::X).is_series_used(d));
    }

    #[test]
    fn trailing_cut_is_not_duplicated() {
        let mut rec = KeyframeRecorder::new(Options::default());
        rec.set_splitted(true);
        rec.on_finished();
        assert_eq!(rec.into_keyframes().len(), 1);

        let rec = KeyframeRecorder::new(Options::default());
        assert_eq!(rec.into_keyframes(), vec![Options::default()]);
    }
}
