//! Staging policy for channel edits.
//!
//! Adding a dimension to (or removing it from) a channel changes how rows are
//! grouped into markers. Done in one step, markers would pop in or out instead
//! of splitting or merging. The splitter routes the dimension through a
//! neutral channel first (the sub axis for rectangles and areas, size for
//! circles and lines), so each cut only changes one thing the viewer can
//! follow.
//!
//! Requests are validated against the current options before anything is
//! staged, so a rejected edit forwards nothing.

use log::debug;
use morphchart_data_core::SeriesIndex;

use crate::channel::{ChannelId, ChannelRange};
use crate::error::ChartError;
use crate::options::{Options, Orientation, ShapeType};
use crate::setter::OptionsSetter;

pub struct AutoSplitter<'a, S: OptionsSetter> {
    setter: &'a mut S,
}

impl<'a, S: OptionsSetter> AutoSplitter<'a, S> {
    pub fn new(setter: &'a mut S) -> Self {
        Self { setter }
    }

    pub fn inner(&self) -> &S {
        self.setter
    }

    fn stage_add(
        &mut self,
        channel: ChannelId,
        series: SeriesIndex,
        pos: Option<usize>,
    ) -> Result<(), ChartError> {
        let options = self.setter.options();
        let shape = options.shape;
        let main = options.main_axis_type();
        let sub = options.sub_axis_type();
        let unused = !options.channels.is_series_used(series);
        let sub_free = !options.sub_axis().is_series_used(series);

        match shape {
            ShapeType::Rectangle if channel == main && sub_free => {
                debug!("staging add of {series:?} to {channel} through {sub}");
                self.setter.add_series(sub, series, None)?;
                self.setter.on_finished();
                self.setter.add_series(channel, series, pos)?;
                self.setter.delete_series(sub, series)
            }
            ShapeType::Circle if channel != ChannelId::Size && unused => {
                debug!("staging add of {series:?} to {channel} through size");
                self.setter.add_series(ChannelId::Size, series, None)?;
                self.setter.on_finished();
                self.setter.add_series(channel, series, pos)?;
                self.setter.delete_series(ChannelId::Size, series)
            }
            ShapeType::Line if channel != ChannelId::Size && unused => {
                debug!("staging add of {series:?} to {channel} through size");
                self.setter.add_series(ChannelId::Size, series, None)?;
                if channel != main {
                    self.setter.on_finished();
                }
                self.setter.add_series(channel, series, pos)?;
                if channel == main {
                    self.setter.on_finished();
                }
                self.setter.delete_series(ChannelId::Size, series)
            }
            ShapeType::Area if channel == main && sub_free => {
                debug!("staging add of {series:?} to {channel} through {sub}");
                self.setter.add_series(sub, series, None)?;
                self.setter.add_series(channel, series, pos)?;
                self.setter.on_finished();
                self.setter.delete_series(sub, series)
            }
            _ => self.setter.add_series(channel, series, pos),
        }
    }

    fn stage_delete(&mut self, channel: ChannelId, series: SeriesIndex) -> Result<(), ChartError> {
        let options = self.setter.options();
        let shape = options.shape;
        let main = options.main_axis_type();
        let sub = options.sub_axis_type();
        let last_use = options.channels.count(series) == 1;
        let sub_free = !options.sub_axis().is_series_used(series);

        match shape {
            ShapeType::Rectangle if channel == main && sub_free => {
                debug!("staging delete of {series:?} from {channel} through {sub}");
                self.setter.add_series(sub, series, None)?;
                self.setter.delete_series(channel, series)?;
                self.setter.on_finished();
                self.setter.delete_series(sub, series)
            }
            ShapeType::Circle if channel != ChannelId::Size && last_use => {
                debug!("staging delete of {series:?} from {channel} through size");
                self.setter.add_series(ChannelId::Size, series, None)?;
                self.setter.delete_series(channel, series)?;
                self.setter.on_finished();
                self.setter.delete_series(ChannelId::Size, series)
            }
            ShapeType::Line if channel != ChannelId::Size && last_use => {
                debug!("staging delete of {series:?} from {channel} through size");
                self.setter.add_series(ChannelId::Size, series, None)?;
                if channel == main {
                    self.setter.on_finished();
                }
                self.setter.delete_series(channel, series)?;
                if channel != main {
                    self.setter.on_finished();
                }
                self.setter.delete_series(ChannelId::Size, series)
            }
            ShapeType::Area if channel == main && sub_free => {
                debug!("staging delete of {series:?} from {channel} through {sub}");
                self.setter.add_series(sub, series, None)?;
                self.setter.on_finished();
                self.setter.delete_series(channel, series)?;
                self.setter.delete_series(sub, series)
            }
            _ => self.setter.delete_series(channel, series),
        }
    }
}

impl<'a, S: OptionsSetter> OptionsSetter for AutoSplitter<'a, S> {
    fn options(&self) -> &Options {
        self.setter.options()
    }

    fn add_series(
        &mut self,
        channel: ChannelId,
        series: SeriesIndex,
        pos: Option<usize>,
    ) -> Result<(), ChartError> {
        self.setter.options().validate_add(channel, series, pos)?;
        if series.is_dimension() {
            self.stage_add(channel, series, pos)
        } else {
            self.setter.add_series(channel, series, pos)
        }
    }

    fn delete_series(&mut self, channel: ChannelId, series: SeriesIndex) -> Result<(), ChartError> {
        self.setter.options().validate_delete(channel, series)?;
        if series.is_dimension() {
            self.stage_delete(channel, series)
        } else {
            self.setter.delete_series(channel, series)
        }
    }

    /// Splitting is only meaningful for areas; other shapes ignore `true`.
    fn set_splitted(&mut self, split: bool) {
        if !split || self.setter.options().shape == ShapeType::Area {
            self.setter.set_splitted(split);
        }
    }

    fn set_shape(&mut self, shape: ShapeType) -> Result<(), ChartError> {
        let options = self.setter.options();
        if options.shape == shape {
            return Ok(());
        }
        options.validate_shape(shape)?;
        if shape != ShapeType::Area {
            self.setter.set_splitted(false);
        }
        self.setter.set_shape(shape)
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        self.setter.set_orientation(orientation);
    }

    fn set_range(&mut self, channel: ChannelId, range: ChannelRange) {
        self.setter.set_range(channel, range);
    }

    fn on_finished(&mut self) {
        self.setter.on_finished();
    }
}
