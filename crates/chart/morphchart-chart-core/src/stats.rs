//! Per-channel scaling facts computed once per generation pass: the measure
//! extent (with stack totals for stacked axes) and the categorical slots of
//! the channel's dimensions.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use log::trace;
use morphchart_data_core::{ColumnIndex, DataCube, SubSliceIndex};

use crate::channel::ChannelId;
use crate::options::Options;

#[derive(Clone, Debug, Default)]
pub struct ChannelStats {
    /// Extent the channel's measure is normalized over, after the range policy.
    pub range: Option<(f64, f64)>,
    /// Dimension columns on the channel, canonical order.
    pub dimensions: Vec<ColumnIndex>,
    slots: HashMap<SubSliceIndex, usize>,
}

impl ChannelStats {
    /// Map a measure value into 0..1 (outside when the range policy clips).
    pub fn normalize(&self, value: f64) -> f64 {
        match self.range {
            Some((lo, hi)) if hi > lo => (value - lo) / (hi - lo),
            _ => 0.0,
        }
    }

    pub fn slot(&self, key: &SubSliceIndex) -> Option<usize> {
        self.slots.get(key).copied()
    }

    /// Number of distinct occupied dimension combinations.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot `i` of `n` spans `[i/n, (i+1)/n]`.
    pub fn slot_span(&self, key: &SubSliceIndex) -> Option<(f64, f64)> {
        let n = self.slots.len() as f64;
        self.slot(key)
            .map(|i| (i as f64 / n, (i as f64 + 1.0) / n))
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChannelsStats {
    channels: [ChannelStats; 6],
}

impl ChannelsStats {
    pub fn compute(cube: &DataCube, options: &Options) -> Self {
        let mut stats = ChannelsStats::default();
        let sub_axis = options.sub_axis_type();
        let main_dims = options.main_axis().dimensions();

        for channel in options.channels.iter() {
            let entry = &mut stats.channels[channel.id.index()];
            entry.dimensions = channel.dimensions();

            let keys: BTreeSet<SubSliceIndex> = cube
                .iter()
                .map(|(idx, _)| cube.sub_slice(idx, &entry.dimensions))
                .collect();
            entry.slots = keys.into_iter().enumerate().map(|(i, k)| (k, i)).collect();

            let Some(measure) = channel.measure() else {
                continue;
            };
            let values = cube
                .iter()
                .map(|(idx, _)| (idx, cube.value(idx, measure).unwrap_or(0.0)));

            let (mut lo, mut hi) = if channel.id == sub_axis && options.is_stacked() {
                let mut stacks: HashMap<SubSliceIndex, (f64, f64)> = HashMap::new();
                for (idx, v) in values {
                    let stack = stacks
                        .entry(cube.sub_slice(idx, &main_dims))
                        .or_insert((0.0, 0.0));
                    if v >= 0.0 {
                        stack.0 += v;
                    } else {
                        stack.1 += v;
                    }
                }
                stacks
                    .values()
                    .fold((0.0_f64, 0.0_f64), |(lo, hi), &(pos, neg)| {
                        (lo.min(neg), hi.max(pos))
                    })
            } else {
                values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
                    (lo.min(v), hi.max(v))
                })
            };

            let from_zero = channel.id == ChannelId::Size
                || (channel.id.is_axis() && options.shape.is_extended());
            if lo > hi {
                (lo, hi) = (0.0, 1.0);
            }
            if from_zero {
                lo = lo.min(0.0);
                hi = hi.max(0.0);
            }
            if lo == hi {
                (lo, hi) = if lo == 0.0 {
                    (0.0, 1.0)
                } else {
                    (lo.min(0.0), hi.max(0.0))
                };
            }
            entry.range = Some(channel.range.resolve((lo, hi)));
            trace!(
                "{}: range {:?} over {} slot(s)",
                channel.id,
                entry.range,
                entry.slots.len()
            );
        }
        stats
    }

    pub fn get(&self, id: ChannelId) -> &ChannelStats {
        &self.channels[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{ChannelExtrema, ChannelRange};
    use crate::options::ShapeType;
    use morphchart_data_core::DataTable;

    fn table() -> DataTable {
        let mut t = DataTable::new();
        t.add_dimension("Year", &["2001", "2001", "2002", "2002"])
            .unwrap();
        t.add_dimension("Genre", &["Pop", "Rock", "Pop", "Rock"])
            .unwrap();
        t.add_measure("Sales", "", &[3.0, -1.0, 5.0, 2.0]).unwrap();
        t
    }

    fn stacked(t: &DataTable) -> (DataCube, Options) {
        let mut o = Options::new(ShapeType::Rectangle);
        o.add_series(ChannelId::X, t.series("Year").unwrap(), None)
            .unwrap();
        o.add_series(ChannelId::Y, t.series("Sales").unwrap(), None)
            .unwrap();
        o.add_series(ChannelId::Y, t.series("Genre").unwrap(), None)
            .unwrap();
        let cube = DataCube::build(t, &o.channels.dimensions(), &o.channels.measures()).unwrap();
        (cube, o)
    }

    #[test]
    fn stacked_axis_uses_stack_totals() {
        let t = table();
        let (cube, o) = stacked(&t);
        let stats = ChannelsStats::compute(&cube, &o);
        // 2001: +3 / -1, 2002: +7
        assert_eq!(stats.get(ChannelId::Y).range, Some((-1.0, 7.0)));
        assert_eq!(stats.get(ChannelId::X).slot_count(), 2);
    }

    #[test]
    fn split_areas_use_cell_extent() {
        let t = table();
        let (cube, mut o) = stacked(&t);
        o.shape = ShapeType::Area;
        o.split = true;
        let stats = ChannelsStats::compute(&cube, &o);
        assert_eq!(stats.get(ChannelId::Y).range, Some((-1.0, 5.0)));
    }

    #[test]
    fn circles_do_not_force_zero_and_ranges_apply() {
        let t = table();
        let (cube, mut o) = stacked(&t);
        o.shape = ShapeType::Circle;
        o.channels.get_mut(ChannelId::Y).range = ChannelRange {
            min: ChannelExtrema::Auto,
            max: ChannelExtrema::Percent(200.0),
        };
        let stats = ChannelsStats::compute(&cube, &o);
        let y = stats.get(ChannelId::Y);
        assert_eq!(y.range, Some((-1.0, 11.0)));
        assert_eq!(y.normalize(-1.0), 0.0);
        assert_eq!(y.normalize(5.0), 0.5);
    }

    #[test]
    fn inverted_ranges_still_normalize() {
        let t = table();
        let (cube, mut o) = stacked(&t);
        o.channels.get_mut(ChannelId::Y).range = ChannelRange {
            min: ChannelExtrema::Value(10.0),
            max: ChannelExtrema::Value(-2.0),
        };
        let stats = ChannelsStats::compute(&cube, &o);
        let y = stats.get(ChannelId::Y);
        assert_eq!(y.range, Some((-2.0, 10.0)));
        assert_eq!(y.normalize(4.0), 0.5);
    }

    #[test]
    fn slots_are_dense_and_ordered() {
        let t = table();
        let (cube, o) = stacked(&t);
        let stats = ChannelsStats::compute(&cube, &o);
        let x = stats.get(ChannelId::X);
        let year = t.column("Year").unwrap();
        let first = cube.iter().next().map(|(idx, _)| cube.sub_slice(idx, &[year])).unwrap();
        assert_eq!(x.slot(&first), Some(0));
        assert_eq!(x.slot_span(&first), Some((0.0, 0.5)));
        assert_eq!(stats.get(ChannelId::Color).slot_count(), 1);
    }
}
