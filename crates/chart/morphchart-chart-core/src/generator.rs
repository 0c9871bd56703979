//! Marker generation: one marker per occupied cube cell, in cube order.

use hashbrown::{HashMap, HashSet};
use log::debug;
use morphchart_anim_core::{Color, FuzzyBool, Interpolated, Lerp, Point};
use morphchart_data_core::{AggregatorKind, ColumnIndex, DataCube, DataTable, MultiIndex, SubSliceIndex};

use crate::channel::ChannelId;
use crate::config::GeneratorConfig;
use crate::error::ChartError;
use crate::marker::{Id, Label, Marker};
use crate::options::Options;
use crate::stats::ChannelsStats;

/// Running stack offsets keyed by main-axis slot and sign.
type Stacks = HashMap<(SubSliceIndex, bool), f64>;

#[derive(Clone, Debug, Default)]
pub struct MarkerGenerator {
    config: GeneratorConfig,
    id_offset: usize,
}

impl MarkerGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            id_offset: 0,
        }
    }

    /// Markers of this generator start at `offset` instead of 0.
    pub fn with_id_offset(mut self, offset: usize) -> Self {
        self.id_offset = offset;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the cube and stats for `options`, then generate.
    pub fn build(&self, table: &DataTable, options: &Options) -> Result<Vec<Marker>, ChartError> {
        let cube = DataCube::build(
            table,
            &options.channels.dimensions(),
            &options.channels.measures(),
        )?;
        let stats = ChannelsStats::compute(&cube, options);
        self.generate(&cube, options, table, &stats)
    }

    pub fn generate(
        &self,
        cube: &DataCube,
        options: &Options,
        table: &DataTable,
        stats: &ChannelsStats,
    ) -> Result<Vec<Marker>, ChartError> {
        let all_dims = cube.dimensions().to_vec();
        let main_dims = options.main_axis().dimensions();
        let size_channel_dims = options.channels.get(ChannelId::Size).dimensions();
        let sub_dims = without(&all_dims, &main_dims);
        let size_dims = without(&all_dims, &size_channel_dims);
        let label_dims = options.channels.get(ChannelId::Label).dimensions();

        let mut stacks = Stacks::new();
        let mut seen: HashSet<Id> = HashSet::with_capacity(cube.len());
        let mut markers = Vec::with_capacity(cube.len());

        for (idx, (index, _)) in cube.iter().enumerate() {
            let mut position = Point::ZERO;
            let mut size = Point::ZERO;
            let mut spacing = Point::ZERO;
            for axis in [ChannelId::X, ChannelId::Y] {
                let (start, end, gap) =
                    self.axis_extent(axis, cube, index, options, stats, &main_dims, &mut stacks);
                let horizontal = axis == ChannelId::X;
                *position.along_mut(horizontal) = start.max(end);
                *size.along_mut(horizontal) = (end - start).abs();
                *spacing.along_mut(horizontal) = gap;
            }

            let main_id = Id::new(cube, table, &all_dims, index);
            if !seen.insert(main_id.clone()) {
                return Err(ChartError::IdentityCollision {
                    context: "generated markers",
                    id: format!("{main_id:?}"),
                });
            }

            markers.push(Marker {
                index: index.clone(),
                idx,
                position,
                size,
                spacing,
                size_factor: self.size_factor(cube, index, options, stats),
                color: self.color(cube, index, options, stats),
                enabled: FuzzyBool::TRUE,
                selected: FuzzyBool::FALSE,
                label: Interpolated::new(self.label(cube, index, options, table, &label_dims)),
                main_id: Interpolated::new(main_id),
                sub_id: Id::new(cube, table, &sub_dims, index),
                size_id: Id::new(cube, table, &size_dims, index),
                stack_id: Id::new(cube, table, &main_dims, index),
                prev_main_marker_idx: Interpolated::new(None),
                next_main_marker_idx: Interpolated::new(None),
                next_sub_marker_idx: Interpolated::new(None),
            });
        }

        link_neighbours(&mut markers);
        if self.id_offset > 0 {
            for marker in &mut markers {
                marker.set_id_offset(self.id_offset);
            }
        }

        debug!(
            "generated {} {} marker(s) from {} cell(s)",
            markers.len(),
            options.shape,
            cube.len()
        );
        Ok(markers)
    }

    /// Extent of one cell along `axis` as (start, end, spacing).
    #[allow(clippy::too_many_arguments)]
    fn axis_extent(
        &self,
        axis: ChannelId,
        cube: &DataCube,
        index: &MultiIndex,
        options: &Options,
        stats: &ChannelsStats,
        main_dims: &[ColumnIndex],
        stacks: &mut Stacks,
    ) -> (f64, f64, f64) {
        let channel = options.channels.get(axis);
        let stat = stats.get(axis);
        let extended = options.shape.is_extended();

        if let Some(measure) = channel.measure() {
            let value = cube.value(index, measure).unwrap_or(0.0);
            if !extended {
                let p = stat.normalize(value);
                return (p, p, 0.0);
            }
            let base = if axis == options.sub_axis_type() && options.is_stacked() {
                let offset = stacks
                    .entry((cube.sub_slice(index, main_dims), value < 0.0))
                    .or_insert(0.0);
                let base = *offset;
                *offset += value;
                base
            } else {
                0.0
            };
            return (stat.normalize(base), stat.normalize(base + value), 0.0);
        }

        if channel.has_dimensions() {
            let key = cube.sub_slice(index, &stat.dimensions);
            let (lo, hi) = stat.slot_span(&key).unwrap_or((0.0, 1.0));
            return if extended {
                (lo, hi, 1.0)
            } else {
                let centre = (lo + hi) / 2.0;
                (centre, centre, 1.0)
            };
        }

        if extended {
            (0.0, 1.0, 0.0)
        } else {
            (0.5, 0.5, 0.0)
        }
    }

    fn size_factor(&self, cube: &DataCube, index: &MultiIndex, options: &Options, stats: &ChannelsStats) -> f64 {
        match options.channels.get(ChannelId::Size).measure() {
            Some(measure) => {
                let value = cube.value(index, measure).unwrap_or(0.0);
                stats.get(ChannelId::Size).normalize(value).clamp(0.0, 1.0)
            }
            None => 1.0,
        }
    }

    fn color(&self, cube: &DataCube, index: &MultiIndex, options: &Options, stats: &ChannelsStats) -> Color {
        let base = match position_on(ChannelId::Color, cube, index, options, stats) {
            Some(ChannelPosition::Continuous(t)) => {
                self.config.gradient_low.lerp(&self.config.gradient_high, t)
            }
            Some(ChannelPosition::Slot(i, _)) => self.config.palette_color(i),
            None => self.config.default_color,
        };
        let shade = match position_on(ChannelId::Lightness, cube, index, options, stats) {
            Some(ChannelPosition::Continuous(t)) => t,
            Some(ChannelPosition::Slot(i, n)) if n > 1 => i as f64 / (n - 1) as f64,
            Some(ChannelPosition::Slot(..)) | None => return base,
        };
        base.lightened((shade * 2.0 - 1.0) * self.config.lightness_span)
    }

    fn label(
        &self,
        cube: &DataCube,
        index: &MultiIndex,
        options: &Options,
        table: &DataTable,
        label_dims: &[ColumnIndex],
    ) -> Label {
        let index_str = Label::index_string(table, &cube.sub_slice(index, label_dims));
        match options.channels.get(ChannelId::Label).measure() {
            Some(measure) => {
                let value = cube.value(index, measure).unwrap_or(0.0);
                let unit = match measure.aggregator() {
                    Some(AggregatorKind::Count | AggregatorKind::Distinct | AggregatorKind::Exists) => "",
                    _ => table.get_info(measure.column).map_or("", |info| info.unit()),
                };
                Label::with_value(value, measure, unit, index_str)
            }
            None => Label::without_value(index_str),
        }
    }
}

enum ChannelPosition {
    Continuous(f64),
    Slot(usize, usize),
}

/// Where a cell falls on a non-positional channel: a 0..1 measure position,
/// or a categorical slot out of a count.
fn position_on(
    channel: ChannelId,
    cube: &DataCube,
    index: &MultiIndex,
    options: &Options,
    stats: &ChannelsStats,
) -> Option<ChannelPosition> {
    let ch = options.channels.get(channel);
    let stat = stats.get(channel);
    if let Some(measure) = ch.measure() {
        let value = cube.value(index, measure).unwrap_or(0.0);
        return Some(ChannelPosition::Continuous(stat.normalize(value).clamp(0.0, 1.0)));
    }
    if ch.has_dimensions() {
        let key = cube.sub_slice(index, &stat.dimensions);
        return stat
            .slot(&key)
            .map(|i| ChannelPosition::Slot(i, stat.slot_count()));
    }
    None
}

fn without(all: &[ColumnIndex], removed: &[ColumnIndex]) -> Vec<ColumnIndex> {
    all.iter()
        .copied()
        .filter(|c| !removed.contains(c))
        .collect()
}

/// Chain markers sharing a sub id (prev/next main) and a stack id (next sub),
/// in sequence order.
fn link_neighbours(markers: &mut [Marker]) {
    let mut last_by_sub: HashMap<Id, usize> = HashMap::new();
    let mut last_by_stack: HashMap<Id, usize> = HashMap::new();
    for i in 0..markers.len() {
        if let Some(prev) = last_by_sub.insert(markers[i].sub_id.clone(), i) {
            markers[i].prev_main_marker_idx = Interpolated::new(Some(prev));
            markers[prev].next_main_marker_idx = Interpolated::new(Some(i));
        }
        if let Some(prev) = last_by_stack.insert(markers[i].stack_id.clone(), i) {
            markers[prev].next_sub_marker_idx = Interpolated::new(Some(i));
        }
    }
}
