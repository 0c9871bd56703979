//! Dotted-path option writes, expressed as [`OptionsSetter`] calls.
//!
//! Recognized paths: `geometry`, `orientation`, `split`,
//! `channels.<id>.set` (comma separated series references, empty clears) and
//! `channels.<id>.range.min|max`. Routed through an [`AutoSplitter`], path
//! writes get the same staging and split policy as direct edits.
//!
//! [`AutoSplitter`]: crate::AutoSplitter

use morphchart_data_core::{DataTable, SeriesIndex};

use crate::channel::{ChannelExtrema, ChannelId};
use crate::error::ChartError;
use crate::setter::OptionsSetter;

pub fn set_path<S: OptionsSetter>(
    setter: &mut S,
    table: &DataTable,
    path: &str,
    value: &str,
) -> Result<(), ChartError> {
    let invalid = || ChartError::InvalidValue {
        path: path.to_string(),
        value: value.to_string(),
    };
    let parts: Vec<&str> = path.split('.').collect();
    match parts.as_slice() {
        ["geometry"] => setter.set_shape(value.parse()?),
        ["orientation"] => {
            setter.set_orientation(value.parse()?);
            Ok(())
        }
        ["split"] => {
            setter.set_splitted(value.parse::<bool>().map_err(|_| invalid())?);
            Ok(())
        }
        ["channels", id, "set"] => {
            let channel: ChannelId = id.parse()?;
            let wanted = value
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(|r| table.series(r))
                .collect::<Result<Vec<SeriesIndex>, _>>()?;
            set_channel(setter, channel, &wanted)
        }
        ["channels", id, "range", end @ ("min" | "max")] => {
            let channel: ChannelId = id.parse()?;
            let extrema: ChannelExtrema = value.parse().map_err(|_| invalid())?;
            let mut range = setter.options().channels.get(channel).range;
            if *end == "min" {
                range.min = extrema;
            } else {
                range.max = extrema;
            }
            setter.set_range(channel, range);
            Ok(())
        }
        _ => Err(ChartError::InvalidPath {
            path: path.to_string(),
        }),
    }
}

/// Replace the series on `channel` with `wanted`: absent ones are deleted,
/// new ones appended. The whole change is checked on a copy first, so a
/// rejected list forwards nothing.
fn set_channel<S: OptionsSetter>(
    setter: &mut S,
    channel: ChannelId,
    wanted: &[SeriesIndex],
) -> Result<(), ChartError> {
    let current = setter.options().channels.get(channel).series.clone();
    let removed: Vec<SeriesIndex> = current
        .iter()
        .copied()
        .filter(|s| !wanted.contains(s))
        .collect();
    let added: Vec<SeriesIndex> = wanted
        .iter()
        .copied()
        .filter(|s| !current.contains(s))
        .collect();

    let mut check = setter.options().clone();
    for &series in &removed {
        check.delete_series(channel, series)?;
    }
    for &series in &added {
        check.add_series(channel, series, None)?;
    }

    for &series in &removed {
        setter.delete_series(channel, series)?;
    }
    for &series in &added {
        setter.add_series(channel, series, None)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autosplitter::AutoSplitter;
    use crate::options::{Options, Orientation, ShapeType};
    use crate::setter::KeyframeRecorder;

    fn table() -> DataTable {
        let mut t = DataTable::new();
        t.add_dimension("Genre", &["Pop", "Rock"]).unwrap();
        t.add_dimension("Year", &["2001", "2002"]).unwrap();
        t.add_measure("Sales", "", &[1.0, 2.0]).unwrap();
        t.add_measure("Rating", "", &[3.0, 4.0]).unwrap();
        t
    }

    /// Apply `writes` through a splitter and return every keyframe.
    fn apply(start: Options, writes: &[(&str, &str)]) -> Result<Vec<Options>, ChartError> {
        let t = table();
        let mut rec = KeyframeRecorder::new(start);
        {
            let mut splitter = AutoSplitter::new(&mut rec);
            for &(path, value) in writes {
                set_path(&mut splitter, &t, path, value)?;
            }
        }
        Ok(rec.into_keyframes())
    }

    fn last(frames: Vec<Options>) -> Options {
        frames.into_iter().last().unwrap()
    }

    #[test]
    fn known_paths_are_applied() {
        let o = last(
            apply(
                Options::default(),
                &[
                    ("geometry", "line"),
                    ("orientation", "vertical"),
                    ("channels.x.set", "Genre, max(Sales)"),
                    ("channels.x.range.max", "110%"),
                ],
            )
            .unwrap(),
        );
        assert_eq!(o.shape, ShapeType::Line);
        assert_eq!(o.orientation, Orientation::Vertical);
        assert_eq!(o.channels.get(ChannelId::X).series.len(), 2);
        assert_eq!(
            o.channels.get(ChannelId::X).range.max,
            ChannelExtrema::Percent(110.0)
        );
        assert_eq!(o.channels.get(ChannelId::X).range.min, ChannelExtrema::Auto);
    }

    #[test]
    fn split_only_sticks_for_areas() {
        for shape in [ShapeType::Rectangle, ShapeType::Circle, ShapeType::Line] {
            let o = last(apply(Options::new(shape), &[("split", "true")]).unwrap());
            assert!(!o.split, "{shape}");
            let writes = [("split", "true"), ("geometry", shape.name())];
            let o = last(apply(Options::new(ShapeType::Area), &writes).unwrap());
            assert!(!o.split, "area -> {shape}");
        }
        let o = last(apply(Options::new(ShapeType::Area), &[("split", "true")]).unwrap());
        assert!(o.split);
    }

    #[test]
    fn dimension_swaps_are_staged() {
        let t = table();
        let mut start = Options::default();
        start.add_series(ChannelId::X, t.series("Genre").unwrap(), None).unwrap();
        start.add_series(ChannelId::Y, t.series("Sales").unwrap(), None).unwrap();

        let frames = apply(start, &[("channels.x.set", "Year")]).unwrap();
        // delete Genre and add Year both go through the sub axis
        assert!(frames.len() > 1);
        let o = frames.last().unwrap();
        let x = o.channels.get(ChannelId::X);
        assert_eq!(x.series, vec![t.series("Year").unwrap()]);
        assert_eq!(o.channels.get(ChannelId::Y).series, vec![t.series("Sales").unwrap()]);
    }

    #[test]
    fn rejected_writes_are_reported() {
        assert!(matches!(
            apply(Options::default(), &[("channels.x.set", "Genre, Sales, Rating")]),
            Err(ChartError::ChannelMeasureOccupied { .. })
        ));
        assert!(matches!(
            apply(Options::default(), &[("channels.depth.set", "Genre")]),
            Err(ChartError::UnknownChannel { .. })
        ));
        assert!(matches!(
            apply(Options::default(), &[("legend", "x")]),
            Err(ChartError::InvalidPath { .. })
        ));
        assert!(matches!(
            apply(Options::default(), &[("split", "maybe")]),
            Err(ChartError::InvalidValue { .. })
        ));
        let cleared = last(
            apply(Options::default(), &[("channels.x.set", "Genre"), ("channels.x.set", "")]).unwrap(),
        );
        assert!(cleared.channels.get(ChannelId::X).is_empty());
    }
}
