//! Markers: one visual datum per cube cell, with the identities used to pair
//! markers across generations.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use morphchart_anim_core::{lerp_f64, step, Color, FuzzyBool, Interpolated, Lerp, Point, Rect};
use morphchart_data_core::{ColumnIndex, DataCube, DataTable, MultiIndex, SeriesIndex, SubSliceIndex};
use serde::{Deserialize, Serialize};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Identity of a marker under one grouping (a set of dimension columns).
///
/// Two generations produce equal ids for the same combination of categories
/// over the same column set, whatever other dimensions, channel placement or
/// row filtering are in play. Equality, ordering and hashing look at
/// `series_id` and `item_id` only; `item_slice_index` holds positional
/// category indices that shift when a table drops a category.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Id {
    /// Fingerprint of the grouping column set.
    pub series_id: u64,
    pub item_slice_index: SubSliceIndex,
    /// Fingerprint of the category labels along the slice.
    pub item_id: u64,
}

fn fnv(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

impl Id {
    pub fn new(cube: &DataCube, table: &DataTable, dims: &[ColumnIndex], index: &MultiIndex) -> Self {
        let slice = cube.sub_slice(index, dims);
        let mut series_id = FNV_OFFSET;
        let mut item_id = FNV_OFFSET;
        for s in slice.iter() {
            series_id = fnv(series_id, &(s.column.0 as u64).to_le_bytes());
            item_id = match table.get_info(s.column).and_then(|i| i.category_label(s.value)) {
                Some(label) => fnv(item_id, label.as_bytes()),
                None => fnv(item_id, &(s.value as u64).to_le_bytes()),
            };
            // 0xff never occurs in UTF-8, so label boundaries stay unambiguous
            item_id = fnv(item_id, &[0xff]);
        }
        Self {
            series_id,
            item_slice_index: slice,
            item_id,
        }
    }

    fn key(&self) -> (u64, u64) {
        (self.series_id, self.item_id)
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Label content of a marker. Without a measure on the label channel only
/// the index string is shown.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub value: f64,
    pub measure: Option<SeriesIndex>,
    pub unit: String,
    /// `Name: Category` pairs of the label channel's dimensions.
    pub index_str: String,
}

impl Label {
    pub fn with_value(value: f64, measure: SeriesIndex, unit: &str, index_str: String) -> Self {
        Self {
            value,
            measure: Some(measure),
            unit: unit.to_string(),
            index_str,
        }
    }

    pub fn without_value(index_str: String) -> Self {
        Self {
            index_str,
            ..Self::default()
        }
    }

    pub fn has_value(&self) -> bool {
        self.measure.is_some()
    }

    /// Index string of `slice`, e.g. `Genre: Pop, Year: 2001`.
    pub fn index_string(table: &DataTable, slice: &SubSliceIndex) -> String {
        slice
            .iter()
            .filter_map(|s| {
                let info = table.get_info(s.column)?;
                Some(format!("{}: {}", info.name(), info.category_label(s.value)?))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Display text: the value (with unit) and the index string, one per line.
    pub fn text(&self, precision: usize) -> String {
        let mut parts = Vec::with_capacity(2);
        if self.has_value() {
            let mut value = format!("{:.*}", precision, self.value);
            if !self.unit.is_empty() {
                value.push(' ');
                value.push_str(&self.unit);
            }
            parts.push(value);
        }
        if !self.index_str.is_empty() {
            parts.push(self.index_str.clone());
        }
        parts.join("\n")
    }
}

/// One visual datum in normalized 0..1 layout space.
///
/// `position` is the far corner of the marker's extent and `size` the extent
/// itself, so the covered rectangle is `position - size .. position`. Points
/// (circles, lines) have zero size along categorical axes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub index: MultiIndex,
    pub idx: usize,
    pub position: Point,
    pub size: Point,
    pub spacing: Point,
    pub size_factor: f64,
    pub color: Color,
    pub enabled: FuzzyBool,
    pub selected: FuzzyBool,
    pub label: Interpolated<Label>,
    pub main_id: Interpolated<Id>,
    pub sub_id: Id,
    pub size_id: Id,
    pub stack_id: Id,
    pub prev_main_marker_idx: Interpolated<Option<usize>>,
    pub next_main_marker_idx: Interpolated<Option<usize>>,
    pub next_sub_marker_idx: Interpolated<Option<usize>>,
}

impl Marker {
    pub fn to_rectangle(&self) -> Rect {
        Rect::new(self.position - self.size, self.size)
    }

    pub fn from_rectangle(&mut self, rect: Rect) {
        self.position = rect.top_right();
        self.size = rect.size;
    }

    /// Shift this marker's index and neighbour references by `offset`.
    pub fn set_id_offset(&mut self, offset: usize) {
        self.idx += offset;
        let shift = |i: &Option<usize>| i.map(|i| i + offset);
        self.prev_main_marker_idx = self.prev_main_marker_idx.map(shift);
        self.next_main_marker_idx = self.next_main_marker_idx.map(shift);
        self.next_sub_marker_idx = self.next_sub_marker_idx.map(shift);
    }

    /// Blend two markers. Geometry, color and weights are linear; label,
    /// identity and neighbour references become weighted states. Index and
    /// secondary ids step at the midpoint.
    pub fn interpolate(a: &Marker, b: &Marker, factor: f64) -> Marker {
        Marker {
            index: step(&a.index, &b.index, factor).clone(),
            idx: *step(&a.idx, &b.idx, factor),
            position: a.position.lerp(&b.position, factor),
            size: a.size.lerp(&b.size, factor),
            spacing: a.spacing.lerp(&b.spacing, factor),
            size_factor: lerp_f64(a.size_factor, b.size_factor, factor),
            color: a.color.lerp(&b.color, factor),
            enabled: a.enabled.lerp(&b.enabled, factor),
            selected: a.selected.lerp(&b.selected, factor),
            label: Interpolated::interpolate(&a.label, &b.label, factor),
            main_id: Interpolated::interpolate(&a.main_id, &b.main_id, factor),
            sub_id: step(&a.sub_id, &b.sub_id, factor).clone(),
            size_id: step(&a.size_id, &b.size_id, factor).clone(),
            stack_id: step(&a.stack_id, &b.stack_id, factor).clone(),
            prev_main_marker_idx: Interpolated::interpolate(
                &a.prev_main_marker_idx,
                &b.prev_main_marker_idx,
                factor,
            ),
            next_main_marker_idx: Interpolated::interpolate(
                &a.next_main_marker_idx,
                &b.next_main_marker_idx,
                factor,
            ),
            next_sub_marker_idx: Interpolated::interpolate(
                &a.next_sub_marker_idx,
                &b.next_sub_marker_idx,
                factor,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morphchart_data_core::AggregatorKind;

    fn table() -> DataTable {
        let mut t = DataTable::new();
        t.add_dimension("Genre", &["Pop", "Rock", "Jazz"]).unwrap();
        t.add_dimension("Year", &["2001", "2002", "2001"]).unwrap();
        t.add_measure("Sales", "k", &[1.0, 2.0, 3.0]).unwrap();
        t
    }

    #[test]
    fn ids_do_not_depend_on_other_dimensions() {
        let t = table();
        let genre = t.column("Genre").unwrap();
        let year = t.column("Year").unwrap();
        let narrow = DataCube::build(&t, &[genre], &[]).unwrap();
        let wide = DataCube::build(&t, &[genre, year], &[]).unwrap();

        // Rock alone vs Rock/2002
        let a = Id::new(&narrow, &t, &[genre], &MultiIndex(vec![1]));
        let b = Id::new(&wide, &t, &[genre], &MultiIndex(vec![1, 1]));
        assert_eq!(a, b);
        let c = Id::new(&wide, &t, &[genre, year], &MultiIndex(vec![1, 1]));
        assert_ne!(a.series_id, c.series_id);
        assert_ne!(a.item_id, c.item_id);
    }

    #[test]
    fn ids_follow_labels_not_category_positions() {
        let t = table();
        let mut filtered = DataTable::new();
        filtered.add_dimension("Genre", &["Rock", "Jazz"]).unwrap();
        filtered.add_dimension("Year", &["2002", "2001"]).unwrap();
        filtered.add_measure("Sales", "k", &[2.0, 3.0]).unwrap();

        let genre = t.column("Genre").unwrap();
        let year = t.column("Year").unwrap();
        let full = DataCube::build(&t, &[genre, year], &[]).unwrap();
        let part = DataCube::build(&filtered, &[genre, year], &[]).unwrap();

        // Rock/2002 sits at (1, 1) in the full table and at (0, 0) once Pop is gone
        let before = Id::new(&full, &t, &[genre, year], &MultiIndex(vec![1, 1]));
        let after = Id::new(&part, &filtered, &[genre, year], &MultiIndex(vec![0, 0]));
        assert_eq!(before, after);
        assert_ne!(before.item_slice_index, after.item_slice_index);

        // Pop/2001 must not be taken over by whatever now sits at (0, 0)
        let pop = Id::new(&full, &t, &[genre, year], &MultiIndex(vec![0, 0]));
        assert_ne!(pop, after);

        // an extra category does not disturb existing ids
        let mut wider = DataTable::new();
        wider.add_dimension("Genre", &["Pop", "Rock", "Jazz", "Soul"]).unwrap();
        wider.add_dimension("Year", &["2001", "2002", "2001", "2003"]).unwrap();
        wider.add_measure("Sales", "k", &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let cube = DataCube::build(&wider, &[genre, year], &[]).unwrap();
        let rock = Id::new(&cube, &wider, &[genre, year], &MultiIndex(vec![1, 1]));
        assert_eq!(before, rock);
    }

    #[test]
    fn label_text_and_index_string() {
        let t = table();
        let genre = t.column("Genre").unwrap();
        let year = t.column("Year").unwrap();
        let cube = DataCube::build(&t, &[genre, year], &[]).unwrap();
        let slice = cube.slice(&MultiIndex(vec![0, 0]));
        let index = Label::index_string(&t, &slice);
        assert_eq!(index, "Genre: Pop, Year: 2001");

        let sales = SeriesIndex::measure(t.column("Sales").unwrap(), AggregatorKind::Sum);
        let label = Label::with_value(1234.5, sales, "k", index.clone());
        assert!(label.has_value());
        assert_eq!(label.text(2), "1234.50 k\nGenre: Pop, Year: 2001");
        let bare = Label::without_value(index);
        assert!(!bare.has_value());
        assert_eq!(bare.text(2), "Genre: Pop, Year: 2001");
    }

    fn marker(x: f64, id: u64) -> Marker {
        Marker {
            index: MultiIndex(vec![id as usize]),
            idx: id as usize,
            position: Point::new(x, 1.0),
            size: Point::new(0.5, 1.0),
            spacing: Point::ZERO,
            size_factor: 1.0,
            color: Color::rgb(x, 0.0, 0.0),
            enabled: FuzzyBool::TRUE,
            selected: FuzzyBool::FALSE,
            label: Interpolated::new(Label::without_value(format!("m{id}"))),
            main_id: Interpolated::new(Id {
                item_id: id,
                ..Id::default()
            }),
            sub_id: Id::default(),
            size_id: Id::default(),
            stack_id: Id::default(),
            prev_main_marker_idx: Interpolated::new(None),
            next_main_marker_idx: Interpolated::new(Some(id as usize + 1)),
            next_sub_marker_idx: Interpolated::new(None),
        }
    }

    #[test]
    fn interpolation_endpoints_are_exact() {
        let a = marker(0.5, 0);
        let b = marker(1.0, 1);
        assert_eq!(Marker::interpolate(&a, &b, 0.0), a);
        assert_eq!(Marker::interpolate(&a, &b, 1.0), b);
        let mid = Marker::interpolate(&a, &b, 0.5);
        assert_eq!(mid.position.x, 0.75);
        assert_eq!(mid.main_id.count(), 2);
        assert_eq!(mid.label.count(), 2);
    }

    #[test]
    fn rectangle_round_trip_and_offset() {
        let mut m = marker(0.5, 0);
        let rect = m.to_rectangle();
        assert_eq!(rect.pos, Point::new(0.0, 0.0));
        m.from_rectangle(Rect::new(Point::new(0.1, 0.0), Point::new(0.2, 0.5)));
        assert_eq!(m.position, Point::new(0.1 + 0.2, 0.5));
        m.set_id_offset(10);
        assert_eq!(m.idx, 10);
        assert_eq!(m.next_main_marker_idx.settled(), Some(&Some(11)));
    }
}
