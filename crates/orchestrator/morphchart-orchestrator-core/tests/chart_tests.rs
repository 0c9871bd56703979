use morphchart_chart_core::{
    ChannelId, ChartError, GeneratorConfig, OptionsSetter, Pairing, ShapeType,
};
use morphchart_data_core::{DataTable, TableSpec};
use morphchart_orchestrator::{Chart, ChartSpec};
use morphchart_test_fixtures::{charts, tables};

fn approx(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

fn chart(name: &str) -> Chart {
    let (spec, table): (ChartSpec, TableSpec) =
        charts::load_with_table(name).expect("chart fixture");
    let table = DataTable::from_spec(&table).expect("table fixture");
    Chart::from_spec(table, &spec, GeneratorConfig::default()).expect("chart builds")
}

fn music_without(genre: &str) -> DataTable {
    let mut spec: TableSpec = tables::load("music").unwrap();
    let keep: Vec<bool> = spec.dimensions[0].values.iter().map(|g| g != genre).collect();
    for d in &mut spec.dimensions {
        d.values = d
            .values
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(v, _)| v.clone())
            .collect();
    }
    for m in &mut spec.measures {
        m.values = m
            .values
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(v, _)| *v)
            .collect();
    }
    DataTable::from_spec(&spec).unwrap()
}

#[test]
fn every_fixture_chart_generates() {
    for name in charts::keys() {
        let chart = chart(&name);
        assert!(!chart.markers().is_empty(), "{name} has no markers");
        for marker in chart.markers() {
            assert!(marker.position.is_finite(), "{name}: {:?}", marker.position);
            assert!(marker.size.is_finite(), "{name}: {:?}", marker.size);
        }
    }
}

#[test]
fn from_json_matches_fixture_loading() {
    let json = Chart::from_json(
        &tables::json("music").unwrap(),
        &charts::json("bar-by-genre").unwrap(),
    )
    .unwrap();
    let loaded = chart("bar-by-genre");
    assert_eq!(json.markers(), loaded.markers());
    assert_eq!(json.options(), loaded.options());
}

#[test]
fn percent_range_leaves_headroom() {
    let chart = chart("stacked-years");
    // tallest stack is 2002 at 24, the axis max is 110% of that
    let top = chart
        .markers()
        .iter()
        .map(|m| m.position.y)
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(approx(top, 24.0 / 26.4, 1e-12));
}

#[test]
fn adding_a_dimension_animates_in_two_legs() {
    let mut chart = chart("bar-by-genre");
    let before: Vec<_> = chart.markers().iter().map(|m| m.position).collect();
    let year = chart.table().series("Year").unwrap();

    let animation = chart
        .edit(|s| s.add_series(ChannelId::X, year, None))
        .unwrap();
    assert_eq!(animation.leg_count(), 2);
    assert!(chart.options().channels.get(ChannelId::X).is_series_used(year));
    assert!(!chart.options().channels.get(ChannelId::Y).is_series_used(year));
    assert_eq!(chart.markers().len(), 8);
    assert_eq!(animation.final_markers(), chart.markers());

    for leg in animation.legs() {
        assert!(leg
            .transition
            .pairs()
            .iter()
            .all(|p| matches!(p, Pairing::Morph { .. })));
    }

    // every new marker starts out from one of the old bars
    let start = animation.sample(0.0);
    assert_eq!(start.len(), 8);
    for marker in &start {
        assert!(before.contains(&marker.position));
    }
}

#[test]
fn rejected_edit_keeps_published_state() {
    let mut chart = chart("bar-by-genre");
    let options = chart.options().clone();
    let markers = chart.markers().to_vec();
    let min_sales = chart.table().series("min(Sales)").unwrap();

    let err = chart
        .edit(|s| s.add_series(ChannelId::Y, min_sales, None))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChartError>(),
        Some(ChartError::ChannelMeasureOccupied { .. })
    ));
    assert_eq!(chart.options(), &options);
    assert_eq!(chart.markers(), markers.as_slice());

    assert!(chart.apply_path("channels.depth.set", "Genre").is_err());
    assert_eq!(chart.options(), &options);
}

#[test]
fn shape_change_is_a_single_leg() {
    let mut chart = chart("line-trend");
    let animation = chart.edit(|s| s.set_shape(ShapeType::Area)).unwrap();
    assert_eq!(animation.leg_count(), 1);
    assert_eq!(chart.options().shape, ShapeType::Area);
    let mid = animation.sample(0.5);
    assert_eq!(mid.len(), chart.markers().len());
    assert!(mid.iter().all(|m| m.enabled.full()));
}

#[test]
fn option_paths_animate() {
    let mut chart = chart("bar-by-genre");
    let animation = chart.apply_path("geometry", "circle").unwrap();
    assert_eq!(animation.leg_count(), 1);
    assert_eq!(chart.options().shape, ShapeType::Circle);
    assert_eq!(chart.markers().len(), 3);
}

#[test]
fn filtered_table_fades_the_missing_category() {
    let mut chart = chart("bar-by-genre");
    let animation = chart.set_table(music_without("Jazz")).unwrap();
    assert_eq!(animation.leg_count(), 1);
    assert_eq!(animation.sample(0.5).len(), 3);
    assert_eq!(animation.final_markers().len(), 2);
    assert_eq!(chart.markers().len(), 2);

    let fading: Vec<_> = animation
        .sample(0.5)
        .into_iter()
        .filter(|m| !m.enabled.full())
        .collect();
    assert_eq!(fading.len(), 1);
    assert!(approx(fading[0].enabled.weight(), 0.5, 1e-12));
}

#[test]
fn filtering_the_first_category_keeps_pairs_on_their_labels() {
    let mut chart = Chart::from_json(
        &tables::json("music").unwrap(),
        r#"{ "geometry": "rectangle",
             "channels": { "x": ["Genre"], "y": ["Sales"], "label": ["Genre"] } }"#,
    )
    .unwrap();
    let animation = chart.set_table(music_without("Pop")).unwrap();
    assert_eq!(animation.leg_count(), 1);
    let transition = &animation.legs()[0].transition;

    let mut morphs = 0;
    for pairing in transition.pairs() {
        match *pairing {
            Pairing::Morph { from, to, .. } => {
                morphs += 1;
                assert_eq!(
                    transition.source()[from].label.dominant().index_str,
                    transition.target()[to].label.dominant().index_str
                );
            }
            Pairing::Vanish { from } => {
                assert_eq!(transition.source()[from].label.dominant().index_str, "Genre: Pop");
            }
            Pairing::Materialize { to } => panic!("unexpected new marker {to}"),
        }
    }
    assert_eq!(morphs, 2);
    let labels: Vec<_> = chart
        .markers()
        .iter()
        .map(|m| m.label.dominant().index_str.clone())
        .collect();
    assert_eq!(labels, ["Genre: Rock", "Genre: Jazz"]);
}

#[test]
fn split_path_is_ignored_outside_areas() {
    let mut chart = chart("stacked-years");
    let markers = chart.markers().to_vec();
    chart.apply_path("split", "true").unwrap();
    assert!(!chart.options().split);
    assert!(chart.options().is_stacked());
    assert_eq!(chart.markers(), markers.as_slice());

    let mut chart = chart_with_area_split();
    assert!(chart.options().split);
    chart.apply_path("geometry", "rectangle").unwrap();
    assert_eq!(chart.options().shape, ShapeType::Rectangle);
    assert!(!chart.options().split);
}

fn chart_with_area_split() -> Chart {
    let mut chart = chart("stacked-years");
    chart.apply_path("geometry", "area").unwrap();
    chart.apply_path("split", "true").unwrap();
    chart
}

#[test]
fn channel_paths_are_staged_like_edits() {
    let mut chart = chart("bar-by-genre");
    let animation = chart.apply_path("channels.x.set", "Genre, Year").unwrap();
    assert_eq!(animation.leg_count(), 2);
    let year = chart.table().series("Year").unwrap();
    assert!(chart.options().channels.get(ChannelId::X).is_series_used(year));
    assert!(!chart.options().channels.get(ChannelId::Y).is_series_used(year));
    for leg in animation.legs() {
        assert!(leg
            .transition
            .pairs()
            .iter()
            .all(|p| matches!(p, Pairing::Morph { .. })));
    }
}
