use morphchart_anim_core::{Color, FuzzyBool, Interpolated, Lerp, Point, Rect};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn assert_endpoints<T>(prev: T, next: T)
where
    T: Clone + PartialEq + std::fmt::Debug,
{
    let at0 = Interpolated::between(prev.clone(), next.clone(), 0.0);
    let at1 = Interpolated::between(prev.clone(), next.clone(), 1.0);
    assert_eq!(at0.settled(), Some(&prev));
    assert_eq!(at1.settled(), Some(&next));
    let mid = Interpolated::between(prev.clone(), next.clone(), 0.5);
    if prev != next {
        assert_eq!(mid.count(), 2);
        assert_eq!(mid.get(0).map(|s| s.value), Some(&prev));
        assert_eq!(mid.get(1).map(|s| s.value), Some(&next));
    }
}

#[test]
fn endpoints_are_exact_for_every_value_kind() {
    assert_endpoints(0.1_f64, 0.7);
    assert_endpoints(Color::rgb(0.2, 0.4, 0.6), Color::rgba(1.0, 0.0, 0.5, 0.5));
    assert_endpoints(Point::new(0.25, 0.5), Point::new(1.0, 0.0));
    assert_endpoints(
        Rect::new(Point::new(0.0, 0.0), Point::new(0.5, 0.5)),
        Rect::new(Point::new(0.1, 0.2), Point::new(0.3, 0.9)),
    );
    assert_endpoints("Pop".to_string(), "Rock".to_string());
    assert_endpoints(FuzzyBool::TRUE, FuzzyBool::FALSE);
    assert_endpoints(Some(3_usize), None);
}

#[test]
fn combine_blends_linear_values() {
    let c = Interpolated::between(Color::rgb(0.0, 0.0, 0.0), Color::rgb(1.0, 0.5, 0.0), 0.5)
        .combine();
    approx(c.r, 0.5, 1e-12);
    approx(c.g, 0.25, 1e-12);

    let p = Interpolated::between(Point::new(0.0, 1.0), Point::new(1.0, 0.0), 0.25).combine();
    approx(p.x, 0.25, 1e-12);
    approx(p.y, 0.75, 1e-12);

    let w = Interpolated::between(FuzzyBool::TRUE, FuzzyBool::FALSE, 0.75).combine();
    approx(w.weight(), 0.25, 1e-12);
    assert_eq!(0.2_f64.lerp(&0.4, 1.0), 0.4);
}

#[test]
fn text_crossfade_visits_each_state() {
    let label = Interpolated::between("12 k".to_string(), "14 k".to_string(), 0.3);
    let mut seen = Vec::new();
    label.visit(|i, state| seen.push((i, state.value.clone(), state.weight)));
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].1, "12 k");
    approx(seen[0].2, 0.7, 1e-12);
    approx(seen[1].2, 0.3, 1e-12);
    assert_eq!(label.dominant(), "12 k");
}

#[test]
fn composing_staged_legs_yields_multi_state_value() {
    // second leg starts while the first is still in flight
    let first = Interpolated::between("a".to_string(), "b".to_string(), 0.5);
    let second = Interpolated::between("b".to_string(), "c".to_string(), 0.5);
    let composed = Interpolated::interpolate(&first, &second, 0.5);
    assert_eq!(composed.count(), 3);
    approx(composed.weight_of(&"a".to_string()), 0.25, 1e-12);
    approx(composed.weight_of(&"b".to_string()), 0.5, 1e-12);
    approx(composed.weight_of(&"c".to_string()), 0.25, 1e-12);
    let total: f64 = composed.iter().map(|s| s.weight).sum();
    approx(total, 1.0, 1e-12);
}
