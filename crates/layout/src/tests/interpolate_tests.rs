use super::*;

fn table(pairs: &[(f64, f64)]) -> Vec<Breakpoint> {
    pairs
        .iter()
        .map(|&(width, value)| Breakpoint::new(width, value))
        .collect()
}

#[test]
fn clamps_below_first_and_above_last_breakpoint() {
    let points = table(&[(320.0, 100.0), (768.0, 200.0), (1280.0, 260.0)]);
    for width in [0.0, 100.0, 319.9, 320.0] {
        assert_eq!(interpolate(&points, width), Ok(100.0));
    }
    for width in [1280.0, 1280.5, 4000.0] {
        assert_eq!(interpolate(&points, width), Ok(260.0));
    }
}

#[test]
fn exact_breakpoints_return_stored_values() {
    let points = table(&[(320.0, 0.1), (555.5, 0.7), (768.0, 0.3), (1280.0, 123.456)]);
    for point in &points {
        assert_eq!(interpolate(&points, point.width), Ok(point.value));
    }
}

#[test]
fn linear_between_adjacent_pair() {
    let points = table(&[(0.0, 0.0), (100.0, 50.0), (200.0, 250.0)]);
    assert_eq!(interpolate(&points, 50.0), Ok(25.0));
    assert_eq!(interpolate(&points, 150.0), Ok(150.0));
}

#[test]
fn single_entry_table_is_constant() {
    let points = table(&[(768.0, 42.0)]);
    for width in [0.0, 768.0, 10_000.0] {
        assert_eq!(interpolate(&points, width), Ok(42.0));
    }
}

#[test]
fn monotonic_tables_give_monotonic_values() {
    let rising = BreakpointTable::from_pairs(&[(320.0, 10.0), (640.0, 80.0), (1920.0, 90.0)])
        .expect("table");
    let falling = BreakpointTable::from_pairs(&[(320.0, 90.0), (1024.0, 40.0), (1920.0, 5.0)])
        .expect("table");

    let mut previous_rising = f64::MIN;
    let mut previous_falling = f64::MAX;
    for width in (0..2200).step_by(7).map(f64::from) {
        let r = rising.value_at(width);
        let f = falling.value_at(width);
        assert!(r >= previous_rising, "rising table dipped at {width}");
        assert!(f <= previous_falling, "falling table rose at {width}");
        previous_rising = r;
        previous_falling = f;
    }
}

#[test]
fn non_finite_widths_clamp_to_table_ends() {
    let table = BreakpointTable::from_pairs(&[(320.0, 1.0), (1280.0, 9.0)]).expect("table");
    assert_eq!(table.value_at(f64::NAN), 1.0);
    assert_eq!(table.value_at(f64::NEG_INFINITY), 1.0);
    assert_eq!(table.value_at(f64::INFINITY), 9.0);
}

#[test]
fn rejects_empty_table() {
    let err = interpolate(&[], 500.0).expect_err("empty table");
    assert!(matches!(err, LayoutError::InvalidConfiguration(_)));
}

#[test]
fn rejects_unsorted_or_duplicate_widths() {
    for pairs in [
        &[(320.0, 1.0), (320.0, 2.0)][..],
        &[(768.0, 1.0), (320.0, 2.0)][..],
    ] {
        let err = BreakpointTable::from_pairs(pairs).expect_err("not increasing");
        assert!(matches!(err, LayoutError::InvalidConfiguration(_)));
    }
}

#[test]
fn rejects_non_finite_points() {
    let err = BreakpointTable::from_pairs(&[(320.0, f64::NAN)]).expect_err("nan value");
    assert!(matches!(err, LayoutError::InvalidConfiguration(_)));
}

#[test]
fn deserializes_from_pair_arrays() {
    let table: BreakpointTable = serde_json::from_str("[[320, 10], [768, 20.5]]").expect("json");
    assert_eq!(table.points()[1], Breakpoint::new(768.0, 20.5));

    let err = serde_json::from_str::<BreakpointTable>("[[768, 10], [320, 20]]");
    assert!(err.is_err());
}
