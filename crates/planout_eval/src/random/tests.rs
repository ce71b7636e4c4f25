use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_known_buckets() {
    // Reference values: first 15 hex digits of SHA-256 over the joined string.
    let source = RandomSource::new("s1", "x");
    assert_eq!(
        source.bucket(&[Value::from("42")], None),
        335_205_529_610_024_669
    );

    let source = RandomSource::new("exp", "p");
    assert_eq!(
        source.bucket(&[Value::from(7)], None),
        125_019_329_540_518_780
    );
    assert_eq!(
        source.bucket(&[Value::from("a"), Value::from("b")], None),
        503_131_664_397_010_946
    );
    assert_eq!(
        source.bucket(&[Value::from(7)], Some(&Value::from(3))),
        5_866_740_066_709_844
    );
}

#[test]
fn test_known_draw() {
    let source = RandomSource::new("s1", "x");
    let draw = source.draw(&[Value::from("42")], None);
    assert!((draw - 0.290_744_450_745_874_24).abs() < 1e-12);
}

#[test]
fn test_string_and_number_units_agree() {
    let source = RandomSource::new("exp", "p");
    assert_eq!(
        source.bucket(&[Value::from("7")], None),
        source.bucket(&[Value::from(7)], None)
    );
}

#[test]
fn test_full_salt_replaces_experiment_salt() {
    let shared = RandomSource::with_full_salt("exp.p");
    let scoped = RandomSource::new("exp", "p");
    assert_eq!(shared, scoped);
    assert_eq!(shared.full_salt(), "exp.p");
}

#[test]
fn test_unit_values() {
    assert_eq!(unit_values(Value::from(1)), vec![Value::from(1)]);
    assert_eq!(
        unit_values(Value::seq(vec![Value::from(1), Value::from("a")])),
        vec![Value::from(1), Value::from("a")]
    );
}

#[test]
fn test_salts_decorrelate() {
    let a = RandomSource::new("exp", "first");
    let b = RandomSource::new("exp", "second");
    let differing = (0..200)
        .filter(|i| {
            let unit = [Value::from(*i)];
            (a.draw(&unit, None) < 0.5) != (b.draw(&unit, None) < 0.5)
        })
        .count();
    // Independent fair coins disagree about half the time.
    assert!((60..140).contains(&differing), "differing = {differing}");
}

proptest! {
    #[test]
    fn prop_draw_is_pure_and_in_range(salt in "[a-z]{1,8}", unit in any::<u32>()) {
        let source = RandomSource::new("exp", &salt);
        let units = [Value::from(unit)];
        let first = source.draw(&units, None);
        let second = RandomSource::new("exp", &salt).draw(&units, None);
        prop_assert_eq!(first.to_bits(), second.to_bits());
        prop_assert!((0.0..1.0).contains(&first));
    }

    #[test]
    fn prop_uniform_within_bounds(min in -1e3_f64..1e3, span in 0.0_f64..1e3, unit in ".*") {
        let source = RandomSource::new("exp", "p");
        let value = source.uniform(min, min + span, &[Value::from(unit)], None);
        prop_assert!(value >= min);
        prop_assert!(value <= min + span);
    }
}
