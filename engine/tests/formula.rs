use chronicle_engine::{DamageFormula, FormulaError};
use proptest::prelude::*;

#[test]
fn bare_dsy_means_one_die() {
    let f = DamageFormula::parse("0+DSY").unwrap();
    assert_eq!(f, DamageFormula { base: 0, die_count: 1 });
}

#[test]
fn explicit_die_count() {
    let f: DamageFormula = "3+2DSY".parse().unwrap();
    assert_eq!(f.base, 3);
    assert_eq!(f.die_count, 2);
}

#[test]
fn rejects_malformed_strings() {
    for bad in ["3+2", "3+2D6", "-1+DSY", "3+DSYX", "X+DSY", "3-2DSY", "DSY", "3+2DSY+1"] {
        assert!(
            matches!(DamageFormula::parse(bad), Err(FormulaError::InvalidFormat(_))),
            "{bad} should be rejected"
        );
    }
    assert_eq!(DamageFormula::parse("   "), Err(FormulaError::Empty));
}

#[test]
fn error_message_shows_expected_shape() {
    let err = DamageFormula::parse("2d6").unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @r#"damage must be in the format "X+DSY" or "X+2DSY" (e.g. 1+DSY, 0+2DSY), got "2d6""#
    );
}

#[test]
fn display_drops_single_die_count() {
    let one = DamageFormula { base: 1, die_count: 1 };
    let many = DamageFormula { base: 3, die_count: 4 };
    insta::assert_snapshot!(format!("{one} / {many}"), @"1+DSY / 3+4DSY");
}

proptest! {
    #[test]
    fn numeric_values_round_trip(base in 0u32..10_000, count in 1u32..100) {
        let text = format!("{base}+{count}DSY");
        let f = DamageFormula::parse(&text).unwrap();
        prop_assert_eq!(f.base, base);
        prop_assert_eq!(f.die_count, count);
        prop_assert_eq!(DamageFormula::parse(&f.to_string()).unwrap(), f);
    }

    #[test]
    fn anything_without_the_suffix_fails(base in 0u32..1000, tail in "[A-CE-Z]{1,4}") {
        let text = format!("{base}+{tail}");
        prop_assert!(DamageFormula::parse(&text).is_err());
    }
}
