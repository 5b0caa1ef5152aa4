use chronicle_engine::symmetry::{SymmetryTally, attack_dice, map_face};
use chronicle_engine::DamageFormula;
use proptest::prelude::*;

#[test]
fn tally_of_mixed_faces() {
    let t = SymmetryTally::from_faces(&[1, 2, 6, 3, 6]);
    assert_eq!(t.total_success, 3);
    assert_eq!(t.total_effect, 2);
    assert_eq!(t.total_damage(2), 5);
    assert_eq!(t.faces, vec![1, 2, 6, 3, 6]);
}

#[test]
fn empty_pool_is_base_damage() {
    let t = SymmetryTally::from_faces(&[]);
    assert_eq!(t.total_damage(4), 4);
    assert_eq!(t.total_effect, 0);
}

#[test]
fn largest_base_saturates_instead_of_overflowing() {
    let f = DamageFormula::parse("4294967295+DSY").unwrap();
    let t = SymmetryTally::from_faces(&[1]);
    assert_eq!(t.total_damage(f.base), u32::MAX);
}

#[test]
fn attack_dice_adds_bonus_and_floors_at_zero() {
    let f = DamageFormula { base: 1, die_count: 2 };
    assert_eq!(attack_dice(f, 3), 5);
    assert_eq!(attack_dice(f, -5), 0);
}

proptest! {
    #[test]
    fn sums_are_additive(faces in prop::collection::vec(1u8..=6, 0..20)) {
        let t = SymmetryTally::from_faces(&faces);
        let success: u32 = faces.iter().map(|&f| map_face(f).success).sum();
        let effect: u32 = faces.iter().map(|&f| map_face(f).effect).sum();
        prop_assert_eq!(t.total_success, success);
        prop_assert_eq!(t.total_effect, effect);
    }

    #[test]
    fn splitting_a_pool_keeps_totals(
        a in prop::collection::vec(1u8..=6, 0..10),
        b in prop::collection::vec(1u8..=6, 0..10),
    ) {
        let whole: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
        let (ta, tb, tw) = (
            SymmetryTally::from_faces(&a),
            SymmetryTally::from_faces(&b),
            SymmetryTally::from_faces(&whole),
        );
        prop_assert_eq!(tw.total_success, ta.total_success + tb.total_success);
        prop_assert_eq!(tw.total_effect, ta.total_effect + tb.total_effect);
    }
}
