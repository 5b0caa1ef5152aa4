use chronicle_engine::dread::{DreadLadder, active_effect};

#[test]
fn seven_dread_completes_three_tiers() {
    let ladder = DreadLadder::compute(7);
    let complete: Vec<_> = ladder.tiers.iter().map(|t| t.complete).collect();
    assert_eq!(complete, vec![true, true, true, false, false]);
    assert_eq!(ladder.active_effect, 2);
    assert_eq!(ladder.complication_threshold(), 18);
}

#[test]
fn zero_dread_has_no_effect() {
    let ladder = DreadLadder::compute(0);
    assert_eq!(ladder.active_effect, 0);
    assert!(ladder.tiers.iter().all(|t| !t.complete));
    assert_eq!(ladder.complication_threshold(), 20);
}

#[test]
fn boxes_are_numbered_across_tiers() {
    let ladder = DreadLadder::compute(4);
    let indices: Vec<u32> = ladder
        .tiers
        .iter()
        .flat_map(|t| t.boxes.iter().map(|b| b.global_index))
        .collect();
    assert_eq!(indices, (1..=15).collect::<Vec<_>>());
    let checked = ladder
        .tiers
        .iter()
        .flat_map(|t| t.boxes.iter())
        .filter(|b| b.checked)
        .count();
    assert_eq!(checked, 4);
}

#[test]
fn effect_saturates_at_top_tier() {
    assert_eq!(active_effect(15), 4);
    assert_eq!(active_effect(99), 4);
    assert_eq!(active_effect(1), 0);
    assert_eq!(active_effect(3), 1);
}
