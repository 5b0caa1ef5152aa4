use chronicle_engine::HitLocation;
use chronicle_engine::wounds::{
    TrackKind, WOUND_TABLE, WoundTrack, capacity_row, ladder_toggle, mental_capacity,
    normalize_track, toggle_box,
};
use proptest::prelude::*;

#[test]
fn normalization_pads_and_truncates() {
    assert_eq!(
        normalize_track(&[true, false], 5),
        vec![true, false, false, false, false]
    );
    assert_eq!(normalize_track(&[true, true, true], 2), vec![true, true]);
    assert!(normalize_track(&[true], 0).is_empty());
}

#[test]
fn band_examples() {
    let low = capacity_row(9);
    assert_eq!((low.head, low.torso, low.serious, low.critical), (2, 5, 4, 2));
    let high = capacity_row(30);
    assert_eq!((high.head, high.torso, high.serious, high.critical), (5, 11, 9, 6));
    assert_eq!(capacity_row(-4), low);
}

#[test]
fn leg_asymmetry_at_28_and_29() {
    for sum in [28, 29] {
        let row = capacity_row(sum);
        assert_eq!(row.location(HitLocation::RightLeg), 8);
        assert_eq!(row.location(HitLocation::LeftLeg), 9);
    }
}

#[test]
fn mental_track_follows_mental_strength() {
    assert_eq!(mental_capacity(9), 9);
    assert_eq!(mental_capacity(-2), 0);
}

#[test]
fn toggling_flips_one_box_of_the_normalized_track() {
    assert_eq!(toggle_box(&[true], 3, 2), vec![true, false, true]);
    assert_eq!(toggle_box(&[true, true], 3, 0), vec![false, true, false]);
    // Clicks past the end leave the normalized track alone.
    assert_eq!(toggle_box(&[true, true, true, true], 2, 5), vec![true, true]);
}

#[test]
fn box_view_indexes_from_zero() {
    let track = WoundTrack::normalized(&[false, true], 3);
    let checked: Vec<_> = track.boxes().iter().map(|b| (b.index, b.checked)).collect();
    assert_eq!(checked, vec![(0, false), (1, true), (2, false)]);
    assert_eq!(track.marked(), 1);
}

#[test]
fn row_capacity_by_track_kind() {
    let row = capacity_row(17);
    assert_eq!(row.capacity(TrackKind::Location(HitLocation::Torso)), 7);
    assert_eq!(row.capacity(TrackKind::Serious), 6);
    assert_eq!(row.capacity(TrackKind::Critical), 3);
}

proptest! {
    #[test]
    fn every_sum_hits_exactly_one_band(sum in any::<i32>()) {
        let matching = WOUND_TABLE.iter().filter(|r| r.contains(sum)).count();
        prop_assert_eq!(matching, 1);
    }

    #[test]
    fn normalized_length_is_capacity(
        stored in prop::collection::vec(any::<bool>(), 0..20),
        cap in 0usize..15,
    ) {
        let out = normalize_track(&stored, cap);
        prop_assert_eq!(out.len(), cap);
        let kept = stored.len().min(cap);
        prop_assert_eq!(&out[..kept], &stored[..kept]);
        prop_assert!(out[kept..].iter().all(|b| !b));
    }

    #[test]
    fn ladder_toggle_twice_on_fresh_box_returns_to_index(idx in 0u32..30) {
        let once = ladder_toggle(0, idx, None);
        prop_assert_eq!(once, idx + 1);
        prop_assert_eq!(ladder_toggle(once, idx, None), idx);
    }
}
