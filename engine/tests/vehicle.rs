use chronicle_engine::content::sample_store;
use chronicle_engine::store::{DataStore, UpdateIntent};
use chronicle_engine::vehicle::{DamageTrack, VehicleLocation, VehicleTrack};

const SHIP: &str = "Ironclad Gunship";

#[test]
fn clicking_the_filled_box_steps_back() {
    let v = sample_store().unwrap().vehicle(SHIP).unwrap();
    assert_eq!(
        v.click_damage(VehicleLocation::Hull, VehicleTrack::Surface, 0),
        UpdateIntent::SetVehicleDamage {
            location: VehicleLocation::Hull,
            track: VehicleTrack::Surface,
            value: 0
        }
    );
}

#[test]
fn damage_is_clamped_to_track_max() {
    let mut store = sample_store().unwrap();
    let v = store.vehicle(SHIP).unwrap();
    let intent = v.click_damage(VehicleLocation::Hull, VehicleTrack::System, 12);
    assert!(matches!(intent, UpdateIntent::SetVehicleDamage { value: 6, .. }));
    store.apply(SHIP, &intent).unwrap();
    assert_eq!(store.vehicle(SHIP).unwrap().hull.system.cur, 6);
}

#[test]
fn pilot_assignment() {
    let mut store = sample_store().unwrap();
    let v = store.vehicle(SHIP).unwrap();
    store.apply(SHIP, &v.assign_pilot("Valerie Duval")).unwrap();
    assert_eq!(
        store.vehicle(SHIP).unwrap().pilot.as_deref(),
        Some("Valerie Duval")
    );
}

#[test]
fn oversized_tracks_clamp_to_thirty() {
    let t = DamageTrack { cur: 45, max: 40 }.clamped();
    assert_eq!(t, DamageTrack { cur: 30, max: 30 });
    let boxes = DamageTrack { cur: 2, max: 4 }.boxes();
    let checked: Vec<_> = boxes.iter().map(|b| b.checked).collect();
    assert_eq!(checked, vec![true, true, false, false]);
}
