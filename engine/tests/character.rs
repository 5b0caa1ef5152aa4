use std::str::FromStr;

use chronicle_engine::HitLocation;
use chronicle_engine::api::character_view;
use chronicle_engine::character::{AttributeKind, Character, CombatQualitySlot, ChroniclePoints};
use chronicle_engine::content::sample_store;
use chronicle_engine::store::{DataStore, MemoryStore, Quality, UpdateIntent};
use chronicle_engine::wounds::TrackKind;
use chronicle_engine::EngineError;

const VAL: &str = "Valerie Duval";

#[test]
fn wound_box_toggle_round_trips_through_the_store() {
    let mut store = sample_store().unwrap();
    let c = store.character(VAL).unwrap();
    let torso = TrackKind::Location(HitLocation::Torso);

    let intent = c.toggle_wound(torso, 2);
    assert_eq!(
        intent,
        UpdateIntent::SetWoundTrack {
            track: torso,
            filled: vec![true, false, true, false, false, false, false],
        }
    );
    store.apply(VAL, &intent).unwrap();

    let c = store.character(VAL).unwrap();
    store.apply(VAL, &c.toggle_wound(torso, 0)).unwrap();
    let view = character_view(&store, VAL).unwrap();
    assert_eq!(view.locations[1].track.marked(), 1);
    assert!(view.locations[1].track.filled[2]);
}

#[test]
fn extreme_attributes_land_in_the_edge_rows() {
    let mut c = Character::new("Golem");
    c.attributes.physique = i32::MAX;
    c.attributes.strength = i32::MAX;
    assert_eq!(c.attribute_sum(), i32::MAX);
    assert_eq!(c.capacity(TrackKind::Location(HitLocation::Torso)), 11);

    c.attributes.physique = i32::MIN;
    c.attributes.strength = -1;
    assert_eq!(c.attribute_sum(), i32::MIN);
    assert_eq!(c.capacity(TrackKind::Location(HitLocation::Torso)), 5);
}

fn trait_names(store: &MemoryStore) -> Vec<String> {
    character_view(store, VAL).unwrap().traits.into_iter().map(|t| t.name).collect()
}

#[test]
fn deleted_qualities_drop_out_of_the_sheet() {
    let mut store = sample_store().unwrap();
    assert_eq!(trait_names(&store), vec!["Hardy"]);

    let hardy = store.remove_quality("hardy").unwrap();
    assert!(store.quality("hardy").is_none());
    assert!(trait_names(&store).is_empty());
    // The sheet still holds the id; only the lookup failed.
    assert_eq!(store.character(VAL).unwrap().traits, vec!["hardy"]);

    store.insert_quality(Quality {
        name: "Hardy (revised)".into(),
        ..hardy
    });
    assert_eq!(trait_names(&store), vec!["Hardy (revised)"]);
}

#[test]
fn dread_boxes_use_ladder_clicks() {
    let c = sample_store().unwrap().character(VAL).unwrap();
    assert_eq!(c.dread, 2);
    assert_eq!(c.click_dread(4), UpdateIntent::SetDread(5));
    assert_eq!(c.click_dread(1), UpdateIntent::SetDread(1));
}

#[test]
fn reload_dots_cap_at_five() {
    let mut store = sample_store().unwrap();
    let c = store.character(VAL).unwrap();
    let intent = c.click_reload("M50 Assault Rifle", 9).unwrap();
    assert_eq!(
        intent,
        UpdateIntent::SetReloadUsed {
            weapon: "M50 Assault Rifle".into(),
            value: 5
        }
    );
    store.apply(VAL, &intent).unwrap();
    let c = store.character(VAL).unwrap();
    assert_eq!(c.weapon("M50 Assault Rifle").unwrap().reload_used(), 5);
    let again = c.click_reload("M50 Assault Rifle", 4).unwrap();
    assert!(matches!(again, UpdateIntent::SetReloadUsed { value: 4, .. }));
}

#[test]
fn chronicle_points_only_spend_when_available() {
    let store = sample_store().unwrap();
    let val = store.character(VAL).unwrap();
    assert_eq!(val.spend_chronicle_point(), Some(UpdateIntent::SetChroniclePoints(2)));
    let marek = store.character("Brother Marek").unwrap();
    assert_eq!(marek.spend_chronicle_point(), None);

    let odd = ChroniclePoints { value: 9, max: -1 }.normalized();
    assert_eq!(odd, ChroniclePoints { value: 0, max: 0 });
    assert!(!odd.can_spend());
}

#[test]
fn traits_are_deduplicated() {
    let mut store = sample_store().unwrap();
    let c = store.character(VAL).unwrap();
    assert_eq!(c.add_trait("hardy"), None);

    let add = c.add_trait("staggered").unwrap();
    store.apply(VAL, &add).unwrap();
    let c = store.character(VAL).unwrap();
    assert_eq!(c.traits, vec!["hardy", "staggered"]);

    store.apply(VAL, &c.remove_trait("hardy")).unwrap();
    assert_eq!(store.character(VAL).unwrap().traits, vec!["staggered"]);
}

#[test]
fn weapon_qualities_add_and_clear() {
    let mut store = sample_store().unwrap();
    let c = store.character(VAL).unwrap();
    assert_eq!(c.add_weapon_quality("M50 Assault Rifle", "spread").unwrap(), None);
    let add = c
        .add_weapon_quality("M50 Assault Rifle", "vicious_1")
        .unwrap()
        .unwrap();
    store.apply(VAL, &add).unwrap();
    let c = store.character(VAL).unwrap();
    assert_eq!(c.weapon("M50 Assault Rifle").unwrap().qualities.len(), 3);

    store
        .apply(VAL, &c.clear_weapon_qualities("M50 Assault Rifle").unwrap())
        .unwrap();
    let c = store.character(VAL).unwrap();
    assert!(c.weapon("M50 Assault Rifle").unwrap().qualities.is_empty());
}

#[test]
fn equipping_armor_changes_soak() {
    let mut store = sample_store().unwrap();
    let c = store.character(VAL).unwrap();
    assert_eq!(c.soak().head, 2);
    store
        .apply(VAL, &c.toggle_equipped("parade helmet").unwrap())
        .unwrap();
    assert_eq!(store.character(VAL).unwrap().soak().head, 3);
    assert!(matches!(
        c.toggle_equipped("Power Fist"),
        Err(EngineError::UnknownWeapon(_))
    ));
}

#[test]
fn combat_qualities_resolve_or_vanish() {
    let mut store = sample_store().unwrap();
    let c = store.character(VAL).unwrap();
    store
        .apply(VAL, &c.set_combat_quality(CombatQualitySlot::Status, "staggered"))
        .unwrap();
    store
        .apply(VAL, &c.set_combat_quality(CombatQualitySlot::CriticalInjury, "lost_eye"))
        .unwrap();
    let view = character_view(&store, VAL).unwrap();
    assert_eq!(view.status.map(|q| q.name), Some("Staggered".to_string()));
    assert_eq!(view.critical_injury, None);
}

#[test]
fn attribute_names_parse_loosely() {
    assert_eq!(
        AttributeKind::from_str("Mental Strength").unwrap(),
        AttributeKind::MentalStrength
    );
    assert_eq!(AttributeKind::from_str("PHYSIQUE").unwrap(), AttributeKind::Physique);
    assert!(matches!(
        AttributeKind::from_str("luck"),
        Err(EngineError::UnknownAttribute(_))
    ));
}

#[test]
fn intents_serialize_with_op_and_args() {
    let json = serde_json::to_value(UpdateIntent::SetDread(3)).unwrap();
    assert_eq!(json, serde_json::json!({"op": "set_dread", "args": 3}));
}

#[test]
fn unknown_target_is_an_error() {
    let mut store = sample_store().unwrap();
    let err = store.apply("Ghost", &UpdateIntent::SetDread(1)).unwrap_err();
    assert!(matches!(err, EngineError::UnknownCharacter(_)));
}
