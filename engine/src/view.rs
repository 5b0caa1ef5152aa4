//! Read-only projections of sheets for display. Nothing here writes.

use serde::Serialize;

use crate::character::{AttributeKind, Character, ChroniclePoints, MAX_RELOAD, Weapon, WeaponRange};
use crate::dread::DreadLadder;
use crate::hit_location::HitLocation;
use crate::skill::target_number;
use crate::store::{DataStore, QualityRef, resolve_qualities, resolve_quality};
use crate::vehicle::{DamageTrack, Vehicle, VehicleLocation};
use crate::wounds::{TrackBox, TrackKind, WoundTrack, box_view};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillView {
    pub name: String,
    pub attribute: AttributeKind,
    pub expertise: i32,
    pub focus: i32,
    pub target_number: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationView {
    pub location: HitLocation,
    pub label: &'static str,
    pub soak: i32,
    pub track: WoundTrack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeaponView {
    pub name: String,
    pub range: Option<WeaponRange>,
    pub damage: Option<String>,
    pub mode: Option<String>,
    pub size: Option<String>,
    pub enc: Option<String>,
    pub reliability: Option<String>,
    pub bonus: u32,
    pub reload: Vec<TrackBox>,
    pub qualities: Vec<QualityRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterView {
    pub name: String,
    pub melee_bonus: u32,
    pub ranged_bonus: u32,
    pub dread: DreadLadder,
    pub chronicle_points: ChroniclePoints,
    pub skills: Vec<SkillView>,
    pub traits: Vec<QualityRef>,
    pub locations: Vec<LocationView>,
    pub serious: WoundTrack,
    pub critical: WoundTrack,
    pub mental: WoundTrack,
    pub weapons: Vec<WeaponView>,
    pub armor: Vec<String>,
    pub status: Option<QualityRef>,
    pub critical_injury: Option<QualityRef>,
}

impl CharacterView {
    pub fn build<S: DataStore + ?Sized>(store: &S, c: &Character) -> Self {
        let soak = c.soak();
        let skills = c
            .skills
            .iter()
            .map(|(name, s)| SkillView {
                name: name.clone(),
                attribute: s.attribute,
                expertise: s.expertise,
                focus: s.focus,
                target_number: target_number(c.attributes.get(s.attribute), s.expertise),
            })
            .collect();
        let locations = HitLocation::ALL
            .iter()
            .map(|&loc| LocationView {
                location: loc,
                label: loc.label(),
                soak: soak.at(loc),
                track: c.wound_track(TrackKind::Location(loc)),
            })
            .collect();
        let weapons = c
            .equipped_weapons()
            .map(|w| weapon_view(store, c, w))
            .collect();

        Self {
            name: c.name.clone(),
            melee_bonus: c.melee_bonus(),
            ranged_bonus: c.ranged_bonus(),
            dread: c.dread_ladder(),
            chronicle_points: c.chronicle_points.normalized(),
            skills,
            traits: resolve_qualities(store, &c.traits),
            locations,
            serious: c.wound_track(TrackKind::Serious),
            critical: c.wound_track(TrackKind::Critical),
            mental: c.wound_track(TrackKind::Mental),
            weapons,
            armor: c.equipped_armor().map(|a| a.name.clone()).collect(),
            status: resolve_quality(store, c.combat.status_quality.as_deref()),
            critical_injury: resolve_quality(store, c.combat.critical_injury_quality.as_deref()),
        }
    }
}

fn weapon_view<S: DataStore + ?Sized>(store: &S, c: &Character, w: &Weapon) -> WeaponView {
    let used = w.reload_used() as usize;
    let reload: Vec<bool> = (0..MAX_RELOAD as usize).map(|i| i < used).collect();
    WeaponView {
        name: w.name.clone(),
        range: w.range,
        damage: w.damage.clone(),
        mode: w.mode.clone(),
        size: w.size.clone(),
        enc: w.enc.clone(),
        reliability: w.reliability.clone(),
        bonus: c.bonus_for(w),
        reload: box_view(&reload),
        qualities: resolve_qualities(store, &w.qualities),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackView {
    pub cur: u32,
    pub max: u32,
    pub boxes: Vec<TrackBox>,
}

impl From<DamageTrack> for TrackView {
    fn from(t: DamageTrack) -> Self {
        let c = t.clamped();
        Self {
            cur: c.cur,
            max: c.max,
            boxes: t.boxes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleLocationView {
    pub location: VehicleLocation,
    pub label: &'static str,
    pub soak: i32,
    pub surface: TrackView,
    pub system: TrackView,
    pub structural: TrackView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleView {
    pub name: String,
    pub impact_damage: Option<String>,
    pub locations: Vec<VehicleLocationView>,
    pub qualities: Vec<QualityRef>,
    pub pilot: Option<String>,
}

impl VehicleView {
    pub fn build<S: DataStore + ?Sized>(store: &S, v: &Vehicle) -> Self {
        let locations = [VehicleLocation::Hull, VehicleLocation::Motive]
            .into_iter()
            .map(|loc| {
                let state = v.location(loc);
                VehicleLocationView {
                    location: loc,
                    label: loc.label(),
                    soak: state.soak,
                    surface: state.surface.into(),
                    system: state.system.into(),
                    structural: state.structural.into(),
                }
            })
            .collect();
        Self {
            name: v.name.clone(),
            impact_damage: v.impact_damage.clone(),
            locations,
            qualities: resolve_qualities(store, &v.qualities),
            pilot: v.pilot.clone(),
        }
    }
}
