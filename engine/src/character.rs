//! Typed character sheet and the named update operations that act on it.
//!
//! Operations never write directly: they compute an [`UpdateIntent`] which
//! the owning store applies through [`Character::apply`].

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::armor::{Armor, LocationSoak, total_soak};
use crate::dread::DreadLadder;
use crate::error::EngineError;
use crate::hit_location::HitLocation;
use crate::skill::{SkillTestParams, target_number};
use crate::store::UpdateIntent;
use crate::symmetry::symmetry_bonus;
use crate::wounds::{
    TrackKind, WoundCapacityRow, WoundTrack, capacity_row, ladder_toggle, mental_capacity,
    toggle_box,
};

/// Reload dots on a weapon card.
pub const MAX_RELOAD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Agility,
    Awareness,
    Coordination,
    Intelligence,
    MentalStrength,
    Personality,
    Physique,
    Strength,
}

impl FromStr for AttributeKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use AttributeKind::*;
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "agility" => Ok(Agility),
            "awareness" => Ok(Awareness),
            "coordination" => Ok(Coordination),
            "intelligence" => Ok(Intelligence),
            "mental_strength" => Ok(MentalStrength),
            "personality" => Ok(Personality),
            "physique" => Ok(Physique),
            "strength" => Ok(Strength),
            _ => Err(EngineError::UnknownAttribute(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub agility: i32,
    pub awareness: i32,
    pub coordination: i32,
    pub intelligence: i32,
    pub mental_strength: i32,
    pub personality: i32,
    pub physique: i32,
    pub strength: i32,
}

impl Attributes {
    pub fn get(&self, kind: AttributeKind) -> i32 {
        match kind {
            AttributeKind::Agility => self.agility,
            AttributeKind::Awareness => self.awareness,
            AttributeKind::Coordination => self.coordination,
            AttributeKind::Intelligence => self.intelligence,
            AttributeKind::MentalStrength => self.mental_strength,
            AttributeKind::Personality => self.personality,
            AttributeKind::Physique => self.physique,
            AttributeKind::Strength => self.strength,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub attribute: AttributeKind,
    #[serde(default)]
    pub expertise: i32,
    #[serde(default)]
    pub focus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChroniclePoints {
    pub value: i32,
    pub max: i32,
}

impl Default for ChroniclePoints {
    fn default() -> Self {
        Self { value: 0, max: 5 }
    }
}

impl ChroniclePoints {
    /// Negative max reads as zero and value never exceeds max.
    pub fn normalized(self) -> Self {
        let max = self.max.max(0);
        Self {
            value: self.value.min(max),
            max,
        }
    }

    pub fn can_spend(self) -> bool {
        self.normalized().value > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponRange {
    Reach,
    Close,
    Medium,
    Long,
}

impl fmt::Display for WeaponRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeaponRange::Reach => "REACH",
            WeaponRange::Close => "CLOSE",
            WeaponRange::Medium => "MEDIUM",
            WeaponRange::Long => "LONG",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    #[serde(default)]
    pub range: Option<WeaponRange>,
    #[serde(default)]
    pub damage: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub enc: Option<String>,
    #[serde(default)]
    pub reliability: Option<String>,
    #[serde(default)]
    pub qualities: Vec<String>,
    #[serde(default)]
    pub reload_used: u32,
    #[serde(default)]
    pub equipped: bool,
}

impl Weapon {
    pub fn is_melee(&self) -> bool {
        self.range == Some(WeaponRange::Reach)
    }

    pub fn reload_used(&self) -> u32 {
        self.reload_used.min(MAX_RELOAD)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationWounds {
    pub head: Vec<bool>,
    pub torso: Vec<bool>,
    pub right_arm: Vec<bool>,
    pub left_arm: Vec<bool>,
    pub right_leg: Vec<bool>,
    pub left_leg: Vec<bool>,
}

impl LocationWounds {
    pub fn at(&self, loc: HitLocation) -> &[bool] {
        match loc {
            HitLocation::Head => &self.head,
            HitLocation::Torso => &self.torso,
            HitLocation::RightArm => &self.right_arm,
            HitLocation::LeftArm => &self.left_arm,
            HitLocation::RightLeg => &self.right_leg,
            HitLocation::LeftLeg => &self.left_leg,
        }
    }

    fn at_mut(&mut self, loc: HitLocation) -> &mut Vec<bool> {
        match loc {
            HitLocation::Head => &mut self.head,
            HitLocation::Torso => &mut self.torso,
            HitLocation::RightArm => &mut self.right_arm,
            HitLocation::LeftArm => &mut self.left_arm,
            HitLocation::RightLeg => &mut self.right_leg,
            HitLocation::LeftLeg => &mut self.left_leg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatQualitySlot {
    Status,
    CriticalInjury,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatState {
    pub status_quality: Option<String>,
    pub critical_injury_quality: Option<String>,
    pub wounds: LocationWounds,
    pub serious_wounds: Vec<bool>,
    pub critical_wounds: Vec<bool>,
    pub mental_wounds: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub skills: IndexMap<String, Skill>,
    #[serde(default)]
    pub dread: u32,
    #[serde(default)]
    pub chronicle_points: ChroniclePoints,
    #[serde(default, deserialize_with = "one_or_many")]
    pub traits: Vec<String>,
    #[serde(default)]
    pub combat: CombatState,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub armor: Vec<Armor>,
}

/// Older sheets store a single trait id as a bare string.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    let list = match raw {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    };
    Ok(list
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::default(),
            skills: IndexMap::new(),
            dread: 0,
            chronicle_points: ChroniclePoints::default(),
            traits: Vec::new(),
            combat: CombatState::default(),
            weapons: Vec::new(),
            armor: Vec::new(),
        }
    }

    pub fn attribute_sum(&self) -> i32 {
        self.attributes.physique.saturating_add(self.attributes.strength)
    }

    pub fn wound_row(&self) -> &'static WoundCapacityRow {
        capacity_row(self.attribute_sum())
    }

    pub fn capacity(&self, track: TrackKind) -> usize {
        match track {
            TrackKind::Mental => mental_capacity(self.attributes.mental_strength),
            other => self.wound_row().capacity(other),
        }
    }

    fn stored_track(&self, track: TrackKind) -> &[bool] {
        match track {
            TrackKind::Location(loc) => self.combat.wounds.at(loc),
            TrackKind::Serious => &self.combat.serious_wounds,
            TrackKind::Critical => &self.combat.critical_wounds,
            TrackKind::Mental => &self.combat.mental_wounds,
        }
    }

    /// Stored track normalized against the capacity implied by the current
    /// attributes. Attributes may have changed since the track was written.
    pub fn wound_track(&self, track: TrackKind) -> WoundTrack {
        WoundTrack::normalized(self.stored_track(track), self.capacity(track))
    }

    pub fn soak(&self) -> LocationSoak {
        total_soak(&self.armor)
    }

    pub fn melee_bonus(&self) -> u32 {
        symmetry_bonus(self.attributes.strength)
    }

    pub fn ranged_bonus(&self) -> u32 {
        symmetry_bonus(self.attributes.awareness)
    }

    pub fn bonus_for(&self, weapon: &Weapon) -> u32 {
        if weapon.is_melee() {
            self.melee_bonus()
        } else {
            self.ranged_bonus()
        }
    }

    pub fn dread_ladder(&self) -> DreadLadder {
        DreadLadder::compute(self.dread)
    }

    pub fn skill(&self, name: &str) -> Result<&Skill, EngineError> {
        self.skills
            .get(name)
            .ok_or_else(|| EngineError::UnknownSkill(name.to_string()))
    }

    /// TN from the skill's attribute plus expertise; complications widen with
    /// the current Dread effect.
    pub fn skill_params(&self, name: &str) -> Result<SkillTestParams, EngineError> {
        let skill = self.skill(name)?;
        let tn = target_number(self.attributes.get(skill.attribute), skill.expertise);
        Ok(SkillTestParams::new(
            tn,
            skill.focus,
            self.dread_ladder().active_effect,
        ))
    }

    pub fn weapon(&self, name: &str) -> Result<&Weapon, EngineError> {
        self.weapons
            .iter()
            .find(|w| w.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::UnknownWeapon(name.to_string()))
    }

    pub fn equipped_weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.iter().filter(|w| w.equipped)
    }

    pub fn equipped_armor(&self) -> impl Iterator<Item = &Armor> {
        self.armor.iter().filter(|a| a.equipped)
    }

    /* ---------------- update operations ---------------- */

    pub fn toggle_wound(&self, track: TrackKind, index: usize) -> UpdateIntent {
        let filled = toggle_box(self.stored_track(track), self.capacity(track), index);
        UpdateIntent::SetWoundTrack { track, filled }
    }

    pub fn click_dread(&self, index: u32) -> UpdateIntent {
        UpdateIntent::SetDread(ladder_toggle(self.dread, index, None))
    }

    pub fn click_reload(&self, weapon: &str, index: u32) -> Result<UpdateIntent, EngineError> {
        let w = self.weapon(weapon)?;
        Ok(UpdateIntent::SetReloadUsed {
            weapon: w.name.clone(),
            value: ladder_toggle(w.reload_used(), index, Some(MAX_RELOAD)),
        })
    }

    /// `None` when no point is available.
    pub fn spend_chronicle_point(&self) -> Option<UpdateIntent> {
        let cp = self.chronicle_points.normalized();
        cp.can_spend()
            .then(|| UpdateIntent::SetChroniclePoints((cp.value - 1).max(0)))
    }

    /// `None` when the trait is already present.
    pub fn add_trait(&self, quality_id: &str) -> Option<UpdateIntent> {
        if self.traits.iter().any(|t| t == quality_id) {
            return None;
        }
        let mut next = self.traits.clone();
        next.push(quality_id.to_string());
        Some(UpdateIntent::SetTraits(next))
    }

    pub fn remove_trait(&self, quality_id: &str) -> UpdateIntent {
        UpdateIntent::SetTraits(
            self.traits
                .iter()
                .filter(|t| *t != quality_id)
                .cloned()
                .collect(),
        )
    }

    pub fn add_weapon_quality(
        &self,
        weapon: &str,
        quality_id: &str,
    ) -> Result<Option<UpdateIntent>, EngineError> {
        let w = self.weapon(weapon)?;
        if w.qualities.iter().any(|q| q == quality_id) {
            return Ok(None);
        }
        let mut qualities = w.qualities.clone();
        qualities.push(quality_id.to_string());
        Ok(Some(UpdateIntent::SetWeaponQualities {
            weapon: w.name.clone(),
            qualities,
        }))
    }

    pub fn clear_weapon_qualities(&self, weapon: &str) -> Result<UpdateIntent, EngineError> {
        let w = self.weapon(weapon)?;
        Ok(UpdateIntent::SetWeaponQualities {
            weapon: w.name.clone(),
            qualities: Vec::new(),
        })
    }

    /// Flip the equipped flag of the named weapon or armor.
    pub fn toggle_equipped(&self, item: &str) -> Result<UpdateIntent, EngineError> {
        if let Some(w) = self.weapons.iter().find(|w| w.name.eq_ignore_ascii_case(item)) {
            return Ok(UpdateIntent::SetEquipped {
                item: w.name.clone(),
                equipped: !w.equipped,
            });
        }
        if let Some(a) = self.armor.iter().find(|a| a.name.eq_ignore_ascii_case(item)) {
            return Ok(UpdateIntent::SetEquipped {
                item: a.name.clone(),
                equipped: !a.equipped,
            });
        }
        Err(EngineError::UnknownWeapon(item.to_string()))
    }

    pub fn set_combat_quality(&self, slot: CombatQualitySlot, quality_id: &str) -> UpdateIntent {
        UpdateIntent::SetCombatQuality {
            slot,
            quality: Some(quality_id.to_string()),
        }
    }

    /// Apply an intent produced by one of the operations above.
    pub fn apply(&mut self, intent: &UpdateIntent) {
        match intent {
            UpdateIntent::SetWoundTrack { track, filled } => {
                let slot = match track {
                    TrackKind::Location(loc) => self.combat.wounds.at_mut(*loc),
                    TrackKind::Serious => &mut self.combat.serious_wounds,
                    TrackKind::Critical => &mut self.combat.critical_wounds,
                    TrackKind::Mental => &mut self.combat.mental_wounds,
                };
                *slot = filled.clone();
            }
            UpdateIntent::SetDread(value) => self.dread = *value,
            UpdateIntent::SetChroniclePoints(value) => {
                self.chronicle_points = self.chronicle_points.normalized();
                self.chronicle_points.value = (*value).clamp(0, self.chronicle_points.max);
            }
            UpdateIntent::SetReloadUsed { weapon, value } => {
                if let Some(w) = self.weapons.iter_mut().find(|w| &w.name == weapon) {
                    w.reload_used = (*value).min(MAX_RELOAD);
                }
            }
            UpdateIntent::SetTraits(traits) => self.traits = traits.clone(),
            UpdateIntent::SetWeaponQualities { weapon, qualities } => {
                if let Some(w) = self.weapons.iter_mut().find(|w| &w.name == weapon) {
                    w.qualities = qualities.clone();
                }
            }
            UpdateIntent::SetEquipped { item, equipped } => {
                if let Some(w) = self.weapons.iter_mut().find(|w| &w.name == item) {
                    w.equipped = *equipped;
                } else if let Some(a) = self.armor.iter_mut().find(|a| &a.name == item) {
                    a.equipped = *equipped;
                }
            }
            UpdateIntent::SetCombatQuality { slot, quality } => match slot {
                CombatQualitySlot::Status => self.combat.status_quality = quality.clone(),
                CombatQualitySlot::CriticalInjury => {
                    self.combat.critical_injury_quality = quality.clone()
                }
            },
            UpdateIntent::SetVehicleDamage { .. } | UpdateIntent::SetPilot(_) => {}
        }
    }
}
