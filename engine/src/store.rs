//! The document-store boundary: read access to sheets and qualities, and the
//! update intents that are the only way state changes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::character::{Character, CombatQualitySlot};
use crate::error::EngineError;
use crate::vehicle::{Vehicle, VehicleLocation, VehicleTrack};
use crate::wounds::TrackKind;

/// A write the owning store should perform. The engine only computes these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op", content = "args")]
pub enum UpdateIntent {
    SetWoundTrack { track: TrackKind, filled: Vec<bool> },
    SetDread(u32),
    SetChroniclePoints(i32),
    SetReloadUsed { weapon: String, value: u32 },
    SetTraits(Vec<String>),
    SetWeaponQualities { weapon: String, qualities: Vec<String> },
    SetEquipped { item: String, equipped: bool },
    SetCombatQuality { slot: CombatQualitySlot, quality: Option<String> },
    SetVehicleDamage { location: VehicleLocation, track: VehicleTrack, value: u32 },
    SetPilot(Option<String>),
}

/// A named rule tag (weapon quality, trait, status, injury).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quality {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A quality reference that resolved, as shown on cards and sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityRef {
    pub id: String,
    pub name: String,
}

pub trait DataStore {
    fn character(&self, name: &str) -> Option<Character>;
    fn vehicle(&self, name: &str) -> Option<Vehicle>;
    fn quality(&self, id: &str) -> Option<Quality>;
    /// Apply an intent to the named character or vehicle.
    fn apply(&mut self, target: &str, intent: &UpdateIntent) -> Result<(), EngineError>;
}

/// Resolve quality ids, dropping any that no longer exist.
pub fn resolve_qualities<S: DataStore + ?Sized>(store: &S, ids: &[String]) -> Vec<QualityRef> {
    ids.iter()
        .filter_map(|id| match store.quality(id) {
            Some(q) => Some(QualityRef { id: q.id, name: q.name }),
            None => {
                tracing::warn!(quality = %id, "quality reference does not resolve; skipping");
                None
            }
        })
        .collect()
}

pub fn resolve_quality<S: DataStore + ?Sized>(store: &S, id: Option<&str>) -> Option<QualityRef> {
    let id = id.filter(|s| !s.is_empty())?;
    resolve_qualities(store, &[id.to_string()]).pop()
}

/// Everything a store holds, as loaded from a content file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBundle {
    pub characters: Vec<Character>,
    pub vehicles: Vec<Vehicle>,
    pub qualities: Vec<Quality>,
}

/// In-process store keyed by name (case-insensitive lookups).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    characters: IndexMap<String, Character>,
    vehicles: IndexMap<String, Vehicle>,
    qualities: IndexMap<String, Quality>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bundle(bundle: ContentBundle) -> Self {
        let mut store = Self::new();
        store.extend(bundle);
        store
    }

    pub fn extend(&mut self, bundle: ContentBundle) {
        for c in bundle.characters {
            self.insert_character(c);
        }
        for v in bundle.vehicles {
            self.vehicles.insert(v.name.to_lowercase(), v);
        }
        for q in bundle.qualities {
            self.qualities.insert(q.id.clone(), q);
        }
    }

    pub fn insert_character(&mut self, character: Character) {
        self.characters
            .insert(character.name.to_lowercase(), character);
    }

    pub fn insert_quality(&mut self, quality: Quality) {
        self.qualities.insert(quality.id.clone(), quality);
    }

    pub fn remove_quality(&mut self, id: &str) -> Option<Quality> {
        self.qualities.shift_remove(id)
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn into_bundle(self) -> ContentBundle {
        ContentBundle {
            characters: self.characters.into_values().collect(),
            vehicles: self.vehicles.into_values().collect(),
            qualities: self.qualities.into_values().collect(),
        }
    }
}

impl DataStore for MemoryStore {
    fn character(&self, name: &str) -> Option<Character> {
        self.characters.get(&name.to_lowercase()).cloned()
    }

    fn vehicle(&self, name: &str) -> Option<Vehicle> {
        self.vehicles.get(&name.to_lowercase()).cloned()
    }

    fn quality(&self, id: &str) -> Option<Quality> {
        self.qualities.get(id).cloned()
    }

    fn apply(&mut self, target: &str, intent: &UpdateIntent) -> Result<(), EngineError> {
        let key = target.to_lowercase();
        match intent {
            UpdateIntent::SetVehicleDamage { .. } | UpdateIntent::SetPilot(_) => {
                let vehicle = self
                    .vehicles
                    .get_mut(&key)
                    .ok_or_else(|| EngineError::Content(format!("vehicle '{}' not found", target)))?;
                vehicle.apply(intent);
            }
            _ => {
                let character = self
                    .characters
                    .get_mut(&key)
                    .ok_or_else(|| EngineError::UnknownCharacter(target.to_string()))?;
                character.apply(intent);
            }
        }
        tracing::debug!(entity = target, ?intent, "applied update");
        Ok(())
    }
}
