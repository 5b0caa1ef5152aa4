//! Vehicle damage tracks and the impact damage formula.

use serde::{Deserialize, Serialize};

use crate::store::UpdateIntent;
use crate::wounds::{TrackBox, ladder_toggle};

/// Upper bound on any vehicle damage track.
pub const MAX_VEHICLE_TRACK: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleLocation {
    Hull,
    Motive,
}

impl VehicleLocation {
    pub fn label(self) -> &'static str {
        match self {
            VehicleLocation::Hull => "HULL",
            VehicleLocation::Motive => "MOTIVE SYSTEM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleTrack {
    Surface,
    System,
    Structural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageTrack {
    pub cur: u32,
    pub max: u32,
}

impl DamageTrack {
    /// `max` is capped at 30 and `cur` at `max`.
    pub fn clamped(self) -> Self {
        let max = self.max.min(MAX_VEHICLE_TRACK);
        Self {
            cur: self.cur.min(max),
            max,
        }
    }

    pub fn boxes(self) -> Vec<TrackBox> {
        let t = self.clamped();
        (0..t.max as usize)
            .map(|index| TrackBox {
                index,
                checked: index < t.cur as usize,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleLocationState {
    pub soak: i32,
    pub surface: DamageTrack,
    pub system: DamageTrack,
    pub structural: DamageTrack,
}

impl VehicleLocationState {
    pub fn track(&self, track: VehicleTrack) -> DamageTrack {
        match track {
            VehicleTrack::Surface => self.surface,
            VehicleTrack::System => self.system,
            VehicleTrack::Structural => self.structural,
        }
    }

    fn track_mut(&mut self, track: VehicleTrack) -> &mut DamageTrack {
        match track {
            VehicleTrack::Surface => &mut self.surface,
            VehicleTrack::System => &mut self.system,
            VehicleTrack::Structural => &mut self.structural,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vehicle {
    pub name: String,
    #[serde(default)]
    pub impact_damage: Option<String>,
    #[serde(default)]
    pub hull: VehicleLocationState,
    #[serde(default)]
    pub motive: VehicleLocationState,
    #[serde(default)]
    pub qualities: Vec<String>,
    #[serde(default)]
    pub pilot: Option<String>,
}

impl Vehicle {
    pub fn location(&self, loc: VehicleLocation) -> &VehicleLocationState {
        match loc {
            VehicleLocation::Hull => &self.hull,
            VehicleLocation::Motive => &self.motive,
        }
    }

    fn location_mut(&mut self, loc: VehicleLocation) -> &mut VehicleLocationState {
        match loc {
            VehicleLocation::Hull => &mut self.hull,
            VehicleLocation::Motive => &mut self.motive,
        }
    }

    pub fn click_damage(
        &self,
        location: VehicleLocation,
        track: VehicleTrack,
        index: u32,
    ) -> UpdateIntent {
        let t = self.location(location).track(track).clamped();
        UpdateIntent::SetVehicleDamage {
            location,
            track,
            value: ladder_toggle(t.cur, index, Some(t.max)),
        }
    }

    pub fn assign_pilot(&self, pilot: &str) -> UpdateIntent {
        UpdateIntent::SetPilot(Some(pilot.to_string()))
    }

    /// Only vehicle intents are meaningful here; anything else is ignored.
    pub fn apply(&mut self, intent: &UpdateIntent) {
        match intent {
            UpdateIntent::SetVehicleDamage {
                location,
                track,
                value,
            } => {
                let t = self.location_mut(*location).track_mut(*track);
                t.cur = (*value).min(t.max.min(MAX_VEHICLE_TRACK));
            }
            UpdateIntent::SetPilot(pilot) => self.pilot = pilot.clone(),
            _ => {}
        }
    }
}
