use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitLocation {
    Head,
    Torso,
    RightArm,
    LeftArm,
    RightLeg,
    LeftLeg,
}

impl HitLocation {
    pub const ALL: [HitLocation; 6] = [
        HitLocation::Head,
        HitLocation::Torso,
        HitLocation::RightArm,
        HitLocation::LeftArm,
        HitLocation::RightLeg,
        HitLocation::LeftLeg,
    ];

    /// Map a d20 result to a body location. Missing results count as 0.
    pub fn from_d20(roll: Option<u8>) -> Self {
        match roll.unwrap_or(0) {
            0..=2 => HitLocation::Head,
            3..=8 => HitLocation::Torso,
            9..=11 => HitLocation::RightArm,
            12..=14 => HitLocation::LeftArm,
            15..=17 => HitLocation::RightLeg,
            _ => HitLocation::LeftLeg,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HitLocation::Head => "HEAD",
            HitLocation::Torso => "TORSO",
            HitLocation::RightArm => "RIGHT ARM",
            HitLocation::LeftArm => "LEFT ARM",
            HitLocation::RightLeg => "RIGHT LEG",
            HitLocation::LeftLeg => "LEFT LEG",
        }
    }
}

impl fmt::Display for HitLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
