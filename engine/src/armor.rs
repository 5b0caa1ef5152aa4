use serde::{Deserialize, Serialize};

use crate::hit_location::HitLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmsCoverage {
    #[default]
    Both,
    Left,
    Right,
}

/// Soak as written on an armor item. Legs are a single value covering both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArmorSoak {
    #[serde(default)]
    pub head: i32,
    #[serde(default)]
    pub torso: i32,
    #[serde(default)]
    pub arms: i32,
    #[serde(default)]
    pub legs: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    #[serde(default)]
    pub soak: ArmorSoak,
    #[serde(default)]
    pub arms_coverage: ArmsCoverage,
    #[serde(default)]
    pub equipped: bool,
}

/// Soak per body location after summing all worn armor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocationSoak {
    pub head: i32,
    pub torso: i32,
    pub right_arm: i32,
    pub left_arm: i32,
    pub right_leg: i32,
    pub left_leg: i32,
}

impl LocationSoak {
    pub fn at(&self, loc: HitLocation) -> i32 {
        match loc {
            HitLocation::Head => self.head,
            HitLocation::Torso => self.torso,
            HitLocation::RightArm => self.right_arm,
            HitLocation::LeftArm => self.left_arm,
            HitLocation::RightLeg => self.right_leg,
            HitLocation::LeftLeg => self.left_leg,
        }
    }

    fn add(&mut self, armor: &Armor) {
        let s = armor.soak;
        self.head += s.head;
        self.torso += s.torso;
        self.right_leg += s.legs;
        self.left_leg += s.legs;
        match armor.arms_coverage {
            ArmsCoverage::Both => {
                self.right_arm += s.arms;
                self.left_arm += s.arms;
            }
            ArmsCoverage::Right => self.right_arm += s.arms,
            ArmsCoverage::Left => self.left_arm += s.arms,
        }
    }
}

/// Sum soak over the equipped pieces only.
pub fn total_soak<'a>(armor: impl IntoIterator<Item = &'a Armor>) -> LocationSoak {
    let mut soak = LocationSoak::default();
    for a in armor.into_iter().filter(|a| a.equipped) {
        soak.add(a);
    }
    soak
}
