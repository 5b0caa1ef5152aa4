//! Symmetry dice (DSY): six-sided dice where 1, 2 and 6 are special faces.

use serde::{Deserialize, Serialize};

use crate::formula::DamageFormula;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymmetryOutcome {
    pub success: u32,
    pub effect: u32,
}

/// Face 1 is one success, face 2 is two, face 6 is an effect. Anything else
/// (including out-of-range faces) scores nothing.
pub fn map_face(face: u8) -> SymmetryOutcome {
    match face {
        1 => SymmetryOutcome { success: 1, effect: 0 },
        2 => SymmetryOutcome { success: 2, effect: 0 },
        6 => SymmetryOutcome { success: 0, effect: 1 },
        _ => SymmetryOutcome::default(),
    }
}

/// Aggregate of a sequence of DSY faces. Faces keep their rolled order so a
/// reroll can address them by index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymmetryTally {
    pub faces: Vec<u8>,
    pub total_success: u32,
    pub total_effect: u32,
}

impl SymmetryTally {
    pub fn from_faces(faces: &[u8]) -> Self {
        let (total_success, total_effect) = faces
            .iter()
            .map(|&f| map_face(f))
            .fold((0, 0), |(s, e), o| (s + o.success, e + o.effect));
        Self {
            faces: faces.to_vec(),
            total_success,
            total_effect,
        }
    }

    pub fn total_damage(&self, base: u32) -> u32 {
        base.saturating_add(self.total_success)
    }
}

/// Bonus DSY granted by Strength (melee) or Awareness (ranged).
pub fn symmetry_bonus(attribute: i32) -> u32 {
    match attribute {
        i32::MIN..=8 => 0,
        9 => 1,
        10..=11 => 2,
        12..=13 => 3,
        14..=15 => 4,
        _ => 5,
    }
}

/// Number of DSY rolled for an attack: the formula's dice plus the bonus.
pub fn attack_dice(formula: DamageFormula, bonus: i64) -> u32 {
    (formula.die_count as i64 + bonus).clamp(0, u32::MAX as i64) as u32
}
