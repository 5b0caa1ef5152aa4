//! d20 skill tests: successes against a target number and focus, and
//! complications at or above a Dread-adjusted threshold.

use serde::{Deserialize, Serialize};

/// The fixed face of the die bought with a Chronicle Point.
pub const AUTO_SUCCESS_FACE: u8 = 1;

/// Default complication threshold before Dread is applied.
pub const BASE_COMPLICATION_THRESHOLD: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTestParams {
    pub target_number: i32,
    pub focus: i32,
    pub complication_threshold: i32,
}

impl SkillTestParams {
    /// Threshold is `20 - dread_effect`, so each Dread level widens the
    /// complication range by one face.
    pub fn new(target_number: i32, focus: i32, dread_effect: u32) -> Self {
        Self {
            target_number,
            focus,
            complication_threshold: BASE_COMPLICATION_THRESHOLD - dread_effect as i32,
        }
    }
}

/// Scoring of a single d20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieScore {
    pub value: u8,
    pub successes: u32,
    pub complication: bool,
    #[serde(default)]
    pub auto: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTestOutcome {
    pub dice: Vec<DieScore>,
    pub total_successes: u32,
    pub total_complications: u32,
}

/// Successes for one value: the TN and focus checks are independent, so a
/// die under both scores two.
pub fn successes_for(value: u8, params: &SkillTestParams) -> u32 {
    let v = value as i32;
    u32::from(v <= params.target_number) + u32::from(v <= params.focus)
}

pub fn score_die(value: u8, params: &SkillTestParams) -> DieScore {
    DieScore {
        value,
        successes: successes_for(value, params),
        complication: value as i32 >= params.complication_threshold,
        auto: false,
    }
}

/// Score every rolled die, then fold in the auto-success die if one was
/// bought. The auto die is scored like any other but never complicates.
pub fn evaluate(params: &SkillTestParams, rolls: &[u8], auto_success: bool) -> SkillTestOutcome {
    let mut dice: Vec<DieScore> = rolls.iter().map(|&v| score_die(v, params)).collect();
    if auto_success {
        dice.push(DieScore {
            value: AUTO_SUCCESS_FACE,
            successes: successes_for(AUTO_SUCCESS_FACE, params),
            complication: false,
            auto: true,
        });
    }

    let total_successes = dice.iter().map(|d| d.successes).sum();
    let total_complications = dice.iter().filter(|d| d.complication).count() as u32;
    tracing::debug!(
        tn = params.target_number,
        focus = params.focus,
        comp = params.complication_threshold,
        ?rolls,
        auto_success,
        total_successes,
        total_complications,
        "skill test scored"
    );

    SkillTestOutcome {
        dice,
        total_successes,
        total_complications,
    }
}

/// NPC tests use bands instead of independent checks: at or under focus is
/// two successes, otherwise at or under TN is one. NPCs take no complications.
pub fn evaluate_npc(target_number: i32, focus: i32, rolls: &[u8]) -> u32 {
    rolls
        .iter()
        .map(|&v| {
            let v = v as i32;
            if v <= focus {
                2
            } else if v <= target_number {
                1
            } else {
                0
            }
        })
        .sum()
}

/// `attribute + expertise`.
pub fn target_number(attribute: i32, expertise: i32) -> i32 {
    attribute.saturating_add(expertise)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_above_tn_counts_both_checks_independently() {
        let params = SkillTestParams {
            target_number: 5,
            focus: 8,
            complication_threshold: 20,
        };
        // 7 is over TN but under focus: one success from focus alone.
        assert_eq!(successes_for(7, &params), 1);
        assert_eq!(successes_for(4, &params), 2);
        // The NPC bands give the same die two.
        assert_eq!(evaluate_npc(5, 8, &[7]), 2);
    }

    #[test]
    fn auto_die_never_complicates() {
        let params = SkillTestParams {
            target_number: 0,
            focus: 0,
            complication_threshold: 1,
        };
        let out = evaluate(&params, &[], true);
        assert_eq!(out.total_complications, 0);
        assert_eq!(out.total_successes, 0);
        assert!(out.dice[0].auto);
    }
}
