//! A resolved roll and its reroll history.
//!
//! The session owns only the raw dice and the fixed parameters of the roll.
//! Every derived value (successes, damage, hit location) is recomputed from
//! those on demand, so a reroll never has to patch totals.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::character::WeaponRange;
use crate::error::DiceError;
use crate::formula::DamageFormula;
use crate::hit_location::HitLocation;
use crate::skill::{self, SkillTestOutcome, SkillTestParams};
use crate::store::QualityRef;
use crate::symmetry::SymmetryTally;
use crate::{DiceSource, DieType, roll_exact};

/// Most recent snapshots kept; older ones fall off the end.
pub const HISTORY_LIMIT: usize = 10;

const REROLL_NOTE: &str = "Rerolled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Melee,
    Ranged,
}

impl fmt::Display for BonusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BonusKind::Melee => f.write_str("MELEE BONUS"),
            BonusKind::Ranged => f.write_str("RANGED BONUS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRoll {
    pub skill: String,
    pub params: SkillTestParams,
    pub auto_success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRoll {
    pub weapon: String,
    pub range: Option<WeaponRange>,
    pub formula: DamageFormula,
    pub bonus: u32,
    pub bonus_kind: BonusKind,
    pub qualities: Vec<QualityRef>,
}

/// What was rolled, with the parameters that stay fixed across rerolls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RollKind {
    Skill(SkillRoll),
    Attack(AttackRoll),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub location_roll: Option<u8>,
    pub hit_location: HitLocation,
    pub symmetry: SymmetryTally,
    pub total_damage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RollOutcome {
    Skill(SkillTestOutcome),
    Attack(AttackOutcome),
}

/// Dice as they were before a reroll replaced some of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollSnapshot {
    pub at: DateTime<Utc>,
    pub d20: Vec<u8>,
    pub d6: Vec<u8>,
    pub note: String,
}

/// Dice picked for a reroll, by type and index. Sets, so picking the same die
/// twice is one pick, and iteration is in ascending index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerollSelection {
    #[serde(default)]
    pub d20: BTreeSet<usize>,
    #[serde(default)]
    pub d6: BTreeSet<usize>,
}

impl RerollSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (DieType, usize)>) -> Self {
        let mut sel = Self::new();
        for (die, index) in pairs {
            sel.set_mut(die).insert(index);
        }
        sel
    }

    fn set_mut(&mut self, die: DieType) -> &mut BTreeSet<usize> {
        match die {
            DieType::D20 => &mut self.d20,
            DieType::D6 => &mut self.d6,
        }
    }

    /// Flip a die in or out of the selection; returns whether it is now selected.
    pub fn toggle(&mut self, die: DieType, index: usize) -> bool {
        let set = self.set_mut(die);
        if set.remove(&index) {
            false
        } else {
            set.insert(index);
            true
        }
    }

    pub fn is_empty(&self) -> bool {
        self.d20.is_empty() && self.d6.is_empty()
    }

    pub fn len(&self) -> usize {
        self.d20.len() + self.d6.len()
    }
}

/// One die a reroll replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub die: DieType,
    pub index: usize,
    pub old: u8,
    pub new: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollSession {
    pub kind: RollKind,
    d20: Vec<u8>,
    d6: Vec<u8>,
    #[serde(default)]
    history: Vec<RollSnapshot>,
}

impl RollSession {
    pub fn skill(roll: SkillRoll, d20: Vec<u8>) -> Self {
        Self {
            kind: RollKind::Skill(roll),
            d20,
            d6: Vec::new(),
            history: Vec::new(),
        }
    }

    /// An attack rolls its DSY pool plus a single d20 for the hit location.
    pub fn attack(roll: AttackRoll, d6: Vec<u8>, location_roll: u8) -> Self {
        Self {
            kind: RollKind::Attack(roll),
            d20: vec![location_roll],
            d6,
            history: Vec::new(),
        }
    }

    pub fn d20(&self) -> &[u8] {
        &self.d20
    }

    pub fn d6(&self) -> &[u8] {
        &self.d6
    }

    /// Most recent first.
    pub fn history(&self) -> &[RollSnapshot] {
        &self.history
    }

    /// Seed for the next reroll of this session. Mixes `base` with the current
    /// dice and every archived roll, so each reroll draws from a new stream
    /// instead of replaying the one that produced the session.
    pub fn reroll_seed(&self, base: u64) -> u64 {
        let mut hasher = DefaultHasher::new();
        base.hash(&mut hasher);
        self.d20.hash(&mut hasher);
        self.d6.hash(&mut hasher);
        self.history.len().hash(&mut hasher);
        for snap in &self.history {
            snap.d20.hash(&mut hasher);
            snap.d6.hash(&mut hasher);
        }
        hasher.finish()
    }

    pub fn outcome(&self) -> RollOutcome {
        self.outcome_for(&self.d20, &self.d6)
    }

    /// Derive the outcome these dice would have under this session's
    /// parameters. Used for the current dice and for history entries alike.
    pub fn outcome_for(&self, d20: &[u8], d6: &[u8]) -> RollOutcome {
        match &self.kind {
            RollKind::Skill(s) => RollOutcome::Skill(skill::evaluate(&s.params, d20, s.auto_success)),
            RollKind::Attack(a) => {
                let symmetry = SymmetryTally::from_faces(d6);
                let location_roll = d20.first().copied();
                RollOutcome::Attack(AttackOutcome {
                    location_roll,
                    hit_location: HitLocation::from_d20(location_roll),
                    total_damage: symmetry.total_damage(a.formula.base),
                    symmetry,
                })
            }
        }
    }

    /// Replace the selected dice with fresh rolls.
    ///
    /// Indices past the end of the current dice are dropped from the
    /// selection. If nothing is left the call is a no-op and returns
    /// `Ok(None)`. Fresh dice are requested before anything is touched, so a
    /// dice failure leaves the session exactly as it was.
    pub async fn apply_reroll<D: DiceSource + ?Sized>(
        &mut self,
        selection: &RerollSelection,
        dice: &mut D,
    ) -> Result<Option<Vec<Replacement>>, DiceError> {
        self.apply_reroll_at(selection, dice, Utc::now()).await
    }

    pub async fn apply_reroll_at<D: DiceSource + ?Sized>(
        &mut self,
        selection: &RerollSelection,
        dice: &mut D,
        at: DateTime<Utc>,
    ) -> Result<Option<Vec<Replacement>>, DiceError> {
        let d20_idx = in_bounds(&selection.d20, self.d20.len(), DieType::D20);
        let d6_idx = in_bounds(&selection.d6, self.d6.len(), DieType::D6);
        if d20_idx.is_empty() && d6_idx.is_empty() {
            return Ok(None);
        }

        let fresh_d20 = roll_exact(dice, DieType::D20, d20_idx.len()).await?;
        let fresh_d6 = roll_exact(dice, DieType::D6, d6_idx.len()).await?;

        self.history.insert(
            0,
            RollSnapshot {
                at,
                d20: self.d20.clone(),
                d6: self.d6.clone(),
                note: REROLL_NOTE.to_string(),
            },
        );
        self.history.truncate(HISTORY_LIMIT);

        let mut replaced = Vec::with_capacity(d20_idx.len() + d6_idx.len());
        for (index, new) in d20_idx.into_iter().zip(fresh_d20) {
            replaced.push(Replacement {
                die: DieType::D20,
                index,
                old: self.d20[index],
                new,
            });
            self.d20[index] = new;
        }
        for (index, new) in d6_idx.into_iter().zip(fresh_d6) {
            replaced.push(Replacement {
                die: DieType::D6,
                index,
                old: self.d6[index],
                new,
            });
            self.d6[index] = new;
        }

        tracing::info!(
            replaced = replaced.len(),
            history = self.history.len(),
            "reroll applied"
        );
        Ok(Some(replaced))
    }

    /// Human-readable card for the current state, newest history first.
    pub fn log_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match (&self.kind, self.outcome()) {
            (RollKind::Skill(s), RollOutcome::Skill(out)) => {
                lines.push(format!(
                    "[SKILL] {} TN={} focus={} comp={}+",
                    s.skill, s.params.target_number, s.params.focus, s.params.complication_threshold
                ));
                let dice = out
                    .dice
                    .iter()
                    .map(|d| {
                        let mut tag = format!("{}", d.successes);
                        if d.complication {
                            tag.push_str(", complication");
                        }
                        if d.auto {
                            tag.push_str(", auto");
                        }
                        format!("{} ({})", d.value, tag)
                    })
                    .collect::<Vec<_>>()
                    .join(" | ");
                lines.push(format!("[D20] {}", dice));
                lines.push(format!(
                    "[RESULT] successes={} complications={}",
                    out.total_successes, out.total_complications
                ));
            }
            (RollKind::Attack(a), RollOutcome::Attack(out)) => {
                let range = a.range.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
                lines.push(format!(
                    "[ATTACK] {} range={} {}={} DSY",
                    a.weapon, range, a.bonus_kind, a.bonus
                ));
                lines.push(format!(
                    "[LOC] d20={} → {}",
                    out.location_roll.unwrap_or(0),
                    out.hit_location
                ));
                lines.push(format!(
                    "[DSY] ({}) {}",
                    out.symmetry.faces.len(),
                    format_faces(&out.symmetry.faces)
                ));
                lines.push(format!(
                    "[DMG] base={} success={} total={}",
                    a.formula.base, out.symmetry.total_success, out.total_damage
                ));
                if out.symmetry.total_effect > 0 {
                    lines.push(format!("[EFFECT] {}", out.symmetry.total_effect));
                }
                if !a.qualities.is_empty() {
                    let names: Vec<_> = a.qualities.iter().map(|q| q.name.as_str()).collect();
                    lines.push(format!("[QUALITIES] {}", names.join(", ")));
                }
            }
            _ => {}
        }

        for (i, snap) in self.history.iter().enumerate() {
            let summary = match self.outcome_for(&snap.d20, &snap.d6) {
                RollOutcome::Skill(out) => format!(
                    "d20=[{}] successes={}",
                    format_faces(&snap.d20),
                    out.total_successes
                ),
                RollOutcome::Attack(out) => format!(
                    "d6=[{}] loc {} total={}",
                    format_faces(&snap.d6),
                    out.location_roll.unwrap_or(0),
                    out.total_damage
                ),
            };
            lines.push(format!("[HISTORY] #{} {} ({})", i + 1, summary, snap.note));
        }
        lines
    }
}

/// One `[REROLL]` line per replaced die, numbered from 1 as shown on the card.
pub fn reroll_lines(replaced: &[Replacement]) -> Vec<String> {
    replaced
        .iter()
        .map(|r| format!("[REROLL] {} #{}: {} → {}", r.die, r.index + 1, r.old, r.new))
        .collect()
}

fn in_bounds(selected: &BTreeSet<usize>, len: usize, die: DieType) -> Vec<usize> {
    let (keep, dropped): (Vec<usize>, Vec<usize>) = selected.iter().partition(|&&i| i < len);
    if !dropped.is_empty() {
        tracing::warn!(%die, ?dropped, len, "ignoring reroll indices past the end of the roll");
    }
    keep
}

fn format_faces(faces: &[u8]) -> String {
    faces
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}
