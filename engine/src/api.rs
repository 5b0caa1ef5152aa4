//! Roll entry points used by the CLI and FFI. Each looks its inputs up in a
//! [`DataStore`], asks the dice source for faces, and hands back a session or
//! a damage roll. State changes go back to the store as intents.

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::error::{EngineError, Result};
use crate::formula::DamageFormula;
use crate::session::{AttackRoll, BonusKind, RollSession, SkillRoll};
use crate::store::{DataStore, resolve_qualities};
use crate::symmetry::{SymmetryTally, attack_dice};
use crate::view::{CharacterView, VehicleView};
use crate::{DiceSource, DieType, roll_exact, skill};

/// How a player skill test should be rolled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SkillRequest {
    pub character: String,
    pub skill: String,
    pub d20_count: Option<usize>,
    pub use_chronicle_point: bool,
}

pub async fn roll_skill_test<S, D>(
    store: &mut S,
    req: &SkillRequest,
    cfg: &RulesConfig,
    dice: &mut D,
) -> Result<RollSession>
where
    S: DataStore + ?Sized,
    D: DiceSource + ?Sized,
{
    let character = lookup_character(store, &req.character)?;
    let params = character.skill_params(&req.skill)?;
    let count = cfg.player_d20_count(req.d20_count);

    let spend = if req.use_chronicle_point {
        let intent = character.spend_chronicle_point();
        if intent.is_none() {
            tracing::warn!(character = %character.name, "no Chronicle Point to spend; rolling without auto-success");
        }
        intent
    } else {
        None
    };

    let rolls = roll_exact(dice, DieType::D20, count).await?;

    // The point is only spent once the dice actually came back.
    let auto_success = spend.is_some();
    if let Some(intent) = spend {
        store.apply(&character.name, &intent)?;
    }

    let session = RollSession::skill(
        SkillRoll {
            skill: req.skill.clone(),
            params,
            auto_success,
        },
        rolls,
    );
    tracing::info!(
        character = %character.name,
        skill = %req.skill,
        dice = count,
        auto_success,
        "skill test rolled"
    );
    Ok(session)
}

/// Weapon attack: the formula's DSY plus the attribute bonus, then one d20
/// for the hit location.
pub async fn roll_attack<S, D>(
    store: &S,
    character: &str,
    weapon: &str,
    cfg: &RulesConfig,
    dice: &mut D,
) -> Result<RollSession>
where
    S: DataStore + ?Sized,
    D: DiceSource + ?Sized,
{
    let c = lookup_character(store, character)?;
    let w = c.weapon(weapon)?;
    let formula = formula_or_default(w.damage.as_deref(), cfg)?;
    let bonus = c.bonus_for(w);
    let total = attack_dice(formula, i64::from(bonus)) as usize;

    let d6 = roll_exact(dice, DieType::D6, total).await?;
    let location = roll_exact(dice, DieType::D20, 1).await?;

    let roll = AttackRoll {
        weapon: w.name.clone(),
        range: w.range,
        formula,
        bonus,
        bonus_kind: if w.is_melee() {
            BonusKind::Melee
        } else {
            BonusKind::Ranged
        },
        qualities: resolve_qualities(store, &w.qualities),
    };
    tracing::info!(character = %c.name, weapon = %w.name, dsy = total, "attack rolled");
    Ok(RollSession::attack(roll, d6, location[0]))
}

/// A bare damage roll with no bonus and no hit location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    pub source: String,
    pub formula: DamageFormula,
    pub symmetry: SymmetryTally,
    pub total_damage: u32,
}

impl DamageRoll {
    pub fn log_lines(&self) -> Vec<String> {
        let faces: Vec<String> = self.symmetry.faces.iter().map(|f| f.to_string()).collect();
        let mut lines = vec![
            format!("[DAMAGE] {} {}", self.source, self.formula),
            format!("[DSY] ({}) {}", faces.len(), faces.join(" | ")),
            format!(
                "[DMG] base={} success={} total={}",
                self.formula.base, self.symmetry.total_success, self.total_damage
            ),
        ];
        if self.symmetry.total_effect > 0 {
            lines.push(format!("[EFFECT] {}", self.symmetry.total_effect));
        }
        lines
    }
}

pub async fn roll_damage<D>(source: &str, formula: DamageFormula, dice: &mut D) -> Result<DamageRoll>
where
    D: DiceSource + ?Sized,
{
    let faces = roll_exact(dice, DieType::D6, formula.die_count as usize).await?;
    let symmetry = SymmetryTally::from_faces(&faces);
    Ok(DamageRoll {
        source: source.to_string(),
        formula,
        total_damage: symmetry.total_damage(formula.base),
        symmetry,
    })
}

pub async fn roll_weapon_damage<S, D>(
    store: &S,
    character: &str,
    weapon: &str,
    cfg: &RulesConfig,
    dice: &mut D,
) -> Result<DamageRoll>
where
    S: DataStore + ?Sized,
    D: DiceSource + ?Sized,
{
    let c = lookup_character(store, character)?;
    let w = c.weapon(weapon)?;
    let formula = formula_or_default(w.damage.as_deref(), cfg)?;
    roll_damage(&w.name, formula, dice).await
}

pub async fn roll_vehicle_impact<S, D>(
    store: &S,
    vehicle: &str,
    cfg: &RulesConfig,
    dice: &mut D,
) -> Result<DamageRoll>
where
    S: DataStore + ?Sized,
    D: DiceSource + ?Sized,
{
    let v = store
        .vehicle(vehicle)
        .ok_or_else(|| EngineError::Content(format!("vehicle '{}' not found", vehicle)))?;
    let formula = formula_or_default(v.impact_damage.as_deref(), cfg)?;
    roll_damage(&format!("{} impact", v.name), formula, dice).await
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NpcSkillRoll {
    pub target_number: i32,
    pub focus: i32,
    pub dice: Vec<u8>,
    pub successes: u32,
}

/// NPC tests roll at least the configured minimum and are never rerolled.
pub async fn roll_npc_skill<D>(
    target_number: i32,
    focus: i32,
    d20_count: usize,
    cfg: &RulesConfig,
    dice: &mut D,
) -> Result<NpcSkillRoll>
where
    D: DiceSource + ?Sized,
{
    let rolls = roll_exact(dice, DieType::D20, cfg.npc_d20_count(d20_count)).await?;
    let successes = skill::evaluate_npc(target_number, focus, &rolls);
    Ok(NpcSkillRoll {
        target_number,
        focus,
        dice: rolls,
        successes,
    })
}

pub fn character_view<S: DataStore + ?Sized>(store: &S, name: &str) -> Result<CharacterView> {
    let c = lookup_character(store, name)?;
    Ok(CharacterView::build(store, &c))
}

pub fn vehicle_view<S: DataStore + ?Sized>(store: &S, name: &str) -> Result<VehicleView> {
    let v = store
        .vehicle(name)
        .ok_or_else(|| EngineError::Content(format!("vehicle '{}' not found", name)))?;
    Ok(VehicleView::build(store, &v))
}

fn lookup_character<S: DataStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<crate::character::Character> {
    store
        .character(name)
        .ok_or_else(|| EngineError::UnknownCharacter(name.to_string()))
}

fn formula_or_default(raw: Option<&str>, cfg: &RulesConfig) -> Result<DamageFormula> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(cfg.default_damage.as_str());
    Ok(DamageFormula::parse(raw)?)
}
