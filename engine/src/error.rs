use thiserror::Error;

use crate::DieType;

/// A damage formula string that does not have the `<base>+<N>DSY` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("damage formula is empty")]
    Empty,
    #[error(r#"damage must be in the format "X+DSY" or "X+2DSY" (e.g. 1+DSY, 0+2DSY), got "{0}""#)]
    InvalidFormat(String),
    #[error("damage formula needs at least one DSY die, got \"{0}\"")]
    NoDice(String),
    #[error("number too large in damage formula \"{0}\"")]
    Overflow(String),
}

/// The dice source failed to produce results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("scripted dice ran out of values")]
    Exhausted,
    #[error("dice source unavailable: {0}")]
    Unavailable(String),
    #[error("dice source returned {got} {die} results, expected {expected}")]
    ShortRoll {
        die: DieType,
        expected: usize,
        got: usize,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error(transparent)]
    Dice(#[from] DiceError),
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
    #[error("unknown skill '{0}'")]
    UnknownSkill(String),
    #[error("weapon '{0}' not found")]
    UnknownWeapon(String),
    #[error("character '{0}' not found")]
    UnknownCharacter(String),
    #[error("content error: {0}")]
    Content(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
