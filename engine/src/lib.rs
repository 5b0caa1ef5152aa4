use std::collections::VecDeque;
use std::fmt;

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub mod api;
pub mod armor;
pub mod character;
pub mod config;
pub mod content;
pub mod dread;
pub mod error;
pub mod formula;
pub mod hit_location;
pub mod session;
pub mod skill;
pub mod store;
pub mod symmetry;
pub mod vehicle;
pub mod view;
pub mod wounds;

pub use error::{DiceError, EngineError, FormulaError};
pub use formula::DamageFormula;
pub use hit_location::HitLocation;
pub use session::{RerollSelection, RollKind, RollOutcome, RollSession};
pub use symmetry::{SymmetryOutcome, SymmetryTally};

/// The two dice the rules use: d20 for tests and hit locations, d6 for Symmetry dice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DieType {
    D20,
    D6,
}

impl DieType {
    pub fn faces(self) -> u8 {
        match self {
            DieType::D20 => 20,
            DieType::D6 => 6,
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.faces())
    }
}

/// Where fresh die faces come from. Implementations may animate or defer, so
/// the call is async; callers must not derive anything until it resolves.
#[async_trait]
pub trait DiceSource: Send {
    async fn roll(&mut self, die: DieType, count: usize) -> Result<Vec<u8>, DiceError>;
}

/// Roll exactly `count` dice, treating a short or long answer as a failure.
pub(crate) async fn roll_exact<D: DiceSource + ?Sized>(
    dice: &mut D,
    die: DieType,
    count: usize,
) -> Result<Vec<u8>, DiceError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let faces = dice.roll(die, count).await?;
    if faces.len() != count {
        return Err(DiceError::ShortRoll {
            die,
            expected: count,
            got: faces.len(),
        });
    }
    Ok(faces)
}

enum Source {
    Seeded(ChaCha8Rng),
    Scripted(VecDeque<u8>),
}

/// Deterministic dice: a seeded ChaCha stream, or a fixed script for tests.
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Faces are handed out in order regardless of die type.
    pub fn from_scripted(values: Vec<u8>) -> Self {
        Self {
            source: Source::Scripted(values.into()),
        }
    }

    pub fn roll_die(&mut self, die: DieType) -> Result<u8, DiceError> {
        match &mut self.source {
            Source::Seeded(rng) => Ok(rng.gen_range(1..=die.faces())),
            Source::Scripted(queue) => queue.pop_front().ok_or(DiceError::Exhausted),
        }
    }

    pub fn roll_many(&mut self, die: DieType, count: usize) -> Result<Vec<u8>, DiceError> {
        (0..count).map(|_| self.roll_die(die)).collect()
    }

    pub fn d20(&mut self) -> Result<u8, DiceError> {
        self.roll_die(DieType::D20)
    }
}

#[async_trait]
impl DiceSource for Dice {
    async fn roll(&mut self, die: DieType, count: usize) -> Result<Vec<u8>, DiceError> {
        self.roll_many(die, count)
    }
}
