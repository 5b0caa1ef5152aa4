//! Damage formulas of the form `<base>+<N>DSY`, e.g. `3+2DSY` or `1+DSY`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FormulaError;

static FORMULA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\+(\d*)DSY$").expect("valid regex"));

/// A parsed damage formula: a flat base plus a number of Symmetry dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageFormula {
    pub base: u32,
    pub die_count: u32,
}

impl DamageFormula {
    /// Whitespace is ignored and the suffix is case-insensitive. An empty
    /// die count means one die.
    pub fn parse(input: &str) -> Result<Self, FormulaError> {
        let normalized: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        if normalized.is_empty() {
            return Err(FormulaError::Empty);
        }

        let caps = FORMULA_RE
            .captures(&normalized)
            .ok_or_else(|| FormulaError::InvalidFormat(input.to_string()))?;

        let base: u32 = caps[1]
            .parse()
            .map_err(|_| FormulaError::Overflow(input.to_string()))?;
        let die_count: u32 = match &caps[2] {
            "" => 1,
            digits => digits
                .parse()
                .map_err(|_| FormulaError::Overflow(input.to_string()))?,
        };
        if die_count == 0 {
            return Err(FormulaError::NoDice(input.to_string()));
        }

        Ok(Self { base, die_count })
    }
}

impl FromStr for DamageFormula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DamageFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.die_count == 1 {
            write!(f, "{}+DSY", self.base)
        } else {
            write!(f, "{}+{}DSY", self.base, self.die_count)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_and_case_are_ignored() {
        let f = DamageFormula::parse(" 2 + 3 dsy ").unwrap();
        assert_eq!(f, DamageFormula { base: 2, die_count: 3 });
    }

    #[test]
    fn zero_dice_is_rejected() {
        assert!(matches!(
            DamageFormula::parse("3+0DSY"),
            Err(FormulaError::NoDice(_))
        ));
    }

    #[test]
    fn huge_numbers_do_not_panic() {
        assert!(matches!(
            DamageFormula::parse("99999999999999+DSY"),
            Err(FormulaError::Overflow(_))
        ));
    }
}
