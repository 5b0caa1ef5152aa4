use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAMAGE_FORMULA: &str = "1+DSY";

/// Table defaults a group may override from a YAML or JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RulesConfig {
    pub default_d20_count: usize,
    pub min_d20_count: usize,
    pub max_d20_count: usize,
    pub npc_min_d20_count: usize,
    pub default_damage: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            default_d20_count: 2,
            min_d20_count: 1,
            max_d20_count: 5,
            npc_min_d20_count: 2,
            default_damage: DEFAULT_DAMAGE_FORMULA.to_string(),
        }
    }
}

impl RulesConfig {
    /// `.yaml`/`.yml` parse as YAML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read rules config: {}", path.display()))?;
        let cfg = if is_yaml(path) {
            serde_yaml::from_str(&text)
                .with_context(|| format!("failed to parse rules YAML: {}", path.display()))?
        } else {
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse rules JSON: {}", path.display()))?
        };
        Ok(cfg)
    }

    /// Player d20 count, defaulted and clamped to the configured range.
    pub fn player_d20_count(&self, requested: Option<usize>) -> usize {
        let lo = self.min_d20_count.min(self.max_d20_count);
        requested
            .unwrap_or(self.default_d20_count)
            .clamp(lo, self.max_d20_count)
    }

    pub fn npc_d20_count(&self, requested: usize) -> usize {
        requested.max(self.npc_min_d20_count)
    }
}

/// `.yaml` and `.yml` files are YAML; everything else is read as JSON.
pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}
