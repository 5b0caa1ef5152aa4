use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::is_yaml;
use crate::store::{ContentBundle, MemoryStore};

pub fn builtin_bundles() -> HashMap<&'static str, &'static str> {
    HashMap::from([("sample", include_str!("../content/sample.yaml"))])
}

pub fn parse_bundle(text: &str, yaml: bool) -> Result<ContentBundle> {
    if yaml {
        serde_yaml::from_str(text).context("failed to parse content YAML")
    } else {
        serde_json::from_str(text).context("failed to parse content JSON")
    }
}

pub fn load_bundle(path: impl AsRef<Path>) -> Result<ContentBundle> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read content: {}", path.display()))?;
    parse_bundle(&text, is_yaml(path))
        .with_context(|| format!("failed to load content: {}", path.display()))
}

pub fn builtin_bundle(name: &str) -> Result<ContentBundle> {
    let text = builtin_bundles()
        .get(name)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("no builtin content named '{}'", name))?;
    parse_bundle(text, true).with_context(|| format!("builtin content '{}' is invalid", name))
}

/// A store seeded with the bundled sample sheets.
pub fn sample_store() -> Result<MemoryStore> {
    Ok(MemoryStore::from_bundle(builtin_bundle("sample")?))
}
