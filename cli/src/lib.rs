//! File helpers shared by the `chronicle` and `damage-stats` binaries.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chronicle_engine::config::is_yaml;
use chronicle_engine::content::{parse_bundle, sample_store};
use chronicle_engine::store::MemoryStore;
use encoding_rs::Encoding;

/// Read a text file, honouring a UTF-8 or UTF-16 byte-order mark.
pub fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

/// Content from `path`, or the bundled sample sheets when no file is given.
pub fn load_store(path: Option<&Path>) -> anyhow::Result<MemoryStore> {
    match path {
        Some(p) => {
            let text = read_text_auto(p)?;
            let bundle = parse_bundle(&text, is_yaml(p))
                .with_context(|| format!("failed to load content: {}", p.display()))?;
            Ok(MemoryStore::from_bundle(bundle))
        }
        None => sample_store(),
    }
}

#[cfg(test)]
mod tests {
    use chronicle_engine::store::DataStore;

    use super::*;

    #[test]
    fn utf16_content_with_bom_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.json");
        let mut bytes = vec![0xFF, 0xFE];
        for unit in r#"{"characters":[{"name":"Ada"}]}"#.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        fs::write(&path, bytes).unwrap();

        let text = read_text_auto(&path).unwrap();
        assert!(text.starts_with(r#"{"characters""#));
        assert!(load_store(Some(&path)).unwrap().character("ada").is_some());
    }
}
