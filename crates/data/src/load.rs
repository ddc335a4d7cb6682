use crate::schema::{parse_category_tree, CategoryTree, GameConfig};
use anyhow::Context;
use middl_core::Catalog;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.json";
pub const METHODS_FILE: &str = "methods.json";

/// Everything the game needs at startup.
#[derive(Debug, Clone)]
pub struct Assets {
    pub config: GameConfig,
    pub catalog: Catalog,
}

/// Reads `config.json` from `dir`, falling back to defaults when it is absent.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE);
    let config: GameConfig = if path.exists() {
        load_json(&path)?
    } else {
        log::info!("{} not found, using default config", path.display());
        GameConfig::default()
    };
    config
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

/// Reads `methods.json` from `dir`, falling back to the built-in tree.
pub fn load_category_tree(dir: &Path) -> anyhow::Result<CategoryTree> {
    let path = dir.join(METHODS_FILE);
    if !path.exists() {
        log::info!("{} not found, using built-in category tree", path.display());
        return Ok(CategoryTree::standard());
    }
    let value: Value = load_json(&path)?;
    parse_category_tree(&value).with_context(|| format!("parse tree {}", path.display()))
}

pub fn load_assets(dir: &Path) -> anyhow::Result<Assets> {
    let config = load_game_config(dir)?;
    let tree = load_category_tree(dir)?;
    let catalog = Catalog::generate(&tree, &config.pricing)
        .with_context(|| format!("generate catalog from {}", dir.display()))?;
    Ok(Assets { config, catalog })
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "middl_data_load_test_{}_{}",
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("mkdir");
        dir
    }

    #[test]
    fn empty_dir_uses_defaults() {
        let dir = scratch_dir();
        let assets = load_assets(&dir).expect("load");
        assert_eq!(assets.config, GameConfig::default());
        assert_eq!(assets.catalog.len(), 146);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = scratch_dir();
        fs::write(dir.join(CONFIG_FILE), r#"{"sequence_length": 4, "pricing": {"scale": 4.0}}"#)
            .expect("write");
        let config = load_game_config(&dir).expect("load");
        assert_eq!(config.sequence_length, 4);
        assert_eq!(config.default_chips, 100);
        assert_eq!(config.pricing.growth, 2.0);
        assert_eq!(config.pricing.scale, 4.0);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn zero_length_config_is_rejected() {
        let dir = scratch_dir();
        fs::write(dir.join(CONFIG_FILE), r#"{"sequence_length": 0}"#).expect("write");
        assert!(load_game_config(&dir).is_err());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_category_fails_catalog_generation() {
        let dir = scratch_dir();
        fs::write(
            dir.join(METHODS_FILE),
            r#"{"center": {"color": {"red": ["Hearts", "Diamonds"]}}, "corner": {"generic": {}}}"#,
        )
        .expect("write");
        let err = load_assets(&dir).unwrap_err();
        assert!(format!("{err:#}").contains("\"corner\""), "{err:#}");
        let _ = fs::remove_dir_all(dir);
    }
}
