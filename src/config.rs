//! Generator configuration
//!
//! Loaded from a `restscaffold.toml` that sits alongside the catalog, or from
//! an explicit `--config` path. A missing file means defaults.
//!
//! ```toml
//! max_depth = 8
//! class_suffix = "Api"
//! output_dir = "src/generated"
//!
//! [tags]
//! OrderService = ["Orders", "Sales"]
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name looked up next to the catalog
pub const CONFIG_FILE_NAME: &str = "restscaffold.toml";

const DEFAULT_MAX_DEPTH: usize = 16;

/// Settings that shape a generation run
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Deepest resource nesting accepted below a root service
    pub max_depth: usize,
    /// Appended to the implementation name to form the generated class name
    pub class_suffix: String,
    /// Output directory used when `--output` is not given
    pub output_dir: Option<PathBuf>,
    /// Documentation tags per interface type
    pub tags: BTreeMap<String, Vec<String>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            class_suffix: "Api".to_string(),
            output_dir: None,
            tags: BTreeMap::new(),
        }
    }
}

/// Load generator configuration from a TOML file
///
/// # Returns
///
/// `Ok(Some(config))` if the file exists and parses, `Ok(None)` if it does
/// not exist, `Err` if it exists but cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(config_path).with_context(|| {
        format!(
            "Failed to read generator config: {}",
            config_path.display()
        )
    })?;
    let config: GeneratorConfig = toml::from_str(&contents).with_context(|| {
        format!(
            "Failed to parse generator config: {}",
            config_path.display()
        )
    })?;
    if config.max_depth == 0 {
        anyhow::bail!(
            "max_depth must be at least 1 in {}",
            config_path.display()
        );
    }
    Ok(Some(config))
}

/// Look for `restscaffold.toml` in the catalog's directory
pub fn auto_detect_config_path(catalog_path: &Path) -> Option<PathBuf> {
    let dir = catalog_path.parent()?;
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Resolve the config path
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. Auto-detected alongside the catalog
/// 3. None (defaults)
pub fn resolve_config_path(explicit_path: Option<&Path>, catalog_path: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    auto_detect_config_path(catalog_path)
}

/// Resolve and load the configuration, falling back to defaults
///
/// An explicit path that does not exist is an error; a missing auto-detected
/// file is not.
pub fn resolve_config(
    explicit_path: Option<&Path>,
    catalog_path: &Path,
) -> anyhow::Result<GeneratorConfig> {
    match resolve_config_path(explicit_path, catalog_path) {
        Some(path) => match load_config(&path)? {
            Some(config) => Ok(config),
            None if explicit_path.is_some() => {
                anyhow::bail!("Generator config not found: {}", path.display())
            }
            None => Ok(GeneratorConfig::default()),
        },
        None => Ok(GeneratorConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::fs;

    #[test]
    fn test_load_config_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join(CONFIG_FILE_NAME))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_load_config_partial_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "class_suffix = \"Swagger\"\n[tags]\nOrderService = [\"Orders\"]\n").unwrap();
        let config = load_config(&path).unwrap().unwrap();
        assert_eq!(config.class_suffix, "Swagger");
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.tags["OrderService"], vec!["Orders".to_string()]);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "max_depth = 0\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_resolve_config_auto_detect() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.yaml");
        assert_eq!(resolve_config(None, &catalog).unwrap(), GeneratorConfig::default());

        fs::write(dir.path().join(CONFIG_FILE_NAME), "max_depth = 3\n").unwrap();
        assert_eq!(resolve_config(None, &catalog).unwrap().max_depth, 3);
    }

    #[test]
    fn test_resolve_config_explicit_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.yaml");
        let missing = dir.path().join("nope.toml");
        assert!(resolve_config(Some(&missing), &catalog).is_err());
    }
}
