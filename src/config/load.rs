use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::StitchConfig;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: StitchConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: StitchConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Atlas output path, relative to the config file directory.
    pub fn resolve_atlas(&self) -> PathBuf {
        self.config_dir.join(&self.config.atlas)
    }

    /// Metadata output path, relative to the config file directory.
    pub fn resolve_metadata(&self) -> PathBuf {
        self.config_dir.join(&self.config.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resolves_relative_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stitcher.json");
        std::fs::write(
            &path,
            r#"{ "padding": 8, "atlas": "out/atlas.png", "metadata": "/abs/meta.json" }"#,
        )
        .unwrap();

        let loaded = LoadedConfig::load(&path).unwrap();
        assert_eq!(loaded.config.padding, 8);
        assert_eq!(loaded.resolve_atlas(), tmp.path().join("out/atlas.png"));
        assert_eq!(loaded.resolve_metadata(), PathBuf::from("/abs/meta.json"));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stitcher.json");
        std::fs::write(&path, "{ padding: 8 }").unwrap();
        assert!(LoadedConfig::load(&path).is_err());
    }
}
