use std::path::Path;

use anyhow::{Context, Result};

use super::types::StitchConfig;

/// Save a config to a JSON file with pretty formatting.
pub fn save_config(config: &StitchConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .with_context(|| "failed to serialize config to JSON")?;

    std::fs::write(path, content)
        .with_context(|| format!("failed to write config file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadedConfig;

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stitcher.json");
        let config = StitchConfig {
            padding: 12,
            guides: false,
            ..Default::default()
        };

        save_config(&config, &path).unwrap();
        assert_eq!(LoadedConfig::load(&path).unwrap().config, config);
    }
}
