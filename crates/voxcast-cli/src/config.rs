use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Fallbacks applied when the matching command-line flag is absent.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    pub preset: Option<String>,
    pub format: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = path.cloned().unwrap_or_else(|| {
            dirs::config_dir()
                .map(|p| p.join("voxcast").join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config() {
        let config: Config = toml::from_str("[defaults]\npreset = \"deep_calm\"\n").expect("toml");
        assert_eq!(config.defaults.preset.as_deref(), Some("deep_calm"));
        assert!(config.defaults.format.is_none());
        assert!(config.defaults.output_dir.is_none());
    }

    #[test]
    fn empty_config_is_valid() {
        let config: Config = toml::from_str("").expect("toml");
        assert!(config.defaults.preset.is_none());
    }
}
