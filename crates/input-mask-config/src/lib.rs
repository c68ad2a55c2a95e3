use input_mask_engine::{MaskConfig, MaskError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Placeholder must be a single character, got {0:?}")]
    InvalidPlaceholder(String),

    #[error("Validation specifier must be a single character, got {0:?}")]
    InvalidSpecifier(String),

    #[error(transparent)]
    InvalidPattern(#[from] MaskError),
}

/// Process-wide mask settings, read once before any field is created.
///
/// ```toml
/// placeholder = "_"
///
/// [validation]
/// H = "[0-9A-Fa-f]"
///
/// [masks]
/// phone = "(999) 999-9999"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Extra slot specifiers, added on top of the built-in `A`, `a` and `9`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub validation: BTreeMap<String, String>,
    /// Named templates.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub masks: BTreeMap<String, String>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/input-mask");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Build the engine configuration: built-in specifiers plus the ones
    /// declared in `[validation]`, which may override the built-ins.
    pub fn mask_config(&self) -> Result<MaskConfig, ConfigError> {
        let mut mask_config = MaskConfig::default();

        if let Some(placeholder) = &self.placeholder {
            mask_config.set_placeholder(
                single_char(placeholder)
                    .ok_or_else(|| ConfigError::InvalidPlaceholder(placeholder.clone()))?,
            );
        }

        for (specifier, pattern) in &self.validation {
            let ch = single_char(specifier)
                .ok_or_else(|| ConfigError::InvalidSpecifier(specifier.clone()))?;
            mask_config.add_char_validation(ch, pattern)?;
        }

        Ok(mask_config)
    }

    pub fn mask(&self, name: &str) -> Option<&str> {
        self.masks.get(name).map(String::as_str)
    }

}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> Config {
        let mut config = Config {
            placeholder: Some("*".to_string()),
            ..Config::default()
        };
        config
            .validation
            .insert("H".to_string(), "[0-9A-Fa-f]".to_string());
        config
            .masks
            .insert("phone".to_string(), "(999) 999-9999".to_string());
        config
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/input-mask/config.toml"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = sample();

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.mask_config().unwrap().placeholder, '_');
    }

    #[test]
    fn test_parse_full_file() {
        let config_content = r##"
placeholder = "#"

[validation]
H = "[0-9A-F]"
9 = "[0-5]"

[masks]
mac = "HH:HH:HH:HH:HH:HH"
date = "99/99/9999"
"##;

        let config: Config = toml::from_str(config_content).unwrap();
        assert_eq!(config.mask("date"), Some("99/99/9999"));
        assert_eq!(config.mask("missing"), None);

        let mask_config = config.mask_config().unwrap();
        assert_eq!(mask_config.placeholder, '#');
        assert!(mask_config.table.accepts('H', 'E'));
        assert!(!mask_config.table.accepts('9', '7'));
        assert!(mask_config.table.accepts('A', 'q'));
    }

    #[test]
    fn test_multi_char_placeholder_is_rejected() {
        let config = Config {
            placeholder: Some("__".to_string()),
            ..Config::default()
        };

        assert!(matches!(
            config.mask_config(),
            Err(ConfigError::InvalidPlaceholder(p)) if p == "__"
        ));
    }

    #[test]
    fn test_multi_char_specifier_is_rejected() {
        let mut config = Config::default();
        config
            .validation
            .insert("HX".to_string(), "[0-9]".to_string());

        assert!(matches!(
            config.mask_config(),
            Err(ConfigError::InvalidSpecifier(s)) if s == "HX"
        ));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let mut config = Config::default();
        config
            .validation
            .insert("X".to_string(), "[oops".to_string());

        let err = config.mask_config().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern(_)));
        assert!(err.to_string().contains("'X'"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "placeholder = [").unwrap();

        let result = Config::load_from_path(&config_file);
        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = sample();

        test_config.save_to_path(&config_file).unwrap();

        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded_config, test_config);
    }
}
