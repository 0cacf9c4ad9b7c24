use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const TOCK_DIR: &str = ".tock";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub max_iterations: usize,
    pub temperature: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            base_url: None,
            model: "qwen3:0.6b".to_string(),
            max_iterations: 20,
            temperature: 0.0,
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        if config_exists() {
            load_config()
        } else {
            Ok(Config::default())
        }
    }
}

pub fn get_tock_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(TOCK_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_tock_dir().join("config.toml")
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!("Config file not found. Run 'tock init' to create one.")
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", config_path.display(), e)
        }
    })?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))
}

pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
    }

    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_the_local_ollama_setup() {
        let config = Config::default();
        assert!(config.provider.is_none());
        assert_eq!(config.model, "qwen3:0.6b");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_iterations, 20);
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let config = Config {
            provider: Some("openai".into()),
            model: "gpt-4o".into(),
            max_iterations: 5,
            temperature: 0.7,
            ..Config::default()
        };
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.provider.as_deref(), Some("openai"));
        assert_eq!(loaded.model, "gpt-4o");
        assert_eq!(loaded.max_iterations, 5);
        assert_eq!(loaded.temperature, 0.7);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("model = \"llama3.2\"\n").unwrap();
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_iterations, 20);
    }

    #[test]
    fn missing_file_has_a_helpful_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config_from(&tmp.path().join("config.toml")).unwrap_err();
        assert!(err.to_string().contains("tock init"));
    }
}
