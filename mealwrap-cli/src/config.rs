use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use mealwrap_vibe::client::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmSection::default(),
            server: ServerSection::default(),
        }
    }
}

pub fn config_path() -> PathBuf {
    PathBuf::from("mealwrap.toml")
}

/// Load `mealwrap.toml` from the working directory; a missing file means
/// defaults, not an error.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path())
}

fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config: Config =
        toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config_from(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.server.bind, "127.0.0.1:5000");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mealwrap.toml");
        fs::write(&path, "[server]\nbind = \"0.0.0.0:8080\"\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mealwrap.toml");
        fs::write(&path, "[server\nbind=").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
