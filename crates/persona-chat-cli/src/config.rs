//! Configuration management for Persona Chat CLI
//!
//! Stores the relay URL, default persona and voice commands in
//! ~/.config/persona-chat/config.toml

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "persona-chat";
const CONFIG_FILE: &str = "config.toml";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_mode")]
    pub default_mode: String,
    /// Speak model replies aloud
    #[serde(default)]
    pub speak: bool,
    /// Speech synthesis command, the reply text is passed as the last argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_command: Option<String>,
    /// Speech recognition command, prints one transcript to stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stt_command: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_mode() -> String {
    "friend".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_mode: default_mode(),
            speak: false,
            tts_command: None,
            stt_command: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Update one setting by its command-line key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base-url" => self.base_url = value.trim_end_matches('/').to_string(),
            "default-mode" => self.default_mode = value.to_string(),
            "speak" => {
                self.speak = match value {
                    "true" | "on" | "1" => true,
                    "false" | "off" | "0" => false,
                    other => bail!("Invalid value for speak: '{}' (use on/off)", other),
                }
            }
            "tts-command" => self.tts_command = non_empty(value),
            "stt-command" => self.stt_command = non_empty(value),
            other => bail!(
                "Unknown config key '{}'. Keys: base-url, default-mode, speak, tts-command, stt-command",
                other
            ),
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Split a configured command line into program and arguments
pub fn split_command(command: &str) -> Option<(String, Vec<String>)> {
    let mut words = command.split_whitespace().map(str::to_string);
    let program = words.next()?;
    Some((program, words.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: Config = toml::from_str("speak = true").unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.default_mode, "friend");
        assert!(config.speak);
        assert!(config.tts_command.is_none());
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = Config::default();
        config.set("default-mode", "lover").unwrap();
        config.set("tts-command", "espeak -v en").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_mode, "lover");
        assert_eq!(loaded.tts_command.as_deref(), Some("espeak -v en"));
        assert!(loaded.stt_command.is_none());
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_flag() {
        let mut config = Config::default();
        assert!(config.set("api-key", "x").is_err());
        assert!(config.set("speak", "maybe").is_err());

        config.set("speak", "on").unwrap();
        assert!(config.speak);
        config.set("base-url", "https://chat.example.com/").unwrap();
        assert_eq!(config.base_url, "https://chat.example.com");
        config.set("stt-command", "  ").unwrap();
        assert!(config.stt_command.is_none());
    }

    #[test]
    fn test_split_command() {
        assert_eq!(
            split_command("espeak -v en"),
            Some(("espeak".to_string(), vec!["-v".to_string(), "en".to_string()]))
        );
        assert_eq!(split_command("   "), None);
    }
}
