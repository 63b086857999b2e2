//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;
use crate::application::matching::DEFAULT_CUTOFF;

pub const DEFAULT_CONTACT: &str = "若要求补充回答可联系开发者阿咪。";

/// Bot configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub qa: QaConfig,
    /// User ids allowed to manage the whitelist
    pub admins: Vec<String>,
    /// Group ids allowed to ask questions
    pub whitelist: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct QaConfig {
    /// JSON question/answer table
    pub data_path: PathBuf,
    /// Base directory for relative image paths
    pub image_dir: PathBuf,
    pub cutoff: u8,
    /// Keys suggested when nothing matches
    pub sample_count: usize,
    /// Extra line in the no-match reply; null to omit
    pub contact: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig::default(),
            qa: QaConfig::default(),
            admins: Vec::new(),
            whitelist: Vec::new(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "campus-qa-bot".to_string(),
            prefix: "/".to_string(),
        }
    }
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/questions.json"),
            image_dir: PathBuf::from("data"),
            cutoff: DEFAULT_CUTOFF,
            sample_count: 3,
            contact: Some(DEFAULT_CONTACT.to_string()),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config {}: {}", path.display(), e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Write(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Write(format!("Failed to create {}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, yaml)
            .map_err(|e| ConfigError::Write(format!("Failed to write {}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qa.cutoff > 100 {
            return Err(ConfigError::InvalidValue(format!("qa.cutoff must be 0-100, got {}", self.qa.cutoff)));
        }
        if self.bot.prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue("bot.prefix must not contain whitespace".to_string()));
        }
        Ok(())
    }

    /// Override settings from environment variables
    pub fn apply_env(&mut self) {
        if let Ok(prefix) = std::env::var("QA_BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Ok(path) = std::env::var("QA_BOT_DATA") {
            self.qa.data_path = PathBuf::from(path);
        }

        if let Ok(cutoff) = std::env::var("QA_BOT_CUTOFF") {
            match cutoff.parse::<u8>() {
                Ok(value) if value <= 100 => self.qa.cutoff = value,
                _ => tracing::warn!("Ignoring invalid QA_BOT_CUTOFF {:?}", cutoff),
            }
        }
    }
}
