use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::json_store;

pub const MAX_ADVANCE_DELAY_MS: u64 = 2000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Directory holding `meta.json`, `library.json` and `packs.json`.
    /// Unset means the catalog bundled into the binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    #[serde(default = "default_progress_dir")]
    pub progress_dir: String,
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_progress_dir() -> String {
    json_store::default_base_dir().to_string_lossy().to_string()
}
fn default_advance_delay_ms() -> u64 {
    260
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            data_dir: None,
            progress_dir: default_progress_dir(),
            advance_delay_ms: default_advance_delay_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("una-words")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn validate(&mut self) {
        self.advance_delay_ms = self.advance_delay_ms.min(MAX_ADVANCE_DELAY_MS);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
        if self.progress_dir.trim().is_empty() {
            self.progress_dir = default_progress_dir();
        }
        if self.data_dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
            self.data_dir = None;
        }
    }

    pub fn progress_path(&self) -> PathBuf {
        PathBuf::from(&self.progress_dir)
    }
}
