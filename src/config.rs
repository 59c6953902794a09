use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::theme::ThemeConfig;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where reminders are stored
    pub data_file: Option<PathBuf>,

    /// Log destination for the interactive screen
    pub log_file: Option<PathBuf>,

    /// chrono format used for due dates
    pub date_format: String,

    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            log_file: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("reminders").join("config.toml"))
    }

    /// Load from `path` (or the default location). Missing files give the
    /// defaults; unreadable or invalid files are logged and also give the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Failed to parse {}: {}", path.display(), e),
            },
            Err(e) => tracing::warn!("Failed to read {}: {}", path.display(), e),
        }

        Self::default()
    }

    pub fn data_file(&self) -> Option<PathBuf> {
        self.data_file
            .clone()
            .or_else(|| data_dir().map(|d| d.join("reminders.toml")))
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| data_dir().map(|d| d.join("reminders.log")))
    }
}

fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("reminders"))
}
