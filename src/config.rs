use crate::catalog::RegionId;
use crate::db;
use crate::error::Result;
use crate::preferences::PreferenceDefaults;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Settings read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the preference database and log file live.
    pub data_dir: Option<PathBuf>,
    /// Replaces the bundled flag catalog.
    pub catalog_path: Option<PathBuf>,
    /// Flags asked per quiz; unset asks every flag of the enabled regions.
    pub questions_per_quiz: Option<usize>,
    pub default_choices: usize,
    pub default_regions: Vec<String>,
    pub log_level: String,
    /// How long a notice stays on screen.
    pub toast_millis: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: None,
            catalog_path: None,
            questions_per_quiz: None,
            default_choices: 4,
            default_regions: vec![RegionId::DEFAULT.key().to_string()],
            log_level: "info".to_string(),
            toast_millis: 2000,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".config/flag-quiz/config.toml")
    }

    /// Reads `path` when given (it must exist), otherwise the default
    /// location if present, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_toml(&fs::read_to_string(path)?),
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_toml(&fs::read_to_string(default_path)?)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(db::get_data_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("flag_quiz.log")
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_millis)
    }

    /// Preference defaults with unknown region names dropped. An empty
    /// result falls back to the default region.
    pub fn preference_defaults(&self) -> PreferenceDefaults {
        let mut regions: BTreeSet<String> = self
            .default_regions
            .iter()
            .filter_map(|name| match name.parse::<RegionId>() {
                Ok(region) => Some(region.key().to_string()),
                Err(e) => {
                    warn!(error = %e, "Ignoring configured default region");
                    None
                }
            })
            .collect();
        if regions.is_empty() {
            regions.insert(RegionId::DEFAULT.key().to_string());
        }

        PreferenceDefaults {
            choices: self.default_choices,
            regions,
        }
    }
}
