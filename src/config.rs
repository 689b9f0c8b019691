//! Where the CLI keeps favorites and the session, and under which name.
//!
//! Settings are layered: built-in defaults, then `config.yaml`, then the
//! `FITMALTA_*` environment variables. Each resolved value remembers the
//! layer that supplied it so `config show` can explain where it came from.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use fitmalta_core::{JsonFileRepository, STORAGE_KEY};

use crate::session::SessionStorage;

pub const DATA_DIR_VAR: &str = "FITMALTA_DATA_DIR";
pub const STORAGE_KEY_VAR: &str = "FITMALTA_STORAGE_KEY";

/// Which layer a setting was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Layer::Default => "default",
            Layer::File => "config file",
            Layer::Environment => "environment",
        })
    }
}

/// A resolved setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setting<T> {
    pub value: T,
    pub layer: Layer,
}

impl<T> Setting<T> {
    fn builtin(value: T) -> Self {
        Self {
            value,
            layer: Layer::Default,
        }
    }

    fn overlay(&mut self, candidate: Option<T>, layer: Layer) {
        if let Some(value) = candidate {
            self.value = value;
            self.layer = layer;
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the favorites snapshot and the session
    pub data_dir: Setting<PathBuf>,
    /// File stem of the favorites snapshot
    pub storage_key: Setting<String>,
    /// The config file that was consulted
    pub config_path: PathBuf,
    /// Whether `config_path` existed and was read
    pub file_loaded: bool,
}

/// Keys accepted in `config.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    data_dir: Option<PathBuf>,
    storage_key: Option<String>,
}

impl Config {
    /// Resolves settings from `config_path` (or the default location) and
    /// the process environment.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::resolve(config_path.unwrap_or_else(default_config_path), |name| {
            std::env::var(name).ok()
        })
    }

    /// Resolves settings with `env` standing in for the process environment.
    pub(crate) fn resolve(
        config_path: PathBuf,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut data_dir = Setting::builtin(default_data_dir());
        let mut storage_key = Setting::builtin(STORAGE_KEY.to_string());

        let file = read_file_settings(&config_path)?;
        let file_loaded = file.is_some();
        if let Some(file) = file {
            // Relative directories are anchored at the config file.
            let base = config_path.parent().unwrap_or_else(|| Path::new(""));
            data_dir.overlay(file.data_dir.map(|dir| base.join(dir)), Layer::File);
            storage_key.overlay(file.storage_key, Layer::File);
        }

        data_dir.overlay(env(DATA_DIR_VAR).map(PathBuf::from), Layer::Environment);
        storage_key.overlay(env(STORAGE_KEY_VAR), Layer::Environment);

        check_storage_key(&storage_key.value)?;

        Ok(Self {
            data_dir,
            storage_key,
            config_path,
            file_loaded,
        })
    }

    /// The favorites repository these settings point at.
    pub fn repository(&self) -> JsonFileRepository {
        JsonFileRepository::with_key(self.data_dir.value.clone(), self.storage_key.value.clone())
    }

    pub fn session_storage(&self) -> SessionStorage {
        SessionStorage::new(self.data_dir.value.clone())
    }
}

fn read_file_settings(path: &Path) -> Result<Option<FileSettings>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::Read(path.to_path_buf(), e)),
    };

    let has_content = text.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if !has_content {
        return Ok(Some(FileSettings::default()));
    }

    serde_yaml::from_str(&text)
        .map(Some)
        .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// The key names a file inside the data directory, so it has to be a plain
/// file stem: no separators, no leading dot.
pub fn check_storage_key(key: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| -> Result<(), ConfigError> {
        Err(ConfigError::InvalidStorageKey(key.to_string(), reason))
    };

    if key.is_empty() {
        return invalid("must not be empty".to_string());
    }
    if key.starts_with('.') {
        return invalid("must not start with '.'".to_string());
    }
    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return invalid(format!(
            "contains {:?}; use letters, digits, '-', '_' or '.'",
            c
        ));
    }
    Ok(())
}

/// `fitmalta/config.yaml` under the platform config directory
/// (`~/.config` on Linux).
pub fn default_config_path() -> PathBuf {
    app_dir(dirs::config_dir()).join("config.yaml")
}

/// `fitmalta/` under the platform data directory (`~/.local/share` on Linux).
pub fn default_data_dir() -> PathBuf {
    app_dir(dirs::data_dir())
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join("fitmalta")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    Read(PathBuf, #[source] io::Error),

    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_yaml::Error),

    #[error("Invalid storage_key '{0}': {1}")]
    InvalidStorageKey(String, String),
}
