//! Runtime configuration.
//!
//! Paths are resolved from, in order: explicit overrides (CLI flags), the
//! `NOTEBOX_DB_PATH` / `NOTEBOX_DATA_DIR` environment variables, `config.json`
//! inside the data directory, and finally the platform data directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::media::{ImageCompression, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_DIMENSION};
use crate::util::normalize_text_option;
use crate::Result;

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DB_PATH_ENV: &str = "NOTEBOX_DB_PATH";
pub const DATA_DIR_ENV: &str = "NOTEBOX_DATA_DIR";

const APP_DIR_NAME: &str = "notebox";

/// Application configuration, as stored in `config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Directory for the database and media; platform default when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Explicit database file, overriding `data_dir`/`db_file_name`
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,
    #[serde(default = "default_media_dir_name")]
    pub media_dir_name: String,
    #[serde(default = "default_image_max_dimension")]
    pub image_max_dimension: u32,
    #[serde(default = "default_image_jpeg_quality")]
    pub image_jpeg_quality: u8,
}

/// Values that beat both the environment and the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            db_file_name: default_db_file_name(),
            media_dir_name: default_media_dir_name(),
            image_max_dimension: default_image_max_dimension(),
            image_jpeg_quality: default_image_jpeg_quality(),
        }
    }
}

impl AppConfig {
    /// Resolve configuration from overrides, the process environment and `config.json`.
    pub fn resolve(overrides: &ConfigOverrides) -> Self {
        Self::resolve_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::resolve`] with a custom environment lookup.
    pub fn resolve_with_env(
        overrides: &ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let explicit_data_dir = overrides
            .data_dir
            .clone()
            .or_else(|| env_path(&env, DATA_DIR_ENV));
        let explicit_db_path = overrides
            .db_path
            .clone()
            .or_else(|| env_path(&env, DB_PATH_ENV));

        let data_dir = explicit_data_dir
            .clone()
            .unwrap_or_else(default_data_dir);
        let mut config = load_config_from_path(&data_dir.join(CONFIG_FILE_NAME));

        if explicit_data_dir.is_some() {
            config.data_dir = explicit_data_dir;
        }
        if explicit_db_path.is_some() {
            config.db_path = explicit_db_path;
        }
        config
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.data_dir().join(&self.db_file_name))
    }

    #[must_use]
    pub fn media_dir(&self) -> PathBuf {
        self.data_dir().join(&self.media_dir_name)
    }

    #[must_use]
    pub const fn image_compression(&self) -> ImageCompression {
        ImageCompression {
            max_dimension: self.image_max_dimension,
            jpeg_quality: self.image_jpeg_quality,
        }
    }
}

/// Platform data directory for notebox
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Load a config file, falling back to defaults when missing or malformed.
pub fn load_config_from_path(path: &Path) -> AppConfig {
    if !path.exists() {
        return AppConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!("Failed to parse config at {}: {}", path.display(), error);
                AppConfig::default()
            }
        },
        Err(error) => {
            tracing::warn!("Failed to read config at {}: {}", path.display(), error);
            AppConfig::default()
        }
    }
}

pub fn save_config_to_path(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn env_path(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<PathBuf> {
    normalize_text_option(env(key)).map(PathBuf::from)
}

fn default_db_file_name() -> String {
    "notebox.db".to_string()
}

fn default_media_dir_name() -> String {
    "media".to_string()
}

const fn default_image_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

const fn default_image_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_key: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_use_standard_compression() {
        let config = AppConfig::default();
        assert_eq!(config.db_file_name, "notebox.db");
        assert_eq!(config.media_dir_name, "media");
        assert_eq!(config.image_compression(), ImageCompression::default());
    }

    #[test]
    fn partial_file_uses_field_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"image_jpeg_quality": 90}"#).unwrap();
        assert_eq!(config.image_jpeg_quality, 90);
        assert_eq!(config.image_max_dimension, 1600);
        assert_eq!(config.db_file_name, "notebox.db");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<AppConfig>(r#"{"colour": "red"}"#).is_err());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_config_from_path(&path), AppConfig::default());
    }

    #[test]
    fn explicit_data_dir_reads_its_config_file() {
        let temp = tempfile::tempdir().unwrap();
        save_config_to_path(
            &AppConfig {
                db_file_name: "custom.db".to_string(),
                ..AppConfig::default()
            },
            &temp.path().join(CONFIG_FILE_NAME),
        )
        .unwrap();

        let config = AppConfig::resolve_with_env(
            &ConfigOverrides {
                data_dir: Some(temp.path().to_path_buf()),
                db_path: None,
            },
            no_env,
        );

        assert_eq!(config.db_path(), temp.path().join("custom.db"));
        assert_eq!(config.media_dir(), temp.path().join("media"));
    }

    #[test]
    fn overrides_beat_environment() {
        let temp = tempfile::tempdir().unwrap();
        let env = |key: &str| match key {
            DB_PATH_ENV => Some("/from/env.db".to_string()),
            DATA_DIR_ENV => Some(temp.path().to_string_lossy().into_owned()),
            _ => None,
        };

        let from_env = AppConfig::resolve_with_env(&ConfigOverrides::default(), env);
        assert_eq!(from_env.db_path(), PathBuf::from("/from/env.db"));
        assert_eq!(from_env.data_dir(), temp.path());

        let from_flag = AppConfig::resolve_with_env(
            &ConfigOverrides {
                db_path: Some(PathBuf::from("/from/flag.db")),
                data_dir: None,
            },
            env,
        );
        assert_eq!(from_flag.db_path(), PathBuf::from("/from/flag.db"));
    }

    #[test]
    fn blank_environment_values_are_ignored() {
        let temp = tempfile::tempdir().unwrap();
        let config = AppConfig::resolve_with_env(
            &ConfigOverrides {
                data_dir: Some(temp.path().to_path_buf()),
                db_path: None,
            },
            |_key| Some("   ".to_string()),
        );
        assert_eq!(config.db_path(), temp.path().join("notebox.db"));
    }
}
