//! Local installation config.
//!
//! A single JSON document, by default at `$XDG_CONFIG_HOME/aircast/config`. Its one required
//! entry is a `uuid` identifying this client installation, generated on first run; any other
//! entries are preserved across loads and saves.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Resolve the default config file location.
pub fn default_config_path() -> PathBuf {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg_config_home.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed).join("aircast").join("config");
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed)
                .join(".config")
                .join("aircast")
                .join("config");
        }
    }

    PathBuf::from(".aircast").join("config")
}

/// On-disk client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Config {
    /// Load the config from its default location, see [`default_config_path`].
    pub fn load_default() -> crate::Result<Self> {
        Self::load(default_config_path())
    }

    /// Load the config at `path`.
    ///
    /// A missing or unparsable file is reinitialized to an empty document, creating parent
    /// directories as needed. A missing `uuid` entry is generated and written back, so after
    /// this returns the file exists and [`Config::uuid`] is non-empty.
    pub fn load(path: impl Into<PathBuf>) -> crate::Result<Self> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<Map<String, Value>>(&bytes).ok(),
            Err(_) => None,
        };

        let mut config = match values {
            Some(values) => Config { path, values },
            None => {
                let config = Config {
                    path,
                    values: Map::new(),
                };
                config.save()?;
                log::info!("initialized configuration at {}", config.path.display());
                config
            }
        };

        if config.uuid_entry().is_none() {
            let uuid = Uuid::new_v4().to_string();
            log::info!("generated installation id {}", uuid);
            config.values.insert("uuid".to_string(), Value::String(uuid));
            config.save()?;
        }

        Ok(config)
    }

    /// Installation id generated on first run.
    pub fn uuid(&self) -> &str {
        self.uuid_entry().unwrap_or_default()
    }

    fn uuid_entry(&self) -> Option<&str> {
        self.values.get("uuid").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Write the document back to disk.
    pub fn save(&self) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec(&self.values)?)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn first_load_creates_file_with_uuid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aircast").join("config");

        let config = Config::load(path.clone()).unwrap();

        assert!(path.exists());
        assert!(!config.uuid().is_empty());
        Uuid::parse_str(config.uuid()).unwrap();
    }

    #[test]
    fn reload_keeps_uuid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");

        let first = Config::load(path.clone()).unwrap();
        let second = Config::load(path).unwrap();

        assert_eq!(first.uuid(), second.uuid());
    }

    #[test]
    fn unparsable_file_is_reinitialized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "definitely not json").unwrap();

        let config = Config::load(path.clone()).unwrap();

        assert!(!config.uuid().is_empty());
        let on_disk: Map<String, Value> =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk.get("uuid").and_then(Value::as_str), Some(config.uuid()));
    }

    #[test]
    fn uuid_backfilled_into_existing_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, r#"{"streamer":"10.0.0.8"}"#).unwrap();

        let config = Config::load(path).unwrap();

        assert!(!config.uuid().is_empty());
        assert_eq!(
            config.get("streamer").and_then(Value::as_str),
            Some("10.0.0.8")
        );
    }

    #[test]
    fn extra_keys_survive_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");

        let mut config = Config::load(path.clone()).unwrap();
        config.set("streamer", "10.0.0.8");
        config.save().unwrap();

        let reloaded = Config::load(path).unwrap();
        assert_eq!(
            reloaded.get("streamer").and_then(Value::as_str),
            Some("10.0.0.8")
        );
        assert_eq!(reloaded.uuid(), config.uuid());
    }
}
