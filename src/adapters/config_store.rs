use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{AppConfig, DomainError};
use crate::ports::ConfigStore;

/// Environment variable that replaces the OS data directory.
pub const DATA_DIR_ENV: &str = "SIGNBRIDGE_DATA_DIR";

/// TOML-based configuration store with OS-specific paths.
pub struct TomlConfigStore {
    data_dir: PathBuf,
}

impl TomlConfigStore {
    /// Create a store rooted at `$SIGNBRIDGE_DATA_DIR`, or the OS application
    /// data directory when the variable is unset.
    pub fn new() -> Result<Self, DomainError> {
        let data_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Self::default_data_dir()?,
        };
        Self::with_data_dir(data_dir)
    }

    /// Create a store rooted at an explicit directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Result<Self, DomainError> {
        fs::create_dir_all(&data_dir)?;
        info!(data_dir = ?data_dir, "ConfigStore initialized");
        Ok(Self { data_dir })
    }

    /// - macOS: ~/Library/Application Support/SignBridge/
    /// - Windows: %APPDATA%\SignBridge\
    /// - Linux: ~/.config/SignBridge/
    fn default_data_dir() -> Result<PathBuf, DomainError> {
        #[cfg(target_os = "macos")]
        let base = dirs::data_dir();

        #[cfg(not(target_os = "macos"))]
        let base = dirs::config_dir();

        base.map(|p| p.join("SignBridge")).ok_or_else(|| {
            DomainError::Config("Could not find application data directory".to_string())
        })
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig, DomainError> {
        let config_path = self.config_path();

        if config_path.exists() {
            debug!(path = ?config_path, "Loading configuration");
            let content = fs::read_to_string(&config_path)?;
            let config: AppConfig = toml::from_str(&content)?;
            info!(path = ?config_path, "Configuration loaded");
            Ok(config)
        } else {
            info!(path = ?config_path, "Configuration file not found, creating default");
            let config = AppConfig::new();
            self.save(&config)?;
            Ok(config)
        }
    }

    fn save(&self, config: &AppConfig) -> Result<(), DomainError> {
        let config_path = self.config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&config_path, content)?;

        info!(path = ?config_path, "Configuration saved");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_config_writes_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::with_data_dir(temp.path().to_path_buf()).unwrap();

        assert!(!store.config_path().exists());
        let config = store.load().unwrap();
        assert_eq!(config.server.port, 5001);
        assert!(store.config_path().exists());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::with_data_dir(temp.path().to_path_buf()).unwrap();

        let mut config = AppConfig::new();
        config.logging.level = "debug".to_string();
        config.recognition.debounce_ms = 250;
        config.media.lexicon_path = Some(PathBuf::from("custom/lexicon.toml"));
        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.logging.level, "debug");
        assert_eq!(loaded.recognition.debounce_ms, 250);
        assert_eq!(loaded.media.lexicon_path, config.media.lexicon_path);
    }

    #[test]
    fn test_relative_paths_resolve_under_data_dir() {
        let temp = tempfile::tempdir().unwrap();
        let store = TomlConfigStore::with_data_dir(temp.path().to_path_buf()).unwrap();

        assert_eq!(
            store.resolve(Path::new("assets/mp4videos")),
            temp.path().join("assets/mp4videos")
        );
        let absolute = temp.path().join("elsewhere");
        assert_eq!(store.resolve(&absolute), absolute);
        assert!(store.logs_dir().ends_with("logs"));
    }
}
