use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, DomainError};

/// Port for the persisted service configuration.
pub trait ConfigStore: Send + Sync {
    /// Read `config.toml`, writing the defaults first if it does not exist.
    fn load(&self) -> Result<AppConfig, DomainError>;

    fn save(&self, config: &AppConfig) -> Result<(), DomainError>;

    fn config_path(&self) -> PathBuf;

    /// Root that relative paths in the configuration are resolved against.
    fn data_dir(&self) -> PathBuf;

    fn logs_dir(&self) -> PathBuf;

    /// Resolve a configured path: absolute paths are kept, relative ones are
    /// joined onto the data directory.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}
