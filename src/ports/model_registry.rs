use std::path::PathBuf;

use crate::domain::{ModelStatus, SignLanguage};

/// Port for locating installed recognition models.
pub trait ModelRegistry: Send + Sync {
    /// Where the model for `language` is expected.
    fn model_path(&self, language: SignLanguage) -> PathBuf;

    /// Check the model for `language` on disk.
    fn status(&self, language: SignLanguage) -> ModelStatus;

    /// Status of every supported language.
    fn statuses(&self) -> Vec<ModelStatus> {
        SignLanguage::ALL.iter().map(|l| self.status(*l)).collect()
    }

    /// Get the models directory path.
    fn models_dir(&self) -> PathBuf;
}
