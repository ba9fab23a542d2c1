use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::domain::upload::{
    allowed_extension, secure_filename, UploadDirStatus, UploadLogStatus,
};
use crate::domain::{DomainError, SignLanguage, UploadDirsReport, UploadRecord};
use crate::ports::UploadStore;

const UPLOAD_LOG: &str = "uploads.log";
const UPLOAD_LOG_HEADER: &str = "Upload Log File Created\n";

fn persistence(e: impl std::fmt::Display) -> DomainError {
    DomainError::Persistence {
        what: "upload",
        message: e.to_string(),
    }
}

async fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

/// Uploaded sign media under `<base>/<language>/`, with an append-only log.
pub struct FsUploadStore {
    base: PathBuf,
}

impl FsUploadStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn log_path(&self) -> PathBuf {
        self.base.join(UPLOAD_LOG)
    }

    /// Create every language directory and the log file if missing.
    pub async fn init(&self) -> Result<(), DomainError> {
        for language in SignLanguage::ALL {
            fs::create_dir_all(self.base.join(language.as_str()))
                .await
                .map_err(persistence)?;
        }

        let log = self.log_path();
        if fs::metadata(&log).await.is_err() {
            fs::write(&log, UPLOAD_LOG_HEADER).await.map_err(persistence)?;
        }

        info!(base = ?self.base, "Upload directories ready");
        Ok(())
    }

    async fn append_log(&self, line: &str) -> Result<(), DomainError> {
        let mut log = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())
            .await
            .map_err(persistence)?;
        log.write_all(line.as_bytes()).await.map_err(persistence)
    }

    async fn dir_status(&self, dir: PathBuf) -> Result<UploadDirStatus, DomainError> {
        let exists = fs::metadata(&dir).await.map(|m| m.is_dir()).unwrap_or(false);
        let mut files = Vec::new();
        if exists {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if let Some(name) = entry.file_name().to_str() {
                    files.push(name.to_string());
                }
            }
            files.sort();
        }
        let writable = exists && is_writable(&dir).await;
        Ok(UploadDirStatus {
            path: dir,
            exists,
            files,
            writable,
        })
    }
}

#[async_trait]
impl UploadStore for FsUploadStore {
    async fn store(
        &self,
        language: SignLanguage,
        word: &str,
        original_name: &str,
        file_type: &str,
        data: &[u8],
    ) -> Result<UploadRecord, DomainError> {
        let ext = allowed_extension(original_name)?;
        let word = word.trim().to_lowercase();
        let file_name = secure_filename(&format!("{}.{}", word, ext));
        if file_name.len() <= ext.len() + 1 || !file_name.ends_with(&format!(".{}", ext)) {
            return Err(DomainError::UploadValidation(
                "Word must contain ASCII letters or digits".to_string(),
            ));
        }

        let dir = self.base.join(language.as_str());
        fs::create_dir_all(&dir).await.map_err(persistence)?;
        let path = dir.join(&file_name);
        fs::write(&path, data).await.map_err(persistence)?;

        let record = UploadRecord {
            language: language.as_str().to_string(),
            file_name,
            file_type: file_type.to_string(),
            path,
        };
        if let Err(e) = self.append_log(&record.log_line()).await {
            warn!(error = %e, "Upload saved but not logged");
        }

        info!(
            language = %record.language,
            file = %record.file_name,
            bytes = data.len(),
            "Sign upload stored"
        );
        Ok(record)
    }

    async fn check(&self) -> Result<UploadDirsReport, DomainError> {
        if fs::metadata(&self.base).await.is_err() {
            return Err(DomainError::NotFound("Upload folder does not exist".to_string()));
        }

        let mut languages = BTreeMap::new();
        for language in SignLanguage::ALL {
            let status = self.dir_status(self.base.join(language.as_str())).await?;
            languages.insert(language.as_str().to_string(), status);
        }

        let log_path = self.log_path();
        let log_exists = fs::metadata(&log_path).await.is_ok();
        let log = UploadLogStatus {
            writable: log_exists && is_writable(&log_path).await,
            exists: log_exists,
            path: log_path,
        };

        Ok(UploadDirsReport { languages, log })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_creates_tree_and_log_header() {
        let temp = tempfile::tempdir().unwrap();
        let store = FsUploadStore::new(temp.path().join("uploads"));
        store.init().await.unwrap();

        let report = store.check().await.unwrap();
        assert_eq!(report.languages.len(), SignLanguage::ALL.len());
        assert!(report.languages.values().all(|s| s.exists && s.files.is_empty()));
        assert!(report.log.exists);

        let log = std::fs::read_to_string(store.log_path()).unwrap();
        assert_eq!(log, UPLOAD_LOG_HEADER);

        // idempotent
        store.init().await.unwrap();
        assert_eq!(std::fs::read_to_string(store.log_path()).unwrap(), log);
    }

    #[tokio::test]
    async fn test_store_sanitizes_and_logs() {
        let temp = tempfile::tempdir().unwrap();
        let store = FsUploadStore::new(temp.path().join("uploads"));
        store.init().await.unwrap();

        let record = store
            .store(SignLanguage::Isl, "Thank You", "clip.MP4", "video", b"data")
            .await
            .unwrap();
        assert_eq!(record.file_name, "thank_you.mp4");
        assert_eq!(std::fs::read(&record.path).unwrap(), b"data");

        let report = store.check().await.unwrap();
        assert_eq!(report.languages["isl"].files, vec!["thank_you.mp4"]);

        let log = std::fs::read_to_string(store.log_path()).unwrap();
        assert!(log.ends_with("Uploaded: isl/thank_you.mp4 - Type: video\n"));
    }

    #[tokio::test]
    async fn test_store_rejects_bad_input() {
        let temp = tempfile::tempdir().unwrap();
        let store = FsUploadStore::new(temp.path().to_path_buf());

        let err = store
            .store(SignLanguage::Asl, "hello", "notes.txt", "video", b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UploadValidation(_)));

        let err = store
            .store(SignLanguage::Hindi, "नमस्ते", "a.mp4", "video", b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UploadValidation(_)));

        let record = store
            .store(SignLanguage::Asl, "../../escape", "a.png", "image", b"x")
            .await
            .unwrap();
        assert!(record.path.starts_with(temp.path().join("asl")));
    }

    #[tokio::test]
    async fn test_check_missing_base() {
        let temp = tempfile::tempdir().unwrap();
        let store = FsUploadStore::new(temp.path().join("absent"));
        let err = store.check().await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
