use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{DomainError, FeedbackDocument, FeedbackEntry, GrammarContext};
use crate::ports::FeedbackStore;

const FEEDBACK_FILE: &str = "feedback_data.json";
const FEEDBACK_LOG: &str = "feedback.log";

fn persistence(e: impl std::fmt::Display) -> DomainError {
    DomainError::Persistence {
        what: "feedback",
        message: e.to_string(),
    }
}

/// Feedback persisted as a pretty-printed JSON document plus a plaintext log.
pub struct JsonFeedbackStore {
    dir: PathBuf,
    // Serializes read-modify-write of the document.
    write_lock: Mutex<()>,
}

impl JsonFeedbackStore {
    pub fn new(dir: PathBuf) -> Self {
        info!(dir = ?dir, "JsonFeedbackStore initialized");
        Self {
            dir,
            write_lock: Mutex::new(()),
        }
    }

    pub fn document_path(&self) -> PathBuf {
        self.dir.join(FEEDBACK_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(FEEDBACK_LOG)
    }

    async fn load(&self) -> Result<FeedbackDocument, DomainError> {
        let path = self.document_path();
        match fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(persistence),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FeedbackDocument::default()),
            Err(e) => Err(persistence(e)),
        }
    }

    async fn save(&self, document: &FeedbackDocument) -> Result<(), DomainError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document.serialize(&mut ser).map_err(persistence)?;
        fs::write(self.document_path(), buf).await.map_err(persistence)
    }

    async fn append_log(&self, entry: &FeedbackEntry) -> Result<(), DomainError> {
        let mut log = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())
            .await
            .map_err(persistence)?;
        log.write_all(entry.log_line().as_bytes())
            .await
            .map_err(persistence)
    }
}

#[async_trait]
impl FeedbackStore for JsonFeedbackStore {
    async fn record(
        &self,
        original: &str,
        correction: &str,
        context: Option<GrammarContext>,
    ) -> Result<FeedbackEntry, DomainError> {
        let _guard = self.write_lock.lock().await;
        fs::create_dir_all(&self.dir).await.map_err(persistence)?;

        let mut entry = FeedbackEntry::new(original, correction, Local::now());
        entry.context = context;
        let mut document = self.load().await?;
        document.feedback.push(entry.clone());
        self.save(&document).await?;
        self.append_log(&entry).await?;

        debug!(entries = document.feedback.len(), "Feedback recorded");
        Ok(entry)
    }

    async fn entries(&self) -> Result<Vec<FeedbackEntry>, DomainError> {
        Ok(self.load().await?.feedback)
    }
}
