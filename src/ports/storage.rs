use async_trait::async_trait;

use crate::domain::{
    DomainError, FeedbackEntry, FeedbackStats, GrammarContext, SignLanguage, UploadDirsReport,
    UploadRecord,
};

/// Port for persisting user corrections.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Append a correction to the feedback document and the feedback log.
    async fn record(
        &self,
        original: &str,
        correction: &str,
        context: Option<GrammarContext>,
    ) -> Result<FeedbackEntry, DomainError>;

    /// All corrections recorded so far.
    async fn entries(&self) -> Result<Vec<FeedbackEntry>, DomainError>;

    async fn stats(&self) -> Result<FeedbackStats, DomainError> {
        Ok(FeedbackStats::from_entries(&self.entries().await?))
    }
}

/// Port for user-contributed sign media.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Store `data` as the sign for `word` in `language`.
    ///
    /// `original_name` only supplies the extension, which must be one of the
    /// accepted media types.
    async fn store(
        &self,
        language: SignLanguage,
        word: &str,
        original_name: &str,
        file_type: &str,
        data: &[u8],
    ) -> Result<UploadRecord, DomainError>;

    /// Existence, contents and writability of every language directory.
    async fn check(&self) -> Result<UploadDirsReport, DomainError>;
}
