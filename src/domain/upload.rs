use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::error::DomainError;

/// Extensions accepted for uploaded sign media.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["mp4", "jpg", "jpeg", "png"];

/// Lowercased extension of `file_name` if it is an accepted media type.
pub fn allowed_extension(file_name: &str) -> Result<String, DomainError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(DomainError::UploadValidation(
            "Invalid file type. Allowed types: mp4, jpg, jpeg, png".to_string(),
        ))
    }
}

/// Reduce a user-supplied name to a safe single path component.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; whitespace becomes `_`;
/// everything else is dropped. Leading dots and underscores are stripped so
/// the result can never be hidden or climb out of its directory.
pub fn secure_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            out.push(c);
        } else if c.is_whitespace() {
            out.push('_');
        }
    }
    out.trim_start_matches(['.', '_']).to_string()
}

/// A stored upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRecord {
    pub language: String,
    pub file_name: String,
    pub file_type: String,
    pub path: PathBuf,
}

impl UploadRecord {
    pub fn log_line(&self) -> String {
        format!(
            "Uploaded: {}/{} - Type: {}\n",
            self.language, self.file_name, self.file_type
        )
    }
}

/// State of one per-language upload directory.
#[derive(Debug, Clone, Serialize)]
pub struct UploadDirStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub files: Vec<String>,
    pub writable: bool,
}

/// State of the upload log file.
#[derive(Debug, Clone, Serialize)]
pub struct UploadLogStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub writable: bool,
}

/// Upload tree report: one entry per language plus the log.
#[derive(Debug, Clone, Serialize)]
pub struct UploadDirsReport {
    #[serde(flatten)]
    pub languages: BTreeMap<String, UploadDirStatus>,
    pub log: UploadLogStatus,
}
