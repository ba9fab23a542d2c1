use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::{DomainError, MediaCatalog, MediaCategory};

/// On-disk roots of the three media categories.
#[derive(Debug, Clone)]
pub struct MediaRoots {
    pub videos: PathBuf,
    pub asl_letters: PathBuf,
    pub isl_letters: PathBuf,
}

impl MediaRoots {
    pub fn root(&self, category: MediaCategory) -> &Path {
        match category {
            MediaCategory::Videos => &self.videos,
            MediaCategory::AslLetters => &self.asl_letters,
            MediaCategory::IslLetters => &self.isl_letters,
        }
    }

    /// Index the files directly under every root.
    ///
    /// A missing root is logged and indexed as empty so the service still
    /// starts with partial assets.
    pub fn scan(&self) -> Result<MediaCatalog, DomainError> {
        let mut catalog = MediaCatalog::new();

        for category in MediaCategory::ALL {
            let root = self.root(category);
            if !root.is_dir() {
                warn!(?category, root = ?root, "Media directory not found");
                continue;
            }

            for entry in fs::read_dir(root)? {
                let entry = entry?;
                if !entry.file_type()?.is_file() {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    catalog.insert(category, name);
                }
            }

            info!(?category, files = catalog.len(category), "Media directory indexed");
        }

        Ok(catalog)
    }
}
