use std::collections::HashMap;

use serde::Serialize;

/// Media roots the resolver can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    /// Word and phrase sign videos.
    Videos,
    /// ASL fingerspelling images.
    AslLetters,
    /// ISL fingerspelling and numeral images.
    IslLetters,
}

impl MediaCategory {
    pub const ALL: [MediaCategory; 3] = [
        MediaCategory::Videos,
        MediaCategory::AslLetters,
        MediaCategory::IslLetters,
    ];

    /// Path prefix used in media references and under `/media`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaCategory::Videos => "mp4videos",
            MediaCategory::AslLetters => "alphabetimages",
            MediaCategory::IslLetters => "indianalphabetsandnumbers",
        }
    }
}

/// File index of the media roots, built once at startup.
///
/// Lookups are case-insensitive; returned references keep the on-disk name so
/// they can be served from case-sensitive filesystems.
#[derive(Debug, Clone, Default)]
pub struct MediaCatalog {
    entries: HashMap<MediaCategory, HashMap<String, String>>,
}

impl MediaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file found under a category root.
    pub fn insert(&mut self, category: MediaCategory, file_name: impl Into<String>) {
        let file_name = file_name.into();
        self.entries
            .entry(category)
            .or_default()
            .insert(file_name.to_lowercase(), file_name);
    }

    /// Build a catalog from literal file lists.
    #[cfg(test)]
    pub fn from_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (MediaCategory, S)>,
        S: Into<String>,
    {
        let mut catalog = Self::new();
        for (category, name) in files {
            catalog.insert(category, name);
        }
        catalog
    }

    pub fn contains(&self, category: MediaCategory, file_name: &str) -> bool {
        self.lookup(category, file_name).is_some()
    }

    /// Media reference `"<category-dir>/<file>"` for a file, if it exists.
    pub fn reference(&self, category: MediaCategory, file_name: &str) -> Option<String> {
        self.lookup(category, file_name)
            .map(|actual| format!("{}/{}", category.dir_name(), actual))
    }

    pub fn len(&self, category: MediaCategory) -> usize {
        self.entries.get(&category).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }

    fn lookup(&self, category: MediaCategory, file_name: &str) -> Option<&str> {
        self.entries
            .get(&category)?
            .get(&file_name.to_lowercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_keeps_disk_name() {
        let catalog = MediaCatalog::from_files([
            (MediaCategory::Videos, "Hello.mp4"),
            (MediaCategory::AslLetters, "A_test.jpg"),
        ]);

        assert_eq!(
            catalog.reference(MediaCategory::Videos, "hello.mp4").as_deref(),
            Some("mp4videos/Hello.mp4")
        );
        assert!(catalog.contains(MediaCategory::AslLetters, "a_test.jpg"));
        assert!(!catalog.contains(MediaCategory::IslLetters, "A.jpg"));
        assert_eq!(catalog.len(MediaCategory::Videos), 1);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = MediaCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.reference(MediaCategory::Videos, "x.mp4"), None);
    }
}
