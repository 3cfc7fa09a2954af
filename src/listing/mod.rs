//! Directory listing types.
//!
//! A listing is the ordered set of entries shown for one directory. Entries are
//! immutable once fetched and the whole listing is replaced on navigation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One file or directory row in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Name within the current directory. Unique within a listing.
    pub name: String,
    /// Whether the entry is a directory.
    #[serde(rename = "is_dir")]
    pub is_directory: bool,
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// Last modification time.
    #[serde(rename = "modified")]
    pub modified_at: DateTime<Utc>,
}

impl Entry {
    /// Create a file entry.
    pub fn file(name: impl Into<String>, size: u64, modified_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
            size,
            modified_at,
        }
    }

    /// Create a directory entry.
    pub fn dir(name: impl Into<String>, modified_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
            size: 0,
            modified_at,
        }
    }

    /// Whether the entry is an image, judged by extension.
    pub fn is_image(&self) -> bool {
        if self.is_directory {
            return false;
        }
        let ext = match self.name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return false,
        };
        IMAGE_EXTENSIONS.contains(&ext.as_str())
    }
}

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "avif"];

/// The entries of the directory currently being viewed.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// The user's base path, prefixed to every shared path.
    pub base_path: String,
    /// Path of the directory being viewed, relative to the base path.
    pub current_path: String,
    /// Entries in display order.
    pub entries: Vec<Entry>,
}

impl Listing {
    /// Create a listing for the given directory. Repeated names are dropped.
    pub fn new(
        base_path: impl Into<String>,
        current_path: impl Into<String>,
        entries: Vec<Entry>,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            current_path: current_path.into(),
            entries: unique_entries(entries),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the listing has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by index.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Find the index of an entry by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Full path of an entry in this listing.
    pub fn full_path(&self, name: &str) -> String {
        join_share_path(&self.base_path, &self.current_path, name)
    }
}

/// Join base path, current directory and entry name into an absolute share path.
///
/// No separator is inserted when the directory already ends with `/` or the
/// name already starts with one. A base path of `/` contributes nothing.
pub fn join_share_path(base_path: &str, current_path: &str, name: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let split = if current_path.ends_with('/') || name.starts_with('/') {
        ""
    } else {
        "/"
    };
    format!("{}{}{}{}", base, current_path, split, name)
}

/// Keep the first entry for each name, preserving display order.
pub fn unique_entries(entries: Vec<Entry>) -> Vec<Entry> {
    let total = entries.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.name.clone()))
        .collect();
    if unique.len() != total {
        warn!(
            dropped = total - unique.len(),
            "Dropped entries with duplicate names"
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_share_path_basic() {
        assert_eq!(join_share_path("/u", "/docs", "a.txt"), "/u/docs/a.txt");
    }

    #[test]
    fn test_join_share_path_trailing_slash() {
        assert_eq!(join_share_path("/u", "/docs/", "a.txt"), "/u/docs/a.txt");
    }

    #[test]
    fn test_join_share_path_root_dir() {
        assert_eq!(join_share_path("/u", "/", "a.txt"), "/u/a.txt");
    }

    #[test]
    fn test_join_share_path_root_base() {
        assert_eq!(join_share_path("/", "/docs", "a.txt"), "/docs/a.txt");
        assert_eq!(join_share_path("", "/docs", "a.txt"), "/docs/a.txt");
    }

    #[test]
    fn test_join_share_path_name_with_leading_slash() {
        assert_eq!(join_share_path("/u", "/docs", "/a.txt"), "/u/docs/a.txt");
    }

    #[test]
    fn test_listing_position_and_full_path() {
        let now = Utc::now();
        let listing = Listing::new(
            "/u",
            "/docs",
            vec![Entry::file("a.txt", 10, now), Entry::dir("photos", now)],
        );

        assert_eq!(listing.len(), 2);
        assert!(!listing.is_empty());
        assert_eq!(listing.position("photos"), Some(1));
        assert_eq!(listing.position("missing"), None);
        assert_eq!(listing.full_path("photos"), "/u/docs/photos");
    }

    #[test]
    fn test_listing_drops_duplicate_names() {
        let now = Utc::now();
        let listing = Listing::new(
            "/u",
            "/docs",
            vec![
                Entry::file("a.txt", 1, now),
                Entry::file("b.txt", 2, now),
                Entry::file("a.txt", 3, now),
            ],
        );

        assert_eq!(listing.len(), 2);
        assert_eq!(listing.entries[0].size, 1);
        assert_eq!(listing.position("b.txt"), Some(1));
    }

    #[test]
    fn test_entry_constructors() {
        let now = Utc::now();
        let file = Entry::file("a.txt", 42, now);
        assert!(!file.is_directory);
        assert_eq!(file.size, 42);

        let dir = Entry::dir("photos", now);
        assert!(dir.is_directory);
        assert_eq!(dir.size, 0);
    }

    #[test]
    fn test_entry_is_image() {
        let now = Utc::now();
        assert!(Entry::file("cat.PNG", 1, now).is_image());
        assert!(Entry::file("a.b.jpeg", 1, now).is_image());
        assert!(!Entry::file("notes.txt", 1, now).is_image());
        assert!(!Entry::file("png", 1, now).is_image());
        assert!(!Entry::dir("photos.png", now).is_image());
    }

    #[test]
    fn test_entry_serde_names() {
        let now = Utc::now();
        let json = serde_json::to_value(Entry::dir("photos", now)).unwrap();
        assert_eq!(json["is_dir"], true);
        assert!(json.get("modified").is_some());
    }
}
