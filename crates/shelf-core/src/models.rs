//! Data models for Shelf
//!
//! Defines the catalog entry type, `Book`. Field names on the wire follow the
//! GraphQL schema (`coverPhotoURL`, `readingLevel`).

use serde::{Deserialize, Serialize};

/// A catalog entry
///
/// Books are supplied by the catalog endpoint and never modified locally.
/// The title is the book's identity within a reading list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Book title (case-sensitive key)
    #[serde(default)]
    pub title: String,
    /// Author name
    #[serde(default)]
    pub author: String,
    /// Cover image reference
    #[serde(default, rename = "coverPhotoURL")]
    pub cover_photo_url: String,
    /// Reading level label
    #[serde(default, rename = "readingLevel")]
    pub reading_level: String,
}

impl Book {
    /// Create a book with the given title and author
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            cover_photo_url: String::new(),
            reading_level: String::new(),
        }
    }

    /// Set the cover image reference
    pub fn with_cover(mut self, url: impl Into<String>) -> Self {
        self.cover_photo_url = url.into();
        self
    }

    /// Set the reading level
    pub fn with_reading_level(mut self, level: impl Into<String>) -> Self {
        self.reading_level = level.into();
        self
    }

    /// Whether the title contains `needle_lower` (already lowercased)
    pub(crate) fn title_matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}
