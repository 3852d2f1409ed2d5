//! Core data models used throughout Seed Vault.
//!
//! These types represent the artifact rows, lookup categories, and tagged
//! words that flow between the extractor, the lookup tables, and the CLI.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One qualifying row of the artifact table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    pub title: String,
    pub author: String,
    pub date: String,
    pub link: Option<String>,
}

impl ArtifactRecord {
    /// True when every field is populated and the link uses an HTTP(S) scheme.
    pub fn is_displayable(&self) -> bool {
        !self.title.is_empty()
            && !self.author.is_empty()
            && !self.date.is_empty()
            && self
                .link
                .as_deref()
                .is_some_and(|link| link.starts_with("http"))
    }

    /// SHA-256 over (title, author, date). Two rows describing the same
    /// artifact share a fingerprint regardless of their links.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update([0x1f]);
        hasher.update(self.author.as_bytes());
        hasher.update([0x1f]);
        hasher.update(self.date.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Which of the three lookup tables a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Language,
    Artifact,
    Location,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Language, Category::Artifact, Category::Location];

    pub fn label(self) -> &'static str {
        match self {
            Category::Language => "Language",
            Category::Artifact => "Artifact",
            Category::Location => "Location",
        }
    }

    /// The sentinel returned for names absent from the table.
    pub fn not_found_message(self) -> String {
        format!("{} not found", self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A word in the tag registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedWordEntry {
    pub word: String,
    pub meaning: String,
    pub contributor: String,
    pub timestamp: DateTime<Utc>,
}

/// A word as returned by [`crate::storage::WordStorage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWord {
    pub word: String,
    pub meaning: String,
    pub language: String,
}
