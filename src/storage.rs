//! Key-value storage for words in indigenous languages.
//!
//! The word itself is the key and must survive storage unchanged, diacritics
//! included. The payload (meaning and language) is kept as JSON text with
//! non-ASCII characters written verbatim rather than `\u` escaped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::StoredWord;

#[derive(Debug, Serialize, Deserialize)]
struct WordPayload {
    meaning: String,
    language: String,
}

#[derive(Debug, Default)]
pub struct WordStorage {
    entries: HashMap<String, String>,
}

impl WordStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `word`, replacing any previous payload for the same key.
    pub fn add_word(&mut self, word: &str, meaning: &str, language: &str) -> Result<()> {
        let payload = serde_json::to_string(&WordPayload {
            meaning: meaning.to_string(),
            language: language.to_string(),
        })?;
        if self.entries.insert(word.to_string(), payload).is_some() {
            tracing::debug!(word, "replaced stored word");
        }
        Ok(())
    }

    pub fn get_word(&self, word: &str) -> Result<Option<StoredWord>> {
        let Some(raw) = self.entries.get(word) else {
            return Ok(None);
        };
        let payload: WordPayload = serde_json::from_str(raw)?;
        Ok(Some(StoredWord {
            word: word.to_string(),
            meaning: payload.meaning,
            language: payload.language,
        }))
    }

    /// Raw stored payload, as written.
    pub fn raw_payload(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
