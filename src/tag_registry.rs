//! Create, read, and update for tagged words.
//!
//! The registry owns its entries; there is no global table and no delete.
//! Timestamps come from a [`Clock`] supplied at construction so tests can
//! pin them.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::error::{InputProblem, Result, VaultError};
use crate::models::TaggedWordEntry;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[derive(Debug)]
pub struct TagRegistry<C = SystemClock> {
    entries: HashMap<String, TaggedWordEntry>,
    clock: C,
}

impl TagRegistry<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TagRegistry<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TagRegistry<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    /// Tag a new word. Every field is required and the word must be new.
    pub fn create(&mut self, word: &str, meaning: &str, contributor: &str) -> Result<()> {
        for (field, value) in [
            ("word", word),
            ("meaning", meaning),
            ("contributor", contributor),
        ] {
            if value.is_empty() {
                return Err(InputProblem::MissingField(field).into());
            }
        }
        if self.entries.contains_key(word) {
            return Err(InputProblem::AlreadyTagged(word.to_string()).into());
        }

        let entry = TaggedWordEntry {
            word: word.to_string(),
            meaning: meaning.to_string(),
            contributor: contributor.to_string(),
            timestamp: self.clock.now(),
        };
        tracing::debug!(word, contributor, "tagged word");
        self.entries.insert(word.to_string(), entry);
        Ok(())
    }

    pub fn read(&self, word: &str) -> Result<&TaggedWordEntry> {
        self.entries.get(word).ok_or_else(|| VaultError::NotFound {
            word: word.to_string(),
        })
    }

    /// Replace the meaning of an existing word and refresh its timestamp.
    pub fn update(&mut self, word: &str, meaning: &str) -> Result<&TaggedWordEntry> {
        let now = self.clock.now();
        let entry = self
            .entries
            .get_mut(word)
            .ok_or_else(|| VaultError::NotFound {
                word: word.to_string(),
            })?;
        if meaning.is_empty() {
            return Err(InputProblem::EmptyMeaning.into());
        }
        entry.meaning = meaning.to_string();
        entry.timestamp = now;
        Ok(entry)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
