//! Display rules for the artifact list.
//!
//! [`Listing`] is what a front end renders: either the empty sentinel or the
//! records split into displayable and rejected. [`find_duplicates`] is the
//! uniqueness check over (title, author, date).

use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::extract::parse_artifacts;
use crate::models::ArtifactRecord;

/// Message shown instead of an empty table.
pub const NO_ARTIFACTS_MESSAGE: &str = "no artifacts available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<'a> {
    Empty,
    Populated {
        displayable: Vec<&'a ArtifactRecord>,
        rejected: Vec<&'a ArtifactRecord>,
    },
}

impl<'a> Listing<'a> {
    pub fn build(records: &'a [ArtifactRecord]) -> Self {
        if records.is_empty() {
            return Listing::Empty;
        }
        let (displayable, rejected): (Vec<_>, Vec<_>) =
            records.iter().partition(|r| r.is_displayable());
        Listing::Populated {
            displayable,
            rejected,
        }
    }

    /// The sentinel message, when there is nothing to list.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Listing::Empty => Some(NO_ARTIFACTS_MESSAGE),
            Listing::Populated { .. } => None,
        }
    }

    pub fn displayable(&self) -> &[&'a ArtifactRecord] {
        match self {
            Listing::Empty => &[],
            Listing::Populated { displayable, .. } => displayable,
        }
    }

    pub fn rejected(&self) -> &[&'a ArtifactRecord] {
        match self {
            Listing::Empty => &[],
            Listing::Populated { rejected, .. } => rejected,
        }
    }
}

/// A (title, author, date) triple seen more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub title: String,
    pub author: String,
    pub date: String,
    pub occurrences: usize,
}

/// Every triple that occurs more than once, in first-seen order.
pub fn find_duplicates(records: &[ArtifactRecord]) -> Vec<Duplicate> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut counted: Vec<Duplicate> = Vec::new();

    for record in records {
        let fingerprint = record.fingerprint();
        match seen.get(&fingerprint) {
            Some(&idx) => counted[idx].occurrences += 1,
            None => {
                seen.insert(fingerprint, counted.len());
                counted.push(Duplicate {
                    title: record.title.clone(),
                    author: record.author.clone(),
                    date: record.date.clone(),
                    occurrences: 1,
                });
            }
        }
    }

    counted.retain(|d| d.occurrences > 1);
    counted
}

fn load_artifacts(config: &Config) -> Result<Vec<ArtifactRecord>> {
    let path = &config.seed.artifacts;
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact page: {}", path.display()))?;
    let records = parse_artifacts(&html);
    tracing::info!(count = records.len(), path = %path.display(), "loaded artifacts");
    Ok(records)
}

/// CLI entry point for `vault artifacts`.
pub fn run_artifacts(config: &Config) -> Result<()> {
    let records = load_artifacts(config)?;
    let listing = Listing::build(&records);

    if let Some(message) = listing.message() {
        println!("{}", message);
        return Ok(());
    }

    println!("{:<32} {:<24} {:<12} LINK", "TITLE", "AUTHOR", "DATE");
    for record in listing.displayable() {
        println!(
            "{:<32} {:<24} {:<12} {}",
            record.title,
            record.author,
            record.date,
            record.link.as_deref().unwrap_or("")
        );
    }

    let rejected = listing.rejected();
    if !rejected.is_empty() {
        println!();
        println!("rejected: {}", rejected.len());
        for record in rejected {
            tracing::warn!(title = %record.title, "artifact is missing data or a valid link");
            println!("  {:?}", record.title);
        }
    }
    Ok(())
}

/// CLI entry point for `vault check`. Fails when any triple repeats.
pub fn run_check(config: &Config) -> Result<()> {
    let records = load_artifacts(config)?;
    let duplicates = find_duplicates(&records);

    if duplicates.is_empty() {
        println!("all {} entries are unique", records.len());
        return Ok(());
    }

    println!("Duplicate entries found:");
    for dup in &duplicates {
        println!(
            "  ({}, {}, {}) x{}",
            dup.title, dup.author, dup.date, dup.occurrences
        );
    }
    anyhow::bail!("table contains {} duplicate entries", duplicates.len())
}
