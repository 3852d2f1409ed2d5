//! Inline tagging of free text.
//!
//! Each whitespace-separated word is looked up in a tag map after stripping
//! trailing punctuation; tagged words are annotated as `word [tag]`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{InputProblem, Result};

const PUNCTUATION: [char; 4] = ['.', ',', '!', '?'];

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[.*?\]").expect("tag pattern is valid"))
}

/// Annotate every tagged word in `text` as `word [tag]`.
pub fn tag_words(text: &str, tags: &HashMap<String, String>) -> Result<String> {
    annotate(text, tags, |word, tag| format!("{word} [{tag}]"))
}

/// Like [`tag_words`], but wraps word and tag in highlight markup.
pub fn highlight_tags(text: &str, tags: &HashMap<String, String>) -> Result<String> {
    annotate(text, tags, |word, tag| {
        format!(r#"<span class="highlight">{word}</span><span class="label">[{tag}]</span>"#)
    })
}

/// Number of `[...]` annotations in already tagged text.
pub fn count_tags(tagged: &str) -> usize {
    tag_pattern().find_iter(tagged).count()
}

fn annotate<F>(text: &str, tags: &HashMap<String, String>, render: F) -> Result<String>
where
    F: Fn(&str, &str) -> String,
{
    if text.is_empty() {
        return Err(InputProblem::EmptyText.into());
    }

    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            let key: String = word.chars().filter(|c| !PUNCTUATION.contains(c)).collect();
            match tags.get(&key) {
                Some(tag) => render(word, tag),
                None => word.to_string(),
            }
        })
        .collect();

    Ok(words.join(" "))
}

/// CLI entry point for `vault tag`.
pub fn run_tag(text: &str, pairs: Vec<(String, String)>, highlight: bool) -> anyhow::Result<()> {
    let tags: HashMap<String, String> = pairs.into_iter().collect();
    let tagged = tag_words(text, &tags)?;
    if highlight {
        println!("{}", highlight_tags(text, &tags)?);
    } else {
        println!("{}", tagged);
    }
    println!("tags: {}", count_tags(&tagged));
    Ok(())
}
