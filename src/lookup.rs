//! Name lookup over the language, artifact, and location tables.
//!
//! Each [`LookupTable`] owns its mapping from canonical name to description.
//! Inputs arrive as [`serde_json::Value`] so that callers holding untyped
//! data (a form field, a JSON request) go through the same validation as
//! typed callers: null and non-text inputs are rejected before any lookup,
//! while a well-formed name that matches nothing yields [`Lookup::NotFound`].

use std::collections::HashMap;
use std::fmt;

use anyhow::Context;
use serde_json::Value;

use crate::config::{Config, TablesConfig};
use crate::error::{InputProblem, Result, VaultError};
use crate::extract::{scan_page, ScannedPage};
use crate::models::Category;

/// Outcome of a validated lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a str),
    NotFound(Category),
}

impl Lookup<'_> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// The description, or the "<Category> not found" sentinel.
    pub fn into_display(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Found(description) => f.write_str(description),
            Lookup::NotFound(category) => write!(f, "{} not found", category.label()),
        }
    }
}

/// Mapping from canonical name to description for one category.
#[derive(Debug, Clone)]
pub struct LookupTable {
    category: Category,
    entries: HashMap<String, String>,
}

impl LookupTable {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            entries: HashMap::new(),
        }
    }

    pub fn from_entries<I, K, V>(category: Category, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new(category);
        for (name, description) in entries {
            table.insert(name, description);
        }
        table
    }

    /// Build from the table `table_id` of a scanned page.
    ///
    /// The first row is the header, whatever its cells, and is skipped. In
    /// the rest, cell 0 is the name and cell 1 the description; rows with
    /// fewer than two cells or an empty name are skipped. A table that is
    /// present but empty loads as an empty table.
    pub fn from_page(category: Category, page: &ScannedPage, table_id: &str) -> Result<Self> {
        if !page.has_table(table_id) {
            return Err(VaultError::MissingTable(table_id.to_string()));
        }

        let mut table = Self::new(category);
        for row in page.rows_of(table_id).skip(1) {
            if row.cells.len() < 2 || row.cells[0].is_empty() {
                continue;
            }
            table.insert(row.cells[0].clone(), row.cells[1].clone());
        }
        Ok(table)
    }

    /// Insert a name unless it is already present. The first description
    /// recorded for a name is the one served.
    pub fn insert(&mut self, name: impl Into<String>, description: impl Into<String>) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            tracing::debug!(category = %self.category, name = %name, "ignoring repeated name");
            return false;
        }
        self.entries.insert(name, description.into());
        true
    }

    /// Validate `input` and look it up.
    pub fn find(&self, input: &Value) -> Result<Lookup<'_>> {
        let name = validate_input(input)?;
        self.find_name(name)
    }

    /// Look up a name that is already known to be text.
    ///
    /// Numeric text is rejected only when the table has no such name, so a
    /// row named `1491` stays reachable.
    pub fn find_name(&self, name: &str) -> Result<Lookup<'_>> {
        if let Some(description) = self.entries.get(name) {
            return Ok(Lookup::Found(description.as_str()));
        }
        if is_numeric_text(name) {
            return Err(InputProblem::NumericText(name.to_string()).into());
        }
        Ok(Lookup::NotFound(self.category))
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Reject anything that is not text, keeping null distinct from other types.
pub fn validate_input(input: &Value) -> std::result::Result<&str, InputProblem> {
    match input {
        Value::String(s) => Ok(s),
        Value::Null => Err(InputProblem::Null),
        Value::Bool(_) => Err(InputProblem::WrongType { found: "boolean" }),
        Value::Number(_) => Err(InputProblem::WrongType { found: "number" }),
        Value::Array(_) => Err(InputProblem::WrongType { found: "array" }),
        Value::Object(_) => Err(InputProblem::WrongType { found: "object" }),
    }
}

fn is_numeric_text(s: &str) -> bool {
    let s = s.trim();
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty()
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
}

/// The three lookup tables of the search page.
#[derive(Debug, Clone)]
pub struct SeedIndex {
    languages: LookupTable,
    artifacts: LookupTable,
    locations: LookupTable,
}

impl SeedIndex {
    pub fn new(languages: LookupTable, artifacts: LookupTable, locations: LookupTable) -> Self {
        Self {
            languages,
            artifacts,
            locations,
        }
    }

    /// Read all three tables from the search page markup.
    pub fn from_html(html: &str, tables: &TablesConfig) -> Result<Self> {
        let page = scan_page(html);
        let index = Self::new(
            LookupTable::from_page(Category::Language, &page, &tables.language)?,
            LookupTable::from_page(Category::Artifact, &page, &tables.artifact)?,
            LookupTable::from_page(Category::Location, &page, &tables.location)?,
        );
        tracing::info!(
            languages = index.languages.len(),
            artifacts = index.artifacts.len(),
            locations = index.locations.len(),
            "loaded lookup tables"
        );
        Ok(index)
    }

    pub fn table(&self, category: Category) -> &LookupTable {
        match category {
            Category::Language => &self.languages,
            Category::Artifact => &self.artifacts,
            Category::Location => &self.locations,
        }
    }

    pub fn find(&self, category: Category, input: &Value) -> Result<Lookup<'_>> {
        self.table(category).find(input)
    }

    pub fn find_language(&self, input: &Value) -> Result<Lookup<'_>> {
        self.languages.find(input)
    }

    pub fn find_artifact(&self, input: &Value) -> Result<Lookup<'_>> {
        self.artifacts.find(input)
    }

    pub fn find_location(&self, input: &Value) -> Result<Lookup<'_>> {
        self.locations.find(input)
    }
}

/// CLI entry point for `vault find`.
///
/// With `json` set, `name` is parsed as a JSON literal so that `null`,
/// `true`, or `42` reach validation as non-text input.
pub fn run_find(config: &Config, category: Category, name: &str, json: bool) -> anyhow::Result<()> {
    let path = &config.seed.search;
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read search page: {}", path.display()))?;
    let index = SeedIndex::from_html(&html, &config.tables)
        .with_context(|| format!("Failed to load lookup tables: {}", path.display()))?;

    let input = if json {
        serde_json::from_str(name).with_context(|| format!("NAME is not a JSON literal: {}", name))?
    } else {
        Value::String(name.to_string())
    };

    let found = index.find(category, &input)?;
    println!("{}", found);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn languages() -> LookupTable {
        LookupTable::from_entries(
            Category::Language,
            [
                ("Navajo", "Diné bizaad, spoken in the Southwest"),
                ("Cherokee", "Tsalagi, written in the Cherokee syllabary"),
            ],
        )
    }

    #[test]
    fn present_name_returns_exact_description() {
        let table = languages();
        let got = table.find(&json!("Navajo")).unwrap();
        assert_eq!(got, Lookup::Found("Diné bizaad, spoken in the Southwest"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let table = languages();
        assert_eq!(
            table.find(&json!("navajo")).unwrap(),
            Lookup::NotFound(Category::Language)
        );
    }

    #[test]
    fn absent_name_returns_sentinel() {
        let table = languages();
        let got = table.find(&json!("Elvish")).unwrap();
        assert!(!got.is_found());
        assert_eq!(got.into_display(), "Language not found");
    }

    #[test]
    fn null_input_is_rejected_as_null() {
        let err = languages().find(&Value::Null).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn non_text_inputs_are_rejected_as_wrong_type() {
        for input in [json!(true), json!(42), json!(1.5), json!(["Navajo"]), json!({})] {
            let err = languages().find(&input).unwrap_err();
            assert!(err.is_invalid_input(), "{input} should be rejected");
            assert!(err.to_string().contains("type"), "{err}");
        }
    }

    #[test]
    fn numeric_text_is_rejected() {
        let err = languages().find(&json!("1234")).unwrap_err();
        assert!(err.to_string().contains("Invalid"));
        assert!(languages().find_name("-3.5").is_err());
        assert!(languages().find_name("Route 66").is_ok());
        assert!(languages().find_name("").is_ok());
    }

    #[test]
    fn first_description_wins() {
        let mut table = LookupTable::new(Category::Location);
        assert!(table.insert("Chaco Canyon", "New Mexico"));
        assert!(!table.insert("Chaco Canyon", "elsewhere"));
        assert_eq!(
            table.find_name("Chaco Canyon").unwrap(),
            Lookup::Found("New Mexico")
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn tables_are_read_by_id() {
        let html = r#"
            <table id="langTable">
              <tr><th>Language</th><th>Description</th></tr>
              <tr><td>Navajo</td><td>Diné bizaad</td></tr>
              <tr><td></td><td>orphan description</td></tr>
            </table>
            <table id="artTable">
              <tr><th>Artifact</th><th>Description</th></tr>
              <tr><td>Drum</td><td>Ceremonial drum</td><td>extra</td></tr>
            </table>
            <table id="locTable">
              <tr><th>Location</th><th>Description</th></tr>
              <tr><td>Chaco Canyon</td><td>New Mexico</td></tr>
            </table>
        "#;
        let index = SeedIndex::from_html(html, &TablesConfig::default()).unwrap();
        assert_eq!(index.table(Category::Language).len(), 1);
        assert_eq!(
            index.find_artifact(&json!("Drum")).unwrap(),
            Lookup::Found("Ceremonial drum")
        );
        assert_eq!(
            index.find_location(&json!("Atlantis")).unwrap().into_display(),
            "Location not found"
        );
    }

    #[test]
    fn header_row_is_skipped_even_with_td_cells() {
        let html = r#"
            <table id="langTable">
              <tr><td>Language</td><td>Description</td></tr>
              <tr><td>Navajo</td><td>Diné bizaad</td></tr>
            </table>
            <table id="artTable"></table>
            <table id="locTable"></table>
        "#;
        let index = SeedIndex::from_html(html, &TablesConfig::default()).unwrap();
        assert_eq!(
            index.find_language(&json!("Language")).unwrap(),
            Lookup::NotFound(Category::Language)
        );
        assert_eq!(
            index.find_language(&json!("Navajo")).unwrap(),
            Lookup::Found("Diné bizaad")
        );
    }

    #[test]
    fn present_but_empty_table_loads_empty() {
        let html = r#"
            <table id="langTable"><tr><th>Language</th><th>Description</th></tr></table>
            <table id="artTable"></table>
            <table id="locTable"><tbody></tbody></table>
        "#;
        let index = SeedIndex::from_html(html, &TablesConfig::default()).unwrap();
        for category in Category::ALL {
            assert!(index.table(category).is_empty());
        }
        assert_eq!(
            index.find_artifact(&json!("Drum")).unwrap().into_display(),
            "Artifact not found"
        );
    }

    #[test]
    fn numeric_name_in_table_is_found() {
        let table = LookupTable::from_entries(Category::Artifact, [("1491", "Year marker stone")]);
        assert_eq!(
            table.find(&json!("1491")).unwrap(),
            Lookup::Found("Year marker stone")
        );
        assert!(table.find(&json!("1492")).unwrap_err().is_invalid_input());
    }

    #[test]
    fn missing_table_is_an_error() {
        let html = r#"<table id="langTable"><tr><td>a</td><td>b</td></tr></table>"#;
        let err = SeedIndex::from_html(html, &TablesConfig::default()).unwrap_err();
        assert!(matches!(err, VaultError::MissingTable(id) if id == "artTable"));
    }
}
