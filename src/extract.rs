//! Table extraction from seed HTML documents.
//!
//! The page is parsed with an HTML5 parser, so the rules a browser applies
//! hold here too: `<script>` and `<style>` bodies are raw text, a stray `<`
//! in a cell is literal, optional end tags are implied, and character
//! references resolve one at a time (unknown ones stay as written).
//!
//! [`scan_page`] returns every table id in the document plus one
//! [`TableRow`] per `<tr>`. [`parse_artifacts`] turns the rows of
//! `seed.html` into [`ArtifactRecord`]s; [`crate::lookup`] reads the name
//! tables of `seed_search.html` from the same scan.

use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};

use crate::models::ArtifactRecord;

/// Number of populated cells an artifact row must have (title, author, date).
pub const ARTIFACT_CELLS: usize = 3;

/// One `<tr>` as seen by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// `id` attribute of the innermost enclosing `<table>`, if any.
    pub table_id: Option<String>,
    /// Trimmed text of every `<td>`, empty cells included.
    pub cells: Vec<String>,
    /// `href` of the first anchor inside the row.
    pub link: Option<String>,
}

impl TableRow {
    pub fn populated_cells(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }
}

/// Result of scanning one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedPage {
    /// `id` of every `<table>` in the document, rows or not.
    pub table_ids: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ScannedPage {
    pub fn has_table(&self, id: &str) -> bool {
        self.table_ids.iter().any(|t| t == id)
    }

    /// Rows whose innermost table carries `id`, in document order.
    pub fn rows_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a TableRow> + 'a {
        self.rows
            .iter()
            .filter(move |r| r.table_id.as_deref() == Some(id))
    }
}

fn selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("static selector is valid"))
}

fn table_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    selector(&SELECTOR, "table")
}

fn row_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    selector(&SELECTOR, "tr")
}

fn link_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    selector(&SELECTOR, "a[href]")
}

/// Parse every qualifying artifact row in `html`, in document order.
///
/// Rows whose populated cell count is not exactly three are skipped. No
/// input fails the parse; a page without tables yields no records.
pub fn parse_artifacts(html: &str) -> Vec<ArtifactRecord> {
    let rows = scan_rows(html);
    let mut artifacts = Vec::with_capacity(rows.len());

    for row in rows {
        let cells: Vec<&str> = row.populated_cells().collect();
        if cells.len() != ARTIFACT_CELLS {
            tracing::debug!(
                populated = cells.len(),
                table = row.table_id.as_deref().unwrap_or("-"),
                "skipping row without exactly three populated cells"
            );
            continue;
        }
        artifacts.push(ArtifactRecord {
            title: cells[0].to_string(),
            author: cells[1].to_string(),
            date: cells[2].to_string(),
            link: row.link.clone(),
        });
    }

    tracing::debug!(count = artifacts.len(), "parsed artifact rows");
    artifacts
}

/// Every table row in `html`, in document order.
pub fn scan_rows(html: &str) -> Vec<TableRow> {
    scan_page(html).rows
}

/// Scan `html` for tables and their rows.
pub fn scan_page(html: &str) -> ScannedPage {
    let document = Html::parse_document(html);

    let table_ids = document
        .select(table_selector())
        .filter_map(|table| table.value().attr("id"))
        .map(str::to_string)
        .collect();

    let rows = document.select(row_selector()).map(read_row).collect();

    ScannedPage { table_ids, rows }
}

fn read_row(tr: ElementRef<'_>) -> TableRow {
    let table_id = tr
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
        .and_then(|table| table.value().attr("id"))
        .map(str::to_string);

    // Inline children (`<b>`, `<a>`, `<br>`) contribute their text in order.
    let cells = tr
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "td")
        .map(|td| td.text().collect::<String>().trim().to_string())
        .collect();

    let link = tr
        .select(link_selector())
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    TableRow {
        table_id,
        cells,
        link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Seed Vault</title></head>
<body>
<table id="artTable">
  <tr><th>Title</th><th>Author</th><th>Date</th></tr>
  <tr>
    <td><a href="https://example.org/basket">Woven Basket</a></td>
    <td> Maria Tallchief </td>
    <td>10/29/2025</td>
  </tr>
  <tr><td>Song of the River</td><td>Joe</td><td>01/02/2024</td></tr>
  <tr><td>Only two</td><td>cells</td></tr>
  <tr><td>a</td><td>b</td><td>c</td><td>d</td></tr>
  <tr><td></td><td></td><td></td></tr>
</table>
</body>
</html>"#;

    #[test]
    fn three_cell_rows_become_records() {
        let arts = parse_artifacts(SEED);
        assert_eq!(arts.len(), 2);
        assert_eq!(arts[0].title, "Woven Basket");
        assert_eq!(arts[0].author, "Maria Tallchief");
        assert_eq!(arts[0].date, "10/29/2025");
        assert_eq!(arts[0].link.as_deref(), Some("https://example.org/basket"));
        assert_eq!(arts[1].title, "Song of the River");
        assert_eq!(arts[1].link, None);
    }

    #[test]
    fn empty_cells_do_not_count() {
        let html = "<table><tr><td>T</td><td>  </td><td>A</td><td>D</td></tr></table>";
        let arts = parse_artifacts(html);
        assert_eq!(arts.len(), 1);
        assert_eq!(arts[0].author, "A");
        assert_eq!(arts[0].date, "D");
    }

    #[test]
    fn link_is_first_anchor_in_row() {
        let html = r#"<table><tr>
            <td>Title</td>
            <td><a href="http://first">Author</a></td>
            <td><a href="http://second">Date</a></td>
        </tr></table>"#;
        let arts = parse_artifacts(html);
        assert_eq!(arts[0].link.as_deref(), Some("http://first"));
    }

    #[test]
    fn link_does_not_leak_between_rows() {
        let html = r#"<table>
            <tr><td><a href="http://one">A</a></td><td>B</td><td>C</td></tr>
            <tr><td>D</td><td>E</td><td>F</td></tr>
        </table>"#;
        let arts = parse_artifacts(html);
        assert_eq!(arts[1].link, None);
    }

    #[test]
    fn inline_children_are_concatenated() {
        let html = "<table><tr><td>Woven <b>Basket</b></td><td>M</td><td>D</td></tr></table>";
        let arts = parse_artifacts(html);
        assert_eq!(arts[0].title, "Woven Basket");
    }

    #[test]
    fn html_style_markup_is_tolerated() {
        let html = "<TABLE id=artTable><TR><TD nowrap>Mask<br></TD><TD>K&eacute;ri</TD><TD>1901</TD></TABLE>";
        let rows = scan_rows(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].table_id.as_deref(), Some("artTable"));
        assert_eq!(rows[0].cells, vec!["Mask", "Kéri", "1901"]);
    }

    #[test]
    fn unknown_entity_kept_verbatim() {
        let html = "<table><tr><td>Arts &bogus; Crafts</td></tr></table>";
        let rows = scan_rows(html);
        assert_eq!(rows[0].cells, vec!["Arts &bogus; Crafts"]);
    }

    #[test]
    fn known_references_resolve_beside_unknown_ones() {
        let rows = scan_rows("<table><tr><td>Arts &amp; Crafts &bogus;</td></tr></table>");
        assert_eq!(rows[0].cells, vec!["Arts & Crafts &bogus;"]);
    }

    #[test]
    fn script_after_table_keeps_rows() {
        let html = "<table><tr><td><a href=\"http://y\">Basket</a></td><td>Maria</td><td>2020</td></tr></table>\n\
                    <script>if (a && b) { x = \"<\"; }</script>";
        let arts = parse_artifacts(html);
        assert_eq!(arts.len(), 1);
        assert_eq!(arts[0].title, "Basket");
        assert_eq!(arts[0].link.as_deref(), Some("http://y"));
    }

    #[test]
    fn style_and_script_text_is_not_a_row() {
        let html = "<style>td > a { color: red }</style>\
                    <table><tr><td>T</td><td>A</td><td>D</td></tr></table>\
                    <script>document.write('<tr><td>x</td></tr>')</script>";
        let rows = scan_rows(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells, vec!["T", "A", "D"]);
    }

    #[test]
    fn bare_less_than_stays_in_cell_text() {
        let html = r#"<table><tr><td><a href="http://x">a < b</a></td><td>M</td><td>D</td></tr></table>"#;
        let arts = parse_artifacts(html);
        assert_eq!(arts[0].title, "a < b");
    }

    #[test]
    fn empty_tables_are_still_listed() {
        let page = scan_page(r#"<table id="artTable"></table><table><tr><td>x</td></tr></table>"#);
        assert!(page.has_table("artTable"));
        assert!(!page.has_table("langTable"));
        assert_eq!(page.rows_of("artTable").count(), 0);
        assert_eq!(page.rows.len(), 1);
    }

    #[test]
    fn rows_carry_innermost_table_id() {
        let html = r#"<table id="outer"><tr><td>x</td></tr></table>
            <table id="langTable"><tr><td>Navajo</td><td>Diné bizaad</td></tr></table>"#;
        let rows = scan_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].table_id.as_deref(), Some("outer"));
        assert_eq!(rows[1].table_id.as_deref(), Some("langTable"));
        assert_eq!(rows[1].cells[1], "Diné bizaad");
    }

    #[test]
    fn header_cells_are_not_collected() {
        let rows = scan_rows("<table><tr><th>Name</th><th>Meaning</th></tr></table>");
        assert!(rows[0].cells.is_empty());
    }

    #[test]
    fn document_without_table_yields_nothing() {
        assert!(parse_artifacts("<p>nothing here</p>").is_empty());
        assert!(parse_artifacts("").is_empty());
    }
}
