use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};

/// Text contents of an HTML `<table>`. `headers` is empty when the table
/// has no `<thead>` and its first row is not made of `<th>` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HtmlTable {
    pub fn column_index(&self, header: &str) -> Option<usize> {
        let wanted = header.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| EtlError::parse(format!("invalid selector '{}': {}", css, e)))
}

/// Collapses runs of whitespace (NBSP included) into single spaces.
fn clean_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn in_thead(row: ElementRef<'_>) -> bool {
    row.parent()
        .and_then(ElementRef::wrap)
        .map(|parent| parent.value().name() == "thead")
        .unwrap_or(false)
}

/// Extracts the first `<table>` of a page.
pub fn parse_first_table(html: &str) -> Result<HtmlTable> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| EtlError::parse("no <table> element found"))?;

    let mut parsed = HtmlTable::default();
    for row in table.select(&row_sel) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
        if cells.is_empty() {
            continue;
        }

        let all_th = cells.iter().all(|c| c.value().name() == "th");
        let texts: Vec<String> = cells.into_iter().map(clean_text).collect();

        let is_header = parsed.headers.is_empty()
            && parsed.rows.is_empty()
            && (all_th || in_thead(row));
        if is_header {
            parsed.headers = texts;
        } else if !in_thead(row) {
            parsed.rows.push(texts);
        }
    }

    Ok(parsed)
}
