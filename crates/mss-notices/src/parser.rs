use std::sync::LazyLock;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::text::normalize;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to parse date: {0}")]
    DateParse(String),
}

/// Listing cells in use: the title cell and the registration date cell.
const MIN_CELLS: usize = 5;
const TITLE_CELL: usize = 1;
const DATE_CELL: usize = 4;

const DATE_FORMAT: &str = "%Y.%m.%d";

static SEL_LISTING_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tbody tr").expect("invalid selector: listing row"));
static SEL_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("invalid selector: cell"));
static SEL_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("invalid selector: anchor"));
static SEL_CONTENT_ROW: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table tbody tr.m-block").expect("invalid selector: content row")
});
static SEL_TEXTAREA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("textarea").expect("invalid selector: textarea"));

/// One row of a listing page, before the reference and date are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub title: String,
    pub date_text: String,
    /// The title anchor's `onclick`; `None` when the cell has no clickable anchor.
    pub reference: Option<String>,
}

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Parses every listing row of a board page, in document order.
///
/// Rows with fewer than five cells (the "no posts" placeholder, spacer rows) are
/// not listing rows. An empty result means the listing has run out.
pub fn parse_listing_page(html: &str) -> Vec<ListingRow> {
    let document = Html::parse_document(html);

    document
        .select(&SEL_LISTING_ROW)
        .filter_map(|row| {
            let cells: Vec<ElementRef> = row.select(&SEL_CELL).collect();
            if cells.len() < MIN_CELLS {
                return None;
            }
            Some(parse_listing_row(cells[TITLE_CELL], cells[DATE_CELL]))
        })
        .collect()
}

fn parse_listing_row(title_cell: ElementRef, date_cell: ElementRef) -> ListingRow {
    let anchor = title_cell.select(&SEL_ANCHOR).next();

    let title = anchor
        .map(|a| {
            a.value()
                .attr("title")
                .map(normalize)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| normalize(&elem_text(a)))
        })
        .unwrap_or_else(|| normalize(&elem_text(title_cell)));

    let reference = anchor
        .and_then(|a| a.value().attr("onclick"))
        .map(str::to_string);

    ListingRow {
        title,
        date_text: elem_text(date_cell).trim().to_string(),
        reference,
    }
}

/// Extracts the free-text body of a detail page.
///
/// Returns an empty string when the page has no content row or the row has no
/// text area.
pub fn parse_detail_content(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .select(&SEL_CONTENT_ROW)
        .next()
        .and_then(|row| row.select(&SEL_TEXTAREA).next())
        .map(|textarea| normalize(&elem_text(textarea)))
        .unwrap_or_default()
}

/// Parses a listing date such as `2025.03.04`.
pub fn parse_date(text: &str) -> Result<NaiveDate, ParseError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| ParseError::DateParse(format!("'{}': {}", text, e)))
}
