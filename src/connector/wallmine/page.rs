//! Narrow page-query capability for WallMine markup.
//!
//! Everything the connector knows about WallMine's page structure lives
//! here: the csrf meta tag, the "Add a transaction" anchor carrying the
//! item id, and the notes column carrying embedded checksum markers.
//! Keeping the selectors and capture patterns in one place isolates the
//! structural coupling to the remote markup and lets the extraction be
//! tested against fixture HTML.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

lazy_static! {
    static ref CSRF_META: Selector = Selector::parse(r#"meta[name="csrf-token"]"#).unwrap();
    static ref NOTES_CELLS: Selector =
        Selector::parse(r#"tr[class^="js-transaction-"] td[class="notes-column"]"#).unwrap();
    static ref ITEM_URL_RE: Regex =
        Regex::new(r"(?i)/portfolios/\d+/item/(\d+)/transaction").unwrap();
    static ref CHECKSUM_RE: Regex = Regex::new(r".*#(\d+)#").unwrap();
}

/// Anti-forgery token from the page's `csrf-token` meta tag.
///
/// Required on every state-changing form submission; a fresh one must be
/// harvested from the most recently fetched page.
pub(super) fn csrf_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&CSRF_META)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

/// The `data-url` of the "Add a transaction" anchor for a ticker.
///
/// The anchor is identified by its `data-symbol` attribute and its
/// human-facing title; the ticker must already be uppercased.
pub(super) fn add_transaction_url(html: &str, ticker: &str) -> Option<String> {
    let selector = Selector::parse(&format!(
        r#"a[data-symbol="{ticker}"][title="Add a {ticker} transaction"]"#
    ))
    .ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .next()
        .and_then(|anchor| anchor.value().attr("data-url"))
        .map(str::to_string)
}

/// Numeric item id captured out of an add-transaction URL
/// (`/portfolios/<pid>/item/<id>/transaction`).
pub(super) fn position_id_from_url(url: &str) -> Option<String> {
    ITEM_URL_RE
        .captures(url)
        .map(|captures| captures[1].to_string())
}

/// Checksums embedded as `#digits#` markers in the notes column of the
/// transactions table.
///
/// Notes cells without a marker (hand-entered transactions) are skipped.
pub(super) fn note_checksums(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&NOTES_CELLS)
        .filter_map(|cell| {
            let text: String = cell.text().collect();
            CHECKSUM_RE
                .captures(&text)
                .map(|captures| captures[1].to_string())
        })
        .collect()
}
