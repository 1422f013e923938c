//! Chapter page parser for ncode.syosetu.com
//!
//! Parses a single chapter page into its title and body text.

use scraper::{Html, Selector};

use crate::error::{Result, SyosetuError};
use crate::types::Chapter;

/// The site's full-width space (U+3000), normalized on chapter pages.
const FULL_WIDTH_SPACE: char = '\u{3000}';

/// Parse a chapter page into a normalized [`Chapter`].
///
/// The full-width space is translated to a single ordinary space in the
/// title and removed entirely from the body. This rule is part of the text
/// file contract consumed downstream, not cosmetic cleanup.
///
/// # Arguments
/// * `html` - Raw HTML content of the chapter page
/// * `number` - Chapter number, recorded on the result and in errors
///
/// # Errors
/// `SyosetuError::Parse` when the title or body node is missing (site
/// layout mismatch, or the chapter was removed).
pub fn parse_chapter(html: &str, number: u32) -> Result<Chapter> {
    let document = Html::parse_document(html);

    let title = select_text(&document, "h1.p-novel__title").ok_or_else(|| {
        SyosetuError::Parse(format!(
            "chapter {}: title (h1.p-novel__title) not found",
            number
        ))
    })?;
    let body = select_text(&document, "div.p-novel__body").ok_or_else(|| {
        SyosetuError::Parse(format!(
            "chapter {}: body (div.p-novel__body) not found",
            number
        ))
    })?;

    Ok(Chapter {
        number,
        title: title.replace(FULL_WIDTH_SPACE, " "),
        body: body.replace(FULL_WIDTH_SPACE, ""),
    })
}

/// Collect the text of the first element matching `selector`.
fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let element = document.select(&selector).next()?;
    Some(element.text().collect::<String>())
}
