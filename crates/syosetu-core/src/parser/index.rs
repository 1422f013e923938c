//! Index page parser for ncode.syosetu.com
//!
//! Extracts the novel title, author, and part structure from a novel's
//! landing page. The chapter list comes in two shapes: novels with parts
//! carry `p-eplist__chapter-title` heading nodes grouping
//! `p-eplist__sublist` entry nodes, flat novels carry entry nodes only.
//!
//! Parsing is a two-pass extraction: first collect every heading and entry
//! node in document order into a flat sequence, then group entries under
//! the preceding heading with a partition scan.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, SyosetuError};
use crate::types::{ChapterRange, NovelIndex, Part};

/// CSS class of a part heading node on the index page
const HEADING_CLASS: &str = "p-eplist__chapter-title";

/// CSS class of a chapter list entry node on the index page
const ENTRY_CLASS: &str = "p-eplist__sublist";

/// One node of interest from the index page, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IndexNode {
    /// A part heading with its title text
    Heading(String),
    /// A chapter list entry with the chapter number from its link target
    Entry(u32),
}

/// Parse a novel index page.
///
/// Title and author come from fixed markup locations; a missing one means
/// the page layout is unrecognized. `parts` is empty for a flat novel —
/// callers fall back to [`parse_flat_chapter_count`].
///
/// Pure function of the markup: identical input yields identical output.
///
/// # Arguments
/// * `html` - Raw HTML content of the novel index page
///
/// # Errors
/// `SyosetuError::Structure` when the title or author node is absent.
pub fn parse_index(html: &str) -> Result<NovelIndex> {
    let document = Html::parse_document(html);

    let title = extract_novel_title(&document).ok_or_else(|| {
        SyosetuError::Structure("novel title (h1.p-novel__title) not found".to_string())
    })?;
    let author = extract_novel_author(&document)
        .ok_or_else(|| SyosetuError::Structure("novel author link not found".to_string()))?;

    let nodes = collect_index_nodes(&document);
    let parts = group_parts(&nodes);

    Ok(NovelIndex {
        title,
        author,
        parts,
    })
}

/// Count chapter list entries on a flat index page.
///
/// Flat novels number their chapters 1..=count in list order, so the range
/// is `[1, count + 1)`.
///
/// # Arguments
/// * `html` - Raw HTML content of the novel index page
pub fn parse_flat_chapter_count(html: &str) -> ChapterRange {
    let document = Html::parse_document(html);
    let mut count = 0u32;

    if let Ok(selector) = Selector::parse(&format!("div.{}", ENTRY_CLASS)) {
        count = document.select(&selector).count() as u32;
    }

    1..count + 1
}

/// Extract the trailing numeric path segment from a chapter link target.
///
/// Chapter links look like `/{novel_id}/{chapter}/`; the chapter number is
/// the last path segment.
///
/// # Examples
/// ```
/// use syosetu_core::parser::extract_chapter_number;
///
/// assert_eq!(extract_chapter_number("/n8920ex/148/"), Some(148));
/// assert_eq!(extract_chapter_number("/n8920ex/148"), Some(148));
/// assert_eq!(extract_chapter_number("/n8920ex/"), None);
/// ```
pub fn extract_chapter_number(href: &str) -> Option<u32> {
    let re = regex_lite::Regex::new(r"/(\d+)/?$").ok()?;
    let caps = re.captures(href)?;
    let number: u32 = caps.get(1)?.as_str().parse().ok()?;

    if number > 0 {
        Some(number)
    } else {
        None
    }
}

/// Extract the novel title from the page.
fn extract_novel_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("h1.p-novel__title").ok()?;
    let element = document.select(&selector).next()?;
    let title = element.text().collect::<String>().trim().to_string();

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Extract the author name: the first anchor on the index page.
fn extract_novel_author(document: &Html) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    let element = document.select(&selector).next()?;
    let author = element.text().collect::<String>().trim().to_string();

    if author.is_empty() {
        None
    } else {
        Some(author)
    }
}

/// First pass: collect heading and entry nodes in document order.
///
/// Entries whose link carries no recoverable chapter number are skipped.
fn collect_index_nodes(document: &Html) -> Vec<IndexNode> {
    let mut nodes = Vec::new();

    let Ok(selector) = Selector::parse(&format!("div.{}, div.{}", HEADING_CLASS, ENTRY_CLASS))
    else {
        return nodes;
    };

    for element in document.select(&selector) {
        if has_class(&element, HEADING_CLASS) {
            let title = element.text().collect::<String>().trim().to_string();
            nodes.push(IndexNode::Heading(title));
        } else if let Some(number) = entry_chapter_number(&element) {
            nodes.push(IndexNode::Entry(number));
        }
    }

    nodes
}

fn has_class(element: &ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Chapter number of a list entry, recovered from its first link.
fn entry_chapter_number(element: &ElementRef) -> Option<u32> {
    let selector = Selector::parse("a[href]").ok()?;
    let link = element.select(&selector).next()?;
    extract_chapter_number(link.value().attr("href")?)
}

/// Second pass: group entries under their preceding heading.
///
/// Each part's range is `[min, max + 1)` over its entries' chapter numbers.
/// Headings with zero entries are dropped; entries before the first heading
/// are ignored.
pub(crate) fn group_parts(nodes: &[IndexNode]) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut current: Option<(String, Vec<u32>)> = None;

    for node in nodes {
        match node {
            IndexNode::Heading(title) => {
                if let Some(part) = finish_part(current.take()) {
                    parts.push(part);
                }
                current = Some((title.clone(), Vec::new()));
            }
            IndexNode::Entry(number) => {
                if let Some((_, numbers)) = current.as_mut() {
                    numbers.push(*number);
                }
            }
        }
    }

    if let Some(part) = finish_part(current) {
        parts.push(part);
    }

    parts
}

fn finish_part(state: Option<(String, Vec<u32>)>) -> Option<Part> {
    let (title, numbers) = state?;
    let min = *numbers.iter().min()?;
    let max = *numbers.iter().max()?;
    Some(Part::new(title, min..max + 1))
}
