//! HTML parsers for ncode.syosetu.com pages
//!
//! This module contains parsers for extracting data from syosetu HTML pages:
//! - `index`: novel landing page (title, author, part structure)
//! - `chapter`: single chapter page (title and body text)

pub mod chapter;
pub mod index;

// Re-export main parsing functions
pub use chapter::parse_chapter;
pub use index::{extract_chapter_number, parse_flat_chapter_count, parse_index};
