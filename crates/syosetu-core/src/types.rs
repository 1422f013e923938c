//! Data types for the syosetu downloader.
//!
//! All types are plain data and implement Serialize and Deserialize for
//! JSON compatibility.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SyosetuError;

/// Half-open interval `[start, end)` of chapter numbers within a novel.
///
/// Chapter numbers are positive and globally unique within one novel.
pub type ChapterRange = std::ops::Range<u32>;

/// Immutable identity of a novel, resolved once from the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovelHandle {
    /// Site-assigned novel id (e.g. "n8920ex")
    pub id: String,
    /// Novel title from the index page
    pub title: String,
    /// Author name from the index page
    pub author: String,
}

/// A named subdivision of a novel covering a contiguous block of chapters.
///
/// Parts appear in document order; their ranges are pairwise disjoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Part title; empty for the synthetic part of a novel without parts
    pub title: String,
    /// Chapter numbers belonging to this part
    pub chapters: ChapterRange,
}

impl Part {
    /// Create a new part
    pub fn new(title: impl Into<String>, chapters: ChapterRange) -> Self {
        Self {
            title: title.into(),
            chapters,
        }
    }

    /// Whether this is the synthetic part of a novel without part headings
    pub fn is_flat(&self) -> bool {
        self.title.is_empty()
    }
}

/// Raw parse result of a novel index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovelIndex {
    /// Novel title
    pub title: String,
    /// Author name
    pub author: String,
    /// Parts in document order; empty when the novel has no part headings
    pub parts: Vec<Part>,
}

/// Resolved download plan: novel identity plus parts in document order.
///
/// For a novel without parts this holds a single synthetic [`Part`] with an
/// empty title covering the flat chapter range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NovelStructure {
    /// Novel identity
    pub handle: NovelHandle,
    /// Parts to download, in order
    pub parts: Vec<Part>,
}

/// A fetched chapter, whitespace-normalized and ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter number within the novel (1-based)
    pub number: u32,
    /// Chapter title
    pub title: String,
    /// Chapter body text
    pub body: String,
}

/// Output format selection for a download session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    /// Flat text files, one per part
    #[default]
    Txt,
    /// Text files converted to one EPUB per part
    Epub,
}

impl FromStr for SaveFormat {
    type Err = SyosetuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "txt" => Ok(SaveFormat::Txt),
            "epub" => Ok(SaveFormat::Epub),
            other => Err(SyosetuError::Config(other.to_string())),
        }
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveFormat::Txt => write!(f, "txt"),
            SaveFormat::Epub => write!(f, "epub"),
        }
    }
}
