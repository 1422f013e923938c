//! Syosetu Downloader Core Library
//!
//! This crate downloads web novels from ncode.syosetu.com: it parses a
//! novel's index page into parts with contiguous chapter-number ranges,
//! fetches chapter bodies with bounded concurrency, and appends them to
//! per-part text files strictly in ascending chapter order.
//!
//! # Features
//! - Two-shape index parsing (novels with parts vs. flat novels)
//! - Bounded concurrent chapter fetches (default 8 in flight per session)
//! - Order-preserving writes independent of fetch completion order
//! - Optional proxy endpoint with relaxed TLS validation

pub mod client;
pub mod downloader;
pub mod error;
pub mod parser;
pub mod record;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, NovelClient};
pub use downloader::{NovelDownloader, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use error::{Result, SyosetuError};
pub use record::{append_record, format_record, safe_file_name, RECORD_MARKER};
pub use types::{
    Chapter, ChapterRange, NovelHandle, NovelIndex, NovelStructure, Part, SaveFormat,
};
