//! Download orchestrator.
//!
//! Drives the full sequence: resolve the novel structure once from the
//! index page, then for each part fetch every chapter in its range under a
//! session-wide concurrency cap and append the records to the part's
//! output file.
//!
//! Ordering invariant: fetch tasks are spawned in ascending chapter order
//! and awaited in submission order, so records land in the file strictly
//! ascending no matter in which order the fetches complete. Parts are
//! processed one at a time in document order — a failure never straddles
//! two output files.
//!
//! Failure policy is fail-fast: the first chapter error aborts the rest of
//! the current part and fails the session, naming the part and chapter.
//! Partially written files are left on disk.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::client::NovelClient;
use crate::error::{Result, SyosetuError};
use crate::parser::{parse_chapter, parse_flat_chapter_count, parse_index};
use crate::record::{append_record, safe_file_name};
use crate::types::{Chapter, NovelHandle, NovelStructure, Part};

/// Default cap on concurrent in-flight chapter fetches per session
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Download orchestrator for one novel.
///
/// # Example
/// ```no_run
/// use syosetu_core::NovelDownloader;
///
/// # async fn example() -> syosetu_core::Result<()> {
/// let downloader = NovelDownloader::new("n8920ex")?;
/// let structure = downloader.download(std::path::Path::new("./downloads")).await?;
/// println!("downloaded {}", structure.handle.title);
/// # Ok(())
/// # }
/// ```
pub struct NovelDownloader {
    /// Shared HTTP client and connection pool
    client: Arc<NovelClient>,
    /// Site-assigned novel id
    novel_id: String,
    /// Session-wide cap on in-flight fetches
    semaphore: Arc<Semaphore>,
    /// Suffix record headers with the chapter position
    record_index: bool,
}

impl NovelDownloader {
    /// Create a downloader with a default client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created or `novel_id`
    /// is empty.
    pub fn new(novel_id: &str) -> Result<Self> {
        Self::with_client(NovelClient::new()?, novel_id)
    }

    /// Create a downloader with a pre-configured client.
    ///
    /// This is how tests point the downloader at a mock server, and how the
    /// CLI passes proxy configuration through.
    ///
    /// # Errors
    /// `SyosetuError::InvalidId` when `novel_id` is empty or whitespace.
    pub fn with_client(client: NovelClient, novel_id: &str) -> Result<Self> {
        let trimmed = novel_id.trim();
        if trimmed.is_empty() {
            return Err(SyosetuError::InvalidId(novel_id.to_string()));
        }

        Ok(Self {
            client: Arc::new(client),
            novel_id: trimmed.to_string(),
            semaphore: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_FETCHES)),
            record_index: false,
        })
    }

    /// Set the cap on concurrent in-flight fetches (minimum 1).
    ///
    /// The cap applies across the whole download session, not per part.
    pub fn with_max_concurrent_fetches(mut self, cap: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(cap.max(1)));
        self
    }

    /// Record each chapter's position in its record header, like `[総第12話]`.
    pub fn record_chapter_index(mut self, enabled: bool) -> Self {
        self.record_index = enabled;
        self
    }

    /// Resolve the novel structure from the index page.
    ///
    /// Fetches the index once and parses it. A novel without part headings
    /// gets one synthetic part (empty title) covering the flat chapter
    /// range, so downstream code handles both shapes uniformly.
    ///
    /// # Errors
    /// `SyosetuError::Structure` when the index layout is unrecognized.
    /// This is fatal and never retried.
    pub async fn resolve_structure(&self) -> Result<NovelStructure> {
        let html = self.client.fetch_index(&self.novel_id).await?;
        let index = parse_index(&html)?;

        let parts = if index.parts.is_empty() {
            vec![Part::new("", parse_flat_chapter_count(&html))]
        } else {
            index.parts
        };

        info!(
            title = %index.title,
            author = %index.author,
            parts = parts.len(),
            "novel structure resolved"
        );

        Ok(NovelStructure {
            handle: NovelHandle {
                id: self.novel_id.clone(),
                title: index.title,
                author: index.author,
            },
            parts,
        })
    }

    /// Download the whole novel into `output_dir`.
    ///
    /// Creates `{output_dir}/{novel title}` holding one text file per part,
    /// named after the part (or after the novel itself when it has no
    /// parts). **Destructive**: a pre-existing directory of that name is
    /// removed before the download starts.
    ///
    /// Returns the resolved structure so callers can locate the output.
    ///
    /// # Errors
    /// Fails fast on the first structure, fetch, parse, or write error.
    /// Files written before the failure remain on disk.
    pub async fn download(&self, output_dir: &Path) -> Result<NovelStructure> {
        let structure = self.resolve_structure().await?;

        let novel_dir = output_dir.join(safe_file_name(&structure.handle.title));
        if tokio::fs::try_exists(&novel_dir).await? {
            tokio::fs::remove_dir_all(&novel_dir).await?;
        }
        tokio::fs::create_dir_all(&novel_dir).await?;

        for part in &structure.parts {
            self.download_part(&structure.handle, part, &novel_dir)
                .await?;
        }

        info!(title = %structure.handle.title, "download complete");
        Ok(structure)
    }

    /// Download one part's chapter range into its output file.
    async fn download_part(
        &self,
        handle: &NovelHandle,
        part: &Part,
        novel_dir: &Path,
    ) -> Result<()> {
        let display_name = if part.is_flat() {
            handle.title.clone()
        } else {
            part.title.clone()
        };
        let path = novel_dir.join(format!("{}.txt", safe_file_name(&display_name)));

        info!(
            part = %display_name,
            start = part.chapters.start,
            end = part.chapters.end,
            "part download started"
        );

        // Spawn one task per chapter in ascending order. Each task waits on
        // the session-wide semaphore before touching the network, so at
        // most `cap` fetches are in flight at once.
        let mut pending: VecDeque<(u32, JoinHandle<Result<Chapter>>)> = VecDeque::new();
        for number in part.chapters.clone() {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&self.semaphore);
            let novel_id = self.novel_id.clone();

            pending.push_back((
                number,
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| SyosetuError::Task(e.to_string()))?;
                    let html = client.fetch_chapter(&novel_id, number).await?;
                    parse_chapter(&html, number)
                }),
            ));
        }

        // Await in submission order: the file grows in ascending chapter
        // order regardless of completion order.
        while let Some((number, task)) = pending.pop_front() {
            let fetched = match task.await {
                Ok(result) => result,
                Err(e) => Err(SyosetuError::Task(e.to_string())),
            };

            let written = match fetched {
                Ok(chapter) => {
                    let result = append_record(&path, &chapter, self.record_index).await;
                    if result.is_ok() {
                        debug!(chapter = number, title = %chapter.title, "chapter saved");
                    }
                    result
                }
                Err(e) => Err(e),
            };

            if let Err(source) = written {
                // Fail fast: nothing past the failing chapter is written,
                // and the in-flight remainder of this part is abandoned.
                for (_, rest) in pending {
                    rest.abort();
                }
                return Err(SyosetuError::Chapter {
                    part: display_name,
                    chapter: number,
                    source: Box::new(source),
                });
            }
        }

        Ok(())
    }
}
