//! Error types for the syosetu downloader.
//!
//! Structure errors are fatal: they indicate the index page layout is
//! unrecognized, not a transient fault, and are never retried. Fetch and
//! parse errors abort the current part under the orchestrator's fail-fast
//! policy and are reported wrapped in [`SyosetuError::Chapter`].

use thiserror::Error;

/// Error type for syosetu downloader operations
#[derive(Error, Debug)]
pub enum SyosetuError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Index page layout was not recognized
    #[error("Unrecognized index page layout: {0}")]
    Structure(String),

    /// Expected chapter content was missing from the response
    #[error("Chapter content missing: {0}")]
    Parse(String),

    /// A chapter download failed, aborting its part
    #[error("chapter {chapter} of \"{part}\" failed: {source}")]
    Chapter {
        /// Display name of the part being downloaded
        part: String,
        /// Number of the chapter that failed
        chapter: u32,
        /// The underlying failure
        #[source]
        source: Box<SyosetuError>,
    },

    /// Invalid save format selection
    #[error("Invalid save format: {0}")]
    Config(String),

    /// Invalid novel id provided
    #[error("Invalid novel id: {0:?}")]
    InvalidId(String),

    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fetch worker task failed to run to completion
    #[error("Fetch task failed: {0}")]
    Task(String),
}

impl SyosetuError {
    /// Whether this error stems from a transport-level connection failure
    /// (connection refused or reset, proxy unreachable, timeout).
    ///
    /// Callers use this to print a network/proxy hint instead of a raw
    /// error chain.
    pub fn is_connection(&self) -> bool {
        match self {
            SyosetuError::Http(e) => e.is_connect() || e.is_timeout(),
            SyosetuError::Chapter { source, .. } => source.is_connection(),
            _ => false,
        }
    }
}

/// Result type alias for syosetu downloader operations
pub type Result<T> = std::result::Result<T, SyosetuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_structure() {
        let error = SyosetuError::Structure("novel title not found".to_string());
        assert_eq!(
            error.to_string(),
            "Unrecognized index page layout: novel title not found"
        );
    }

    #[test]
    fn test_error_display_parse() {
        let error = SyosetuError::Parse("chapter 3: body not found".to_string());
        assert_eq!(
            error.to_string(),
            "Chapter content missing: chapter 3: body not found"
        );
    }

    #[test]
    fn test_error_display_chapter() {
        let error = SyosetuError::Chapter {
            part: "第一部".to_string(),
            chapter: 42,
            source: Box::new(SyosetuError::Parse("missing body".to_string())),
        };
        let display = error.to_string();
        assert!(display.contains("chapter 42"));
        assert!(display.contains("第一部"));
        assert!(display.contains("missing body"));
    }

    #[test]
    fn test_error_display_config() {
        let error = SyosetuError::Config("pdf".to_string());
        assert_eq!(error.to_string(), "Invalid save format: pdf");
    }

    #[test]
    fn test_error_display_invalid_id() {
        let error = SyosetuError::InvalidId("".to_string());
        assert_eq!(error.to_string(), "Invalid novel id: \"\"");
    }

    #[test]
    fn test_is_connection_non_transport() {
        assert!(!SyosetuError::Structure("x".to_string()).is_connection());
        assert!(!SyosetuError::Config("pdf".to_string()).is_connection());
        assert!(!SyosetuError::Task("cancelled".to_string()).is_connection());
    }

    #[test]
    fn test_is_connection_recurses_into_chapter() {
        let error = SyosetuError::Chapter {
            part: "A".to_string(),
            chapter: 1,
            source: Box::new(SyosetuError::Parse("x".to_string())),
        };
        assert!(!error.is_connection());
    }
}
