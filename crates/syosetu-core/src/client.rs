//! HTTP client for ncode.syosetu.com
//!
//! A thin reqwest wrapper that fetches index and chapter page markup. The
//! client supports an optional proxy endpoint and disables strict
//! certificate validation by default — a site-specific accommodation for
//! the intercepting proxy setups commonly used to reach it, configurable
//! via [`ClientConfig::accept_invalid_certs`].
//!
//! No retry happens at this layer: retry policy belongs to the caller, and
//! the download orchestrator is fail-fast by design.

use std::time::Duration;

use crate::error::Result;

/// Base URL for ncode.syosetu.com
const DEFAULT_BASE_URL: &str = "https://ncode.syosetu.com";

/// Default User-Agent mimicking a desktop browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

/// Configuration for the novel HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the novel site (overridable for tests)
    pub base_url: String,
    /// Optional proxy endpoint, e.g. "http://localhost:10809"
    pub proxy: Option<String>,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Skip TLS certificate validation (default: true)
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy: None,
            timeout_secs: 30,
            accept_invalid_certs: true,
        }
    }
}

/// HTTP client for novel index and chapter pages
pub struct NovelClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Site base URL without trailing slash
    base_url: String,
}

impl NovelClient {
    /// Create a new client with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration.
    ///
    /// # Arguments
    /// * `config` - Client configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created or the proxy
    /// endpoint is not a valid URL.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the index page markup for a novel.
    ///
    /// # Arguments
    /// * `novel_id` - Site-assigned novel id (e.g. "n8920ex")
    pub async fn fetch_index(&self, novel_id: &str) -> Result<String> {
        self.fetch(&format!("/{}", novel_id)).await
    }

    /// Fetch a single chapter page markup.
    ///
    /// # Arguments
    /// * `novel_id` - Site-assigned novel id
    /// * `chapter` - Chapter number within the novel (1-based)
    pub async fn fetch_chapter(&self, novel_id: &str, chapter: u32) -> Result<String> {
        self.fetch(&format!("/{}/{}", novel_id, chapter)).await
    }

    /// Fetch raw markup from a site path.
    ///
    /// # Errors
    /// `SyosetuError::Http` on transport failure or a non-success status.
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
