//! Retrieval of remote resources referenced by the board
//!
//! The pipeline talks to the network only through the [`AssetFetcher`]
//! trait. [`HttpFetcher`] is the reqwest-backed implementation:
//!
//! - per-kind timeouts and `Accept` headers
//! - a browser-like `User-Agent`
//! - size limits enforced from `Content-Length` and again while streaming
//!
//! Requests are issued one at a time by the caller; nothing here spawns or
//! joins concurrent downloads.
//!
//! ## Usage
//!
//! ```ignore
//! use kodegen_tools_board_export::asset_localizer::{AssetFetcher, FetchConfig, FetchKind, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new(FetchConfig::default())?;
//! let css = fetcher
//!     .fetch_text("https://boards.example.com/merged.css", FetchKind::Stylesheet)
//!     .await?;
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::path_resolver::AssetRole;
use crate::utils::constants::{
    CHROME_USER_AGENT, DEFAULT_ASSET_TIMEOUT, DEFAULT_CSS_TIMEOUT, DEFAULT_DATA_TIMEOUT,
    DEFAULT_MAX_ASSET_SIZE, DEFAULT_MAX_CSS_SIZE, DEFAULT_MAX_DATA_SIZE,
};

/// What is being fetched; selects timeout, size limit and `Accept` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    StructuredData,
    Stylesheet,
    Attached,
}

impl From<AssetRole> for FetchKind {
    fn from(role: AssetRole) -> Self {
        match role {
            AssetRole::Stylesheet => FetchKind::Stylesheet,
            AssetRole::AttachedSrc | AssetRole::CardCover => FetchKind::Attached,
        }
    }
}

impl std::fmt::Display for FetchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchKind::StructuredData => write!(f, "structured data"),
            FetchKind::Stylesheet => write!(f, "stylesheet"),
            FetchKind::Attached => write!(f, "asset"),
        }
    }
}

/// Configuration for download timeouts and size limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timeout for the structured data export
    pub data_timeout: Duration,
    /// Timeout for each stylesheet
    pub css_timeout: Duration,
    /// Timeout for each attached asset
    pub asset_timeout: Duration,

    /// Maximum size of the structured data export (bytes)
    pub max_data_size: usize,
    /// Maximum size of a stylesheet (bytes)
    pub max_css_size: usize,
    /// Maximum size of an attached asset (bytes)
    pub max_asset_size: usize,

    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            data_timeout: DEFAULT_DATA_TIMEOUT,
            css_timeout: DEFAULT_CSS_TIMEOUT,
            asset_timeout: DEFAULT_ASSET_TIMEOUT,
            max_data_size: DEFAULT_MAX_DATA_SIZE,
            max_css_size: DEFAULT_MAX_CSS_SIZE,
            max_asset_size: DEFAULT_MAX_ASSET_SIZE,
            user_agent: CHROME_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub fn timeout_for(&self, kind: FetchKind) -> Duration {
        match kind {
            FetchKind::StructuredData => self.data_timeout,
            FetchKind::Stylesheet => self.css_timeout,
            FetchKind::Attached => self.asset_timeout,
        }
    }

    #[must_use]
    pub fn max_size_for(&self, kind: FetchKind) -> usize {
        match kind {
            FetchKind::StructuredData => self.max_data_size,
            FetchKind::Stylesheet => self.max_css_size,
            FetchKind::Attached => self.max_asset_size,
        }
    }

    fn accept_for(kind: FetchKind) -> &'static str {
        match kind {
            FetchKind::StructuredData => "application/json,text/plain,*/*;q=0.8",
            FetchKind::Stylesheet => "text/css,*/*;q=0.1",
            FetchKind::Attached => "image/avif,image/webp,image/apng,image/*,*/*;q=0.8",
        }
    }
}

/// Source of remote resource content
///
/// Implementations must either return the complete body or fail; the
/// pipeline never accepts a partial resource.
#[allow(async_fn_in_trait)]
pub trait AssetFetcher {
    /// Fetch a text resource, replacing invalid UTF-8 sequences with U+FFFD
    async fn fetch_text(&self, url: &str, kind: FetchKind) -> Result<String>;

    /// Fetch a binary resource
    async fn fetch_bytes(&self, url: &str, kind: FetchKind) -> Result<Vec<u8>>;
}

/// reqwest-backed [`AssetFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    /// Use an existing client (shares its connection pool)
    ///
    /// The configured user agent is sent on every request regardless of the
    /// client's own defaults.
    #[must_use]
    pub fn with_client(client: Client, config: FetchConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Core download implementation
    ///
    /// Handles HTTP download with streaming, size limits, and timeout.
    async fn download_core(&self, url: &str, kind: FetchKind) -> Result<Vec<u8>> {
        let max_size = self.config.max_size_for(kind);

        let response = self
            .client
            .get(url)
            .timeout(self.config.timeout_for(kind))
            .header("User-Agent", &self.config.user_agent)
            .header("Accept", FetchConfig::accept_for(kind))
            .send()
            .await
            .with_context(|| format!("Failed to download {kind}"))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "{kind} download failed with status: {}",
                response.status()
            ));
        }

        // Enforce limit BEFORE downloading
        let expected_size = response.content_length().unwrap_or(0);
        if expected_size > max_size as u64 {
            return Err(anyhow::anyhow!(
                "{kind} too large: {expected_size} bytes exceeds limit of {max_size} bytes"
            ));
        }

        let mut buffer = if expected_size > 0 {
            Vec::with_capacity(expected_size as usize)
        } else {
            Vec::new()
        };

        // Content-Length may be absent or wrong, so check while streaming as well
        let mut stream = response.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.with_context(|| format!("Failed to read {kind} chunk"))?;

            let new_total = buffer.len() + chunk.len();
            if new_total > max_size {
                return Err(anyhow::anyhow!(
                    "{kind} download exceeded size limit during download: {new_total} bytes (max: {max_size})"
                ));
            }
            buffer.extend_from_slice(&chunk);
        }

        log::debug!("Downloaded {kind} {url} ({} bytes)", buffer.len());
        Ok(buffer)
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, kind: FetchKind) -> Result<String> {
        let bytes = self.download_core(url, kind).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn fetch_bytes(&self, url: &str, kind: FetchKind) -> Result<Vec<u8>> {
        self.download_core(url, kind).await
    }
}
