//! Builder methods available for all states

use std::time::Duration;

use super::builder::ExportConfigBuilder;
use crate::asset_localizer::FetchConfig;

impl<State> ExportConfigBuilder<State> {
    /// Replace every retrieval setting at once
    #[must_use]
    pub fn fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Timeout applied to each stylesheet and attached asset request
    #[must_use]
    pub fn asset_timeout(mut self, timeout: Duration) -> Self {
        self.fetch.asset_timeout = timeout;
        self.fetch.css_timeout = timeout;
        self
    }

    #[must_use]
    pub fn data_timeout(mut self, timeout: Duration) -> Self {
        self.fetch.data_timeout = timeout;
        self
    }

    /// Upper bound on the body size of a single attached asset
    #[must_use]
    pub fn max_asset_size(mut self, bytes: usize) -> Self {
        self.fetch.max_asset_size = bytes;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.fetch.user_agent = user_agent.into();
        self
    }

    /// Pattern of hosting-layout package paths rewritten in stylesheets
    #[must_use]
    pub fn bundle_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.bundle_path_pattern = pattern.into();
        self
    }

    /// Deflate level, 0 (store) through 9
    #[must_use]
    pub fn compression_level(mut self, level: i64) -> Self {
        self.compression_level = level;
        self
    }
}
