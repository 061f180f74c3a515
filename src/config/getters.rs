//! Getter methods for `ExportConfig`

use anyhow::Result;
use regex::Regex;
use std::path::Path;

use super::types::ExportConfig;
use crate::asset_localizer::FetchConfig;
use crate::asset_localizer::css::compile_bundle_pattern;

impl ExportConfig {
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn fetch(&self) -> &FetchConfig {
        &self.fetch
    }

    #[must_use]
    pub fn bundle_path_pattern(&self) -> &str {
        &self.bundle_path_pattern
    }

    /// Compiled bundle-path regex
    ///
    /// Configs built through the builder carry it already; deserialized
    /// configs compile it here.
    pub fn bundle_path_regex(&self) -> Result<Regex> {
        match &self.bundle_path_compiled {
            Some(regex) => Ok(regex.clone()),
            None => compile_bundle_pattern(&self.bundle_path_pattern),
        }
    }

    #[must_use]
    pub fn compression_level(&self) -> i64 {
        self.compression_level
    }
}
