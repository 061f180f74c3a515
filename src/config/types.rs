//! Core configuration types for board export
//!
//! This module contains the main `ExportConfig` struct that defines where
//! archives are written and how assets are retrieved and packed.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::asset_localizer::FetchConfig;

/// Main configuration struct for board export operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `{slug}.zip`
    pub(crate) output_dir: PathBuf,

    /// Timeouts, size limits and user agent for every retrieval
    pub(crate) fetch: FetchConfig,

    /// Pattern matched (case-insensitive, multi-line) against stylesheet
    /// text; every match is replaced with `../`
    pub(crate) bundle_path_pattern: String,

    /// Compiled form of `bundle_path_pattern`
    #[serde(skip)]
    pub(crate) bundle_path_compiled: Option<Regex>,

    /// Deflate level used for every archive entry
    pub(crate) compression_level: i64,
}
