//! Shared configuration constants for board export
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

use std::time::Duration;

/// Chrome user agent string sent with every asset request
///
/// Some board hosts serve stripped-down or redirect responses to
/// non-browser agents, so asset requests present themselves as Chrome.
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Timeout for the structured data export request
pub const DEFAULT_DATA_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for each stylesheet request
pub const DEFAULT_CSS_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for each attached asset request (images, media)
pub const DEFAULT_ASSET_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum size of the structured data export: 64MB
///
/// Board exports carry every card, comment and activity, so large boards
/// routinely reach tens of megabytes.
pub const DEFAULT_MAX_DATA_SIZE: usize = 64 * 1024 * 1024;

/// Maximum size of a single stylesheet: 4MB
///
/// Typical: 50-200KB, bundled application stylesheets: 1-2MB
pub const DEFAULT_MAX_CSS_SIZE: usize = 4 * 1024 * 1024;

/// Maximum size of a single attached asset: 32MB
pub const DEFAULT_MAX_ASSET_SIZE: usize = 32 * 1024 * 1024;

/// Path segment that encodes a package install location inside bundled stylesheets
pub const DEFAULT_BUNDLE_PATH_PATTERN: &str = r"packages/[^/]+/upstream/";

/// Deflate level used for archive entries
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 9;

/// Doctype prefixed to the archived board page
pub const HTML_DOCTYPE: &str = "<!doctype html>";
