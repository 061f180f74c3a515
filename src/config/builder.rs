//! Type-safe builder for `ExportConfig` using the typestate pattern
//!
//! The output directory must be set before `build` becomes available.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::ExportConfig;
use crate::asset_localizer::FetchConfig;
use crate::asset_localizer::css::compile_bundle_pattern;
use crate::utils::{DEFAULT_BUNDLE_PATH_PATTERN, DEFAULT_COMPRESSION_LEVEL};

// Type states for the builder
pub struct WithOutputDir;

pub struct ExportConfigBuilder<State = ()> {
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) fetch: FetchConfig,
    pub(crate) bundle_path_pattern: String,
    pub(crate) compression_level: i64,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ExportConfigBuilder<()> {
    fn default() -> Self {
        Self {
            output_dir: None,
            fetch: FetchConfig::default(),
            bundle_path_pattern: DEFAULT_BUNDLE_PATH_PATTERN.to_string(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            _phantom: PhantomData,
        }
    }
}

impl ExportConfig {
    /// Create a builder for configuring an `ExportConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ExportConfigBuilder<()> {
        ExportConfigBuilder::default()
    }
}

impl ExportConfigBuilder<()> {
    pub fn output_dir(self, dir: impl Into<PathBuf>) -> ExportConfigBuilder<WithOutputDir> {
        ExportConfigBuilder {
            output_dir: Some(dir.into()),
            fetch: self.fetch,
            bundle_path_pattern: self.bundle_path_pattern,
            compression_level: self.compression_level,
            _phantom: PhantomData,
        }
    }
}

impl ExportConfigBuilder<WithOutputDir> {
    pub fn build(self) -> Result<ExportConfig> {
        let bundle_path_compiled = compile_bundle_pattern(&self.bundle_path_pattern)?;

        if !(0..=9).contains(&self.compression_level) {
            return Err(anyhow!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            ));
        }

        Ok(ExportConfig {
            output_dir: self
                .output_dir
                .ok_or_else(|| anyhow!("output_dir is required"))?,
            fetch: self.fetch,
            bundle_path_pattern: self.bundle_path_pattern,
            bundle_path_compiled: Some(bundle_path_compiled),
            compression_level: self.compression_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::builder().output_dir("/tmp/exports").build().unwrap();
        assert_eq!(config.output_dir(), std::path::Path::new("/tmp/exports"));
        assert_eq!(config.bundle_path_pattern(), DEFAULT_BUNDLE_PATH_PATTERN);
        assert_eq!(config.compression_level(), DEFAULT_COMPRESSION_LEVEL);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = ExportConfig::builder()
            .output_dir("/tmp/exports")
            .bundle_path_pattern("packages/(")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_compression_level_range() {
        let result = ExportConfig::builder()
            .output_dir("/tmp/exports")
            .compression_level(12)
            .build();
        assert!(result.is_err());
    }
}
