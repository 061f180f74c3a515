//! Configuration module for board export
//!
//! This module provides the `ExportConfig` struct and its type-safe builder
//! for configuring exports with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{ExportConfigBuilder, WithOutputDir};
pub use types::ExportConfig;
