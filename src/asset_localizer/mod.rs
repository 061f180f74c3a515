//! Asset localization
//!
//! Discovers externally-hosted stylesheets and `src`-bearing elements in a
//! sanitized board tree, fetches them, stores them in the export session and
//! rewrites each reference to its archive-relative location.

pub mod css;
pub mod discovery;
pub mod downloaders;
pub mod localizer;
pub mod types;

pub use downloaders::{AssetFetcher, FetchConfig, FetchKind, HttpFetcher};
pub use localizer::{AssetLocalizer, fix_card_covers};
pub use types::{AssetReference, AssetTask};
