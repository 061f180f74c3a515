//! Type definitions for asset localization

use kuchiki::{ElementData, NodeDataRef};
use serde::Serialize;

use crate::path_resolver::AssetRole;

/// An asset relocated into the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetReference {
    /// URL the element referenced before localization
    pub original_url: String,
    #[serde(serialize_with = "serialize_role")]
    pub role: AssetRole,
    /// Archive path the reference now resolves to
    pub localized_path: String,
}

fn serialize_role<S: serde::Serializer>(role: &AssetRole, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(role)
}

/// One discovered asset waiting in the localization queue
pub struct AssetTask {
    pub role: AssetRole,
    /// Element whose reference gets rewritten
    pub element: NodeDataRef<ElementData>,
    /// Lowercased tag name of `element`
    pub tag: String,
    /// Absolute URL to retrieve
    pub url: String,
}

impl std::fmt::Debug for AssetTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetTask")
            .field("role", &self.role)
            .field("tag", &self.tag)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}
