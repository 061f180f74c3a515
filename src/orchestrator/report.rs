//! Summary of a completed export.

use std::fmt;

use serde::Serialize;

use super::stages::ExportStage;
use crate::archive::EntryDigest;
use crate::asset_localizer::AssetReference;

/// What an export produced and where it went
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub board_slug: String,
    pub archive_name: String,
    pub archive_size: usize,
    /// Where the sink put the archive
    pub location: String,
    /// Archive entries in archive order
    pub entries: Vec<EntryDigest>,
    /// Localized stylesheets, attached assets and card covers
    pub assets: Vec<AssetReference>,
    /// Page-relative references with no entry in the archive
    pub dangling_references: Vec<String>,
    #[serde(serialize_with = "serialize_stages")]
    pub stages: Vec<ExportStage>,
}

fn serialize_stages<S: serde::Serializer>(
    stages: &[ExportStage],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(stages.iter().map(ToString::to_string))
}

impl ExportReport {
    /// Entries whose path starts with `prefix`
    pub fn entries_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a EntryDigest> {
        self.entries.iter().filter(move |e| e.path.starts_with(prefix))
    }

    #[must_use]
    pub fn entry(&self, path: &str) -> Option<&EntryDigest> {
        self.entries.iter().find(|e| e.path == path)
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Exported {} -> {} ({} bytes, {} entries)",
            self.board_slug,
            self.location,
            self.archive_size,
            self.entries.len()
        )?;
        for entry in &self.entries {
            writeln!(f, "  {:>10}  {}  {}", entry.size, entry.xxh3, entry.path)?;
        }
        for reference in &self.dangling_references {
            writeln!(f, "  missing: {reference}")?;
        }
        Ok(())
    }
}
