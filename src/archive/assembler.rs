//! Zip encoding of a finished export session.

use std::io::{Cursor, Write};

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::audit::dangling_references;
use super::session::{ArchiveEntry, ExportSession};
use crate::errors::{ExportError, ExportResult};
use crate::path_resolver::{board_page_path, data_export_path};
use crate::snapshot::SnapshotDocument;
use crate::utils::DEFAULT_COMPRESSION_LEVEL;

/// Path, size and content digest of one archived entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDigest {
    pub path: String,
    pub size: usize,
    /// Lowercase hex xxh3-64 of the entry content
    pub xxh3: String,
}

/// An encoded archive ready to hand to a sink
#[derive(Debug, Clone)]
pub struct AssembledArchive {
    /// `{slug}.zip`
    pub name: String,
    pub bytes: Vec<u8>,
    pub entries: Vec<EntryDigest>,
    /// Page-relative references with no entry in this archive
    pub dangling_references: Vec<String>,
}

/// Adds the board page and data export to a session and encodes it
///
/// Entries are written in path order with a fixed timestamp and fixed
/// permissions, so identical inputs always encode to identical bytes.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveAssembler {
    compression_level: i64,
}

impl Default for ArchiveAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }
}

impl ArchiveAssembler {
    #[must_use]
    pub fn new(compression_level: i64) -> Self {
        Self { compression_level }
    }

    pub async fn assemble(
        &self,
        document: &SnapshotDocument,
        structured_data: &[u8],
        mut session: ExportSession,
    ) -> ExportResult<AssembledArchive> {
        let slug = session.board_slug().to_string();
        let html = document
            .to_html()
            .map_err(|e| ExportError::Encoding(format!("Board page serialization: {e:#}")))?;

        session.add_entry(board_page_path(&slug), html.as_bytes());
        session.add_entry(data_export_path(&slug), structured_data);

        let dangling = dangling_references(&html, &session);
        let entries = session.into_entries();
        let digests = entries
            .iter()
            .map(|entry| EntryDigest {
                path: entry.path.clone(),
                size: entry.content.len(),
                xxh3: format!("{:016x}", xxh3_64(&entry.content)),
            })
            .collect();

        let level = self.compression_level;
        let bytes = tokio::task::spawn_blocking(move || encode_zip(&entries, level))
            .await
            .map_err(|e| ExportError::Encoding(format!("Encoder task failed: {e}")))??;

        log::info!("Encoded {slug}.zip ({} bytes)", bytes.len());

        Ok(AssembledArchive {
            name: format!("{slug}.zip"),
            bytes,
            entries: digests,
            dangling_references: dangling,
        })
    }
}

fn encode_zip(entries: &[ArchiveEntry], compression_level: i64) -> ExportResult<Vec<u8>> {
    let fixed_time = DateTime::from_date_and_time(1980, 1, 1, 0, 0, 0)
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(compression_level))
        .last_modified_time(fixed_time)
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        zip.start_file(entry.path.as_str(), options)?;
        zip.write_all(&entry.content)
            .map_err(|e| ExportError::Encoding(format!("{}: {e}", entry.path)))?;
    }

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const PAGE: &str = r#"<html><head><link rel="stylesheet" href="../style/a.css"></head>
        <body><h1 class="p-name"><a class="u-url" href="../team-alpha/">Alpha</a></h1></body></html>"#;

    fn session() -> ExportSession {
        let mut session = ExportSession::new("team-alpha");
        session.add_entry("style/a.css", "body{}");
        session
    }

    #[tokio::test]
    async fn test_archive_carries_page_and_data() {
        let doc = SnapshotDocument::capture(PAGE, "https://boards.test/b/1/team-alpha").unwrap();
        let archive = ArchiveAssembler::default()
            .assemble(&doc, br#"{"title":"Alpha"}"#, session())
            .await
            .unwrap();

        assert_eq!(archive.name, "team-alpha.zip");
        assert!(archive.dangling_references.is_empty());

        let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        let names: Vec<String> = zip.file_names().map(str::to_string).collect();
        assert!(names.contains(&"team-alpha/index.html".to_string()));
        assert!(names.contains(&"data/team-alpha.json".to_string()));
        assert!(names.contains(&"style/a.css".to_string()));

        let mut data = String::new();
        zip.by_name("data/team-alpha.json")
            .unwrap()
            .read_to_string(&mut data)
            .unwrap();
        assert_eq!(data, r#"{"title":"Alpha"}"#);
    }

    #[tokio::test]
    async fn test_encoding_is_deterministic() {
        let doc = SnapshotDocument::capture(PAGE, "https://boards.test/b/1/team-alpha").unwrap();
        let assembler = ArchiveAssembler::default();
        let first = assembler.assemble(&doc, b"{}", session()).await.unwrap();
        let second = assembler.assemble(&doc, b"{}", session()).await.unwrap();

        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.entries, second.entries);
    }

    #[tokio::test]
    async fn test_structured_data_is_stored_verbatim() {
        let doc = SnapshotDocument::capture(PAGE, "https://boards.test/b/1/team-alpha").unwrap();
        let data = b"{\"title\":\"Caf\xe9\"}";
        let archive = ArchiveAssembler::default()
            .assemble(&doc, data, session())
            .await
            .unwrap();

        let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        let mut stored = Vec::new();
        zip.by_name("data/team-alpha.json")
            .unwrap()
            .read_to_end(&mut stored)
            .unwrap();
        assert_eq!(stored, data);
    }
}
