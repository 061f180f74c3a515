//! In-progress export state.

use std::collections::BTreeMap;

/// A single named path plus its byte content within the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub content: Vec<u8>,
}

/// Archive entries collected for one board export
///
/// Entries are keyed by path, so writing the same path twice keeps the last
/// content. Iteration is in path order, which keeps the encoded archive
/// independent of insertion order.
#[derive(Debug, Clone, Default)]
pub struct ExportSession {
    board_slug: String,
    entries: BTreeMap<String, Vec<u8>>,
}

impl ExportSession {
    #[must_use]
    pub fn new(board_slug: impl Into<String>) -> Self {
        Self {
            board_slug: board_slug.into(),
            entries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn board_slug(&self) -> &str {
        &self.board_slug
    }

    /// Store `content` at `path`; returns `true` when an earlier entry was replaced
    pub fn add_entry(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> bool {
        let path = path.into();
        let replaced = self.entries.insert(path.clone(), content.into()).is_some();
        if replaced {
            log::warn!("Archive entry {path} overwritten by a later asset");
        }
        replaced
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry paths in archive order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Consume the session, yielding entries in archive order
    #[must_use]
    pub fn into_entries(self) -> Vec<ArchiveEntry> {
        self.entries
            .into_iter()
            .map(|(path, content)| ArchiveEntry { path, content })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut session = ExportSession::new("team-alpha");
        assert!(!session.add_entry("team-alpha/img/a.png", b"first".to_vec()));
        assert!(session.add_entry("team-alpha/img/a.png", b"second".to_vec()));

        assert_eq!(session.len(), 1);
        assert_eq!(session.get("team-alpha/img/a.png"), Some(&b"second"[..]));
    }

    #[test]
    fn test_entries_are_path_ordered() {
        let mut session = ExportSession::new("b");
        session.add_entry("style/z.css", "z");
        session.add_entry("b/index.html", "i");
        session.add_entry("data/b.json", "{}");

        let paths: Vec<String> = session.into_entries().into_iter().map(|e| e.path).collect();
        assert_eq!(paths, vec!["b/index.html", "data/b.json", "style/z.css"]);
    }
}
