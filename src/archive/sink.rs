//! Destinations for a finished archive.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tempfile::NamedTempFile;

/// Hands a named archive buffer to the user
///
/// Returns a human-readable description of where the archive ended up.
#[allow(async_fn_in_trait)]
pub trait ArchiveSink {
    async fn persist(&self, name: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Writes archives into a directory, replacing any previous file atomically
#[derive(Debug, Clone)]
pub struct DirectorySink {
    output_dir: PathBuf,
}

impl DirectorySink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ArchiveSink for DirectorySink {
    async fn persist(&self, name: &str, bytes: Vec<u8>) -> Result<String> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        let parent_dir = self.output_dir.clone();
        let path = self.output_dir.join(sanitize_filename::sanitize(name));
        let target = path.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut temp_file = NamedTempFile::new_in(&parent_dir)?;
            temp_file.write_all(&bytes)?;
            temp_file.persist(&target)?;
            Ok(())
        })
        .await
        .map_err(|e| anyhow::anyhow!("Archive write task panicked: {e}"))??;

        Ok(path.display().to_string())
    }
}

/// Keeps archives in memory; useful for embedding and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    archives: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Archives received so far, in arrival order
    pub fn archives(&self) -> Vec<(String, Vec<u8>)> {
        self.archives.lock().clone()
    }

    /// Bytes of the most recent archive named `name`
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.archives
            .lock()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.clone())
    }
}

impl ArchiveSink for MemorySink {
    async fn persist(&self, name: &str, bytes: Vec<u8>) -> Result<String> {
        self.archives.lock().push((name.to_string(), bytes));
        Ok(format!("memory:{name}"))
    }
}
