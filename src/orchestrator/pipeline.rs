//! Sequencing of one board export from live page to persisted archive.

use anyhow::Result;
use regex::Regex;

use super::board::{LiveBoard, TransientSurface};
use super::report::ExportReport;
use super::stages::StageTracker;
use crate::archive::{ArchiveAssembler, ArchiveSink, DirectorySink, ExportSession};
use crate::asset_localizer::{AssetFetcher, AssetLocalizer, FetchKind, HttpFetcher, fix_card_covers};
use crate::config::ExportConfig;
use crate::errors::{ExportError, ExportResult, FetchTarget};
use crate::snapshot::SnapshotSanitizer;
use crate::utils::board_slug_from_url;

/// Drives a [`LiveBoard`] through every export stage
///
/// Stages run one after another on the caller's task. The first failing
/// stage ends the export; the in-progress session is dropped and the sink
/// is never called.
pub struct ExportOrchestrator<F, S> {
    fetcher: F,
    sink: S,
    sanitizer: SnapshotSanitizer,
    assembler: ArchiveAssembler,
    bundle_pattern: Regex,
}

impl ExportOrchestrator<HttpFetcher, DirectorySink> {
    /// HTTP fetching and on-disk archives, both taken from `config`
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch().clone())?;
        let sink = DirectorySink::new(config.output_dir());
        Self::new(config, fetcher, sink)
    }
}

impl<F: AssetFetcher, S: ArchiveSink> ExportOrchestrator<F, S> {
    pub fn new(config: &ExportConfig, fetcher: F, sink: S) -> Result<Self> {
        Ok(Self {
            fetcher,
            sink,
            sanitizer: SnapshotSanitizer::new(),
            assembler: ArchiveAssembler::new(config.compression_level()),
            bundle_pattern: config.bundle_path_regex()?,
        })
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Export `board` and hand the archive to the sink
    pub async fn export<B: LiveBoard>(&self, board: &mut B) -> ExportResult<ExportReport> {
        let mut tracker = StageTracker::new();
        match self.run(board, &mut tracker).await {
            Ok(mut report) => {
                tracker.advance();
                report.stages = tracker.history().to_vec();
                log::info!(
                    "Exported board '{}' to {} ({} entries)",
                    report.board_slug,
                    report.location,
                    report.entries.len()
                );
                Ok(report)
            }
            Err(e) => {
                tracker.fail(&e);
                Err(e)
            }
        }
    }

    async fn run<B: LiveBoard>(
        &self,
        board: &mut B,
        tracker: &mut StageTracker,
    ) -> ExportResult<ExportReport> {
        // Everything checkable without the network is checked here
        let board_slug = board_slug_from_url(board.location())
            .map_err(|e| ExportError::InvalidBoardUrl(format!("{e:#}")))?;
        tracker.set_board_slug(&board_slug);
        let data_url = board.structured_data_url()?;
        let preview = board.snapshot().map_err(snapshot_error)?;
        self.sanitizer.preflight(&preview, &board_slug)?;

        tracker.advance();
        let structured_data = self
            .fetcher
            .fetch_bytes(&data_url, FetchKind::StructuredData)
            .await
            .map_err(|e| ExportError::fetch(&data_url, FetchTarget::StructuredData, &e))?;

        tracker.advance();
        board.close_transient_ui(TransientSurface::Popup);
        board.close_transient_ui(TransientSurface::Sidebar);

        tracker.advance();
        let snapshot = board.snapshot().map_err(snapshot_error)?;
        let document = self.sanitizer.sanitize(snapshot, &board_slug)?;

        tracker.advance();
        let mut session = ExportSession::new(&board_slug);
        let mut assets = AssetLocalizer::new(&self.fetcher, &self.bundle_pattern)
            .localize(&document, &mut session)
            .await?;

        tracker.advance();
        assets.extend(fix_card_covers(&document, &board_slug)?);

        tracker.advance();
        let archive = self
            .assembler
            .assemble(&document, &structured_data, session)
            .await?;

        tracker.advance();
        let archive_size = archive.bytes.len();
        let location = self
            .sink
            .persist(&archive.name, archive.bytes)
            .await
            .map_err(|e| ExportError::Persistence(format!("{e:#}")))?;

        Ok(ExportReport {
            board_slug,
            archive_name: archive.name,
            archive_size,
            location,
            entries: archive.entries,
            assets,
            dangling_references: archive.dangling_references,
            stages: Vec::new(),
        })
    }
}

fn snapshot_error(e: anyhow::Error) -> ExportError {
    ExportError::Snapshot(format!("{e:#}"))
}
