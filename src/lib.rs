pub mod archive;
pub mod asset_localizer;
pub mod config;
pub mod errors;
pub mod orchestrator;
pub mod path_resolver;
pub mod snapshot;
pub mod utils;

pub use archive::{ArchiveAssembler, ArchiveSink, DirectorySink, ExportSession, MemorySink};
pub use asset_localizer::{AssetFetcher, AssetLocalizer, FetchConfig, FetchKind, HttpFetcher};
pub use config::ExportConfig;
pub use errors::{ErrorKind, ExportError, ExportResult};
pub use orchestrator::{
    ExportOrchestrator, ExportReport, ExportStage, LiveBoard, StaticBoard, TransientSurface,
};
pub use path_resolver::AssetRole;
pub use snapshot::{SnapshotDocument, SnapshotSanitizer};

/// Export a saved board page at `location` into `config.output_dir()`
pub async fn export_board(
    config: &ExportConfig,
    html: &str,
    location: &str,
) -> anyhow::Result<ExportReport> {
    let orchestrator = ExportOrchestrator::from_config(config)?;
    let mut board = StaticBoard::from_html(html, location)?;
    Ok(orchestrator.export(&mut board).await?)
}
