//! Export orchestration
//!
//! Sequences the side effects on the live board (closing transient UI)
//! with the snapshot, sanitize, localize, assemble and persist stages.

pub mod board;
pub mod pipeline;
pub mod report;
pub mod stages;

pub use board::{LiveBoard, STRUCTURED_DATA_SELECTOR, StaticBoard, TransientSurface};
pub use pipeline::ExportOrchestrator;
pub use report::ExportReport;
pub use stages::ExportStage;
