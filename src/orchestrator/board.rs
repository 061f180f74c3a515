//! The live board the orchestrator drives.

use std::fmt;

use anyhow::Result;

use crate::errors::{ExportError, ExportResult};
use crate::snapshot::SnapshotDocument;
use crate::snapshot::dom::{remove_class, select_all, select_first};
use crate::utils::resolve_url;

/// Link whose resolved `href` serves the structured data export
pub const STRUCTURED_DATA_SELECTOR: &str = ".download-json-link[href]";

/// Transient interface surfaces closed before the snapshot is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientSurface {
    Popup,
    Sidebar,
}

impl fmt::Display for TransientSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransientSurface::Popup => write!(f, "popup"),
            TransientSurface::Sidebar => write!(f, "sidebar"),
        }
    }
}

/// A board page still attached to its application
pub trait LiveBoard {
    /// Current page location
    fn location(&self) -> &str;

    /// Absolute URL of the structured data export
    fn structured_data_url(&self) -> ExportResult<String>;

    /// Close a transient surface; fire-and-forget
    fn close_transient_ui(&mut self, surface: TransientSurface);

    /// Deep copy of the rendered document sharing no nodes with the board
    fn snapshot(&self) -> Result<SnapshotDocument>;
}

/// [`LiveBoard`] over a saved board page
///
/// Closing a surface edits the page the way the application would: popups
/// are detached and the sidebar loses its open state.
#[derive(Debug)]
pub struct StaticBoard {
    document: SnapshotDocument,
    closed_surfaces: Vec<TransientSurface>,
}

impl StaticBoard {
    pub fn from_html(html: &str, location: &str) -> Result<Self> {
        Ok(Self {
            document: SnapshotDocument::capture(html, location)?,
            closed_surfaces: Vec::new(),
        })
    }

    /// Surfaces closed so far, in call order
    #[must_use]
    pub fn closed_surfaces(&self) -> &[TransientSurface] {
        &self.closed_surfaces
    }

    fn close(&self, surface: TransientSurface) -> Result<usize> {
        let root = self.document.root();
        match surface {
            TransientSurface::Popup => {
                let popups = select_all(root, ".pop-over")?;
                for popup in &popups {
                    popup.as_node().detach();
                }
                Ok(popups.len())
            }
            TransientSurface::Sidebar => {
                let mut touched = 0;
                for sidebar in select_all(root, ".board-sidebar.sidebar.is-open")? {
                    remove_class(&sidebar, "is-open");
                    touched += 1;
                }
                for sibling in select_all(root, ".is-sibling-sidebar-open")? {
                    remove_class(&sibling, "is-sibling-sidebar-open");
                    touched += 1;
                }
                Ok(touched)
            }
        }
    }
}

impl LiveBoard for StaticBoard {
    fn location(&self) -> &str {
        self.document.location()
    }

    fn structured_data_url(&self) -> ExportResult<String> {
        let href = select_first(self.document.root(), STRUCTURED_DATA_SELECTOR)
            .map_err(|e| ExportError::Snapshot(format!("{e:#}")))?
            .and_then(|link| link.attributes.borrow().get("href").map(str::to_string))
            .ok_or(ExportError::Precondition {
                rule: "fetch-structured-data",
                selector: STRUCTURED_DATA_SELECTOR,
            })?;

        resolve_url(self.document.base_url(), &href)
            .map_err(|e| ExportError::Snapshot(format!("Structured data link '{href}': {e:#}")))
    }

    fn close_transient_ui(&mut self, surface: TransientSurface) {
        match self.close(surface) {
            Ok(touched) => log::debug!("Closed {surface} ({touched} element(s))"),
            Err(e) => log::warn!("Closing {surface} failed: {e:#}"),
        }
        self.closed_surfaces.push(surface);
    }

    fn snapshot(&self) -> Result<SnapshotDocument> {
        self.document.duplicate()
    }
}
