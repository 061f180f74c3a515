//! Error types for board export
//!
//! Every failure is fatal to the export that raised it. Errors are never
//! retried internally; they propagate unchanged to the orchestrator's caller.

use std::fmt;
use thiserror::Error;

use crate::path_resolver::AssetRole;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Error types for export operations
#[derive(Debug, Error)]
pub enum ExportError {
    /// A required structural element is absent from the board document
    #[error("Required element '{selector}' missing for rule '{rule}'")]
    Precondition {
        rule: &'static str,
        selector: &'static str,
    },

    /// The snapshot could not be captured or transformed
    #[error("Snapshot failed: {0}")]
    Snapshot(String),

    /// The board location cannot identify a board
    #[error("Invalid board URL: {0}")]
    InvalidBoardUrl(String),

    /// Retrieval of the structured data export or an asset failed
    #[error("Failed to fetch {role} from {url}: {reason}")]
    Fetch {
        url: String,
        role: FetchTarget,
        reason: String,
    },

    /// Archive buffer construction failed
    #[error("Archive encoding failed: {0}")]
    Encoding(String),

    /// The persistence collaborator rejected the archive
    #[error("Failed to persist archive: {0}")]
    Persistence(String),
}

/// What a failed fetch was retrieving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    StructuredData,
    Asset(AssetRole),
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StructuredData => write!(f, "structured data export"),
            Self::Asset(role) => write!(f, "{role}"),
        }
    }
}

/// Coarse classification of an [`ExportError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Precondition,
    Fetch,
    Encoding,
    Persistence,
}

impl ExportError {
    /// Build a fetch error, keeping the full context chain of the cause
    pub(crate) fn fetch(url: impl Into<String>, role: FetchTarget, err: &anyhow::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            role,
            reason: format!("{err:#}"),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Precondition { .. } | Self::Snapshot(_) | Self::InvalidBoardUrl(_) => {
                ErrorKind::Precondition
            }
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(error: zip::result::ZipError) -> Self {
        ExportError::Encoding(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let precondition = ExportError::Precondition {
            rule: "rebuild-permalink",
            selector: "h1",
        };
        assert_eq!(precondition.kind(), ErrorKind::Precondition);
        assert_eq!(
            ExportError::InvalidBoardUrl("x".into()).kind(),
            ErrorKind::Precondition
        );
        assert_eq!(ExportError::Encoding("x".into()).kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_fetch_error_keeps_context_chain() {
        let cause = anyhow::anyhow!("connection refused").context("Failed to download stylesheet");
        let err = ExportError::fetch(
            "https://example.com/a.css",
            FetchTarget::Asset(AssetRole::Stylesheet),
            &cause,
        );
        let message = err.to_string();
        assert!(message.contains("stylesheet"));
        assert!(message.contains("https://example.com/a.css"));
        assert!(message.contains("Failed to download stylesheet: connection refused"));
        assert_eq!(err.kind(), ErrorKind::Fetch);
    }
}
