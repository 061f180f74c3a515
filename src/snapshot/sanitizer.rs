//! Turns a board snapshot into a static, interactivity-free document.

use super::document::SnapshotDocument;
use super::dom::select_first;
use super::rules::{Presence, SANITIZE_RULES, SanitizeContext, SanitizeRule};
use crate::errors::{ExportError, ExportResult};

/// Applies the ordered rule table to a snapshot
#[derive(Debug, Clone, Copy)]
pub struct SnapshotSanitizer {
    rules: &'static [SanitizeRule],
}

impl Default for SnapshotSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSanitizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: SANITIZE_RULES,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &'static [SanitizeRule] {
        self.rules
    }

    /// Run the whole rule table against a copy of `document`, discarding the result
    ///
    /// Required elements are checked in the tree each rule actually sees, so
    /// an element removed by an earlier rule fails here rather than after the
    /// caller has already gone to the network.
    pub fn preflight(&self, document: &SnapshotDocument, board_slug: &str) -> ExportResult<()> {
        let scratch = document
            .duplicate()
            .map_err(|e| ExportError::Snapshot(format!("{e:#}")))?;
        self.sanitize(scratch, board_slug).map(drop)
    }

    /// Run every rule in order, consuming the snapshot and returning the sanitized tree
    pub fn sanitize(
        &self,
        document: SnapshotDocument,
        board_slug: &str,
    ) -> ExportResult<SnapshotDocument> {
        let ctx = SanitizeContext {
            board_slug,
            base_url: document.base_url(),
        };

        for rule in self.rules {
            if rule.presence == Presence::Required {
                ensure_present(&document, rule)?;
            }

            let touched = (rule.apply)(document.root(), &ctx)
                .map_err(|e| ExportError::Snapshot(format!("rule '{}': {e:#}", rule.name)))?;
            log::debug!("Sanitize rule '{}' touched {touched} element(s)", rule.name);
        }

        Ok(document)
    }
}

fn ensure_present(document: &SnapshotDocument, rule: &SanitizeRule) -> ExportResult<()> {
    let found = select_first(document.root(), rule.selector)
        .map_err(|e| ExportError::Snapshot(format!("rule '{}': {e:#}", rule.name)))?;
    if found.is_none() {
        return Err(ExportError::Precondition {
            rule: rule.name,
            selector: rule.selector,
        });
    }
    Ok(())
}
