//! Linear export state machine.

use std::fmt;

/// Stages of a single export, in execution order
///
/// Progress is strictly forward; any stage may jump to [`ExportStage::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExportStage {
    Start,
    FetchStructuredData,
    CloseTransientUI,
    Sanitize,
    LocalizeAssets,
    FixCardCovers,
    AssembleArchive,
    Persist,
    Done,
    Failed,
}

impl ExportStage {
    /// The stage that follows a successful `self`
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Start => Self::FetchStructuredData,
            Self::FetchStructuredData => Self::CloseTransientUI,
            Self::CloseTransientUI => Self::Sanitize,
            Self::Sanitize => Self::LocalizeAssets,
            Self::LocalizeAssets => Self::FixCardCovers,
            Self::FixCardCovers => Self::AssembleArchive,
            Self::AssembleArchive => Self::Persist,
            Self::Persist => Self::Done,
            Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::FetchStructuredData => "fetch-structured-data",
            Self::CloseTransientUI => "close-transient-ui",
            Self::Sanitize => "sanitize",
            Self::LocalizeAssets => "localize-assets",
            Self::FixCardCovers => "fix-card-covers",
            Self::AssembleArchive => "assemble-archive",
            Self::Persist => "persist",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the current stage of one export and logs each transition
#[derive(Debug)]
pub(crate) struct StageTracker {
    board_slug: String,
    current: ExportStage,
    history: Vec<ExportStage>,
}

impl StageTracker {
    pub(crate) fn new() -> Self {
        Self {
            board_slug: String::new(),
            current: ExportStage::Start,
            history: vec![ExportStage::Start],
        }
    }

    pub(crate) fn set_board_slug(&mut self, board_slug: &str) {
        self.board_slug = board_slug.to_string();
    }

    #[cfg(test)]
    pub(crate) fn current(&self) -> ExportStage {
        self.current
    }

    pub(crate) fn history(&self) -> &[ExportStage] {
        &self.history
    }

    /// Move to the next stage
    pub(crate) fn advance(&mut self) -> ExportStage {
        let next = self.current.next();
        tracing::info!(board = %self.board_slug, from = %self.current, to = %next, "Export stage");
        self.enter(next)
    }

    pub(crate) fn fail(&mut self, error: &dyn std::fmt::Display) -> ExportStage {
        tracing::error!(board = %self.board_slug, at = %self.current, "Export failed: {error}");
        self.enter(ExportStage::Failed)
    }

    fn enter(&mut self, stage: ExportStage) -> ExportStage {
        self.current = stage;
        self.history.push(stage);
        stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_is_linear() {
        let mut stage = ExportStage::Start;
        let mut seen = vec![stage];
        while !stage.is_terminal() {
            stage = stage.next();
            seen.push(stage);
        }

        assert_eq!(
            seen,
            vec![
                ExportStage::Start,
                ExportStage::FetchStructuredData,
                ExportStage::CloseTransientUI,
                ExportStage::Sanitize,
                ExportStage::LocalizeAssets,
                ExportStage::FixCardCovers,
                ExportStage::AssembleArchive,
                ExportStage::Persist,
                ExportStage::Done,
            ]
        );
    }

    #[test]
    fn test_failure_is_terminal() {
        let mut tracker = StageTracker::new();
        tracker.advance();
        tracker.fail(&"connection reset");

        assert_eq!(tracker.current(), ExportStage::Failed);
        assert_eq!(
            tracker.history(),
            &[ExportStage::Start, ExportStage::FetchStructuredData, ExportStage::Failed]
        );
        assert_eq!(ExportStage::Failed.next(), ExportStage::Failed);
    }
}
