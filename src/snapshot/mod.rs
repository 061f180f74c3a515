//! Board snapshot capture and sanitization
//!
//! This module turns a full copy of the live board document into a static
//! tree fit for archival: no scripts, no live navigation, no interactive
//! chrome, and a single microformat permalink back to the board.

pub mod document;
pub mod dom;
pub mod rules;
pub mod sanitizer;

pub use document::SnapshotDocument;
pub use rules::{Presence, SANITIZE_RULES, SanitizeContext, SanitizeRule};
pub use sanitizer::SnapshotSanitizer;
