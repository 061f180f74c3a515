//! Mapping from resource URLs to archive paths and rewritten references.
//!
//! Everything here is a pure function of its inputs. The same URL always
//! yields the same filename, independent of fetch order, and each
//! [`AssetRole`] owns a distinct path prefix so assets of different roles
//! never overwrite one another.
//!
//! Archive layout for a board with slug `team-alpha`:
//!
//! ```text
//! style/{filename}                 stylesheets
//! team-alpha/index.html            the board page
//! team-alpha/{tag}/{filename}      src-bearing elements, grouped by tag
//! team-alpha/img/{filename}        card covers (shared with <img> assets)
//! data/team-alpha.json             structured data export
//! ```

use std::fmt;

/// Role an asset plays in the board document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRole {
    /// `<link rel="stylesheet">`
    Stylesheet,
    /// Any element carrying a `src` attribute
    AttachedSrc,
    /// Inline `background-image` on a minicard cover
    CardCover,
}

impl fmt::Display for AssetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRole::Stylesheet => write!(f, "stylesheet"),
            AssetRole::AttachedSrc => write!(f, "attached asset"),
            AssetRole::CardCover => write!(f, "card cover"),
        }
    }
}

/// Directory holding relocated stylesheets
pub const STYLE_DIR: &str = "style";

/// Directory (inside the board directory) holding cover images
pub const COVER_DIR: &str = "img";

/// Directory holding the structured data export
pub const DATA_DIR: &str = "data";

/// Recover a stable local filename from a resource URL
///
/// Strips the fragment and query string, takes the trailing path segment
/// and percent-decodes it. The decoded name is sanitized so an encoded
/// separator (`%2F`) can never introduce extra path levels.
#[must_use]
pub fn resolve_asset_filename(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    let trailing = without_query.rsplit('/').next().unwrap_or_default();

    let decoded = urlencoding::decode_binary(trailing.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);

    let cleaned = sanitize_filename::sanitize(decoded.trim());
    if cleaned.is_empty() {
        "index".to_string()
    } else {
        cleaned
    }
}

/// Canonical in-archive path for an asset
///
/// `tag_name` is only consulted for [`AssetRole::AttachedSrc`].
#[must_use]
pub fn archive_path_for(role: AssetRole, board_slug: &str, tag_name: &str, filename: &str) -> String {
    match role {
        AssetRole::Stylesheet => format!("{STYLE_DIR}/{filename}"),
        AssetRole::AttachedSrc => {
            format!("{board_slug}/{}/{filename}", tag_name.to_ascii_lowercase())
        }
        AssetRole::CardCover => format!("{board_slug}/{COVER_DIR}/{filename}"),
    }
}

/// Path of the archived board page
#[must_use]
pub fn board_page_path(board_slug: &str) -> String {
    format!("{board_slug}/index.html")
}

/// Path of the archived structured data export
#[must_use]
pub fn data_export_path(board_slug: &str) -> String {
    format!("{DATA_DIR}/{board_slug}.json")
}

/// Reference string substituted into the board page for an archived asset
///
/// The board page lives at `{slug}/index.html`. Stylesheets sit one level up
/// (`../style/..`); board-local assets sit beside the page (`./{tag}/..`).
/// Each path segment is percent-encoded for safe embedding in attributes.
#[must_use]
pub fn rewritten_reference(role: AssetRole, archive_path: &str) -> String {
    match role {
        AssetRole::Stylesheet => format!("../{}", encode_path(archive_path)),
        AssetRole::AttachedSrc | AssetRole::CardCover => {
            let board_relative = archive_path
                .split_once('/')
                .map_or(archive_path, |(_, rest)| rest);
            format!("./{}", encode_path(board_relative))
        }
    }
}

/// Map a reference found in the board page back to the archive path it names
///
/// Inverse of [`rewritten_reference`]; returns `None` for anything that is
/// not a page-relative reference (absolute URLs, data URIs, fragments).
#[must_use]
pub fn archive_path_from_reference(board_slug: &str, reference: &str) -> Option<String> {
    let decoded = |s: &str| {
        urlencoding::decode(s)
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| s.to_string())
    };

    if let Some(rest) = reference.strip_prefix("../") {
        return Some(decoded(rest));
    }
    reference
        .strip_prefix("./")
        .map(|rest| format!("{board_slug}/{}", decoded(rest)))
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
