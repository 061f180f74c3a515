//! URL manipulation utilities.
//!
//! This module provides functions for resolving references found in the
//! board document and for deriving the board identity from its location.

use anyhow::{Context, Result};
use url::Url;

/// Resolve a potentially relative URL against a base URL
pub fn resolve_url(base_url: &str, url: &str) -> Result<String> {
    let base = Url::parse(base_url).context("Invalid base URL")?;
    let resolved = base.join(url.trim()).context("Failed to resolve URL")?;
    Ok(resolved.to_string())
}

/// Derive the board slug from the board location
///
/// The slug is the last non-empty path segment; query and fragment are ignored.
/// `https://boards.example.com/b/x7Kq/team-alpha?view=lists` gives `team-alpha`.
///
/// The decoded segment is sanitized as a filename, so an encoded separator
/// such as `%2F` can never turn the slug into a nested archive path.
pub fn board_slug_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).context("Invalid board URL")?;
    let segment = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .ok_or_else(|| anyhow::anyhow!("Board URL has no path segment to derive a slug from: {url}"))?;

    let decoded = urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    let slug = sanitize_filename::sanitize(&decoded);
    if slug.is_empty() {
        anyhow::bail!("Board URL segment '{segment}' does not yield a usable slug");
    }
    Ok(slug)
}

/// Check whether a reference points at something that must be fetched
///
/// Inline `data:` payloads and `javascript:` pseudo-URLs are already
/// self-contained (or meaningless offline) and are never fetched.
#[must_use]
pub fn is_fetchable_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }

    let lower = url.to_ascii_lowercase();
    !(lower.starts_with("data:") || lower.starts_with("javascript:") || lower.starts_with("about:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_url_resolution() {
        let result = resolve_url("https://example.com/b/abc/board", "../css/main.css").unwrap();
        assert_eq!(result, "https://example.com/b/css/main.css");
    }

    #[test]
    fn test_root_relative_url_resolution() {
        let result = resolve_url("https://example.com/b/abc/board", "/app.css?hash=1").unwrap();
        assert_eq!(result, "https://example.com/app.css?hash=1");
    }

    #[test]
    fn test_absolute_url_is_kept() {
        let result = resolve_url("https://example.com/", "https://cdn.example.net/a.png").unwrap();
        assert_eq!(result, "https://cdn.example.net/a.png");
    }

    #[test]
    fn test_slug_is_last_segment() {
        let slug = board_slug_from_url("https://boards.example.com/b/x7Kq/team-alpha").unwrap();
        assert_eq!(slug, "team-alpha");
    }

    #[test]
    fn test_slug_ignores_trailing_slash_query_and_fragment() {
        let slug =
            board_slug_from_url("https://boards.example.com/b/x7Kq/team-alpha/?view=lists#top")
                .unwrap();
        assert_eq!(slug, "team-alpha");
    }

    #[test]
    fn test_slug_requires_path_segment() {
        assert!(board_slug_from_url("https://boards.example.com/").is_err());
        assert!(board_slug_from_url("not a url").is_err());
    }

    #[test]
    fn test_slug_cannot_contain_path_separators() {
        let slug = board_slug_from_url("https://boards.example.com/b/x7Kq/a%2Fb%5Cc").unwrap();
        assert!(!slug.contains('/'));
        assert!(!slug.contains('\\'));
        assert!(slug.starts_with('a') && slug.ends_with('c'));

        assert!(board_slug_from_url("https://boards.example.com/b/x7Kq/%2F").is_err());
    }

    #[test]
    fn test_fetchable_urls() {
        assert!(is_fetchable_url("https://example.com/a.png"));
        assert!(!is_fetchable_url("data:image/png;base64,AAAA"));
        assert!(!is_fetchable_url("JavaScript:void(0)"));
        assert!(!is_fetchable_url("   "));
    }
}
