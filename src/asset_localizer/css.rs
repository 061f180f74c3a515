//! CSS text helpers: bundle-path rewriting and `url(...)` unwrapping.

use std::borrow::Cow;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

/// Captures the `url(...)` expression of a `background-image` declaration
static BACKGROUND_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)background-image\s*:\s*(url\(\s*(?:"[^"]*"|'[^']*'|[^)]*)\s*\))"#)
        .expect("BACKGROUND_IMAGE_RE: hardcoded regex is valid")
});

/// Compile the bundle-path pattern (case-insensitive, multi-line)
pub fn compile_bundle_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?im){pattern}"))
        .with_context(|| format!("Invalid bundle path pattern '{pattern}'"))
}

/// Replace every hosting-layout package path in a stylesheet with `../`
///
/// `url(/packages/wekan-theme/upstream/fonts/a.woff)` becomes `url(/../fonts/a.woff)`
/// relative to the archived stylesheet directory.
pub fn rewrite_bundle_paths<'a>(css: &'a str, bundle_pattern: &Regex) -> Cow<'a, str> {
    bundle_pattern.replace_all(css, "../")
}

/// The `url(...)` expression of an inline `background-image`, if set
#[must_use]
pub fn background_image(style: &str) -> Option<&str> {
    BACKGROUND_IMAGE_RE
        .captures(style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|value| !unwrap_css_url(value).is_empty())
}

/// Recover the bare URL from a CSS `url(...)` value
///
/// Accepts `url("x")`, `url('x')`, `url(x)` and a bare quoted or unquoted `x`.
#[must_use]
pub fn unwrap_css_url(value: &str) -> &str {
    let mut inner = value.trim();
    if inner.get(..4).is_some_and(|prefix| prefix.eq_ignore_ascii_case("url(")) {
        inner = inner[4..].trim_start();
        inner = inner.strip_suffix(')').unwrap_or(inner).trim_end();
    }

    for quote in ['"', '\''] {
        if let Some(unquoted) = inner
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return unquoted.trim();
        }
    }
    inner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::DEFAULT_BUNDLE_PATH_PATTERN;

    #[test]
    fn test_bundle_paths_are_rewritten() {
        let pattern = compile_bundle_pattern(DEFAULT_BUNDLE_PATH_PATTERN).unwrap();
        let css = "a{background:url(/packages/wekan-theme/upstream/img/a.png)}\n\
                   @font-face{src:url('/PACKAGES/fontawesome/Upstream/fonts/fa.woff')}";
        let rewritten = rewrite_bundle_paths(css, &pattern);
        assert_eq!(
            rewritten,
            "a{background:url(/../img/a.png)}\n@font-face{src:url('/../fonts/fa.woff')}"
        );
    }

    #[test]
    fn test_css_without_bundle_paths_is_borrowed() {
        let pattern = compile_bundle_pattern(DEFAULT_BUNDLE_PATH_PATTERN).unwrap();
        let rewritten = rewrite_bundle_paths("body{margin:0}", &pattern);
        assert!(matches!(rewritten, Cow::Borrowed(_)));
    }

    #[test]
    fn test_invalid_bundle_pattern() {
        assert!(compile_bundle_pattern("packages/(").is_err());
    }

    #[test]
    fn test_unwrap_quoting_variants() {
        assert_eq!(unwrap_css_url(r#"url("/cdn/a.png")"#), "/cdn/a.png");
        assert_eq!(unwrap_css_url("url('/cdn/a.png')"), "/cdn/a.png");
        assert_eq!(unwrap_css_url("url(/cdn/a.png)"), "/cdn/a.png");
        assert_eq!(unwrap_css_url("URL( \"/cdn/a.png\" )"), "/cdn/a.png");
        assert_eq!(unwrap_css_url("\"/cdn/a.png\""), "/cdn/a.png");
    }

    #[test]
    fn test_background_image_extraction() {
        let style = r#"height: 120px; background-image: url("https://x.test/cover.jpg?w=1"); color: red"#;
        assert_eq!(
            background_image(style),
            Some(r#"url("https://x.test/cover.jpg?w=1")"#)
        );
        assert_eq!(background_image("color: red"), None);
        assert_eq!(background_image("background-image: url('')"), None);
    }
}
