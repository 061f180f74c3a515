//! Referential completeness check over the finished board page
//!
//! Every page-relative reference in the archived HTML should name an entry
//! of the same archive. References that do not are reported, never fatal:
//! card covers in particular point at images that were only captured when
//! an `<img>` with the same filename was localized.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::session::ExportSession;
use crate::asset_localizer::css::{background_image, unwrap_css_url};
use crate::path_resolver::archive_path_from_reference;

static HREF_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[href]").expect("HREF_SELECTOR: hardcoded selector is valid")
});

static SRC_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[src]").expect("SRC_SELECTOR: hardcoded selector is valid")
});

static STYLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[style]").expect("STYLE_SELECTOR: hardcoded selector is valid")
});

/// Page-relative references in `html` with no matching archive entry
///
/// Returned in document order per attribute kind, without duplicates.
#[must_use]
pub fn dangling_references(html: &str, session: &ExportSession) -> Vec<String> {
    let document = Html::parse_document(html);
    let slug = session.board_slug();

    let hrefs = document
        .select(&HREF_SELECTOR)
        .filter_map(|el| el.value().attr("href"));
    let srcs = document
        .select(&SRC_SELECTOR)
        .filter_map(|el| el.value().attr("src"));
    let covers = document
        .select(&STYLE_SELECTOR)
        .filter_map(|el| el.value().attr("style"))
        .filter_map(background_image)
        .map(unwrap_css_url);

    let mut dangling: Vec<String> = Vec::new();
    for reference in hrefs.chain(srcs).chain(covers) {
        let Some(mut path) = archive_path_from_reference(slug, reference) else {
            continue;
        };
        if path.ends_with('/') {
            path.push_str("index.html");
        }

        if !session.contains(&path) && !dangling.iter().any(|d| d == reference) {
            log::warn!("Board page references {reference} but the archive has no {path}");
            dangling.push(reference.to_string());
        }
    }

    dangling
}
