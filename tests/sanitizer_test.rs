//! Sanitization of captured board pages

mod common;

use common::*;
use kodegen_tools_board_export::snapshot::Presence;
use kodegen_tools_board_export::{ExportError, SnapshotDocument, SnapshotSanitizer};
use scraper::{Html, Selector};

const LOCATION: &str = "https://boards.example.com/b/x7Kq/team-alpha";

fn sanitize(html: &str) -> Html {
    let doc = SnapshotDocument::capture(html, LOCATION).unwrap();
    let sanitized = SnapshotSanitizer::new().sanitize(doc, BOARD_SLUG).unwrap();
    Html::parse_document(&sanitized.to_html().unwrap())
}

fn count(html: &Html, selector: &str) -> usize {
    html.select(&Selector::parse(selector).unwrap()).count()
}

#[test]
fn test_no_scripts_or_resource_hints_survive() {
    let html = sanitize(&asset_rich_page());

    assert_eq!(count(&html, "script"), 0);
    assert_eq!(count(&html, r#"link:not([rel="stylesheet"])"#), 0);
    assert_eq!(count(&html, r#"link[rel="stylesheet"]"#), 2);
}

#[test]
fn test_exactly_one_canonical_anchor() {
    let html = sanitize(&asset_rich_page());

    assert_eq!(count(&html, "a"), 1);
    let anchor = html
        .select(&Selector::parse("h1.p-name > a.u-url").unwrap())
        .next()
        .expect("permalink inside the board heading");
    assert_eq!(anchor.value().attr("href"), Some("../team-alpha/"));
    assert_eq!(anchor.text().collect::<String>(), "Team Alpha");
    assert_eq!(count(&html, ".p-name.u-url"), 0);
}

#[test]
fn test_demoted_anchors_keep_attributes_and_content() {
    let html = sanitize(&asset_rich_page());

    let wrapper = html
        .select(&Selector::parse("span.minicard-wrapper.js-minicard").unwrap())
        .next()
        .expect("card wrapper demoted to span");
    assert!(wrapper.value().attr("href").is_none());
    assert_eq!(count(&html, "span.minicard-wrapper .minicard-cover"), 1);
}

#[test]
fn test_interactive_chrome_is_removed() {
    let html = sanitize(&asset_rich_page());

    for selector in [
        "#header-quick-access",
        "#header-main-bar .board-header-btns",
        ".list-composer",
        ".js-card-composer",
        ".board-sidebar",
        ".is-editable",
        ".is-sibling-sidebar-open",
        ".js-perfect-scrollbar",
    ] {
        assert_eq!(count(&html, selector), 0, "{selector} survived");
    }
}

#[test]
fn test_virtual_scroll_keeps_first_block() {
    let html = sanitize(&asset_rich_page());

    let list_body = html
        .select(&Selector::parse(".list-body").unwrap())
        .next()
        .unwrap();
    assert_eq!(list_body.value().attr("style"), Some("overflow-y: auto !important;"));
    assert_eq!(count(&html, ".list-body > div"), 1);
    assert_eq!(count(&html, ".placeholder"), 0);
}

#[test]
fn test_feed_marker_moves_to_body() {
    let html = sanitize(&asset_rich_page());

    assert_eq!(count(&html, ".h-feed"), 1);
    assert_eq!(count(&html, "body.h-feed"), 1);
}

#[test]
fn test_card_titles_become_plain_headings() {
    let html = sanitize(&asset_rich_page());

    let title = html
        .select(&Selector::parse("h3.minicard-title.p-name").unwrap())
        .next()
        .unwrap();
    assert_eq!(title.inner_html(), "* Ship it");
}

#[test]
fn test_references_are_absolute_after_sanitizing() {
    let html = sanitize(&asset_rich_page());

    let srcs: Vec<&str> = html
        .select(&Selector::parse("[src]").unwrap())
        .filter_map(|el| el.value().attr("src"))
        .collect();
    assert_eq!(
        srcs,
        vec![
            "https://boards.example.com/cdn/logo.png",
            "https://boards.example.com/cdn/cover.jpg",
            "https://boards.example.com/cdn/clip.mp4",
        ]
    );
}

#[test]
fn test_missing_optional_elements_are_no_ops() {
    let page = "<html><head></head><body>\
        <h1>Board</h1><a class=\"u-url p-name\" href=\"/b/1/board\">Board</a>\
        </body></html>";
    let html = sanitize(page);

    assert_eq!(count(&html, "h1.p-name > a.u-url"), 1);
}

#[test]
fn test_missing_permalink_is_a_precondition_failure() {
    let page = "<html><body><h1>Board</h1></body></html>";
    let doc = SnapshotDocument::capture(page, LOCATION).unwrap();
    let sanitizer = SnapshotSanitizer::new();

    let preflight = sanitizer.preflight(&doc, BOARD_SLUG).unwrap_err();
    assert!(matches!(preflight, ExportError::Precondition { rule: "drop-live-permalink", .. }));

    let err = sanitizer.sanitize(doc, BOARD_SLUG).unwrap_err();
    assert!(matches!(err, ExportError::Precondition { selector: ".u-url.p-name", .. }));
}

#[test]
fn test_required_rules() {
    let required: Vec<&str> = SnapshotSanitizer::new()
        .rules()
        .iter()
        .filter(|rule| rule.presence == Presence::Required)
        .map(|rule| rule.name)
        .collect();

    assert_eq!(
        required,
        vec!["mark-feed-root", "drop-live-permalink", "rebuild-permalink"]
    );
}

#[test]
fn test_heading_removed_with_live_permalink_fails_preflight() {
    let page = r#"<html><body><a class="u-url p-name" href="/b/1/board"><h1>Team Alpha</h1></a></body></html>"#;
    let doc = SnapshotDocument::capture(page, LOCATION).unwrap();

    let err = SnapshotSanitizer::new().preflight(&doc, BOARD_SLUG).unwrap_err();
    assert!(matches!(
        err,
        ExportError::Precondition {
            rule: "rebuild-permalink",
            selector: "h1"
        }
    ));
    assert_eq!(count(&Html::parse_document(&doc.to_html().unwrap()), "h1"), 1);
}
