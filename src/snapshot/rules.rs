//! Declarative sanitization rules.
//!
//! Each rule is an independent transform over the snapshot tree. Rules run
//! in the order of [`SANITIZE_RULES`]; later rules assume the removals done
//! by earlier ones. Every rule names the selector whose presence it
//! contracts on and whether that element must exist.

use anyhow::Result;
use kuchiki::NodeRef;

use super::dom::{
    add_class, has_class, new_element, remove_class, rename_element, select_all, select_first,
    set_text,
};
use crate::utils::{is_fetchable_url, resolve_url};

/// Whether a rule's target element must exist when the rule runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absence is a fatal precondition failure
    Required,
    /// Absence is a no-op
    Optional,
}

/// Inputs shared by every rule
#[derive(Debug, Clone, Copy)]
pub struct SanitizeContext<'a> {
    pub board_slug: &'a str,
    pub base_url: &'a str,
}

/// Transform applied by a rule; returns the number of elements touched
pub type RuleFn = fn(&NodeRef, &SanitizeContext<'_>) -> Result<usize>;

/// A single named, ordered sanitization step
pub struct SanitizeRule {
    pub name: &'static str,
    pub selector: &'static str,
    pub presence: Presence,
    pub(crate) apply: RuleFn,
}

impl std::fmt::Debug for SanitizeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanitizeRule")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .field("presence", &self.presence)
            .finish()
    }
}

const PERMALINK_SELECTOR: &str = ".u-url.p-name";
const SIDE_PANEL_SELECTOR: &str = ".board-sidebar.sidebar";

/// Rules in application order
pub static SANITIZE_RULES: &[SanitizeRule] = &[
    SanitizeRule {
        name: "mark-feed-root",
        selector: "body",
        presence: Presence::Required,
        apply: mark_feed_root,
    },
    SanitizeRule {
        name: "remove-scripts",
        selector: "script",
        presence: Presence::Optional,
        apply: remove_scripts,
    },
    SanitizeRule {
        name: "remove-resource-hints",
        selector: "link:not([rel=\"stylesheet\"])",
        presence: Presence::Optional,
        apply: remove_resource_hints,
    },
    SanitizeRule {
        name: "remove-quick-access",
        selector: "#header-quick-access",
        presence: Presence::Optional,
        apply: remove_quick_access,
    },
    SanitizeRule {
        name: "remove-header-buttons",
        selector: "#header-main-bar .board-header-btns",
        presence: Presence::Optional,
        apply: remove_header_buttons,
    },
    SanitizeRule {
        name: "remove-composers",
        selector: ".list-composer, .js-card-composer, .js-add-card",
        presence: Presence::Optional,
        apply: remove_composers,
    },
    SanitizeRule {
        name: "collapse-virtual-scroll",
        selector: ".js-perfect-scrollbar",
        presence: Presence::Optional,
        apply: collapse_virtual_scroll,
    },
    SanitizeRule {
        name: "absolutize-references",
        selector: "[href], [src]",
        presence: Presence::Optional,
        apply: absolutize_references,
    },
    SanitizeRule {
        name: "drop-editable-markers",
        selector: ".is-editable",
        presence: Presence::Optional,
        apply: drop_editable_markers,
    },
    SanitizeRule {
        name: "demote-anchors",
        selector: "a",
        presence: Presence::Optional,
        apply: demote_anchors,
    },
    SanitizeRule {
        name: "drop-live-permalink",
        selector: PERMALINK_SELECTOR,
        presence: Presence::Required,
        apply: drop_live_permalink,
    },
    SanitizeRule {
        name: "rebuild-permalink",
        selector: "h1",
        presence: Presence::Required,
        apply: rebuild_permalink,
    },
    SanitizeRule {
        name: "card-titles-to-headings",
        selector: ".minicard-title.p-name",
        presence: Presence::Optional,
        apply: card_titles_to_headings,
    },
    SanitizeRule {
        name: "clear-sibling-sidebar-flag",
        selector: ".is-sibling-sidebar-open",
        presence: Presence::Optional,
        apply: clear_sibling_sidebar_flag,
    },
    SanitizeRule {
        name: "remove-side-panel",
        selector: SIDE_PANEL_SELECTOR,
        presence: Presence::Optional,
        apply: remove_side_panel,
    },
];

fn detach_all(root: &NodeRef, selector: &str) -> Result<usize> {
    let matches = select_all(root, selector)?;
    for element in &matches {
        element.as_node().detach();
    }
    Ok(matches.len())
}

fn mark_feed_root(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    let feeds = select_all(root, ".h-feed")?;
    for feed in &feeds {
        remove_class(feed, "h-feed");
    }
    if let Some(body) = select_first(root, "body")? {
        add_class(&body, "h-feed");
    }
    Ok(feeds.len() + 1)
}

fn remove_scripts(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    detach_all(root, "script")
}

fn remove_resource_hints(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    detach_all(root, "link:not([rel=\"stylesheet\"])")
}

fn remove_quick_access(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    detach_all(root, "#header-quick-access")
}

fn remove_header_buttons(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    detach_all(root, "#header-main-bar .board-header-btns")
}

fn remove_composers(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    detach_all(root, ".list-composer, .js-card-composer, .js-add-card")
}

/// Keep only the first rendered `div` of each virtual scroll container
fn collapse_virtual_scroll(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    let containers = select_all(root, ".js-perfect-scrollbar")?;
    for container in &containers {
        let placeholders: Vec<NodeRef> = container
            .as_node()
            .children()
            .filter(|child| {
                child
                    .as_element()
                    .is_some_and(|element| &*element.name.local == "div")
            })
            .skip(1)
            .collect();
        for placeholder in placeholders {
            placeholder.detach();
        }

        container
            .attributes
            .borrow_mut()
            .insert("style", "overflow-y: auto !important;".to_string());
        remove_class(container, "js-perfect-scrollbar");
    }
    Ok(containers.len())
}

/// Strip navigational `href`s and pin the remaining references to absolute URLs
fn absolutize_references(root: &NodeRef, ctx: &SanitizeContext<'_>) -> Result<usize> {
    let navigational = select_all(root, "[href]:not(link)")?;
    for element in &navigational {
        element.attributes.borrow_mut().remove("href");
    }

    let mut resolved = 0;
    for attribute in ["href", "src"] {
        for element in select_all(root, &format!("[{attribute}]"))? {
            let Some(value) = element.attributes.borrow().get(attribute).map(str::to_string) else {
                continue;
            };
            if !is_fetchable_url(&value) {
                continue;
            }

            match resolve_url(ctx.base_url, &value) {
                Ok(absolute) => {
                    element.attributes.borrow_mut().insert(attribute, absolute);
                    resolved += 1;
                }
                Err(e) => {
                    log::warn!("Leaving unresolvable {attribute} '{value}' as-is: {e}");
                }
            }
        }
    }

    log::debug!(
        "Stripped {} navigational hrefs, resolved {resolved} references",
        navigational.len()
    );
    Ok(navigational.len() + resolved)
}

fn drop_editable_markers(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    let editable = select_all(root, ".is-editable")?;
    for element in &editable {
        remove_class(element, "is-editable");
    }
    Ok(editable.len())
}

/// Turn every anchor except the canonical permalink into a `span`
fn demote_anchors(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    let mut demoted = 0;
    for anchor in select_all(root, "a")? {
        if has_class(&anchor, "u-url") && has_class(&anchor, "p-name") {
            continue;
        }
        rename_element(&anchor, "span")?;
        demoted += 1;
    }
    Ok(demoted)
}

fn drop_live_permalink(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    detach_all(root, PERMALINK_SELECTOR)
}

/// Expose the board title as `<h1 class="p-name"><a class="u-url" href="../{slug}/">`
fn rebuild_permalink(root: &NodeRef, ctx: &SanitizeContext<'_>) -> Result<usize> {
    let Some(heading) = select_first(root, "h1")? else {
        return Ok(0);
    };
    add_class(&heading, "p-name");

    let title = heading
        .as_node()
        .text_contents()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let anchor = new_element("a")?;
    if let Some(data) = anchor.as_element() {
        let mut attributes = data.attributes.borrow_mut();
        attributes.insert("class", "u-url".to_string());
        attributes.insert("href", format!("../{}/", ctx.board_slug));
    }
    set_text(&anchor, &title);

    for child in heading.as_node().children().collect::<Vec<_>>() {
        child.detach();
    }
    heading.as_node().append(anchor);
    Ok(1)
}

fn card_titles_to_headings(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    let titles = select_all(root, ".minicard-title.p-name")?;
    for title in &titles {
        let text = title.as_node().text_contents();
        set_text(title.as_node(), text.trim());
        rename_element(title, "h3")?;
    }
    Ok(titles.len())
}

fn clear_sibling_sidebar_flag(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    let flagged = select_all(root, ".is-sibling-sidebar-open")?;
    for element in &flagged {
        remove_class(element, "is-sibling-sidebar-open");
    }
    Ok(flagged.len())
}

fn remove_side_panel(root: &NodeRef, _ctx: &SanitizeContext<'_>) -> Result<usize> {
    detach_all(root, SIDE_PANEL_SELECTOR)
}
