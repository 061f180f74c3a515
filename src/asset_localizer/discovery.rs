//! Discovery of externally-hosted resources in a sanitized board tree
//!
//! Discovery is synchronous and never touches the network. It yields tasks
//! in document order: all stylesheets first, then every `src`-bearing
//! element. The localizer drains that queue one task at a time.

use anyhow::Result;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

use super::css::{background_image, unwrap_css_url};
use super::types::AssetTask;
use crate::path_resolver::AssetRole;
use crate::snapshot::dom::select_all;
use crate::utils::{is_fetchable_url, resolve_url};

pub const STYLESHEET_SELECTOR: &str = "link[href][rel=\"stylesheet\"]";
pub const ATTACHED_SELECTOR: &str = "[src]";
pub const CARD_COVER_SELECTOR: &str = ".minicard-cover[style]";

/// Build the ordered localization queue for `root`
///
/// References that cannot be resolved against `base_url` are returned as
/// errors so the caller can fail the export rather than ship a broken page.
pub fn asset_queue(root: &NodeRef, base_url: &str) -> Result<Vec<AssetTask>> {
    let mut queue = discover(root, base_url, AssetRole::Stylesheet, STYLESHEET_SELECTOR, "href")?;
    queue.extend(discover(root, base_url, AssetRole::AttachedSrc, ATTACHED_SELECTOR, "src")?);
    Ok(queue)
}

/// Minicard cover elements whose inline `background-image` needs localizing
///
/// Covers pointing at `data:` payloads are already self-contained and are left alone.
pub fn card_covers(root: &NodeRef) -> Result<Vec<NodeDataRef<ElementData>>> {
    let covers = select_all(root, CARD_COVER_SELECTOR)?
        .into_iter()
        .filter(|cover| {
            cover
                .attributes
                .borrow()
                .get("style")
                .and_then(background_image)
                .is_some_and(|value| is_fetchable_url(unwrap_css_url(value)))
        })
        .collect();
    Ok(covers)
}

fn discover(
    root: &NodeRef,
    base_url: &str,
    role: AssetRole,
    selector: &str,
    attribute: &str,
) -> Result<Vec<AssetTask>> {
    let mut tasks = Vec::new();

    for element in select_all(root, selector)? {
        let Some(reference) = element.attributes.borrow().get(attribute).map(str::to_string) else {
            continue;
        };

        if !is_fetchable_url(&reference) {
            log::debug!("Skipping self-contained {role} reference");
            continue;
        }

        let url = resolve_url(base_url, &reference)
            .map_err(|e| anyhow::anyhow!("Malformed {role} reference '{reference}': {e:#}"))?;
        let tag = (*element.name.local).to_ascii_lowercase();

        tasks.push(AssetTask {
            role,
            element,
            tag,
            url,
        });
    }

    Ok(tasks)
}
