//! Relocation of discovered assets into the archive.

use regex::Regex;

use super::css::{background_image, rewrite_bundle_paths, unwrap_css_url};
use super::discovery::{asset_queue, card_covers};
use super::downloaders::{AssetFetcher, FetchKind};
use super::types::{AssetReference, AssetTask};
use crate::archive::ExportSession;
use crate::errors::{ExportError, ExportResult, FetchTarget};
use crate::path_resolver::{AssetRole, archive_path_for, resolve_asset_filename, rewritten_reference};
use crate::snapshot::SnapshotDocument;

/// Fetches every discovered asset, stores it in the session and rewrites
/// the referencing element
///
/// Tasks are processed strictly one after another in discovery order. Two
/// elements pointing at the same URL are fetched twice and the later write
/// wins. The first failed fetch aborts localization.
pub struct AssetLocalizer<'a, F> {
    fetcher: &'a F,
    bundle_pattern: &'a Regex,
}

impl<'a, F: AssetFetcher> AssetLocalizer<'a, F> {
    pub fn new(fetcher: &'a F, bundle_pattern: &'a Regex) -> Self {
        Self {
            fetcher,
            bundle_pattern,
        }
    }

    /// Localize stylesheets and `src`-bearing elements
    pub async fn localize(
        &self,
        document: &SnapshotDocument,
        session: &mut ExportSession,
    ) -> ExportResult<Vec<AssetReference>> {
        let queue = asset_queue(document.root(), document.base_url())
            .map_err(|e| ExportError::Snapshot(format!("{e:#}")))?;
        log::debug!("Localizing {} asset(s)", queue.len());

        let mut references = Vec::with_capacity(queue.len());
        for task in queue {
            let reference = match task.role {
                AssetRole::Stylesheet => self.localize_stylesheet(&task, session).await?,
                AssetRole::AttachedSrc | AssetRole::CardCover => {
                    self.localize_attached(&task, session).await?
                }
            };
            references.push(reference);
        }

        Ok(references)
    }

    async fn localize_stylesheet(
        &self,
        task: &AssetTask,
        session: &mut ExportSession,
    ) -> ExportResult<AssetReference> {
        let css = self
            .fetcher
            .fetch_text(&task.url, FetchKind::Stylesheet)
            .await
            .map_err(|e| ExportError::fetch(&task.url, FetchTarget::Asset(task.role), &e))?;
        let css = rewrite_bundle_paths(&css, self.bundle_pattern);

        let filename = resolve_asset_filename(&task.url);
        let path = archive_path_for(task.role, session.board_slug(), &task.tag, &filename);
        session.add_entry(path.clone(), css.as_bytes());

        Ok(self.point_at(task, "href", path))
    }

    async fn localize_attached(
        &self,
        task: &AssetTask,
        session: &mut ExportSession,
    ) -> ExportResult<AssetReference> {
        let bytes = self
            .fetcher
            .fetch_bytes(&task.url, FetchKind::Attached)
            .await
            .map_err(|e| ExportError::fetch(&task.url, FetchTarget::Asset(task.role), &e))?;

        let filename = resolve_asset_filename(&task.url);
        let path = archive_path_for(task.role, session.board_slug(), &task.tag, &filename);
        session.add_entry(path.clone(), bytes);

        Ok(self.point_at(task, "src", path))
    }

    fn point_at(&self, task: &AssetTask, attribute: &str, path: String) -> AssetReference {
        let reference = rewritten_reference(task.role, &path);
        task.element
            .attributes
            .borrow_mut()
            .insert(attribute, reference);
        log::debug!("Localized {} {} -> {path}", task.role, task.url);

        AssetReference {
            original_url: task.url.clone(),
            role: task.role,
            localized_path: path,
        }
    }
}

/// Point every card cover at its image inside the board directory
///
/// No bytes are fetched: covers reuse whatever was captured for `<img>`
/// elements under the same filename.
pub fn fix_card_covers(
    document: &SnapshotDocument,
    board_slug: &str,
) -> ExportResult<Vec<AssetReference>> {
    let covers = card_covers(document.root()).map_err(|e| ExportError::Snapshot(format!("{e:#}")))?;

    let mut references = Vec::with_capacity(covers.len());
    for cover in covers {
        let Some(original) = cover
            .attributes
            .borrow()
            .get("style")
            .and_then(background_image)
            .map(|value| unwrap_css_url(value).to_string())
        else {
            continue;
        };

        let filename = resolve_asset_filename(&original);
        let path = archive_path_for(AssetRole::CardCover, board_slug, "", &filename);
        let reference = rewritten_reference(AssetRole::CardCover, &path);

        cover
            .attributes
            .borrow_mut()
            .insert("style", format!("background-image: url(\"{reference}\")"));

        references.push(AssetReference {
            original_url: original,
            role: AssetRole::CardCover,
            localized_path: path,
        });
    }

    Ok(references)
}
