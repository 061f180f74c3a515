//! Owned snapshot of a board document.

use anyhow::Result;
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;

use super::dom::{select_first, serialize_node};
use crate::utils::{HTML_DOCTYPE, resolve_url};

/// An owned, mutable copy of the board document taken at export time
///
/// A snapshot is always built from serialized markup, so it never shares
/// node identity with the live document it was captured from. The pipeline
/// owns it exclusively until the archive is assembled.
pub struct SnapshotDocument {
    root: NodeRef,
    location: String,
    base_url: String,
}

impl SnapshotDocument {
    /// Parse `html` captured from the page at `location`
    ///
    /// The base URL is `location` joined with the first `<base href>`, if any.
    pub fn capture(html: &str, location: &str) -> Result<Self> {
        let root = kuchiki::parse_html().one(html);

        let base_href = select_first(&root, "base[href]")?
            .and_then(|base| base.attributes.borrow().get("href").map(str::to_string));
        let base_url = match base_href {
            Some(href) => resolve_url(location, &href)?,
            None => resolve_url(location, "")?,
        };

        Ok(Self {
            root,
            location: location.to_string(),
            base_url,
        })
    }

    /// Deep copy of this document with no shared nodes
    pub fn duplicate(&self) -> Result<Self> {
        let html = serialize_node(&self.root)?;
        Ok(Self {
            root: kuchiki::parse_html().one(html),
            location: self.location.clone(),
            base_url: self.base_url.clone(),
        })
    }

    /// Document node of the tree
    #[must_use]
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Location of the page the snapshot was taken from
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// URL relative references in the document resolve against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Serialize the document element, prefixed with a doctype declaration
    pub fn to_html(&self) -> Result<String> {
        let body = match select_first(&self.root, "html")? {
            Some(html) => serialize_node(html.as_node())?,
            None => serialize_node(&self.root)?,
        };
        Ok(format!("{HTML_DOCTYPE}{body}"))
    }
}

impl std::fmt::Debug for SnapshotDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotDocument")
            .field("location", &self.location)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
