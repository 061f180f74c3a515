//! Small DOM editing helpers over kuchiki trees.
//!
//! kuchiki keeps element names immutable, so "renaming" an element means
//! building a replacement, moving attributes and children across and
//! swapping it into place.

use anyhow::{Context, Result};
use kuchiki::traits::TendrilSink;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

/// Collect every element matching `selector` under `root`, in document order
///
/// Matches are collected up front because callers detach or replace nodes
/// while walking the result, which would invalidate a live iterator.
pub fn select_all(root: &NodeRef, selector: &str) -> Result<Vec<NodeDataRef<ElementData>>> {
    let matches = root
        .select(selector)
        .map_err(|()| anyhow::anyhow!("Invalid selector: {selector}"))?
        .collect();
    Ok(matches)
}

/// First element matching `selector` under `root`
pub fn select_first(root: &NodeRef, selector: &str) -> Result<Option<NodeDataRef<ElementData>>> {
    Ok(select_all(root, selector)?.into_iter().next())
}

/// Create a detached, empty HTML element named `tag`
pub fn new_element(tag: &str) -> Result<NodeRef> {
    let fragment = kuchiki::parse_html().one(format!("<{tag}></{tag}>"));
    let element = select_first(&fragment, tag)?
        .with_context(|| format!("Parser produced no <{tag}> element"))?;
    let node = element.as_node().clone();
    node.detach();
    Ok(node)
}

/// Replace `element` with an element named `tag`, keeping attributes and children
///
/// Returns the replacement node.
pub fn rename_element(element: &NodeDataRef<ElementData>, tag: &str) -> Result<NodeRef> {
    let replacement = new_element(tag)?;

    if let Some(data) = replacement.as_element() {
        data.attributes.borrow_mut().map = element.attributes.borrow().map.clone();
    }

    let original = element.as_node();
    let children: Vec<NodeRef> = original.children().collect();
    for child in children {
        replacement.append(child);
    }

    original.insert_before(replacement.clone());
    original.detach();
    Ok(replacement)
}

/// Replace all children of `node` with a single text node
pub fn set_text(node: &NodeRef, text: &str) {
    let children: Vec<NodeRef> = node.children().collect();
    for child in children {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

/// Check whether an element carries `class`
#[must_use]
pub fn has_class(element: &ElementData, class: &str) -> bool {
    element
        .attributes
        .borrow()
        .get("class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

/// Remove `class` from an element, dropping the attribute once it is empty
pub fn remove_class(element: &ElementData, class: &str) {
    let mut attributes = element.attributes.borrow_mut();
    let Some(current) = attributes.get("class") else {
        return;
    };

    let remaining: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
    let remaining = remaining.join(" ");
    if remaining.is_empty() {
        attributes.remove("class");
    } else {
        attributes.insert("class", remaining);
    }
}

/// Add `class` to an element unless it is already present
pub fn add_class(element: &ElementData, class: &str) {
    if has_class(element, class) {
        return;
    }

    let mut attributes = element.attributes.borrow_mut();
    let updated = match attributes.get("class") {
        Some(current) if !current.trim().is_empty() => format!("{} {class}", current.trim()),
        _ => class.to_string(),
    };
    attributes.insert("class", updated);
}

/// Serialize a node (including the node itself) to an HTML string
pub fn serialize_node(node: &NodeRef) -> Result<String> {
    let mut output = Vec::new();
    node.serialize(&mut output)
        .context("Failed to serialize HTML")?;
    String::from_utf8(output).context("Failed to convert HTML bytes to UTF-8 string")
}
