//! Helpers around the `kuchikikiki` DOM shared by the pipeline and the site
//! assembler.
use kuchikikiki::{NodeRef, parse_html};
use tendril::TendrilSink;

use crate::error::ProcessResult;

/// Parse an HTML string (document or fragment) into a full document tree.
#[must_use]
pub fn parse_document(html: &str) -> NodeRef {
  parse_html().one(html)
}

/// Parse a markup fragment into detached nodes, ready to be inserted
/// elsewhere.
///
/// The fragment is parsed inside a `<div>` so that leading whitespace and
/// inline content survive the HTML parser's document-level fixups.
#[must_use]
pub fn parse_fragment(html: &str) -> Vec<NodeRef> {
  let document = parse_document(&format!("<div>{html}</div>"));
  let Some(wrapper) = select_first(&document, "body > div") else {
    return Vec::new();
  };

  let children: Vec<NodeRef> = wrapper.children().collect();
  for child in &children {
    child.detach();
  }
  children
}

/// All elements under `node` matching `selector`, in document order.
///
/// The matches are collected up front so callers may mutate the tree while
/// walking them. An invalid selector is logged and matches nothing.
#[must_use]
pub fn select_all(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
  match node.select(selector) {
    Ok(matches) => matches.map(|m| m.as_node().clone()).collect(),
    Err(()) => {
      log::error!("Invalid CSS selector '{selector}'");
      Vec::new()
    },
  }
}

/// First element under `node` matching `selector`.
#[must_use]
pub fn select_first(node: &NodeRef, selector: &str) -> Option<NodeRef> {
  node
    .select_first(selector)
    .ok()
    .map(|m| m.as_node().clone())
}

/// Value of attribute `name` on an element node.
#[must_use]
pub fn attribute(node: &NodeRef, name: &str) -> Option<String> {
  node
    .as_element()
    .and_then(|element| element.attributes.borrow().get(name).map(str::to_string))
}

/// Set attribute `name` on an element node. Non-elements are ignored.
pub fn set_attribute(node: &NodeRef, name: &str, value: &str) {
  if let Some(element) = node.as_element() {
    element
      .attributes
      .borrow_mut()
      .insert(name, value.to_string());
  }
}

/// Append `class` to the element's class list unless already present.
pub fn add_class(node: &NodeRef, class: &str) {
  let classes = attribute(node, "class").unwrap_or_default();
  if classes.split_whitespace().any(|c| c == class) {
    return;
  }
  let updated = if classes.trim().is_empty() {
    class.to_string()
  } else {
    format!("{} {class}", classes.trim())
  };
  set_attribute(node, "class", &updated);
}

/// Replace all children of `node` with `nodes`.
pub fn replace_children(node: &NodeRef, nodes: Vec<NodeRef>) {
  let old: Vec<NodeRef> = node.children().collect();
  for child in old {
    child.detach();
  }
  for new_child in nodes {
    node.append(new_child);
  }
}

/// Replace `node` with `nodes` at the same position.
pub fn replace_with(node: &NodeRef, nodes: Vec<NodeRef>) {
  for new_node in nodes {
    node.insert_before(new_node);
  }
  node.detach();
}

/// Rewrite every element's attributes into name order so serialization is
/// stable regardless of source order.
pub fn sort_attributes(document: &NodeRef) {
  for node in document.inclusive_descendants() {
    if let Some(element) = node.as_element() {
      let mut attributes = element.attributes.borrow_mut();
      let mut entries: Vec<_> =
        std::mem::take(&mut attributes.map).into_iter().collect();
      entries.sort_by(|(a, _), (b, _)| a.local.as_ref().cmp(b.local.as_ref()));
      attributes.map = entries.into_iter().collect();
    }
  }
}

/// Serialize the children of `<body>`, i.e. the fragment without the
/// document shell the parser adds.
///
/// # Errors
///
/// Returns [`crate::ProcessError::Serialize`] if writing fails or produces
/// invalid UTF-8.
pub fn serialize_body(document: &NodeRef) -> ProcessResult<String> {
  let mut buf = Vec::new();
  if let Some(body) = select_first(document, "body") {
    for child in body.children() {
      child.serialize(&mut buf)?;
    }
  }
  Ok(String::from_utf8(buf)?)
}

/// Insert `fragment` immediately after the first element matching
/// `selector`. Returns the HTML unchanged (apart from normalization) if no
/// element matches.
///
/// # Errors
///
/// Propagates serialization failures.
pub fn insert_after_first(
  html: &str,
  selector: &str,
  fragment: &str,
) -> ProcessResult<String> {
  let document = parse_document(html);
  if let Some(anchor) = select_first(&document, selector) {
    for node in parse_fragment(fragment).into_iter().rev() {
      anchor.insert_after(node);
    }
  }
  serialize_body(&document)
}

/// Replace the contents of the element with `id` by `fragment`.
///
/// Returns the new HTML and whether an element with that id was found.
///
/// # Errors
///
/// Propagates serialization failures.
pub fn replace_contents_by_id(
  html: &str,
  id: &str,
  fragment: &str,
) -> ProcessResult<(String, bool)> {
  let document = parse_document(html);
  let target = document
    .inclusive_descendants()
    .find(|node| attribute(node, "id").as_deref() == Some(id));

  let found = target.is_some();
  if let Some(target) = target {
    replace_children(&target, parse_fragment(fragment));
  }
  Ok((serialize_body(&document)?, found))
}
