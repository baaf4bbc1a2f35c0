//! Transformers that run on the HTML DOM.
//!
//! By this point raw HTML from the source, including the custom `<fn>` tag,
//! is an ordinary element tree.
use std::sync::LazyLock;

use kuchikikiki::NodeRef;
use markup5ever::{QualName, local_name, ns};
use log::{debug, trace};
use regex::Regex;

use super::types::DomTransformer;
use crate::{
  error::{ProcessError, ProcessResult},
  syntax::SyntaxManager,
  utils::{
    self,
    dom::{
      add_class,
      attribute,
      parse_fragment,
      replace_children,
      replace_with,
      select_all,
      select_first,
      set_attribute,
    },
  },
};

static EXTERNAL_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(?i)(?:https?:)?//").unwrap_or_else(|e| {
    log::error!(
      "Failed to compile EXTERNAL_HREF_RE regex: {e}\n Falling back to never \
       matching regex."
    );
    utils::never_matching_regex()
  })
});

/// Whether `href` leaves the site: `http://`, `https://` or
/// protocol-relative `//`.
#[must_use]
pub fn is_external_href(href: &str) -> bool {
  EXTERNAL_HREF_RE.is_match(href.trim())
}

/// Require an `href` on every anchor and open external ones in a new tab.
pub struct ExternalLinkTransformer;

impl DomTransformer for ExternalLinkTransformer {
  fn transform(&self, document: &NodeRef) -> ProcessResult<()> {
    for anchor in select_all(document, "a") {
      let href = attribute(&anchor, "href").unwrap_or_default();
      if href.trim().is_empty() {
        return Err(ProcessError::MissingHref(utils::snippet(
          &anchor.text_contents(),
        )));
      }

      if is_external_href(&href) {
        trace!("Marking external link {href}");
        set_attribute(&anchor, "target", "_blank");
        set_attribute(&anchor, "rel", "nofollow noopener noreferrer");
      }
    }
    Ok(())
  }
}

/// Elements that must be highlighted: every `<pre><code>` block, plus any
/// element carrying a `language-<lang>` class.
const CODE_SELECTOR: &str =
  r#"pre > code, [class^="language-"], [class*=" language-"]"#;

/// Highlight code blocks and `language-*` elements through the syntax
/// manager.
pub struct CodeHighlightTransformer<'m> {
  pub manager:      Option<&'m SyntaxManager>,
  pub marker_class: &'m str,
}

impl CodeHighlightTransformer<'_> {
  fn language_of(code: &NodeRef) -> Option<String> {
    attribute(code, "class")?
      .split_whitespace()
      .find_map(|class| class.strip_prefix("language-"))
      .filter(|lang| !lang.is_empty())
      .map(str::to_string)
  }
}

impl DomTransformer for CodeHighlightTransformer<'_> {
  fn transform(&self, document: &NodeRef) -> ProcessResult<()> {
    for code in select_all(document, CODE_SELECTOR) {
      let text = code.text_contents();
      let Some(language) = Self::language_of(&code) else {
        return Err(ProcessError::UnknownLanguage(utils::snippet(&text)));
      };

      let manager = self.manager.ok_or_else(|| {
        ProcessError::Highlight {
          language: language.clone(),
          source:   crate::syntax::SyntaxError::NoBackendAvailable,
        }
      })?;

      let highlighted =
        manager.highlight_code(&text, &language).map_err(|source| {
          ProcessError::Highlight {
            language: language.clone(),
            source,
          }
        })?;

      replace_children(&code, parse_fragment(&highlighted));
      add_class(&code, self.marker_class);
      trace!("Highlighted {language} block ({} bytes)", text.len());
    }
    Ok(())
  }
}

/// Replace `<fn>` markers with numbered references and append the notes.
///
/// Numbering starts at zero for ids and one for display, per document.
pub struct FootnoteTransformer;

const FOOTNOTE_LIST_STYLE: &str = "list-style-type: none; padding-left: 0;";

impl DomTransformer for FootnoteTransformer {
  fn transform(&self, document: &NodeRef) -> ProcessResult<()> {
    let mut table: Vec<NodeRef> = Vec::new();

    for marker in select_all(document, "fn") {
      // Each note keeps its content under a detached holder, so a marker
      // nested in an earlier note still has a parent to be replaced in.
      let index = table.len();
      let holder = NodeRef::new_element(
        QualName::new(None, ns!(html), local_name!("span")),
        Vec::new(),
      );
      let content: Vec<NodeRef> = marker.children().collect();
      for node in content {
        holder.append(node);
      }
      table.push(holder);

      let reference = format!(
        r##"<sup id="fn_link-{index}"><a href="#fn-{index}">{}</a></sup>"##,
        index + 1
      );
      replace_with(&marker, parse_fragment(&reference));
    }

    if table.is_empty() {
      return Ok(());
    }

    let Some(body) = select_first(document, "body") else {
      return Err(ProcessError::Serialize(
        "document has no <body> to append footnotes to".to_string(),
      ));
    };

    body.append(NodeRef::new_text("\n"));
    let mut list = None;
    for node in parse_fragment(&format!(
      "<hr>\n<ul style=\"{FOOTNOTE_LIST_STYLE}\"></ul>\n"
    )) {
      if node
        .as_element()
        .is_some_and(|element| element.name.local.as_ref() == "ul")
      {
        list = Some(node.clone());
      }
      body.append(node);
    }
    let list = list
      .ok_or_else(|| ProcessError::Serialize("footnote list vanished".into()))?;

    let count = table.len();
    for (index, holder) in table.into_iter().enumerate() {
      let item_html = format!(
        r##"<li id="fn-{index}"><p><sup><a href="#fn_link-{index}">{}.</a></sup> </p></li>"##,
        index + 1
      );
      for item in parse_fragment(&item_html) {
        if let Some(paragraph) = select_first(&item, "p") {
          let content: Vec<NodeRef> = holder.children().collect();
          for node in content {
            paragraph.append(node);
          }
        }
        list.append(item);
      }
    }

    debug!("Extracted {count} footnotes");
    Ok(())
  }
}

/// Text of the first `<h1>`, trimmed.
///
/// # Errors
///
/// Returns [`ProcessError::MissingTitle`] if there is no `<h1>` or it has no
/// text.
pub fn extract_title(document: &NodeRef) -> ProcessResult<String> {
  select_first(document, "h1")
    .map(|h1| h1.text_contents().trim().to_string())
    .filter(|title| !title.is_empty())
    .ok_or(ProcessError::MissingTitle)
}
