//! Transformers that run on the comrak AST.
//!
//! These act on Markdown constructs (math spans, tilde runs) before the tree
//! is formatted to HTML.
use comrak::{
  Arena,
  nodes::{AstNode, NodeValue},
};
use latex2mathml::{DisplayStyle, latex_to_mathml};
use log::trace;

use super::types::AstTransformer;
use crate::{
  error::{ProcessError, ProcessResult},
  utils,
};

/// Replace math nodes with MathML.
///
/// Handles `$…$` (inline), `$$…$$` (display) and fenced ```` ```math ````
/// blocks (display). The MathML is emitted as raw HTML so the formatter
/// writes it through unchanged.
pub struct MathTransformer;

impl AstTransformer for MathTransformer {
  fn transform<'a>(
    &self,
    _arena: &'a Arena<'a>,
    root: &'a AstNode<'a>,
  ) -> ProcessResult<()> {
    let mut rendered_count = 0usize;

    for node in root.descendants() {
      let mut data = node.data.borrow_mut();
      let mathml = match data.value {
        NodeValue::Math(ref math) => {
          Some(render_math(&math.literal, math.display_math)?)
        },
        NodeValue::CodeBlock(ref block)
          if block.info.split_whitespace().next() == Some("math") =>
        {
          Some(render_math(&block.literal, true)?)
        },
        _ => None,
      };

      if let Some(mathml) = mathml {
        data.value = NodeValue::HtmlInline(mathml);
        rendered_count += 1;
      }
    }

    trace!("Rendered {rendered_count} math nodes");
    Ok(())
  }
}

const PARSE_ERROR_MARKER: &str = "[PARSE ERROR";

fn render_math(latex: &str, display: bool) -> ProcessResult<String> {
  let style = if display {
    DisplayStyle::Block
  } else {
    DisplayStyle::Inline
  };

  let mathml = latex_to_mathml(latex.trim(), style).map_err(|e| {
    ProcessError::MathRender {
      snippet: utils::snippet(latex),
      reason:  e.to_string(),
    }
  })?;

  // Unknown commands come back as Ok with an inline error node.
  if let Some(start) = mathml.find(PARSE_ERROR_MARKER) {
    let reason = mathml[start + 1..]
      .split(']')
      .next()
      .unwrap_or_default()
      .to_string();
    return Err(ProcessError::MathRender {
      snippet: utils::snippet(latex),
      reason,
    });
  }

  Ok(mathml)
}

/// Turn single-tilde spans back into literal text.
///
/// The parser is run with subscript enabled so that `~x~` and `~~x~~` are
/// told apart; every subscript node is then replaced by its children
/// wrapped in literal `~` characters.
pub struct SingleTildeTransformer;

impl AstTransformer for SingleTildeTransformer {
  fn transform<'a>(
    &self,
    arena: &'a Arena<'a>,
    root: &'a AstNode<'a>,
  ) -> ProcessResult<()> {
    let subscripts: Vec<&'a AstNode<'a>> = root
      .descendants()
      .filter(|node| matches!(node.data.borrow().value, NodeValue::Subscript))
      .collect();

    // Innermost first, so nested spans are already unwrapped when their
    // parent moves them.
    for node in subscripts.into_iter().rev() {
      node.insert_before(tilde(arena));
      let children: Vec<&'a AstNode<'a>> = node.children().collect();
      for child in children {
        node.insert_before(child);
      }
      node.insert_before(tilde(arena));
      node.detach();
    }

    Ok(())
  }
}

fn tilde<'a>(arena: &'a Arena<'a>) -> &'a AstNode<'a> {
  arena.alloc(NodeValue::Text("~".into()).into())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use comrak::{format_html, options::Options, parse_document};

  use super::*;

  fn options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.math_dollars = true;
    options.extension.strikethrough = true;
    options.extension.subscript = true;
    options.render.r#unsafe = true;
    options
  }

  fn run(source: &str, transformer: &dyn AstTransformer) -> String {
    let arena = Arena::new();
    let options = options();
    let root = parse_document(&arena, source, &options);
    transformer.transform(&arena, root).expect("transform");
    let mut html = String::new();
    format_html(root, &options, &mut html).expect("format");
    html
  }

  #[test]
  fn test_inline_math() {
    let html = run("Energy: $E = mc^2$", &MathTransformer);
    assert!(html.contains("<math"));
    assert!(!html.contains("display=\"block\""));
    assert!(!html.contains('$'));
  }

  #[test]
  fn test_display_math_and_fenced_block() {
    let html = run("$$x^2$$\n\n```math\n\\frac{a}{b}\n```\n", &MathTransformer);
    assert_eq!(html.matches("display=\"block\"").count(), 2);
    assert!(!html.contains("<pre>"));
  }

  #[test]
  fn test_invalid_math_names_snippet() {
    let arena = Arena::new();
    let options = options();
    let root = parse_document(&arena, "$\\frac{a}{$", &options);
    let err = MathTransformer
      .transform(&arena, root)
      .expect_err("unbalanced braces should fail");
    assert!(matches!(
      err,
      ProcessError::MathRender { ref snippet, .. } if snippet.contains("frac")
    ));
  }

  #[test]
  fn test_unknown_command_fails() {
    let arena = Arena::new();
    let options = options();
    let root = parse_document(&arena, "Bad $\\notacommand{x}$ here", &options);
    let err = MathTransformer
      .transform(&arena, root)
      .expect_err("unknown command should fail");
    assert!(matches!(
      err,
      ProcessError::MathRender { ref snippet, ref reason }
        if snippet.contains("notacommand") && reason.starts_with("PARSE ERROR")
    ));
  }

  #[test]
  fn test_single_tilde_is_literal() {
    let html = run("H~2~O and ~~gone~~", &SingleTildeTransformer);
    assert!(html.contains("H~2~O"));
    assert!(!html.contains("<sub>"));
    assert!(html.contains("<del>gone</del>"));
  }

  #[test]
  fn test_single_tilde_keeps_inner_markup() {
    let html = run("a ~*b*~ c", &SingleTildeTransformer);
    assert!(html.contains("~<em>b</em>~"));
  }
}
