#![allow(clippy::expect_used, reason = "Fine in tests")]
use quire_markdown::{
  MarkdownOptions,
  MarkdownProcessor,
  ProcessError,
  utils::{parse_document, parse_fragment},
};

fn processor() -> MarkdownProcessor {
  MarkdownProcessor::new(MarkdownOptions::default())
}

fn render(source: &str) -> String {
  processor().render(source).expect("document should render").html
}

#[test]
fn test_full_document() {
  let page = processor()
    .render(
      "---\ndescription: Notes\npublish_date: \"2024-01-01\"\n---\n\n# \
       Rasterizer *notes*\n\nBody text.\n",
    )
    .expect("render");

  assert_eq!(page.title, "Rasterizer notes");
  assert_eq!(page.description, "Notes");
  assert_eq!(page.publish_date.as_deref(), Some("2024-01-01"));
  assert!(page.html.starts_with("<h1>Rasterizer <em>notes</em></h1>"));
  assert!(!page.html.contains("<body>"));
  assert!(!page.html.contains("---"));
}

#[test]
fn test_missing_description_fails_first() {
  // No title either; the frontmatter error must win.
  let result = processor().render("---\npublish_date: \"2024-01-01\"\n---\nno title");
  assert!(matches!(
    result,
    Err(ProcessError::MissingField("description"))
  ));
}

#[test]
fn test_missing_title() {
  let result = processor().render("---\ndescription: x\n---\n## Not a title\n");
  assert!(matches!(result, Err(ProcessError::MissingTitle)));
}

#[test]
fn test_no_footnotes_no_list() {
  let html = render("---\ndescription: x\n---\n# T\n\nPlain paragraph.\n");
  assert!(!html.contains("<hr>"));
  assert!(!html.contains("fn-0"));
  assert!(!html.contains("list-style-type"));
}

#[test]
fn test_footnotes_resolve_both_ways() {
  let html = render(
    "---\ndescription: x\n---\n# T\n\nA<fn>one</fn> B<fn>two</fn>\n\nC<fn>three \
     [link](/x)</fn>\n",
  );

  let document = parse_document(&html);
  for i in 0..3 {
    let link_id = format!("fn_link-{i}");
    let note_id = format!("fn-{i}");

    let marker = document
      .select_first(&format!("sup#{link_id} > a"))
      .expect("marker present");
    assert_eq!(
      marker.attributes.borrow().get("href"),
      Some(format!("#{note_id}").as_str())
    );
    assert_eq!(marker.as_node().text_contents(), (i + 1).to_string());

    let back = document
      .select_first(&format!("li#{note_id} sup > a"))
      .expect("note present");
    assert_eq!(
      back.attributes.borrow().get("href"),
      Some(format!("#{link_id}").as_str())
    );
    assert_eq!(back.as_node().text_contents(), format!("{}.", i + 1));
  }

  assert_eq!(html.matches("<li id=\"fn-").count(), 3);
  assert!(html.contains(r#"<ul style="list-style-type: none; padding-left: 0;">"#));
  assert!(html.contains(r#"three <a href="/x">link</a></p></li>"#));
  assert!(!html.contains("<fn>"));
}

#[test]
fn test_nested_footnotes_each_get_a_note() {
  for source in [
    "---\ndescription: x\n---\n# T\n\nA<fn>outer <fn>inner</fn></fn> end\n",
    "---\ndescription: x\n---\n# T\n\nA<fn>outer <em><fn>inner</fn></em></fn> end\n",
  ] {
    let html = render(source);
    assert_eq!(html.matches("<li id=\"fn-").count(), 2, "{html}");
    assert_eq!(html.matches("<sup id=\"fn_link-").count(), 2, "{html}");
    assert!(html.contains(r#"inner</p></li>"#), "{html}");
    assert!(!html.contains("<fn>"), "{html}");
  }
}

#[test]
fn test_footnote_numbering_is_per_document() {
  let processor = processor();
  for _ in 0..2 {
    let html = processor
      .render("---\ndescription: x\n---\n# T\n\nA<fn>only</fn>\n")
      .expect("render")
      .html;
    assert!(html.contains(r#"id="fn_link-0""#));
    assert!(!html.contains("fn_link-1"));
  }
}

#[test]
fn test_strikethrough_needs_two_tildes() {
  let html = render("---\ndescription: x\n---\n# T\n\n~kept~ and ~~struck~~\n");
  assert!(html.contains("~kept~"));
  assert!(html.contains("<del>struck</del>"));
  assert_eq!(html.matches("<del>").count(), 1);
  assert!(!html.contains("<sub>"));
}

#[test]
fn test_external_and_relative_links() {
  let html = render(
    "---\ndescription: x\n---\n# T\n\n[out](https://example.com) [in](/about) \
     [cdn](//cdn.example.com)\n",
  );
  assert!(html.contains(
    r#"<a href="https://example.com" rel="nofollow noopener noreferrer" target="_blank">out</a>"#
  ));
  assert!(html.contains(r#"<a href="/about">in</a>"#));
  assert!(html.contains(
    r#"<a href="//cdn.example.com" rel="nofollow noopener noreferrer" target="_blank">cdn</a>"#
  ));
}

#[test]
fn test_raw_anchor_without_href() {
  let result = processor()
    .render("---\ndescription: x\n---\n# T\n\n<a name=\"here\">anchor</a>\n");
  assert!(matches!(result, Err(ProcessError::MissingHref(_))));
}

#[test]
fn test_python_block_is_highlighted() {
  let html = render(
    "---\ndescription: x\n---\n# T\n\n```python\ndef f(x):\n    return x < 2\n```\n",
  );
  assert!(html.contains(r#"<code class="highlight language-python">"#)
    || html.contains(r#"<code class="language-python highlight">"#));
  assert!(html.contains("hl-"));
}

#[test]
fn test_highlighted_code_round_trips_text() {
  let code = "def f(x):\n    return x < 2 and \"&\" != 'y'\n";
  let html = render(&format!(
    "---\ndescription: x\n---\n# T\n\n```py\n{code}```\n"
  ));

  let document = parse_document(&html);
  let code_element = document.select_first("pre > code").expect("code block");
  assert_eq!(code_element.as_node().text_contents(), code);

  // Re-parsing the serialized markup on its own gives the same text too.
  let inner: String = parse_fragment(&html)
    .iter()
    .map(kuchikikiki::NodeRef::text_contents)
    .collect();
  assert!(inner.contains(code));
}

#[test]
fn test_code_block_without_language() {
  let result =
    processor().render("---\ndescription: x\n---\n# T\n\n```\nno tag\n```\n");
  assert!(matches!(result, Err(ProcessError::UnknownLanguage(ref s)) if s == "no tag"));
}

#[test]
fn test_unsupported_language() {
  let result = processor()
    .render("---\ndescription: x\n---\n# T\n\n```klingon\nqapla'\n```\n");
  assert!(matches!(result, Err(ProcessError::Highlight { ref language, .. }) if language == "klingon"));
}

#[test]
fn test_math_rendering() {
  let html = render(
    "---\ndescription: x\n---\n# T\n\nInline $a^2$ and\n\n$$\\sum_{i=0}^n i$$\n",
  );
  assert!(html.contains("<math"));
  assert!(html.contains("display=\"block\""));
  assert!(!html.contains("$$"));
}

#[test]
fn test_math_error_aborts() {
  let result =
    processor().render("---\ndescription: x\n---\n# T\n\n$\\frac{1}{$\n");
  assert!(matches!(result, Err(ProcessError::MathRender { .. })));
}

#[test]
fn test_unknown_math_command_aborts() {
  let result = processor()
    .render("---\ndescription: x\n---\n# T\n\n$\\notacommand{x}$\n");
  assert!(matches!(
    result,
    Err(ProcessError::MathRender { ref snippet, .. }) if snippet.contains("notacommand")
  ));
}

#[test]
fn test_raw_html_passthrough() {
  let html = render(
    "---\ndescription: x\n---\n# T\n\n<div id=\"blog-entries\">soon</div>\n",
  );
  assert!(html.contains(r#"<div id="blog-entries">soon</div>"#));
}
