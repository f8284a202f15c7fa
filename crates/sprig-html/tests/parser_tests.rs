//! Integration tests for the HTML tree builder.

use sprig_dom::{DomTree, NodeId};
use sprig_html::{HTMLParser, HTMLTokenizer, ParseIssue, format_tree, parse};

/// Helper to parse HTML and return the tree along with recorded issues.
fn parse_with_issues(html: &str) -> (DomTree, Vec<ParseIssue>) {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run_with_issues()
}

/// Helper to get the tag names of a node's children (`#text` for text).
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<&str> {
    tree.children(id)
        .iter()
        .map(|&child| tree.tag_name(child).unwrap_or("#text"))
        .collect()
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, tag: &str) -> Option<NodeId> {
    tree.descendants(tree.root())
        .find(|&id| tree.tag_name(id) == Some(tag))
}

/// Every parse result has an `html` root with exactly `[head, body]`.
fn assert_skeleton(tree: &DomTree) {
    assert_eq!(tree.tag_name(tree.root()), Some("html"));
    assert_eq!(child_tags(tree, tree.root()), vec!["head", "body"]);
}

#[test]
fn test_paragraph_gets_implicit_structure() {
    let tree = parse("<p>A</p>");
    assert_skeleton(&tree);

    let body = tree.children(tree.root())[1];
    assert_eq!(child_tags(&tree, body), vec!["p"]);
    let p = tree.children(body)[0];
    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.as_text(tree.children(p)[0]), Some("A"));
}

#[test]
fn test_empty_and_whitespace_documents() {
    for html in ["", "   \n\t ", "<!doctype html>", "<!-- only a comment -->"] {
        let tree = parse(html);
        assert_skeleton(&tree);
        let body = tree.children(tree.root())[1];
        assert!(tree.children(body).is_empty(), "input {html:?}");
    }
}

#[test]
fn test_full_document_structure_kept() {
    let tree = parse(
        "<!DOCTYPE html>\n<html lang=en>\n<head><title>T</title></head>\n\
         <body><div><p>x</p></div></body>\n</html>\n",
    );
    assert_skeleton(&tree);
    assert_eq!(
        tree.as_element(tree.root()).and_then(|e| e.attr("lang")),
        Some("en")
    );
    let head = tree.head().unwrap();
    assert_eq!(child_tags(&tree, head), vec!["title"]);
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["div"]);
}

#[test]
fn test_head_only_tags_open_head() {
    let tree = parse("<title>T</title><link rel=stylesheet href=a.css><p>x");
    assert_skeleton(&tree);
    let head = tree.head().unwrap();
    assert_eq!(child_tags(&tree, head), vec!["title", "link"]);
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["p"]);
}

#[test]
fn test_text_closes_head() {
    let tree = parse("<meta charset=utf-8>Hello");
    let head = tree.head().unwrap();
    assert_eq!(child_tags(&tree, head), vec!["meta"]);
    let body = tree.body().unwrap();
    assert_eq!(tree.text_content(body), "Hello");
}

#[test]
fn test_void_elements_are_not_pushed() {
    let tree = parse("<p>a<br>b<img src=x.png>c</p>");
    let p = find_element(&tree, "p").unwrap();
    assert_eq!(child_tags(&tree, p), vec!["#text", "br", "#text", "img", "#text"]);
    let br = find_element(&tree, "br").unwrap();
    assert!(tree.children(br).is_empty());
}

#[test]
fn test_self_closing_non_void_is_opened() {
    let (tree, issues) = parse_with_issues("<div/>x");
    let div = find_element(&tree, "div").unwrap();
    assert_eq!(tree.text_content(div), "x");
    assert!(issues.iter().any(|issue| issue.is_error));
}

#[test]
fn test_whitespace_only_text_dropped() {
    let tree = parse("<div>\n  <p>x</p>\n</div>");
    let div = find_element(&tree, "div").unwrap();
    assert_eq!(child_tags(&tree, div), vec!["p"]);
}

#[test]
fn test_end_tag_closes_current_element() {
    // </b> closes the open <i>, whatever its name.
    let (tree, issues) = parse_with_issues("<p><b><i>x</b>y</p>");
    let b = find_element(&tree, "b").unwrap();
    assert_eq!(child_tags(&tree, b), vec!["i", "#text"]);
    assert!(
        issues
            .iter()
            .any(|issue| issue.is_error && issue.message.contains("</b> closed <i>"))
    );
}

#[test]
fn test_stray_end_tags_ignored() {
    let (tree, issues) = parse_with_issues("<p>x</p></div></span>y");
    assert_skeleton(&tree);
    let body = tree.body().unwrap();
    assert_eq!(tree.text_content(body), "xy");
    assert!(!issues.is_empty());
}

#[test]
fn test_duplicate_bodies_merged() {
    let tree = parse("<body><p>1</p></body></html><p>2</p>");
    assert_skeleton(&tree);
    let body = tree.body().unwrap();
    assert_eq!(child_tags(&tree, body), vec!["p", "p"]);
    assert_eq!(tree.text_content(body), "12");
}

#[test]
fn test_body_without_head() {
    let (tree, issues) = parse_with_issues("<html><body>x</body></html>");
    assert_skeleton(&tree);
    assert!(tree.children(tree.head().unwrap()).is_empty());
    assert!(
        issues
            .iter()
            .any(|issue| !issue.is_error && issue.message == "implied head")
    );
}

#[test]
fn test_unclosed_elements_closed_at_end() {
    let tree = parse("<div><ul><li>one<li>two");
    let ul = find_element(&tree, "ul").unwrap();
    // Without implied end tags the second <li> nests in the first.
    let li = tree.children(ul)[0];
    assert_eq!(child_tags(&tree, li), vec!["#text", "li"]);
    assert_eq!(tree.text_content(ul), "onetwo");
}

#[test]
fn test_parent_links_point_upward() {
    let tree = parse("<div><p>x</p></div>");
    let p = find_element(&tree, "p").unwrap();
    let text = tree.children(p)[0];
    let chain: Vec<&str> = tree
        .ancestors(text)
        .filter_map(|id| tree.tag_name(id))
        .collect();
    assert_eq!(chain, vec!["p", "div", "body", "html"]);
}

#[test]
fn test_script_text_not_decoded() {
    let tree = parse("<script>a &amp;&amp; b</script>");
    let script = find_element(&tree, "script").unwrap();
    assert_eq!(tree.parent(script), tree.head());
    assert_eq!(tree.text_content(script), "a &amp;&amp; b");
}

#[test]
fn test_attribute_parsing() {
    let tree = parse("<p CLASS='a b' id=x data-empty>t</p>");
    let p = find_element(&tree, "p").unwrap();
    let attrs = &tree.as_element(p).unwrap().attrs;
    assert_eq!(attrs.len(), 3);
    assert_eq!(attrs["class"], "a b");
    assert_eq!(attrs["id"], "x");
    assert_eq!(attrs["data-empty"], "");
}

#[test]
fn test_format_tree() {
    let tree = parse("<p id=x>Hi</p>");
    assert_eq!(
        format_tree(&tree, tree.root()),
        "<html>\n  <head>\n  <body>\n    <p id=\"x\">\n      \"Hi\"\n"
    );
}
