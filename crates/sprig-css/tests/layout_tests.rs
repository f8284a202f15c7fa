//! Integration tests for block and inline layout.
//!
//! Every test uses fixed-advance metrics so positions are exact.

use std::collections::HashMap;

use sprig_css::layout::{HSTEP, LineMetrics, PSTEP, VSTEP};
use sprig_css::{
    BoxKind, ComputedStyle, Font, FontMetrics, LayoutBox, LayoutTree, Rule, compute_styles,
    layout_document, parse_stylesheet, ua_stylesheet,
};
use sprig_dom::{DomTree, NodeId};

/// Ten units per character in every font; ascent 8, descent 2.
struct FixedMetrics;

impl FontMetrics for FixedMetrics {
    fn measure(&self, text: &str, _font: &Font) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    fn line_metrics(&self, _font: &Font) -> LineMetrics {
        LineMetrics {
            ascent: 8.0,
            descent: 2.0,
        }
    }
}

/// Ten units per character; ascent equals the point size, descent a quarter of it.
struct ScaledMetrics;

impl FontMetrics for ScaledMetrics {
    fn measure(&self, text: &str, _font: &Font) -> f32 {
        text.chars().count() as f32 * 10.0
    }

    fn line_metrics(&self, font: &Font) -> LineMetrics {
        LineMetrics {
            ascent: font.size as f32,
            descent: font.size as f32 / 4.0,
        }
    }
}

struct Page {
    dom: DomTree,
    styles: HashMap<NodeId, ComputedStyle>,
}

impl Page {
    fn new(html: &str, css: &str) -> Self {
        let dom = sprig_html::parse(html);
        let mut rules: Vec<Rule> = ua_stylesheet().to_vec();
        rules.extend(parse_stylesheet(css));
        let styles = compute_styles(&dom, &rules);
        Self { dom, styles }
    }

    fn layout(&self, metrics: &dyn FontMetrics, width: f32) -> LayoutTree {
        layout_document(&self.dom, &self.styles, metrics, width)
    }
}

fn boxes<'a>(tree: &'a LayoutTree, pred: impl Fn(&BoxKind) -> bool) -> Vec<&'a LayoutBox> {
    tree.descendants()
        .into_iter()
        .filter_map(|id| tree.get(id))
        .filter(|layout_box| pred(&layout_box.kind))
        .collect()
}

fn words(tree: &LayoutTree) -> Vec<&LayoutBox> {
    boxes(tree, |kind| matches!(kind, BoxKind::Word { .. }))
}

fn text(layout_box: &LayoutBox) -> &str {
    match &layout_box.kind {
        BoxKind::Word { text, .. } => text,
        _ => "",
    }
}

/// Word texts grouped by line, in line order.
fn line_texts(tree: &LayoutTree) -> Vec<Vec<&str>> {
    boxes(tree, |kind| matches!(kind, BoxKind::Line { .. }))
        .iter()
        .map(|line| {
            line.children
                .iter()
                .filter_map(|&id| tree.get(id))
                .map(text)
                .collect()
        })
        .collect()
}

#[test]
fn test_document_box_wraps_body() {
    let page = Page::new("<p>hello</p>", "");
    let tree = page.layout(&FixedMetrics, 126.0);
    let document = tree.get(tree.root()).unwrap();
    let body = tree.get(tree.children(tree.root())[0]).unwrap();

    assert_eq!(document.kind, BoxKind::Document);
    assert_eq!(body.node, page.dom.body().unwrap());
    assert!((document.rect.x - HSTEP).abs() < f32::EPSILON);
    assert!((document.rect.y - VSTEP).abs() < f32::EPSILON);
    assert!((document.rect.width - 100.0).abs() < f32::EPSILON);
    assert!((document.rect.height - (body.rect.height + 2.0 * VSTEP)).abs() < f32::EPSILON);
}

#[test]
fn test_words_wrap_at_right_edge() {
    // Content box is 100 wide: "aaaa bbbb" is 40 + 10 + 40, "cccc" wraps.
    let page = Page::new("<p>aaaa bbbb cccc</p>", "");
    let tree = page.layout(&FixedMetrics, 126.0);

    assert_eq!(
        line_texts(&tree),
        vec![vec!["aaaa", "bbbb"], vec!["cccc"], vec![]]
    );

    let placed = words(&tree);
    assert!((placed[0].rect.x - 13.0).abs() < f32::EPSILON);
    assert!((placed[1].rect.x - 63.0).abs() < f32::EPSILON);
    assert!((placed[2].rect.x - 13.0).abs() < f32::EPSILON);
    // Baseline at 1.25 × ascent below each line's top.
    assert!((placed[0].rect.y - 20.0).abs() < f32::EPSILON);
    assert!((placed[2].rect.y - 32.5).abs() < f32::EPSILON);

    // Two 12.5-high lines, the paragraph gap, then the empty line.
    let paragraph = boxes(&tree, |kind| *kind == BoxKind::Inline)[0];
    assert!((paragraph.rect.height - (25.0 + PSTEP)).abs() < f32::EPSILON);
    let document = tree.get(tree.root()).unwrap();
    assert!((document.rect.height - (25.0 + PSTEP + 2.0 * VSTEP)).abs() < f32::EPSILON);
}

#[test]
fn test_soft_hyphen_splits_word() {
    // "xxxxx" ends at 63; "aa-" fits before 113, "aabb-" does not.
    let page = Page::new("<p>xxxxx aa&shy;bb&shy;cc</p>", "");
    let tree = page.layout(&FixedMetrics, 126.0);
    let texts: Vec<&str> = words(&tree).into_iter().map(text).collect();
    assert_eq!(texts, ["xxxxx", "aa-", "bbcc"]);
}

#[test]
fn test_long_word_hyphenated_across_lines() {
    let page = Page::new("<p>ab\u{ad}cd\u{ad}ef\u{ad}gh\u{ad}ij</p>", "");
    // 40 wide: each line holds two letters and a hyphen.
    let tree = page.layout(&FixedMetrics, 66.0);
    let texts: Vec<&str> = words(&tree).into_iter().map(text).collect();
    assert_eq!(texts, ["ab-", "cd-", "ef-", "gh-", "ij"]);
}

#[test]
fn test_word_wraps_whole_when_no_prefix_fits() {
    // After "x" only 80 is left; "abcdefgh-" needs 90, so nothing is split.
    let page = Page::new("<p>x abcdefgh&shy;ijklmn</p>", "");
    let tree = page.layout(&FixedMetrics, 126.0);
    assert_eq!(
        line_texts(&tree),
        vec![vec!["x"], vec!["abcdefghijklmn"], vec![]]
    );
}

#[test]
fn test_word_wraps_whole_when_it_fits_the_next_line() {
    let page = Page::new("<p>xxxxxxxx ab&shy;cd</p>", "");
    let tree = page.layout(&FixedMetrics, 126.0);
    assert_eq!(line_texts(&tree), vec![vec!["xxxxxxxx"], vec!["abcd"], vec![]]);
}

#[test]
fn test_word_too_wide_for_any_line_overflows() {
    let page = Page::new("<p>a enormous b</p>", "");
    let tree = page.layout(&FixedMetrics, 66.0);
    let placed = words(&tree);
    let texts: Vec<&str> = placed.iter().copied().map(text).collect();
    assert_eq!(texts, ["a", "enormous", "b"]);
    assert!((placed[1].rect.x - 13.0).abs() < f32::EPSILON);
    assert!(placed[1].rect.right() > 53.0);
}

#[test]
fn test_blocks_stack_and_sum_heights() {
    let page = Page::new("<div>one</div><div>two</div>", "");
    let tree = page.layout(&FixedMetrics, 800.0);
    let body = tree.get(tree.children(tree.root())[0]).unwrap();
    assert_eq!(body.kind, BoxKind::Block);

    let divs: Vec<&LayoutBox> = body
        .children
        .iter()
        .filter_map(|&id| tree.get(id))
        .collect();
    assert_eq!(divs.len(), 2);
    assert!((divs[0].rect.height - 12.5).abs() < f32::EPSILON);
    assert!((divs[1].rect.y - divs[0].rect.bottom()).abs() < f32::EPSILON);
    assert!((body.rect.height - 25.0).abs() < f32::EPSILON);
}

#[test]
fn test_mixed_sizes_share_a_baseline() {
    // 16px is 12pt and 32px is 24pt.
    let page = Page::new(r#"<p>small <b style="font-size: 32px;">big</b></p>"#, "");
    let tree = page.layout(&ScaledMetrics, 800.0);
    let placed = words(&tree);
    let line = tree.get(placed[0].parent.unwrap()).unwrap();

    let baseline = line.rect.y + 1.25 * 24.0;
    assert!((placed[0].rect.y + 12.0 - baseline).abs() < 1e-4);
    assert!((placed[1].rect.y + 24.0 - baseline).abs() < 1e-4);
    assert!((line.rect.height - 1.25 * (24.0 + 6.0)).abs() < 1e-4);
}

#[test]
fn test_br_and_script_text() {
    let page = Page::new("<p>one<br>two<script>hidden()</script></p>", "");
    let tree = page.layout(&FixedMetrics, 800.0);
    let texts: Vec<&str> = words(&tree).into_iter().map(text).collect();
    assert_eq!(texts, ["one", "two"]);
    let placed = words(&tree);
    assert!(placed[1].rect.y > placed[0].rect.y);
}

#[test]
fn test_raw_text_elements_are_not_rendered() {
    for tag in sprig_html::RAW_TEXT_ELEMENTS {
        let page = Page::new(&format!("<div>shown<{tag}>a < b</{tag}></div>"), "");
        let tree = page.layout(&FixedMetrics, 800.0);
        let texts: Vec<&str> = words(&tree).into_iter().map(text).collect();
        assert_eq!(texts, ["shown"], "text inside <{tag}>");
    }
}

#[test]
fn test_word_carries_style() {
    let page = Page::new("<p><i>slanted</i></p>", "p { color: green; }");
    let tree = page.layout(&FixedMetrics, 800.0);
    let placed = words(&tree);
    let BoxKind::Word { font, color, .. } = &placed[0].kind else {
        panic!("expected a word box");
    };
    assert_eq!(color, "green");
    assert_eq!(font.to_string(), "12pt normal italic");
}
