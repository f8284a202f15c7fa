//! Integration tests for display list generation.

use sprig_css::{
    ApproximateFontMetrics, DisplayCommand, DisplayList, LayoutOutlines, Painter, compute_styles,
    layout_document, ua_stylesheet,
};

fn paint(html: &str, outlines: LayoutOutlines) -> DisplayList {
    let dom = sprig_html::parse(html);
    let styles = compute_styles(&dom, ua_stylesheet());
    let tree = layout_document(&dom, &styles, &ApproximateFontMetrics, 800.0);
    Painter::new(&styles, outlines).paint(&tree)
}

#[test]
fn test_text_in_document_order() {
    let list = paint("<h1>Title</h1><p>Some <b>bold</b> text</p>", LayoutOutlines::default());
    assert_eq!(list.texts().collect::<Vec<_>>(), ["Title", "Some", "bold", "text"]);
    assert!(
        list.commands()
            .iter()
            .all(|command| matches!(command, DisplayCommand::DrawText { .. }))
    );
}

#[test]
fn test_pre_background_painted_under_text() {
    let list = paint("<pre>code</pre>", LayoutOutlines::default());
    assert_eq!(list.len(), 2);
    let DisplayCommand::DrawRect {
        x1,
        y1,
        fill,
        border_color,
        ..
    } = &list.commands()[0]
    else {
        panic!("expected the background first");
    };
    assert_eq!(fill.as_deref(), Some("gray"));
    assert_eq!(*border_color, None);
    assert!((x1 - 13.0).abs() < f32::EPSILON);
    assert!((y1 - 18.0).abs() < f32::EPSILON);
    assert!(matches!(
        &list.commands()[1],
        DisplayCommand::DrawText { text, .. } if text == "code"
    ));
}

#[test]
fn test_text_color_and_font() {
    let list = paint(r#"<p><a href="x">link</a></p>"#, LayoutOutlines::default());
    let DisplayCommand::DrawText { font, color, .. } = &list.commands()[0] else {
        panic!("expected text");
    };
    assert_eq!(color, "blue");
    assert_eq!(font.size, 12);
}

#[test]
fn test_outlines_wrap_content() {
    let list = paint("<p>hi</p>", LayoutOutlines::all());
    let borders: Vec<&str> = list
        .commands()
        .iter()
        .filter_map(|command| match command {
            DisplayCommand::DrawRect { border_color, .. } => border_color.as_deref(),
            DisplayCommand::DrawText { .. } => None,
        })
        .collect();
    // Children are outlined before their parents.
    assert_eq!(
        borders,
        ["red", "green", "green", "blue", "orange", "purple"]
    );
    assert!(matches!(list.commands()[0], DisplayCommand::DrawText { .. }));
}
