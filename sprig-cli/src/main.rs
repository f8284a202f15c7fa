//! sprig CLI
//!
//! Loads a page and prints one stage of the rendering pipeline.
//!
//! Usage:
//!   sprig <URL>                    Print the display list
//!   sprig <URL> --dump layout      Print the layout tree
//!   sprig <URL> --dump styles --json
//!   sprig view-source:<URL>        Render the page's source as text

use std::fmt::Write;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use sprig_browser::{FontdueFontMetrics, LoadedDocument, RenderOptions, load_document};
use sprig_css::{DisplayCommand, LayoutOutlines};
use sprig_dom::NodeId;
use sprig_html::format_tree;

/// sprig: a toy HTML/CSS renderer
#[derive(Parser, Debug)]
#[command(name = "sprig")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Display list for a page
    sprig https://example.org/

    # Layout tree of a local file at 400px
    sprig ./index.html --dump layout --width 400

    # Computed styles as JSON
    sprig ./index.html --dump styles --json

    # The page source, rendered as text
    sprig view-source:https://example.org/
"#)]
struct Cli {
    /// URL or path to load (http, https, file, data, view-source)
    #[arg(value_name = "URL")]
    url: String,

    /// Viewport width in CSS pixels
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Pipeline stage to print
    #[arg(long, value_enum, default_value_t = Dump::Paint)]
    dump: Dump,

    /// Print JSON instead of text (rules, styles, layout, paint)
    #[arg(long)]
    json: bool,

    /// Outline every layout box in the display list
    #[arg(long)]
    outlines: bool,
}

/// Which stage of the pipeline to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dump {
    /// The document tree
    Dom,
    /// Every rule in cascade order
    Rules,
    /// Computed style of every node
    Styles,
    /// The layout box tree
    Layout,
    /// The display list
    Paint,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let doc = load_document(&cli.url)?;

    let output = match cli.dump {
        Dump::Dom => format_tree(&doc.dom, doc.dom.root()),
        Dump::Rules if cli.json => serde_json::to_string_pretty(&doc.rules)?,
        Dump::Rules => format_rules(&doc),
        Dump::Styles if cli.json => serde_json::to_string_pretty(&styles_json(&doc))?,
        Dump::Styles => format_styles(&doc),
        Dump::Layout | Dump::Paint => {
            let options = RenderOptions {
                viewport_width: cli.width,
                outlines: if cli.outlines {
                    LayoutOutlines::all()
                } else {
                    LayoutOutlines::default()
                },
            };
            let metrics = FontdueFontMetrics::load();
            let page = doc.render(&options, &metrics);
            match (cli.dump, cli.json) {
                (Dump::Layout, true) => serde_json::to_string_pretty(&page.layout)?,
                (Dump::Layout, false) => page.layout.dump(&doc.dom),
                (_, true) => serde_json::to_string_pretty(&page.display_list)?,
                (_, false) => page
                    .display_list
                    .commands()
                    .iter()
                    .map(format_command)
                    .collect::<Vec<_>>()
                    .join("\n"),
            }
        }
    };

    if !cli.json {
        println!("{}", format!("=== {} ===", doc.url).bold());
    }
    println!("{}", output.trim_end());
    Ok(())
}

/// One rule per line: priority, selector, declarations.
fn format_rules(doc: &LoadedDocument) -> String {
    let mut out = String::new();
    for rule in &doc.rules {
        let declarations: Vec<String> = rule
            .declarations
            .iter()
            .map(|(property, value)| format!("{property}: {value};"))
            .collect();
        let _ = writeln!(
            out,
            "[{}] {} {{ {} }}",
            rule.priority(),
            rule.selector.cyan(),
            declarations.join(" ")
        );
    }
    out
}

/// The document tree with each node's computed style.
fn format_styles(doc: &LoadedDocument) -> String {
    let mut out = String::new();
    write_styles(doc, doc.dom.root(), 0, &mut out);
    out
}

fn write_styles(doc: &LoadedDocument, id: NodeId, depth: usize, out: &mut String) {
    let label = doc
        .dom
        .tag_name(id)
        .map_or_else(|| "#text".to_string(), |tag| format!("<{tag}>"));
    let style = doc.styles.get(&id).map_or_else(String::new, |style| {
        style
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    });
    let _ = writeln!(out, "{:indent$}{label} [{}]", "", style.dimmed(), indent = depth * 2);
    for &child in doc.dom.children(id) {
        write_styles(doc, child, depth + 1, out);
    }
}

/// Computed styles keyed by node, in document order.
fn styles_json(doc: &LoadedDocument) -> serde_json::Value {
    let nodes: Vec<serde_json::Value> = doc
        .dom
        .descendants(doc.dom.root())
        .filter_map(|id| {
            let style = doc.styles.get(&id)?;
            Some(serde_json::json!({
                "node": id.0,
                "tag": doc.dom.tag_name(id),
                "style": style,
            }))
        })
        .collect();
    serde_json::Value::Array(nodes)
}

fn format_command(command: &DisplayCommand) -> String {
    match command {
        DisplayCommand::DrawText {
            x,
            y,
            text,
            font,
            color,
        } => format!("text ({x:.1}, {y:.1}) {text:?} {font} {color}"),
        DisplayCommand::DrawRect {
            x1,
            y1,
            x2,
            y2,
            fill,
            border_color,
        } => {
            let mut line = format!("rect ({x1:.1}, {y1:.1})-({x2:.1}, {y2:.1})");
            if let Some(fill) = fill {
                let _ = write!(line, " fill={fill}");
            }
            if let Some(border) = border_color {
                let _ = write!(line, " border={border}");
            }
            line
        }
    }
}
