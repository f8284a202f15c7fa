//! High-level browser API for the sprig renderer.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - fetch a URL (or local path) and parse it
//! - **Stylesheets** - default rules, linked stylesheets, then `<style>` text
//! - **Style Computation** - the cascade over the whole document
//! - **Rendering** - layout and paint for a given viewport
//! - **View Source** - `view-source:<url>` shows the page's HTML as text
//!
//! # Not Yet Implemented
//!
//! - Caching of fetched resources
//! - Scripts, images and every other subresource besides stylesheets

pub mod font_metrics;

pub use font_metrics::FontdueFontMetrics;
pub use sprig_css as css;
pub use sprig_dom as dom;
pub use sprig_html as html;

use std::collections::HashMap;

use sprig_common::net::{FetchError, fetch};
use sprig_common::url::resolve_url;
use sprig_common::warning::{clear_warnings, warn_once};
use sprig_css::{
    ComputedStyle, DisplayList, FontMetrics, LayoutOutlines, LayoutTree, Painter, Rule,
    compute_styles, layout_document, linked_stylesheets, parse_stylesheet, style_element_text,
    ua_stylesheet,
};
use sprig_dom::{DomTree, NodeId};
use sprig_html::{HTMLParser, HTMLTokenizer, ParseIssue, escape_html};
use thiserror::Error;

/// Prefix that asks for a page's source instead of the page.
pub const VIEW_SOURCE_PREFIX: &str = "view-source:";

/// Default viewport width in CSS pixels.
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;

/// A fully loaded and styled document.
///
/// Layout is not part of loading: the same document can be rendered at any
/// number of viewport widths with [`LoadedDocument::render`].
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// The URL as requested, `view-source:` prefix included.
    pub url: String,

    /// The HTML that was parsed.
    pub html_source: String,

    /// Parsed DOM tree
    pub dom: DomTree,

    /// All rules in cascade order: defaults, linked sheets, `<style>` text.
    pub rules: Vec<Rule>,

    /// Computed styles per node
    pub styles: HashMap<NodeId, ComputedStyle>,

    /// Structure the tree builder repaired or implied.
    pub parse_issues: Vec<ParseIssue>,
}

/// Settings for one render of a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Viewport width in CSS pixels.
    pub viewport_width: f32,
    /// Which box kinds get a debug outline.
    pub outlines: LayoutOutlines,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            outlines: LayoutOutlines::default(),
        }
    }
}

/// The output of one render: the box tree and what to draw.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Box tree with final geometry.
    pub layout: LayoutTree,
    /// Drawing commands, back to front.
    pub display_list: DisplayList,
}

/// Error type for document loading.
///
/// Only the document itself can fail a load. Stylesheets that cannot be
/// fetched are reported with [`warn_once`] and skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document could not be fetched.
    #[error("failed to load '{url}': {source}")]
    Fetch {
        /// The URL that was fetched.
        url: String,
        /// Why the fetch failed.
        source: FetchError,
    },
}

/// Load a document from a URL or file path.
///
/// This is the main entry point for loading a document. It handles:
/// - `http`/`https`, `file://` and `data:` URLs
/// - Plain paths, read as `file://` URLs
/// - `view-source:` in front of any of the above
/// - Linked stylesheets, resolved against the document URL
///
/// Warnings from a previous load are forgotten first, so every page reports
/// its own problems.
///
/// # Errors
///
/// Returns [`LoadError::Fetch`] if the document itself cannot be fetched.
pub fn load_document(url: &str) -> Result<LoadedDocument, LoadError> {
    clear_warnings();

    let (view_source, target) = match url.strip_prefix(VIEW_SOURCE_PREFIX) {
        Some(inner) => (true, to_url(inner)),
        None => (false, to_url(url)),
    };
    let body = fetch(&target)
        .map_err(|source| LoadError::Fetch {
            url: target.clone(),
            source,
        })?
        .body;

    let mut doc = if view_source {
        parse_document(&view_source_html(&body), None, &fetch_text)
    } else {
        parse_document(&body, Some(&target), &fetch_text)
    };
    doc.url = url.to_string();
    Ok(doc)
}

/// Parse an HTML string into a [`LoadedDocument`].
///
/// Linked stylesheets are resolved against `base_url` and requested through
/// `fetcher`, one at a time in document order. A sheet that fails to load is
/// skipped with a warning.
pub fn parse_document(
    html: &str,
    base_url: Option<&str>,
    fetcher: &dyn Fn(&str) -> Result<String, FetchError>,
) -> LoadedDocument {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    let (dom, parse_issues) = HTMLParser::new(tokenizer.into_tokens()).run_with_issues();

    // [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
    //
    // "Declarations from style sheets independently linked by the originating
    // document are treated as if they were concatenated in linking order."
    let mut rules = ua_stylesheet().to_vec();
    for href in linked_stylesheets(&dom) {
        let url = resolve_url(&href, base_url);
        match fetcher(&url) {
            Ok(css) => rules.extend(parse_stylesheet(&css)),
            Err(err) => warn_once("Browser", &format!("skipping stylesheet '{url}': {err}")),
        }
    }
    rules.extend(parse_stylesheet(&style_element_text(&dom)));

    let styles = compute_styles(&dom, &rules);

    LoadedDocument {
        url: base_url.unwrap_or_default().to_string(),
        html_source: html.to_string(),
        dom,
        rules,
        styles,
        parse_issues,
    }
}

/// Parse an HTML string that has no URL of its own.
///
/// Relative stylesheet links cannot be resolved, so every link is tried as
/// written.
#[must_use]
pub fn parse_html_string(html: &str) -> LoadedDocument {
    parse_document(html, None, &fetch_text)
}

impl LoadedDocument {
    /// Lay out and paint the document.
    #[must_use]
    pub fn render(&self, options: &RenderOptions, metrics: &dyn FontMetrics) -> RenderedPage {
        let layout = layout_document(&self.dom, &self.styles, metrics, options.viewport_width);
        let display_list = Painter::new(&self.styles, options.outlines).paint(&layout);
        RenderedPage {
            layout,
            display_list,
        }
    }
}

/// The page shown for `view-source:`: the source, escaped, as body text.
#[must_use]
pub fn view_source_html(source: &str) -> String {
    format!(
        "<html><head></head><body>{}</body></html>",
        escape_html(source)
    )
}

/// Fetch a URL and keep only the body text.
fn fetch_text(url: &str) -> Result<String, FetchError> {
    fetch(url).map(|response| response.body)
}

/// Turn a command-line argument into a URL.
///
/// Anything without a scheme is taken to be a local path.
fn to_url(input: &str) -> String {
    if input.contains("://") || input.starts_with("data:") {
        return input.to_string();
    }
    let path = std::path::absolute(input)
        .map_or_else(|_| input.to_string(), |path| path.display().to_string());
    format!("file://{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_url() {
        assert_eq!(to_url("https://example.org/"), "https://example.org/");
        assert_eq!(to_url("data:text/html,hi"), "data:text/html,hi");
        assert!(to_url("page.html").starts_with("file:///"));
        assert!(to_url("page.html").ends_with("/page.html"));
    }

    #[test]
    fn test_view_source_html_escapes() {
        assert_eq!(
            view_source_html("<p class=\"x\">a & b</p>"),
            "<html><head></head><body>&lt;p class=&quot;x&quot;&gt;a &amp; b&lt;/p&gt;</body></html>"
        );
    }
}
