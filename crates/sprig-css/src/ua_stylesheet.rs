//! User-Agent Stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents elements
//! of HTML documents in ways consistent with general user expectations."
//!
//! NOTE: There are no cascade origins here. The default rules are simply
//! placed first in the rule list, so an author rule of equal priority wins
//! the source-order tie-break, but a higher-priority default rule still beats
//! a lower-priority author rule.

use std::sync::OnceLock;

use crate::parser::{Rule, parse_stylesheet};

/// Default CSS rules for HTML elements.
///
/// Font sizes are percentages so headings scale with whatever size they
/// inherit.
const UA_CSS: &str = r"
/* [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3) */
pre { background-color: gray; }

/* [§ 15.3.4 Phrasing content](https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3) */
a { color: blue; }
i { font-style: italic; }
em { font-style: italic; }
b { font-weight: bold; }
strong { font-weight: bold; }
small { font-size: 90%; }
big { font-size: 110%; }

/* [§ 15.3.6 Sections and headings](https://html.spec.whatwg.org/multipage/rendering.html#sections-and-headings) */
h1 { font-size: 200%; font-weight: bold; }
h2 { font-size: 150%; font-weight: bold; }
h3 { font-size: 117%; font-weight: bold; }
";

/// Return the parsed UA stylesheet, parsing only once.
///
/// The stylesheet is parsed once per process and cached via `OnceLock`.
pub fn ua_stylesheet() -> &'static [Rule] {
    static STYLESHEET: OnceLock<Vec<Rule>> = OnceLock::new();
    STYLESHEET.get_or_init(|| parse_stylesheet(UA_CSS))
}
