//! CSS selector matching.
//!
//! Only type selectors and the descendant combinator are supported, per
//! [Selectors Level 4 § 5.1](https://www.w3.org/TR/selectors-4/#type-selectors)
//! and [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators).

use std::fmt;

use serde::Serialize;
use sprig_dom::{DomTree, NodeId};

/// A selector: a tag name, or a chain of tag names joined by descendant
/// combinators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    Tag(String),

    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    ///
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant {
        /// Everything left of the last combinator.
        ancestor: Box<Selector>,
        /// The rightmost (subject) tag.
        tag: String,
    },
}

impl Selector {
    /// Cascade priority: the number of tag names in the chain.
    ///
    /// NOTE: This is not CSS specificity. Ids, classes and attributes do not
    /// exist in this selector grammar, so counting tags is the whole story.
    #[must_use]
    pub fn priority(&self) -> usize {
        match self {
            Self::Tag(_) => 1,
            Self::Descendant { ancestor, .. } => ancestor.priority() + 1,
        }
    }

    /// Check whether the node `id` matches. Text nodes never match.
    ///
    /// A descendant chain matches when its subject tag matches `id` and some
    /// strict ancestor of `id` matches the rest of the chain. The parent need
    /// not be that ancestor.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match self {
            Self::Tag(tag) => tree.tag_name(id) == Some(tag.as_str()),
            Self::Descendant { ancestor, tag } => {
                tree.tag_name(id) == Some(tag.as_str())
                    && tree
                        .ancestors(id)
                        .any(|candidate| ancestor.matches(tree, candidate))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "{tag}"),
            Self::Descendant { ancestor, tag } => write!(f, "{ancestor} {tag}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_dom::{AttributesMap, ElementData, NodeType};

    fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
        let id = tree.alloc(
            NodeType::Element(ElementData::new(tag, AttributesMap::new())),
            Some(parent),
        );
        tree.append_child(parent, id);
        id
    }

    fn chain(tags: &[&str]) -> Selector {
        let mut selector = Selector::Tag(tags[0].to_string());
        for tag in &tags[1..] {
            selector = Selector::Descendant {
                ancestor: Box::new(selector),
                tag: (*tag).to_string(),
            };
        }
        selector
    }

    #[test]
    fn test_priority_counts_tags() {
        assert_eq!(chain(&["p"]).priority(), 1);
        assert_eq!(chain(&["div", "p"]).priority(), 2);
        assert_eq!(chain(&["body", "div", "p"]).priority(), 3);
    }

    #[test]
    fn test_descendant_does_not_need_adjacency() {
        let mut tree = DomTree::new();
        let body = element(&mut tree, NodeId::ROOT, "body");
        let div = element(&mut tree, body, "div");
        let section = element(&mut tree, div, "section");
        let p = element(&mut tree, section, "p");

        assert!(chain(&["div", "p"]).matches(&tree, p));
        assert!(chain(&["html", "div", "p"]).matches(&tree, p));
        assert!(!chain(&["p", "div"]).matches(&tree, p));
        assert!(!chain(&["div", "p"]).matches(&tree, section));
    }

    #[test]
    fn test_ancestor_is_strict() {
        let mut tree = DomTree::new();
        let body = element(&mut tree, NodeId::ROOT, "body");
        let p = element(&mut tree, body, "p");
        // `p p` needs a p above the p.
        assert!(!chain(&["p", "p"]).matches(&tree, p));
        let inner = element(&mut tree, p, "p");
        assert!(chain(&["p", "p"]).matches(&tree, inner));
    }

    #[test]
    fn test_later_ancestor_can_satisfy_chain() {
        // `div p a`: the nearest p has no div above it, a farther p does.
        let mut tree = DomTree::new();
        let body = element(&mut tree, NodeId::ROOT, "body");
        let div = element(&mut tree, body, "div");
        let outer_p = element(&mut tree, div, "p");
        let span = element(&mut tree, outer_p, "span");
        let a = element(&mut tree, span, "a");
        assert!(chain(&["div", "p", "a"]).matches(&tree, a));
        assert!(!chain(&["span", "p", "a"]).matches(&tree, a));
    }

    #[test]
    fn test_text_never_matches() {
        let mut tree = DomTree::new();
        let text = tree.alloc(NodeType::Text("p".to_string()), Some(NodeId::ROOT));
        tree.append_child(NodeId::ROOT, text);
        assert!(!chain(&["p"]).matches(&tree, text));
        assert!(!chain(&["html", "p"]).matches(&tree, text));
    }

    #[test]
    fn test_display() {
        assert_eq!(chain(&["h1", "a"]).to_string(), "h1 a");
    }
}
