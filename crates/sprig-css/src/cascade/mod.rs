//! CSS Cascading and Style Computation
//!
//! This module implements style computation per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/),
//! reduced to three layers: inherited values, stylesheet rules in priority
//! order, then the element's inline `style` attribute.

use std::collections::HashMap;

use sprig_dom::{DomTree, NodeId};

use crate::parser::{Rule, parse_declarations};
use crate::style::ComputedStyle;

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Order rules for application: ascending priority, source order within
/// equal priority. Later rules in the result override earlier ones.
#[must_use]
pub fn sort_rules(rules: &[Rule]) -> Vec<&Rule> {
    let mut sorted: Vec<&Rule> = rules.iter().collect();
    // `sort_by_key` is stable, which gives the source-order tie-break.
    sorted.sort_by_key(|rule| rule.priority());
    sorted
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
/// "The cascade takes an unordered list of declared values for a given property
/// on a given element, sorts them by their declaration's precedence..."
///
/// Compute styles for every node in the tree, text nodes included.
/// `rules` is in source order; sorting happens here.
#[must_use]
pub fn compute_styles(tree: &DomTree, rules: &[Rule]) -> HashMap<NodeId, ComputedStyle> {
    let sorted = sort_rules(rules);
    let mut styles = HashMap::with_capacity(tree.len());
    compute_node_styles(tree, tree.root(), &sorted, None, &mut styles);
    styles
}

/// Compute the style for `id`, then recurse into its children.
///
/// Children are visited only after the node's own style is stored, since both
/// inheritance and percentage font sizes read the parent's finished style.
fn compute_node_styles(
    tree: &DomTree,
    id: NodeId,
    rules: &[&Rule],
    parent: Option<&ComputedStyle>,
    styles: &mut HashMap<NodeId, ComputedStyle>,
) {
    // [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    let mut computed = parent.map_or_else(ComputedStyle::initial, ComputedStyle::inherit);
    let parent_font_size = computed.font_size_px();

    for rule in rules.iter().filter(|rule| rule.selector.matches(tree, id)) {
        for (property, value) in &rule.declarations {
            computed.apply_declaration(property, value, parent_font_size);
        }
    }

    // [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
    // Declarations in a style attribute win over every rule here.
    if let Some(inline) = tree.as_element(id).and_then(|element| element.attr("style")) {
        for (property, value) in &parse_declarations(inline) {
            computed.apply_declaration(property, value, parent_font_size);
        }
    }

    for &child in tree.children(id) {
        compute_node_styles(tree, child, rules, Some(&computed), styles);
    }
    let _ = styles.insert(id, computed);
}
