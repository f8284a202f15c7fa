//! Document tree implementation for the sprig renderer.
//!
//! This crate provides an arena-based tree of element and text nodes.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Parent
//! links are plain indices: they exist for walking upward (ancestor matching,
//! inheritance) and never imply ownership. The arena owns every node.
//!
//! The root is always an `html` element, allocated first when the tree is
//! created, so it lives at [`NodeId::ROOT`].

use std::collections::HashMap;

/// Map of attribute names to values for an element.
///
/// Keys are lowercased by the HTML parser and therefore unique.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the document tree.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root `html` element is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "An object that participates in a tree has a parent, which is either
/// null or an object, and has children, which is an ordered set of objects."
#[derive(Debug, Clone)]
pub struct Node {
    /// Element or text payload.
    pub node_type: NodeType,

    /// Non-owning link to the parent element. `None` only for the root.
    pub parent: Option<NodeId>,

    /// Children in document order. Always empty for text nodes.
    pub children: Vec<NodeId>,
}

/// The two kinds of node the renderer knows about.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    ///
    /// Character data with entities already decoded.
    Text(String),
}

/// Element-specific data.
///
/// NOTE: We only store the lowercased tag name and the attributes. Namespaces,
/// custom elements, and the rest of the Element interface are out of scope.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Lowercased tag name, e.g. `"p"`.
    pub tag_name: String,
    /// Attributes with lowercased keys.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data for `tag_name` with the given attributes.
    #[must_use]
    pub fn new(tag_name: &str, attrs: AttributesMap) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attrs,
        }
    }

    /// Returns the value of an attribute, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Arena-based document tree with O(1) node access and traversal.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. This provides:
/// - O(1) access to any node by `NodeId`
/// - O(1) parent traversal
/// - No reference cycles (indices instead of references)
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The `html` element is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree holding just a bare `html` root element.
    #[must_use]
    pub fn new() -> Self {
        let html = Node {
            node_type: NodeType::Element(ElementData::new("html", AttributesMap::new())),
            parent: None,
            children: Vec::new(),
        };
        Self { nodes: vec![html] }
    }

    /// Get the root `html` element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the arena (attached or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty. Never true: the root always exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    ///
    /// The parent link is recorded immediately, but the node is not yet in its
    /// parent's child list; call [`DomTree::append_child`] to attach it.
    pub fn alloc(&mut self, node_type: NodeType, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Appends `child` as the last child of `parent`, updating its parent link.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detach and return all children of `id`, leaving it childless.
    ///
    /// The detached nodes keep their (now stale) parent link until they are
    /// appended somewhere else.
    pub fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        std::mem::take(&mut self.nodes[id.0].children)
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over `id` and all its descendants in document (pre-)order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: vec![id],
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Text(_) => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Text(_) => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            NodeType::Element(_) => None,
        })
    }

    /// Get the tag name if this node is an element.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// The first child of the root with the given tag, if any.
    fn root_child(&self, tag: &str) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.tag_name(id) == Some(tag))
    }

    /// The `head` element (first child of the root once parsing finished).
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.root_child("head")
    }

    /// The `body` element (second child of the root once parsing finished).
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.root_child("body")
    }

    /// Concatenated text of all text nodes under `id`, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|node| self.as_text(node))
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
