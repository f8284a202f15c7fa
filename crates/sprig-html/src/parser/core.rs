use std::fmt::Write as _;

use sprig_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{Attribute, RAW_TEXT_ELEMENTS, Token, decode_entities};

/// Elements that may only appear in `head`. A start tag for one of these while
/// nothing but `html` is open implies a `head` element rather than a `body`.
pub const HEAD_TAGS: [&str; 9] = [
    "base", "basefont", "bgsound", "noscript", "link", "meta", "title", "style", "script",
];

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements can't have any contents (since there's no end tag, no
/// content can be put between the start tag and the end tag)."
pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// "This specification defines the parsing rules for HTML documents...
/// The handling of parse errors is well-defined."
///
/// Issues never stop the parser. They are recorded so callers and tests can
/// see what was repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Short description of what was repaired or ignored.
    pub message: String,
    /// Index into the token stream where this issue was encountered.
    pub token_index: usize,
    /// True for malformed input, false for structure that was merely implied.
    pub is_error: bool,
}

/// What the implicit structure rules are looking at.
#[derive(Debug, Clone, Copy)]
enum Incoming<'a> {
    Start(&'a str),
    End(&'a str),
    Text,
}

impl Incoming<'_> {
    fn is_start(self, tag: &str) -> bool {
        matches!(self, Self::Start(name) if name == tag)
    }

    fn is_end(self, tag: &str) -> bool {
        matches!(self, Self::End(name) if name == tag)
    }

    fn is_head_tag(self) -> bool {
        matches!(self, Self::Start(name) if HEAD_TAGS.contains(&name))
    }
}

/// Builds a [`DomTree`] from a token stream.
///
/// The only persistent state is the stack of open elements. An element is
/// linked into its parent's children when it is popped (void elements and
/// text immediately), so children always appear in document order.
pub struct HTMLParser {
    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack_of_open_elements: Vec<NodeId>,
    tree: DomTree,
    tokens: Vec<Token>,
    token_index: usize,
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        // DomTree::new() creates the html root at NodeId::ROOT
        Self {
            stack_of_open_elements: Vec::new(),
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            issues: Vec::new(),
        }
    }

    /// Get the issues recorded so far.
    #[must_use]
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Run the parser and return the document tree.
    ///
    /// The root of the returned tree is an `html` element whose children are
    /// exactly `[head, body]`.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the tree and any issues recorded.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.iter().enumerate() {
            self.token_index = index;
            self.process_token(token);
        }
        self.finish();
        (self.tree, self.issues)
    }

    fn process_token(&mut self, token: &Token) {
        match token {
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.handle_start_tag(name, *self_closing, attributes),
            Token::EndTag { name } => self.handle_end_tag(name),
            Token::Text { data } => self.handle_text(data),
            // Doctypes and comments are thrown away.
            Token::Comment { .. } | Token::EndOfFile => {}
        }
    }

    fn handle_start_tag(&mut self, name: &str, self_closing: bool, attributes: &[Attribute]) {
        self.implicit_tags(Incoming::Start(name));

        if VOID_ELEMENTS.contains(&name) {
            let parent = self.current_node();
            let element = self.create_element(name, attributes, parent);
            if let Some(parent) = parent {
                self.tree.append_child(parent, element);
            }
            return;
        }

        // [§ 13.2.6.4.7 "in body"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
        // "non-void-html-element-start-tag-with-trailing-solidus": the flag is
        // ignored and the element is opened as usual.
        if self_closing {
            self.parse_error(&format!("trailing solidus on non-void <{name}>"));
        }

        if name == "html" && self.stack_of_open_elements.is_empty() {
            self.open_root(attributes);
            return;
        }

        let parent = self.current_node();
        let element = self.create_element(name, attributes, parent);
        self.stack_of_open_elements.push(element);
    }

    /// End tags close whatever element is current, whatever its name.
    fn handle_end_tag(&mut self, name: &str) {
        self.implicit_tags(Incoming::End(name));

        if self.stack_of_open_elements.len() <= 1 {
            // </html> closing the root is how well-formed documents end.
            if name != "html" {
                self.parse_error(&format!("stray </{name}> ignored"));
            }
            return;
        }

        let Some(closed) = self.pop_current_node() else {
            return;
        };
        let open = self.tree.tag_name(closed).unwrap_or_default();
        if open != name {
            let message = format!("</{name}> closed <{open}>");
            self.parse_error(&message);
        }
    }

    fn handle_text(&mut self, data: &str) {
        if data.chars().all(char::is_whitespace) {
            return;
        }
        self.implicit_tags(Incoming::Text);

        let Some(parent) = self.current_node() else {
            return;
        };
        let raw = self
            .tree
            .tag_name(parent)
            .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
        let text = if raw {
            data.to_string()
        } else {
            decode_entities(data)
        };
        let node = self.tree.alloc(NodeType::Text(text), Some(parent));
        self.tree.append_child(parent, node);
    }

    /// Synthesize the structure the markup left out.
    ///
    /// Repeats until the stack shape is consistent with the incoming event:
    /// - nothing open and not `<html>`: open `html`;
    /// - only `html` open and not `<head>`, `<body>` or `</html>`: open `head`
    ///   for a head-only tag, `body` for anything else;
    /// - `html` and `head` open and neither `</head>` nor a head-only tag:
    ///   close `head`.
    fn implicit_tags(&mut self, incoming: Incoming<'_>) {
        loop {
            let open: Vec<&str> = self
                .stack_of_open_elements
                .iter()
                .map(|&id| self.tree.tag_name(id).unwrap_or_default())
                .collect();

            if open.is_empty() && !incoming.is_start("html") {
                self.implied("html");
                self.open_root(&[]);
            } else if open == ["html"]
                && !incoming.is_start("head")
                && !incoming.is_start("body")
                && !incoming.is_end("html")
            {
                let tag = if incoming.is_head_tag() { "head" } else { "body" };
                self.implied(tag);
                let element = self.create_element(tag, &[], Some(NodeId::ROOT));
                self.stack_of_open_elements.push(element);
            } else if open == ["html", "head"] && !incoming.is_end("head") && !incoming.is_head_tag()
            {
                self.implied("</head>");
                let _ = self.pop_current_node();
            } else {
                break;
            }
        }
    }

    /// Push the pre-allocated root, merging in any attributes from `<html>`.
    fn open_root(&mut self, attributes: &[Attribute]) {
        if let Some(root) = self.tree.as_element_mut(NodeId::ROOT) {
            for attr in attributes {
                let _ = root.attrs.insert(attr.name.clone(), attr.value.clone());
            }
        }
        self.stack_of_open_elements.push(NodeId::ROOT);
    }

    /// Pop the current node and link it under the new current node.
    fn pop_current_node(&mut self) -> Option<NodeId> {
        let node = self.stack_of_open_elements.pop()?;
        if let Some(&parent) = self.stack_of_open_elements.last() {
            self.tree.append_child(parent, node);
        }
        Some(node)
    }

    /// Close every open element bottom-up, then make sure the root has
    /// exactly `[head, body]`.
    fn finish(&mut self) {
        while self.stack_of_open_elements.len() > 1 {
            let _ = self.pop_current_node();
        }
        self.stack_of_open_elements.clear();
        self.normalize_root();
    }

    /// Give the root exactly two children, `head` then `body`.
    ///
    /// Missing ones are synthesized. Repeated ones are merged into the first
    /// of their kind, children kept in document order. Anything else found
    /// directly under the root moves to the end of `body`.
    fn normalize_root(&mut self) {
        let mut head = None;
        let mut body = None;
        let mut strays = Vec::new();

        for child in self.tree.take_children(NodeId::ROOT) {
            let slot = match self.tree.tag_name(child) {
                Some("head") => &mut head,
                Some("body") => &mut body,
                _ => {
                    strays.push(child);
                    continue;
                }
            };
            match *slot {
                None => *slot = Some(child),
                Some(first) => {
                    for grandchild in self.tree.take_children(child) {
                        self.tree.append_child(first, grandchild);
                    }
                }
            }
        }

        let head = head.unwrap_or_else(|| {
            self.implied("head");
            self.create_element("head", &[], Some(NodeId::ROOT))
        });
        let body = body.unwrap_or_else(|| {
            self.implied("body");
            self.create_element("body", &[], Some(NodeId::ROOT))
        });
        for stray in strays {
            self.tree.append_child(body, stray);
        }
        self.tree.append_child(NodeId::ROOT, head);
        self.tree.append_child(NodeId::ROOT, body);
    }

    fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    fn attributes_to_map(attributes: &[Attribute]) -> AttributesMap {
        attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect()
    }

    /// Allocate an element whose parent link points at `parent`. It is not in
    /// the parent's children until it is appended.
    fn create_element(
        &mut self,
        tag_name: &str,
        attributes: &[Attribute],
        parent: Option<NodeId>,
    ) -> NodeId {
        self.tree.alloc(
            NodeType::Element(ElementData::new(
                tag_name,
                Self::attributes_to_map(attributes),
            )),
            parent,
        )
    }

    /// Record a malformed-input issue.
    fn parse_error(&mut self, message: &str) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
            is_error: true,
        });
    }

    /// Record that `tag` was synthesized.
    fn implied(&mut self, tag: &str) {
        self.issues.push(ParseIssue {
            message: format!("implied {tag}"),
            token_index: self.token_index,
            is_error: false,
        });
    }
}

/// Render the subtree at `id` as an indented outline, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, 0, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Element(data) => {
            if data.attrs.is_empty() {
                let _ = writeln!(out, "{prefix}<{}>", data.tag_name);
            } else {
                let mut attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.clone()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                attrs.sort();
                let _ = writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "));
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n");
            let _ = writeln!(out, "{prefix}\"{display}\"");
        }
    }
    for &child_id in tree.children(id) {
        write_node(tree, child_id, indent + 1, out);
    }
}

/// Print a document tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", format_tree(tree, id));
}
