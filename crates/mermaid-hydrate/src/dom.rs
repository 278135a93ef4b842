//! Arena-backed document tree
//!
//! A deliberately small DOM: enough to query elements, read and write text
//! content, and swap one node for another. Nodes are never freed; detaching
//! a node only unlinks it from its parent, so a [`NodeId`] stays valid for
//! the lifetime of its [`Document`].
//!
//! [`DocumentTree`] is the seam the initializer works against. It is
//! implemented here for [`Document`] and by the browser host for the live
//! page.

use html5ever::{LocalName, QualName, ns};

use crate::selector::Selector;

/// Errors from tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The node to replace is not a child of the given parent
    #[error("node is not a child of the given parent")]
    NotAChild,

    /// The replacement node already has a parent
    #[error("replacement node is already attached to the tree")]
    AlreadyAttached,

    /// The operation needs an element but got another kind of node
    #[error("expected an element node")]
    NotAnElement,

    /// The host environment rejected the operation
    #[error("host DOM error: {0}")]
    Host(String),
}

/// The tree operations the initializer needs.
///
/// Every mutating call is fallible: the in-memory tree reports structural
/// mistakes, a browser host reports whatever the DOM throws.
pub trait DocumentTree {
    /// Handle to a node in this tree.
    type Node: Clone;

    /// All elements matching `selector`, in document order.
    ///
    /// The result is a snapshot: later mutations don't change it.
    fn query_selector_all(&self, selector: &Selector) -> Result<Vec<Self::Node>, DomError>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, DomError>;

    /// Set an attribute on an element.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str)
    -> Result<(), DomError>;

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Replace all children of `node` with a single text node.
    fn set_text_content(&mut self, node: &Self::Node, text: &str) -> Result<(), DomError>;

    /// Parent of `node`, if attached.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Put `new` in place of `old` in `parent`'s child list. `old` ends up
    /// detached.
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new: &Self::Node,
        old: &Self::Node,
    ) -> Result<(), DomError>;
}

/// Index of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The document root
    Document,
    /// `<!DOCTYPE name>`
    Doctype { name: String },
    /// An element with its qualified name and attributes in source order.
    /// Names keep their namespace so foreign content (`xlink:href` on SVG)
    /// survives a round trip.
    Element {
        name: QualName,
        attrs: Vec<(QualName, String)>,
    },
    /// Character data
    Text(String),
    /// `<!-- ... -->`
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// An HTML document held in an arena.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document (just the root node).
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
        }
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Create a detached HTML element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = QualName::new(None, ns!(html), LocalName::from(tag));
        self.create_qualified_element(name, Vec::new())
    }

    /// Create a detached element in any namespace, with its attributes.
    pub fn create_qualified_element(
        &mut self,
        name: QualName,
        attrs: Vec<(QualName, String)>,
    ) -> NodeId {
        self.push(NodeData::Element { name, attrs })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Text(text.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeData::Comment(text.into()))
    }

    /// Create a detached doctype node.
    pub fn create_doctype(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeData::Doctype { name: name.into() })
    }

    /// Append `child` as the last child of `parent`, detaching it first if
    /// needed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Unlink `node` from its parent. No-op for detached nodes.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Payload of `node`.
    pub fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0].data
    }

    /// Parent of `node`, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Children of `node`, in order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Tag name, `None` for non-elements.
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    /// Value of the unprefixed attribute `name` on an element.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| is_plain_attr(k, name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Set or overwrite an attribute. Fails on non-elements.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        match &mut self.nodes[node.0].data {
            NodeData::Element { attrs, .. } => {
                match attrs.iter_mut().find(|(k, _)| is_plain_attr(k, name)) {
                    Some((_, v)) => *v = value.to_string(),
                    None => attrs.push((
                        QualName::new(None, ns!(), LocalName::from(name)),
                        value.to_string(),
                    )),
                }
                Ok(())
            }
            _ => Err(DomError::NotAnElement),
        }
    }

    /// Whether an element carries `class` in its class list.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    /// Concatenated text of `node` and its descendants.
    ///
    /// Comments and doctypes contribute nothing, like `Node.textContent`.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element { .. } | NodeData::Document => {
                for &child in &self.nodes[node.0].children {
                    self.collect_text(child, out);
                }
            }
            NodeData::Comment(_) | NodeData::Doctype { .. } => {}
        }
    }

    /// Replace all children of `node` with one text node holding `text`.
    /// An empty string leaves `node` without children.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        if !text.is_empty() {
            let text = self.create_text(text);
            self.append_child(node, text);
        }
    }

    /// Swap `old` (a child of `parent`) for the detached node `new`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<(), DomError> {
        if self.nodes[old.0].parent != Some(parent) {
            return Err(DomError::NotAChild);
        }
        if self.nodes[new.0].parent.is_some() || new == self.root() {
            return Err(DomError::AlreadyAttached);
        }

        let slot = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == old)
            .ok_or(DomError::NotAChild)?;

        self.nodes[parent.0].children[slot] = new;
        self.nodes[new.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        Ok(())
    }

    /// Nodes reachable from the root, in document (pre-)order.
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![node],
        }
    }

    /// All attached elements matching `selector`, in document order.
    ///
    /// `<template>` contents are inert and never matched, like in a browser.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if let NodeData::Element { name, .. } = &self.nodes[node.0].data {
                if selector.matches(&name.local, self.attr(node, "id"), self.attr(node, "class")) {
                    found.push(node);
                }
                if is_template(name) {
                    continue;
                }
            }
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        found
    }

    /// First attached element with the given tag name.
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|&node| self.tag_name(node).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        self.find_element("body")
    }
}

fn is_plain_attr(attr: &QualName, name: &str) -> bool {
    attr.prefix.is_none() && attr.local.as_ref().eq_ignore_ascii_case(name)
}

fn is_template(name: &QualName) -> bool {
    name.ns == ns!(html) && &*name.local == "template"
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.doc.nodes[node.0].children.iter().rev().copied());
        Some(node)
    }
}

impl DocumentTree for Document {
    type Node = NodeId;

    fn query_selector_all(&self, selector: &Selector) -> Result<Vec<NodeId>, DomError> {
        Ok(Document::query_selector_all(self, selector))
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        Ok(Document::create_element(self, tag))
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.set_attr(*node, name, value)
    }

    fn text_content(&self, node: &NodeId) -> String {
        Document::text_content(self, *node)
    }

    fn set_text_content(&mut self, node: &NodeId, text: &str) -> Result<(), DomError> {
        if self.tag_name(*node).is_none() {
            return Err(DomError::NotAnElement);
        }
        Document::set_text_content(self, *node, text);
        Ok(())
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        Document::parent(self, *node)
    }

    fn replace_child(&mut self, parent: &NodeId, new: &NodeId, old: &NodeId) -> Result<(), DomError> {
        Document::replace_child(self, *parent, *new, *old)
    }
}
