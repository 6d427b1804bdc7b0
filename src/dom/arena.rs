//! Arena-based document tree.
//!
//! Nodes live in one contiguous vector and refer to each other by index.
//! Each node owns an explicit list of child ids, so "next sibling" is a
//! position lookup in the parent's list and removal is a splice. Removed
//! subtrees stay allocated but are unreachable from the document root.

use html5ever::{LocalName, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The document root (always the first allocation).
    pub const DOCUMENT: NodeId = NodeId(0);
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Pre-split `class` tokens, kept in sync with `attrs`.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    /// Comment (ignored but needed for TreeSink).
    Comment(String),
    /// Document type declaration.
    Doctype { name: String },
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Build an HTML-namespace qualified name.
pub fn html_name(local: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(local))
}

/// A parsed hypertext document.
///
/// Built once per page, mutated in place by the cleaning passes and
/// dropped after linearization.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    headings_shifted: bool,
}

impl Document {
    /// Create a new empty document with only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            headings_shifted: false,
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn root(&self) -> NodeId {
        NodeId::DOCUMENT
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of allocated nodes, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub(crate) fn headings_shifted(&self) -> bool {
        self.headings_shifted
    }

    pub(crate) fn mark_headings_shifted(&mut self) {
        self.headings_shifted = true;
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a new, detached element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let classes = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "class")
            .map(|a| a.value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            classes,
        }))
    }

    /// Create a new, detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text.into())))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    /// Create a doctype node.
    pub fn create_doctype(&mut self, name: String) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype { name }))
    }

    // ------------------------------------------------------------------
    // Structure mutation
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        self.detach(new_node);
        let Some(index) = self.index_in_parent(sibling) else {
            return;
        };
        if let Some(node) = self.get_mut(new_node) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.insert(index, new_node);
        }
    }

    /// Append text to the last child if it is a text node, else add a new one.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last = self.get(parent).and_then(|n| n.children.last().copied());
        if let Some(last) = last
            && let Some(Node {
                data: NodeData::Text(existing),
                ..
            }) = self.get_mut(last)
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text);
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent. Its subtree travels with it.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    /// Remove a node and its subtree from the document for good.
    ///
    /// Returns `false` when the node was already detached.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if self.parent(id).is_none() {
            return false;
        }
        self.detach(id);
        true
    }

    /// Put `new_node` at `old`'s position and drop `old` from the tree.
    pub fn replace(&mut self, old: NodeId, new_node: NodeId) {
        let Some(parent) = self.parent(old) else {
            return;
        };
        let Some(index) = self.index_in_parent(old) else {
            return;
        };
        self.detach(new_node);
        if let Some(node) = self.get_mut(parent) {
            node.children[index] = new_node;
        }
        if let Some(node) = self.get_mut(new_node) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(old) {
            node.parent = None;
        }
    }

    /// Move every child of `from` to the end of `to`, keeping their order.
    pub fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        let children = match self.get_mut(from) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in &children {
            if let Some(node) = self.get_mut(*child) {
                node.parent = Some(to);
            }
        }
        if let Some(node) = self.get_mut(to) {
            node.children.extend(children);
        }
    }

    /// Append a class token unless it is already present.
    ///
    /// Returns `true` when the token was added.
    pub fn add_class(&mut self, id: NodeId, token: &str) -> bool {
        let Some(Node {
            data: NodeData::Element { attrs, classes, .. },
            ..
        }) = self.get_mut(id)
        else {
            return false;
        };
        if classes.iter().any(|c| c == token) {
            return false;
        }
        classes.push(token.to_string());

        let joined = classes.join(" ");
        match attrs.iter_mut().find(|a| a.name.local.as_ref() == "class") {
            Some(attr) => attr.value = joined,
            None => attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from("class")),
                value: joined,
            }),
        }
        true
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Parent of a node, `None` for the root and detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node in stored order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Position of a node within its parent's child list.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Next sibling that is an element, skipping text and comments.
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent)[index + 1..]
            .iter()
            .copied()
            .find(|&c| self.is_element(c))
    }

    /// Previous sibling that is an element, skipping text and comments.
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent)[..index]
            .iter()
            .rev()
            .copied()
            .find(|&c| self.is_element(c))
    }

    /// Ancestors from the parent upwards.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Check whether a node is still reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == NodeId::DOCUMENT || self.ancestors(id).any(|a| a == NodeId::DOCUMENT)
    }

    /// `root` and all of its descendants in document order.
    pub fn traverse(&self, root: NodeId) -> Traverse<'_> {
        Traverse {
            doc: self,
            stack: vec![root],
        }
    }

    /// Descendants of `root` (excluding `root`) in document order.
    pub fn descendants(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.traverse(root).skip(1)
    }

    /// Find the first attached node matching a predicate, in document order.
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.traverse(NodeId::DOCUMENT).find(|&id| predicate(self, id))
    }

    /// Find the first attached element with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|doc, id| doc.has_tag(id, tag))
    }

    /// Find the first attached element carrying the given `id` attribute.
    pub fn find_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.find(|doc, id| doc.attr(id, "id") == Some(element_id))
    }

    /// All attached elements with the given tag, in document order.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.traverse(NodeId::DOCUMENT)
            .filter(|&id| self.has_tag(id, tag))
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first, pre-order iterator over a subtree.
pub struct Traverse<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Traverse<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Reverse so the first child is popped next
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Convenience accessors for element and text nodes.
impl Document {
    /// Element's local name.
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Element's qualified name.
    pub fn qual_name(&self, id: NodeId) -> Option<&QualName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        })
    }

    /// Element's tag as a string slice.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element_name(id).map(|n| n.as_ref())
    }

    /// Check an element's tag.
    pub fn has_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == Some(tag)
    }

    /// Get an attribute value.
    pub fn attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// All attributes of an element.
    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Get element's classes.
    pub fn classes(&self, id: NodeId) -> &[String] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Check for a class token.
    pub fn has_class(&self, id: NodeId, token: &str) -> bool {
        self.classes(id).iter().any(|c| c == token)
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Check if node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    /// Text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Heading level for `h1`..`h6`.
    pub fn heading_level(&self, id: NodeId) -> Option<u8> {
        match self.tag(id)? {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes, as written.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.traverse(id) {
            if let Some(t) = self.text(node) {
                out.push_str(t);
            }
        }
        out
    }

    /// Text content with whitespace runs collapsed and ends trimmed.
    pub fn normalized_text(&self, id: NodeId) -> String {
        crate::util::collapse_whitespace(&self.text_content(id))
    }
}
