//! Live node handles.
//!
//! A `Node` is a shared handle with a weak parent link, so a detached subtree
//! is released as soon as its last owner (usually a View) drops it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::DomError;
use crate::types::{DocumentId, NodeId};

// =============================================================================
// Node Data
// =============================================================================

/// What kind of node this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Fragment,
}

struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    parent: Weak<NodeInner>,
    children: Vec<Node>,
}

struct NodeInner {
    id: NodeId,
    kind: NodeKind,
    owner: DocumentId,
    /// Built by a custom-element constructor rather than a tag factory.
    constructed: bool,
    data: RefCell<NodeData>,
}

/// Handle to a live node.
#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.0.id)
            .field("name", &self.node_name())
            .field("owner", &self.0.owner)
            .finish()
    }
}

impl Node {
    fn new(owner: DocumentId, kind: NodeKind, tag: &str, text: &str, constructed: bool) -> Self {
        Self(Rc::new(NodeInner {
            id: NodeId::next(),
            kind,
            owner,
            constructed,
            data: RefCell::new(NodeData {
                tag: tag.to_ascii_lowercase(),
                attributes: Vec::new(),
                text: text.to_string(),
                parent: Weak::new(),
                children: Vec::new(),
            }),
        }))
    }

    pub(crate) fn element(owner: DocumentId, tag: &str) -> Self {
        Self::new(owner, NodeKind::Element, tag, "", false)
    }

    pub(crate) fn constructed_element(owner: DocumentId, tag: &str) -> Self {
        Self::new(owner, NodeKind::Element, tag, "", true)
    }

    pub(crate) fn text(owner: DocumentId, text: &str) -> Self {
        Self::new(owner, NodeKind::Text, "", text, false)
    }

    pub(crate) fn fragment(owner: DocumentId) -> Self {
        Self::new(owner, NodeKind::Fragment, "", "", false)
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn id(&self) -> NodeId {
        self.0.id
    }

    pub fn kind(&self) -> NodeKind {
        self.0.kind
    }

    /// Document that created this node.
    pub fn owner_document(&self) -> DocumentId {
        self.0.owner
    }

    /// True when a custom-element constructor produced this node.
    pub fn is_constructed(&self) -> bool {
        self.0.constructed
    }

    pub fn is_same_node(&self, other: &Node) -> bool {
        self == other
    }

    /// Lowercase tag name for elements, `None` otherwise.
    pub fn tag_name(&self) -> Option<String> {
        match self.0.kind {
            NodeKind::Element => Some(self.0.data.borrow().tag.clone()),
            _ => None,
        }
    }

    /// DOM-style node name (`div`, `#text`, `#document-fragment`).
    pub fn node_name(&self) -> String {
        match self.0.kind {
            NodeKind::Element => self.0.data.borrow().tag.clone(),
            NodeKind::Text => "#text".to_string(),
            NodeKind::Fragment => "#document-fragment".to_string(),
        }
    }

    // =========================================================================
    // Tree Navigation
    // =========================================================================

    pub fn parent(&self) -> Option<Node> {
        self.0.data.borrow().parent.upgrade().map(Node)
    }

    pub fn child_nodes(&self) -> Vec<Node> {
        self.0.data.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.data.borrow().children.len()
    }

    pub fn child_at(&self, index: usize) -> Option<Node> {
        self.0.data.borrow().children.get(index).cloned()
    }

    /// Position of `child` among this node's children.
    pub fn index_of(&self, child: &Node) -> Option<usize> {
        self.0.data.borrow().children.iter().position(|c| c == child)
    }

    /// True if `other` is this node or one of its descendants.
    pub fn contains(&self, other: &Node) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    fn ensure_container(&self) -> Result<(), DomError> {
        match self.0.kind {
            NodeKind::Element | NodeKind::Fragment => Ok(()),
            NodeKind::Text => Err(DomError::NotAContainer),
        }
    }

    /// Nodes that would actually be inserted: a fragment contributes its
    /// children and is left empty.
    fn take_insertable(&self, child: &Node) -> Result<Vec<Node>, DomError> {
        if child.kind() == NodeKind::Fragment {
            let moved = std::mem::take(&mut child.0.data.borrow_mut().children);
            for node in &moved {
                node.0.data.borrow_mut().parent = Weak::new();
            }
            return Ok(moved);
        }
        if child.contains(self) {
            return Err(DomError::HierarchyRequest);
        }
        child.remove();
        Ok(vec![child.clone()])
    }

    fn adopt(&self, nodes: &[Node]) {
        for node in nodes {
            node.0.data.borrow_mut().parent = Rc::downgrade(&self.0);
        }
    }

    /// Append `child` as the last child, moving it from any previous parent.
    pub fn append_child(&self, child: &Node) -> Result<(), DomError> {
        self.ensure_container()?;
        let nodes = self.take_insertable(child)?;
        self.adopt(&nodes);
        self.0.data.borrow_mut().children.extend(nodes);
        Ok(())
    }

    /// Insert `child` immediately before `reference`. A `None` reference appends.
    pub fn insert_before(&self, child: &Node, reference: Option<&Node>) -> Result<(), DomError> {
        self.ensure_container()?;
        let Some(reference) = reference else {
            return self.append_child(child);
        };
        if self.index_of(reference).is_none() {
            return Err(DomError::NotAChild);
        }
        if child == reference {
            return Ok(());
        }
        let nodes = self.take_insertable(child)?;
        // Recomputed: detaching `child` may have shifted the reference.
        let at = self.index_of(reference).ok_or(DomError::NotAChild)?;
        self.adopt(&nodes);
        let mut data = self.0.data.borrow_mut();
        for (offset, node) in nodes.into_iter().enumerate() {
            data.children.insert(at + offset, node);
        }
        Ok(())
    }

    /// Detach this node from its parent. No-op when already detached.
    pub fn remove(&self) {
        let Some(parent) = self.parent() else { return };
        parent.0.data.borrow_mut().children.retain(|c| c != self);
        self.0.data.borrow_mut().parent = Weak::new();
    }

    /// Detach every child (`innerHTML = ''`).
    pub fn clear_children(&self) {
        let children = std::mem::take(&mut self.0.data.borrow_mut().children);
        for child in children {
            child.0.data.borrow_mut().parent = Weak::new();
        }
    }

    // =========================================================================
    // Attributes & Content
    // =========================================================================

    pub fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        if self.0.kind != NodeKind::Element {
            return Err(DomError::NotAContainer);
        }
        if !is_valid_attribute_name(name) {
            return Err(DomError::InvalidAttributeName(name.to_string()));
        }
        let name = name.to_ascii_lowercase();
        let mut data = self.0.data.borrow_mut();
        match data.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => data.attributes.push((name, value.to_string())),
        }
        Ok(())
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        self.0
            .data
            .borrow()
            .attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.clone())
    }

    /// Set text content. On elements this replaces every child with one text node.
    pub fn set_text(&self, text: &str) {
        match self.0.kind {
            NodeKind::Text => self.0.data.borrow_mut().text = text.to_string(),
            NodeKind::Element | NodeKind::Fragment => {
                self.clear_children();
                if !text.is_empty() {
                    let node = Node::text(self.0.owner, text);
                    node.0.data.borrow_mut().parent = Rc::downgrade(&self.0);
                    self.0.data.borrow_mut().children.push(node);
                }
            }
        }
    }

    pub fn text_content(&self) -> String {
        match self.0.kind {
            NodeKind::Text => self.0.data.borrow().text.clone(),
            _ => self
                .child_nodes()
                .iter()
                .map(Node::text_content)
                .collect(),
        }
    }

    /// Serialize the subtree. Used for assertions and debugging.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self.0.kind {
            NodeKind::Text => out.push_str(&escape(&self.0.data.borrow().text, false)),
            NodeKind::Fragment => {
                for child in self.child_nodes() {
                    child.write_html(out);
                }
            }
            NodeKind::Element => {
                let (tag, attributes) = {
                    let data = self.0.data.borrow();
                    (data.tag.clone(), data.attributes.clone())
                };
                out.push('<');
                out.push_str(&tag);
                for (name, value) in &attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(value, true)));
                }
                out.push('>');
                for child in self.child_nodes() {
                    child.write_html(out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

/// Simplified XML `Name` production.
fn is_valid_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false };
    (first.is_ascii_alphabetic() || first == '_' || first == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
