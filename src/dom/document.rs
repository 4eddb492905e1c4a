//! Documents - node creation scoped to one rendering context.
//!
//! The host document lives in a thread-local, mirroring the single global
//! document of the embedding page. Frames own their own `Document`.

use std::rc::Rc;

use super::node::Node;
use crate::types::DocumentId;

struct DocumentInner {
    id: DocumentId,
    body: Node,
}

/// A node-creation scope. Cloning shares the same document.
#[derive(Clone)]
pub struct Document(Rc<DocumentInner>);

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Document").field(&self.0.id).finish()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Document {
    fn with_id(id: DocumentId) -> Self {
        Self(Rc::new(DocumentInner {
            id,
            body: Node::element(id, "body"),
        }))
    }

    /// A fresh, independently-scoped document (one per frame).
    pub fn new() -> Self {
        Self::with_id(DocumentId::next())
    }

    pub fn id(&self) -> DocumentId {
        self.0.id
    }

    pub fn body(&self) -> Node {
        self.0.body.clone()
    }

    pub fn create_element(&self, tag: &str) -> Node {
        Node::element(self.0.id, tag)
    }

    pub fn create_text_node(&self, text: &str) -> Node {
        Node::text(self.0.id, text)
    }

    pub fn create_document_fragment(&self) -> Node {
        Node::fragment(self.0.id)
    }

    /// Build an element the way a custom-element constructor does.
    ///
    /// Call this from constructors registered on a `CustomElementRegistry`.
    pub fn construct_custom_element(&self, tag: &str) -> Node {
        Node::constructed_element(self.0.id, tag)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static HOST_DOCUMENT: Document = Document::with_id(DocumentId::HOST);
}

/// The default/host document.
pub fn host_document() -> Document {
    HOST_DOCUMENT.with(|doc| doc.clone())
}
