//! Live node tree.
//!
//! - [`Node`] - shared handle to an element, text or fragment node
//! - [`Document`] - creation API scoped to a rendering context
//! - [`host_document`] - the default document used outside any frame

mod document;
mod node;

pub use document::{host_document, Document};
pub use node::{Node, NodeKind};
