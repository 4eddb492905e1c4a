//! Sandbox context - the isolated rendering surface.
//!
//! A surface exposes a global scope (`Window`) and a document, either of
//! which may be unreachable while the frame is not loaded. Code that needs
//! them degrades to the host document instead of failing.
//!
//! # Example
//!
//! ```ignore
//! use frame_components::surface::{Frame, SandboxContext};
//!
//! let frame = Frame::new();
//! frame.custom_elements().unwrap().define("x-card", |doc| {
//!     doc.construct_custom_element("x-card")
//! });
//! assert!(frame.window().is_some());
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::{Document, Node};
use crate::types::SurfaceId;

// =============================================================================
// Custom Elements
// =============================================================================

/// Constructor registered for a custom element tag.
pub type CustomElementConstructor = Rc<dyn Fn(&Document) -> Node>;

/// Registry of custom element constructors bound to one window.
#[derive(Clone, Default)]
pub struct CustomElementRegistry {
    entries: Rc<RefCell<HashMap<String, CustomElementConstructor>>>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `constructor` for `tag`. Tags are case-insensitive; a second
    /// definition for the same tag replaces the first.
    pub fn define(&self, tag: &str, constructor: impl Fn(&Document) -> Node + 'static) {
        self.entries
            .borrow_mut()
            .insert(tag.to_ascii_lowercase(), Rc::new(constructor));
    }

    pub fn get(&self, tag: &str) -> Option<CustomElementConstructor> {
        self.entries.borrow().get(&tag.to_ascii_lowercase()).cloned()
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.entries.borrow().contains_key(&tag.to_ascii_lowercase())
    }
}

// =============================================================================
// Window
// =============================================================================

/// Global scope of a surface.
#[derive(Clone)]
pub struct Window {
    document: Document,
    custom_elements: Option<CustomElementRegistry>,
}

impl Window {
    pub fn new(document: Document, custom_elements: Option<CustomElementRegistry>) -> Self {
        Self {
            document,
            custom_elements,
        }
    }

    pub fn document(&self) -> Document {
        self.document.clone()
    }

    /// `None` when the environment has no custom element support.
    pub fn custom_elements(&self) -> Option<CustomElementRegistry> {
        self.custom_elements.clone()
    }
}

// =============================================================================
// Sandbox Context
// =============================================================================

/// An isolated rendering surface. Both accessors are nullable.
pub trait SandboxContext {
    fn id(&self) -> SurfaceId;

    fn window(&self) -> Option<Window>;

    fn document(&self) -> Option<Document>;
}

/// Concrete sandbox backed by its own document.
pub struct Frame {
    id: SurfaceId,
    window: RefCell<Option<Window>>,
}

impl Frame {
    /// A loaded frame with a fresh document and custom element support.
    pub fn new() -> Self {
        let document = Document::new();
        Self::with_window(Window::new(document, Some(CustomElementRegistry::new())))
    }

    pub fn with_window(window: Window) -> Self {
        Self {
            id: SurfaceId::next(),
            window: RefCell::new(Some(window)),
        }
    }

    /// A frame whose content is not reachable yet.
    pub fn unloaded() -> Self {
        Self {
            id: SurfaceId::next(),
            window: RefCell::new(None),
        }
    }

    /// Attach a window, as when the frame finishes loading.
    pub fn load(&self, window: Window) {
        *self.window.borrow_mut() = Some(window);
    }

    pub fn unload(&self) {
        self.window.borrow_mut().take();
    }

    /// Shortcut to the window's registry.
    pub fn custom_elements(&self) -> Option<CustomElementRegistry> {
        self.window.borrow().as_ref().and_then(Window::custom_elements)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxContext for Frame {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn window(&self) -> Option<Window> {
        self.window.borrow().clone()
    }

    fn document(&self) -> Option<Document> {
        self.window.borrow().as_ref().map(Window::document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_case_insensitive() {
        let registry = CustomElementRegistry::new();
        registry.define("X-Card", |doc| doc.construct_custom_element("x-card"));

        assert!(registry.is_defined("x-card"));
        assert!(registry.get("X-CARD").is_some());
        assert!(registry.get("x-other").is_none());
    }

    #[test]
    fn test_frame_load_cycle() {
        let frame = Frame::unloaded();
        assert!(frame.window().is_none());
        assert!(frame.document().is_none());
        assert!(frame.custom_elements().is_none());

        let doc = Document::new();
        frame.load(Window::new(doc.clone(), None));
        assert_eq!(frame.document(), Some(doc));
        assert!(frame.custom_elements().is_none());

        frame.unload();
        assert!(frame.document().is_none());
    }

    #[test]
    fn test_frames_have_distinct_ids() {
        assert_ne!(Frame::new().id(), Frame::new().id());
    }
}
