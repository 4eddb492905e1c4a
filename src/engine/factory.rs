//! Node Factory - sandbox-aware element creation.
//!
//! Creation path, in order of precedence:
//! 1. A custom element constructor from the surface window, when the root tag
//!    was detected as a web component.
//! 2. The surface document, so frame-scoped environment patches apply.
//! 3. The host document.

use std::rc::Rc;

use crate::config::RenderConfig;
use crate::dom::{host_document, Document, Node};
use crate::surface::SandboxContext;

/// Creates the nodes a reconciler or view owns.
#[derive(Clone)]
pub struct NodeFactory {
    surface: Option<Rc<dyn SandboxContext>>,
    web_component: bool,
}

impl std::fmt::Debug for NodeFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeFactory")
            .field("surface", &self.surface.as_ref().map(|s| s.id()))
            .field("web_component", &self.web_component)
            .finish()
    }
}

impl NodeFactory {
    /// Factory without web-component detection.
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            surface: config.surface.clone(),
            web_component: false,
        }
    }

    /// Factory whose detection is computed from an existing node.
    pub fn for_node(config: &RenderConfig, el: &Node) -> Self {
        Self {
            surface: config.surface.clone(),
            web_component: element_is_web_component(Some(el), Some(config)),
        }
    }

    /// Create the root node for `tag`.
    ///
    /// A provisional element is built first so detection can inspect its tag,
    /// then the real node is created through the detected path.
    pub fn for_root(config: &RenderConfig, tag: &str) -> (Self, Node) {
        let provisional = Self::new(config).create_element(tag);
        let factory = Self::for_node(config, &provisional);
        let el = factory.create_element(tag);
        (factory, el)
    }

    pub fn is_web_component(&self) -> bool {
        self.web_component
    }

    /// Document used for generic creation.
    pub fn document(&self) -> Document {
        self.surface
            .as_ref()
            .and_then(|s| s.document())
            .unwrap_or_else(host_document)
    }

    pub fn create_element(&self, tag: &str) -> Node {
        if self.web_component {
            if let Some(node) = self.construct_custom_element(tag) {
                return node;
            }
            tracing::warn!(tag, "custom element constructor unavailable, creating generic element");
        }
        self.document().create_element(tag)
    }

    pub fn create_text_node(&self, text: &str) -> Node {
        self.document().create_text_node(text)
    }

    fn construct_custom_element(&self, tag: &str) -> Option<Node> {
        let window = self.surface.as_ref()?.window()?;
        let constructor = window.custom_elements()?.get(tag)?;
        tracing::debug!(tag, "constructing custom element");
        Some(constructor(&window.document()))
    }
}

/// True when `el`'s tag is registered as a custom element on the configured
/// surface. Any missing precondition yields false.
pub fn element_is_web_component(el: Option<&Node>, config: Option<&RenderConfig>) -> bool {
    let Some(el) = el else { return false };
    let Some(config) = config else { return false };
    let Some(surface) = &config.surface else { return false };
    let Some(window) = surface.window() else { return false };
    let Some(registry) = window.custom_elements() else { return false };
    el.tag_name().is_some_and(|tag| registry.is_defined(&tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Frame, Window};

    fn frame_with_card() -> Frame {
        let frame = Frame::new();
        if let Some(registry) = frame.custom_elements() {
            registry.define("x-card", |doc| {
                let node = doc.construct_custom_element("x-card");
                let _ = node.set_attribute("upgraded", "true");
                node
            });
        }
        frame
    }

    #[test]
    fn test_custom_element_path() {
        let config = RenderConfig::new().with_surface(frame_with_card());
        let (factory, el) = NodeFactory::for_root(&config, "x-card");

        assert!(factory.is_web_component());
        assert!(el.is_constructed());
        assert_eq!(el.attribute("upgraded").as_deref(), Some("true"));
        assert_eq!(el.owner_document(), config.document().id());
        assert!(!el.owner_document().is_host());
    }

    #[test]
    fn test_surface_document_path() {
        let frame = Frame::new();
        let doc = frame.document();
        let config = RenderConfig::new().with_surface(frame);
        let (factory, el) = NodeFactory::for_root(&config, "div");

        assert!(!factory.is_web_component());
        assert!(!el.is_constructed());
        assert_eq!(Some(el.owner_document()), doc.map(|d| d.id()));
    }

    #[test]
    fn test_host_document_path() {
        let (factory, el) = NodeFactory::for_root(&RenderConfig::new(), "x-card");
        assert!(!factory.is_web_component());
        assert!(el.owner_document().is_host());
    }

    #[test]
    fn test_detection_degrades_gracefully() {
        let el = host_document().create_element("x-card");

        assert!(!element_is_web_component(None, None));
        assert!(!element_is_web_component(Some(&el), None));
        assert!(!element_is_web_component(Some(&el), Some(&RenderConfig::new())));

        let unloaded = RenderConfig::new().with_surface(Frame::unloaded());
        assert!(!element_is_web_component(Some(&el), Some(&unloaded)));

        let no_registry = RenderConfig::new().with_surface(Frame::with_window(Window::new(Document::new(), None)));
        assert!(!element_is_web_component(Some(&el), Some(&no_registry)));

        let text = host_document().create_text_node("x-card");
        let with_card = RenderConfig::new().with_surface(frame_with_card());
        assert!(!element_is_web_component(Some(&text), Some(&with_card)));
        assert!(element_is_web_component(Some(&el), Some(&with_card)));
    }

    #[test]
    fn test_unloaded_surface_uses_host_document() {
        let config = RenderConfig::new().with_surface(Frame::unloaded());
        let (_, el) = NodeFactory::for_root(&config, "section");
        assert!(el.owner_document().is_host());
    }
}
