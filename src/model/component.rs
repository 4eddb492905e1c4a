//! Component model - one node of the document's component tree.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::collection::ComponentCollection;
use crate::types::ModelId;

/// Type tag used when none is given.
pub const DEFAULT_TYPE: &str = "default";

/// Tag name used when none is given.
pub const DEFAULT_TAG: &str = "div";

struct ComponentInner {
    id: ModelId,
    kind: String,
    tag_name: String,
    attributes: RefCell<Vec<(String, String)>>,
    content: RefCell<String>,
    script: RefCell<Option<String>>,
    children: ComponentCollection,
}

/// Shared handle to a component model. Clones refer to the same model.
#[derive(Clone)]
pub struct Component(Rc<ComponentInner>);

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Component {}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.0.id)
            .field("type", &self.0.kind)
            .field("tag", &self.0.tag_name)
            .finish()
    }
}

impl Component {
    /// New component of type `kind` rendered as a `div`.
    pub fn new(kind: &str) -> Self {
        Self::with_tag(kind, DEFAULT_TAG)
    }

    pub fn with_tag(kind: &str, tag_name: &str) -> Self {
        Self(Rc::new(ComponentInner {
            id: ModelId::next(),
            kind: kind.to_string(),
            tag_name: tag_name.to_string(),
            attributes: RefCell::new(Vec::new()),
            content: RefCell::new(String::new()),
            script: RefCell::new(None),
            children: ComponentCollection::new(),
        }))
    }

    /// Plain text node component.
    pub fn text(content: &str) -> Self {
        Self::with_tag("textnode", "").content(content)
    }

    // Builders

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn content(self, content: &str) -> Self {
        *self.0.content.borrow_mut() = content.to_string();
        self
    }

    pub fn script(self, script: &str) -> Self {
        *self.0.script.borrow_mut() = Some(script.to_string());
        self
    }

    /// Append `child` to this component's children.
    pub fn child(self, child: Component) -> Self {
        self.0.children.add(child, Default::default());
        self
    }

    // Accessors

    pub fn id(&self) -> ModelId {
        self.0.id
    }

    /// The `type` tag used to pick a view.
    pub fn kind(&self) -> &str {
        &self.0.kind
    }

    pub fn tag_name(&self) -> &str {
        &self.0.tag_name
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0.attributes.borrow().clone()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut attributes = self.0.attributes.borrow_mut();
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get_content(&self) -> String {
        self.0.content.borrow().clone()
    }

    pub fn get_script(&self) -> Option<String> {
        self.0.script.borrow().clone()
    }

    /// The child collection. Clones share the same collection.
    pub fn children(&self) -> ComponentCollection {
        self.0.children.clone()
    }

    /// The whole subtree in pre-order. The first entry is `self`, so the
    /// result is never empty.
    pub fn descendants(&self) -> Vec<Component> {
        let mut out = vec![self.clone()];
        for child in self.0.children.models() {
            out.extend(child.descendants());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let c = Component::with_tag("link", "a")
            .attr("href", "/")
            .attr("href", "/home")
            .content("Home");

        assert_eq!(c.kind(), "link");
        assert_eq!(c.tag_name(), "a");
        assert_eq!(c.attributes(), vec![("href".to_string(), "/home".to_string())]);
        assert_eq!(c.get_content(), "Home");
        assert!(c.get_script().is_none());
    }

    #[test]
    fn test_descendants_pre_order() {
        let a1 = Component::new("a1");
        let a = Component::new("a").child(a1.clone());
        let b = Component::new("b");
        let root = Component::new("root").child(a.clone()).child(b.clone());

        let kinds: Vec<String> = root.descendants().iter().map(|c| c.kind().to_string()).collect();
        assert_eq!(kinds, vec!["root", "a", "a1", "b"]);
        assert_eq!(b.descendants(), vec![b.clone()], "a leaf yields only itself");
    }

    #[test]
    fn test_identity() {
        let a = Component::new("x");
        let b = Component::new("x");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
