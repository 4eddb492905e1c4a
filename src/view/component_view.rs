use std::cell::RefCell;
use std::rc::Rc;

use super::{View, ViewHandle, ViewInit};
use crate::config::RenderConfig;
use crate::dom::Node;
use crate::engine::{NodeFactory, TypeRegistry, ViewResolver};
use crate::error::{DomError, RenderFault};
use crate::model::Component;
use crate::reconciler::{Reconciler, ReconcilerProps};

/// Default view: one element for the model's tag, with attributes, text
/// content and a nested reconciler for the children.
pub struct ComponentView {
    model: Component,
    config: RenderConfig,
    types: TypeRegistry,
    resolver: ViewResolver,
    factory: Option<NodeFactory>,
    el: Option<Node>,
    content_node: Option<Node>,
    children_view: Option<Reconciler>,
    script_container: Option<Node>,
}

impl ComponentView {
    pub fn new(init: ViewInit) -> Self {
        Self {
            model: init.model,
            config: init.config,
            types: init.types,
            resolver: init.resolver,
            factory: None,
            el: None,
            content_node: None,
            children_view: None,
            script_container: None,
        }
    }

    pub fn create(init: ViewInit) -> ViewHandle {
        Rc::new(RefCell::new(Self::new(init)))
    }

    fn ensure_el(&mut self) -> (NodeFactory, Node) {
        if let (Some(factory), Some(el)) = (&self.factory, &self.el) {
            return (factory.clone(), el.clone());
        }
        let (factory, el) = NodeFactory::for_root(&self.config, self.model.tag_name());
        self.factory = Some(factory.clone());
        self.el = Some(el.clone());
        (factory, el)
    }

    fn fault(&self, source: DomError) -> RenderFault {
        RenderFault::Dom {
            model: self.model.id(),
            kind: self.model.kind().to_string(),
            source,
        }
    }

    fn render_attributes(&self, el: &Node) -> Result<(), RenderFault> {
        for (name, value) in self.model.attributes() {
            el.set_attribute(&name, &value).map_err(|e| self.fault(e))?;
        }
        Ok(())
    }

    /// Keep the content text as the first child of `el`. Returns how many
    /// leading nodes it occupies.
    fn render_content(&mut self, factory: &NodeFactory, el: &Node) -> Result<usize, RenderFault> {
        let content = self.model.get_content();
        if content.is_empty() {
            if let Some(node) = self.content_node.take() {
                node.remove();
            }
            return Ok(0);
        }

        let node = match &self.content_node {
            Some(node) => {
                node.set_text(&content);
                node.clone()
            }
            None => {
                let node = factory.create_text_node(&content);
                self.content_node = Some(node.clone());
                node
            }
        };
        let first = el.child_at(0);
        if first.as_ref() != Some(&node) {
            el.insert_before(&node, first.as_ref())
                .map_err(|e| self.fault(e))?;
        }
        Ok(1)
    }

    fn render_children(&mut self, el: &Node, leading: usize) {
        let reconciler = match &self.children_view {
            Some(reconciler) => reconciler.clone(),
            None => {
                // Nested reconcilers inherit the resolved type table
                let reconciler = Reconciler::new(ReconcilerProps {
                    collection: self.model.children(),
                    config: self.config.clone().with_component_types(self.types.clone()),
                    resolver: Some(self.resolver.clone()),
                    el: Some(el.clone()),
                    ..Default::default()
                });
                self.children_view = Some(reconciler.clone());
                reconciler
            }
        };
        reconciler.set_leading(leading);
        reconciler.render(Some(el));
    }

    fn render_script(&mut self, factory: &NodeFactory) -> Result<(), RenderFault> {
        let Some(script) = self.model.get_script() else {
            return Ok(());
        };
        let container = match &self.script_container {
            Some(container) => container.clone(),
            None => {
                let container = factory.create_element("script");
                factory
                    .document()
                    .body()
                    .append_child(&container)
                    .map_err(|e| self.fault(e))?;
                self.script_container = Some(container.clone());
                container
            }
        };
        container.set_text(&script);
        Ok(())
    }
}

impl View for ComponentView {
    fn model(&self) -> &Component {
        &self.model
    }

    fn el(&self) -> Option<Node> {
        self.el.clone()
    }

    fn render(&mut self) -> Result<Node, RenderFault> {
        let (factory, el) = self.ensure_el();
        self.render_attributes(&el)?;
        let leading = self.render_content(&factory, &el)?;
        self.render_children(&el, leading);
        self.render_script(&factory)?;
        Ok(el)
    }

    fn children_view(&self) -> Option<Reconciler> {
        self.children_view.clone()
    }

    fn script_container(&self) -> Option<Node> {
        self.script_container.clone()
    }

    fn remove(&mut self) {
        if let Some(el) = self.el.take() {
            el.remove();
        }
        self.content_node = None;
        self.children_view = None;
        self.script_container = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Frame, SandboxContext};

    fn init(model: Component, config: RenderConfig) -> ViewInit {
        ViewInit {
            model,
            config,
            types: TypeRegistry::with_defaults(),
            resolver: ViewResolver::default(),
        }
    }

    #[test]
    fn test_renders_tag_attributes_and_content() {
        let model = Component::with_tag("link", "a").attr("href", "/docs").content("Docs");
        let mut view = ComponentView::new(init(model, RenderConfig::new()));

        let el = view.render().unwrap();
        assert_eq!(el.outer_html(), "<a href=\"/docs\">Docs</a>");
    }

    #[test]
    fn test_rerender_reuses_element() {
        let model = Component::new("default").content("one");
        let mut view = ComponentView::new(init(model.clone(), RenderConfig::new()));

        let first = view.render().unwrap();
        model.set_attribute("title", "t");
        let second = view.render().unwrap();

        assert_eq!(first, second);
        assert_eq!(second.attribute("title").as_deref(), Some("t"));
    }

    #[test]
    fn test_invalid_attribute_is_a_fault() {
        let model = Component::new("default").attr("bad name", "x");
        let mut view = ComponentView::new(init(model.clone(), RenderConfig::new()));

        let fault = view.render().unwrap_err();
        assert_eq!(fault.model(), model.id());
    }

    #[test]
    fn test_children_render_through_nested_reconciler() {
        let model = Component::with_tag("list", "ul")
            .content("Items")
            .child(Component::with_tag("item", "li").content("a"))
            .child(Component::with_tag("item", "li").content("b"));
        let mut view = ComponentView::new(init(model, RenderConfig::new()));

        let el = view.render().unwrap();
        assert_eq!(el.outer_html(), "<ul>Items<li>a</li><li>b</li></ul>");
        assert!(view.children_view().is_some_and(|r| r.is_listening()));
    }

    #[test]
    fn test_content_stays_ahead_of_mutated_children() {
        let model = Component::with_tag("list", "ul")
            .content("Items")
            .child(Component::with_tag("item", "li").attr("id", "a"))
            .child(Component::with_tag("item", "li").attr("id", "b"));
        let mut view = ComponentView::new(init(model.clone(), RenderConfig::new()));
        let el = view.render().unwrap();

        let ids = |el: &Node| -> Vec<String> {
            el.child_nodes()
                .iter()
                .map(|n| n.attribute("id").unwrap_or_else(|| n.node_name()))
                .collect()
        };

        model.children().add(Component::with_tag("item", "li").attr("id", "c"), Default::default());
        assert_eq!(ids(&el), vec!["#text", "a", "b", "c"], "tail add lands last");

        model.children().add_at(Component::with_tag("item", "li").attr("id", "x"), 1, Default::default());
        assert_eq!(ids(&el), vec!["#text", "a", "x", "b", "c"]);

        model.children().reset(vec![Component::with_tag("item", "li").attr("id", "r")], Default::default());
        assert_eq!(ids(&el), vec!["#text", "r"], "reset keeps the content text");

        view.render().unwrap();
        assert_eq!(el.outer_html(), "<ul>Items<li id=\"r\"></li></ul>");
    }

    #[test]
    fn test_script_container_lives_in_surface_body() {
        let frame = Rc::new(Frame::new());
        let body = frame.document().map(|d| d.body());
        let config = RenderConfig::new().with_shared_surface(frame.clone());
        let model = Component::new("default").script("init()");
        let mut view = ComponentView::new(init(model, config));

        view.render().unwrap();
        let container = view.script_container().unwrap();
        assert_eq!(container.parent(), body);
        assert_eq!(container.text_content(), "init()");

        view.render().unwrap();
        assert_eq!(body.map(|b| b.child_count()), Some(1), "container is created once");
    }

    #[test]
    fn test_remove_releases_element() {
        let parent = crate::dom::host_document().create_element("div");
        let mut view = ComponentView::new(init(Component::new("default"), RenderConfig::new()));
        let el = view.render().unwrap();
        parent.append_child(&el).unwrap();

        view.remove();
        assert_eq!(parent.child_count(), 0);
        assert!(view.el().is_none());
    }
}
