use std::cell::RefCell;
use std::rc::Rc;

use super::{View, ViewHandle, ViewInit};
use crate::dom::Node;
use crate::engine::NodeFactory;
use crate::error::RenderFault;
use crate::model::Component;

/// View for `textnode` components: a single text node with the model content.
pub struct TextNodeView {
    model: Component,
    factory: NodeFactory,
    el: Option<Node>,
}

impl TextNodeView {
    pub fn new(init: ViewInit) -> Self {
        Self {
            factory: NodeFactory::new(&init.config),
            model: init.model,
            el: None,
        }
    }

    pub fn create(init: ViewInit) -> ViewHandle {
        Rc::new(RefCell::new(Self::new(init)))
    }
}

impl View for TextNodeView {
    fn model(&self) -> &Component {
        &self.model
    }

    fn el(&self) -> Option<Node> {
        self.el.clone()
    }

    fn render(&mut self) -> Result<Node, RenderFault> {
        let content = self.model.get_content();
        let el = match &self.el {
            Some(el) => {
                el.set_text(&content);
                el.clone()
            }
            None => {
                let el = self.factory.create_text_node(&content);
                self.el = Some(el.clone());
                el
            }
        };
        Ok(el)
    }

    fn remove(&mut self) {
        if let Some(el) = self.el.take() {
            el.remove();
        }
    }
}
