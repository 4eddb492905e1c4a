//! Views - per-model, per-surface owners of one live node.
//!
//! - [`View`] - the trait every registered view implements
//! - [`ComponentView`] - default element view, nests a reconciler for children
//! - [`TextNodeView`] - renders a bare text node
//!
//! # Lifecycle
//!
//! A View is built lazily by the resolver the first time its model renders on
//! a surface. It owns its node until the reconciler tears it down: the nested
//! reconciler stops listening, the script container is removed, then
//! [`View::remove`] detaches and releases the node.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::RenderConfig;
use crate::dom::Node;
use crate::engine::{TypeRegistry, ViewResolver};
use crate::error::RenderFault;
use crate::model::Component;
use crate::reconciler::Reconciler;

mod component_view;
mod text_view;

pub use component_view::ComponentView;
pub use text_view::TextNodeView;

/// Shared handle to a constructed View.
pub type ViewHandle = Rc<RefCell<dyn View>>;

/// Builds a View from its init bundle.
pub type ViewConstructor = Rc<dyn Fn(ViewInit) -> ViewHandle>;

/// Everything a View constructor receives.
#[derive(Clone)]
pub struct ViewInit {
    pub model: Component,
    pub config: RenderConfig,
    /// Type table the View was resolved from; handed down to nested reconcilers.
    pub types: TypeRegistry,
    pub resolver: ViewResolver,
}

pub trait View {
    fn model(&self) -> &Component;

    /// The owned node, once rendered.
    fn el(&self) -> Option<Node>;

    /// Build or refresh the node. Calling it again reuses the same node.
    fn render(&mut self) -> Result<Node, RenderFault>;

    /// Reconciler over the model's children, if any.
    fn children_view(&self) -> Option<Reconciler> {
        None
    }

    /// Auxiliary node holding the model's script.
    fn script_container(&self) -> Option<Node> {
        None
    }

    /// Detach and release the owned node.
    fn remove(&mut self);
}
