//! Reconciler - keeps a live parent node's children in lock-step with an
//! ordered component collection.
//!
//! # Pattern: EffectScope-based Cleanup
//!
//! The collection subscription is owned by an EffectScope:
//! 1. Subscribe to the collection and keep the listener id
//! 2. Register `off(listener_id)` with `on_scope_dispose()` inside `scope.run()`
//! 3. Keep `Box::new(move || scope.stop())` as the stop function
//!
//! `stop_listening()` (and dropping the last handle) runs it, so a torn-down
//! subtree never leaves a listener behind.
//!
//! # Handlers
//!
//! - `add` → [`Reconciler::add_to`]: render and insert at the model's index,
//!   then fire `component:add` for the subtree unless the insertion is temporary
//! - `remove` → [`Reconciler::remove_children`]: depth-first View teardown
//! - `reset` → [`Reconciler::reset_children`]: clear, tear down, re-append
//!
//! # Example
//!
//! ```ignore
//! use frame_components::{Component, ComponentCollection, Reconciler, ReconcilerProps};
//!
//! let collection = ComponentCollection::new();
//! let reconciler = Reconciler::new(ReconcilerProps {
//!     collection: collection.clone(),
//!     ..Default::default()
//! });
//! reconciler.render(None);
//!
//! collection.add(Component::new("default"), Default::default());
//! assert_eq!(reconciler.el().child_count(), 1);
//! ```

mod insert;
mod lifecycle;

pub use insert::insert_at;
pub use lifecycle::trigger_add;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use spark_signals::{effect_scope, on_scope_dispose};

use crate::config::RenderConfig;
use crate::dom::{host_document, Node};
use crate::engine::{NodeFactory, ViewResolver};
use crate::error::{ReconcileError, RenderFault};
use crate::model::{CollectionEvent, Component, ComponentCollection, DEFAULT_TAG};
use crate::types::{Cleanup, MutationFlags};

// =============================================================================
// Props
// =============================================================================

/// Construction inputs.
///
/// Construct directly with struct literal syntax:
/// ```ignore
/// ReconcilerProps {
///     collection: page.children(),
///     config: RenderConfig::new().with_surface(frame),
///     ..Default::default()
/// }
/// ```
#[derive(Default)]
pub struct ReconcilerProps {
    /// Collection to mirror.
    pub collection: ComponentCollection,
    pub config: RenderConfig,
    /// Shared resolver. A fresh one with the default types when `None`.
    pub resolver: Option<ViewResolver>,
    /// Tag of the root node created when `el` is `None` (default `div`).
    pub tag_name: Option<String>,
    /// Existing root node to use instead of creating one.
    pub el: Option<Node>,
}

// =============================================================================
// Reconciler
// =============================================================================

struct ReconcilerInner {
    collection: ComponentCollection,
    config: RenderConfig,
    resolver: ViewResolver,
    factory: NodeFactory,
    el: Node,
    parent_el: RefCell<Option<Node>>,
    /// Nodes at the head of the parent that belong to its owner, not to a model.
    leading: Cell<usize>,
    stop: RefCell<Option<Cleanup>>,
}

impl Drop for ReconcilerInner {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.get_mut().take() {
            stop();
        }
    }
}

/// Handle to a reconciler. Clones share the same instance.
#[derive(Clone)]
pub struct Reconciler(Rc<ReconcilerInner>);

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("el", &self.0.el)
            .field("models", &self.0.collection.len())
            .field("listening", &self.is_listening())
            .finish()
    }
}

impl Reconciler {
    /// Bind to the collection and subscribe. Nothing renders until
    /// [`Reconciler::render`].
    pub fn new(props: ReconcilerProps) -> Self {
        let ReconcilerProps {
            collection,
            config,
            resolver,
            tag_name,
            el,
        } = props;

        let (factory, el) = match el {
            Some(el) => (NodeFactory::for_node(&config, &el), el),
            None => NodeFactory::for_root(&config, tag_name.as_deref().unwrap_or(DEFAULT_TAG)),
        };

        tracing::debug!(
            models = collection.len(),
            surface = ?config.surface_id(),
            web_component = factory.is_web_component(),
            "reconciler created"
        );

        let reconciler = Self(Rc::new(ReconcilerInner {
            collection,
            config,
            resolver: resolver.unwrap_or_default(),
            factory,
            el,
            parent_el: RefCell::new(None),
            leading: Cell::new(0),
            stop: RefCell::new(None),
        }));
        reconciler.listen();
        reconciler
    }

    fn listen(&self) {
        let weak: Weak<ReconcilerInner> = Rc::downgrade(&self.0);
        let collection = self.0.collection.clone();
        let listener_id = collection.on(move |event| {
            if let Some(inner) = weak.upgrade() {
                Reconciler(inner).handle(event);
            }
        });

        let scope = effect_scope(false);
        scope.run(move || {
            on_scope_dispose(move || {
                collection.off(listener_id);
            });
        });

        *self.0.stop.borrow_mut() = Some(Box::new(move || {
            scope.stop();
        }));
    }

    fn handle(&self, event: &CollectionEvent) {
        match event {
            CollectionEvent::Add { model, options } => {
                if let Err(error) = self.add_to(model, *options) {
                    tracing::warn!(%error, "add notification ignored");
                }
            }
            CollectionEvent::Remove { model, options, .. } => {
                self.remove_children(model, *options);
            }
            CollectionEvent::Reset { models, previous } => {
                self.reset_children(models, previous);
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Own root node.
    pub fn el(&self) -> Node {
        self.0.el.clone()
    }

    /// Node whose children are kept in sync: the last render target, or `el`.
    pub fn parent_el(&self) -> Node {
        self.0
            .parent_el
            .borrow()
            .clone()
            .unwrap_or_else(|| self.0.el.clone())
    }

    pub fn collection(&self) -> &ComponentCollection {
        &self.0.collection
    }

    pub fn config(&self) -> &RenderConfig {
        &self.0.config
    }

    pub fn resolver(&self) -> &ViewResolver {
        &self.0.resolver
    }

    pub fn is_web_component(&self) -> bool {
        self.0.factory.is_web_component()
    }

    /// Count of owner nodes kept ahead of the model nodes.
    pub fn leading(&self) -> usize {
        self.0.leading.get()
    }

    /// Reserve the first `count` children of the parent for the owner (a
    /// view's content text). They are never cleared and model indices are
    /// shifted past them.
    pub fn set_leading(&self, count: usize) {
        self.0.leading.set(count);
    }

    pub fn is_listening(&self) -> bool {
        self.0.stop.borrow().is_some()
    }

    /// Unsubscribe from the collection. Idempotent.
    pub fn stop_listening(&self) {
        let stop = self.0.stop.borrow_mut().take();
        if let Some(stop) = stop {
            stop();
        }
    }

    // =========================================================================
    // Full render
    // =========================================================================

    /// Render every model into a detached batch, then replace the parent's
    /// children after the leading nodes with it. Anything else the parent held
    /// is dropped.
    pub fn render(&self, parent: Option<&Node>) -> &Self {
        let parent = parent.cloned().unwrap_or_else(|| self.0.el.clone());
        *self.0.parent_el.borrow_mut() = Some(parent.clone());

        let fragment = host_document().create_document_fragment();
        let models = self.0.collection.models();
        tracing::debug!(models = models.len(), "render batch");

        for model in &models {
            let node = self.render_model(model);
            if let Err(error) = fragment.append_child(&node) {
                tracing::error!(model = %model.id(), %error, "could not batch rendered node");
            }
        }

        self.clear_models(&parent);
        if let Err(error) = parent.append_child(&fragment) {
            tracing::error!(%error, "could not attach render batch");
        }
        self
    }

    // =========================================================================
    // Handler A: add
    // =========================================================================

    /// Render `model` and insert it at its current collection index.
    ///
    /// Unless `options` is temporary, fires `component:add` for the model and
    /// every descendant.
    pub fn add_to(&self, model: &Component, options: MutationFlags) -> Result<Node, ReconcileError> {
        if !self.0.collection.contains(model) {
            return Err(ReconcileError::ModelNotInCollection(model.id()));
        }

        // Rendering may run view constructors that mutate the collection, so
        // the index is read only once the node exists.
        let node = self.render_model(model);
        let Some(index) = self.0.collection.index_of(model) else {
            self.remove_children(model, options);
            return Err(ReconcileError::ModelNotInCollection(model.id()));
        };
        self.place(model, &node, Some(index));

        if !options.is_temporary() {
            if let Some(events) = &self.0.config.events {
                trigger_add(events, model);
            }
        }
        Ok(node)
    }

    /// Render `model` and place it in the parent at `index` (append if `None`).
    fn add_to_collection(&self, model: &Component, index: Option<usize>) -> Node {
        let node = self.render_model(model);
        self.place(model, &node, index);
        node
    }

    fn place(&self, model: &Component, node: &Node, index: Option<usize>) {
        let parent = self.parent_el();
        let at = index.map(|i| i + self.0.leading.get());
        if let Err(error) = insert_at(&parent, node, at) {
            tracing::error!(model = %model.id(), ?index, %error, "could not insert rendered node");
        }
    }

    /// Detach every model node, keeping the leading owner nodes.
    fn clear_models(&self, parent: &Node) {
        let leading = self.0.leading.get();
        if leading == 0 {
            parent.clear_children();
            return;
        }
        for child in parent.child_nodes().into_iter().skip(leading) {
            child.remove();
        }
    }

    /// Resolve and render one model. Faults become an empty text placeholder.
    fn render_model(&self, model: &Component) -> Node {
        let view = self.0.resolver.resolve(model, &self.0.config);
        let rendered = match view.try_borrow_mut() {
            Ok(mut view) => view.render(),
            Err(_) => Err(RenderFault::View {
                model: model.id(),
                kind: model.kind().to_string(),
                message: "view is already rendering".to_string(),
            }),
        };

        match rendered {
            Ok(node) => node,
            Err(fault) => {
                match &self.0.config.events {
                    Some(events) => events.log_error(&fault),
                    None => tracing::error!(model = %fault.model(), error = %fault, "render fault"),
                }
                host_document().create_text_node("")
            }
        }
    }

    // =========================================================================
    // Handler C: remove
    // =========================================================================

    /// Tear down every View of `removed` and, recursively, of its descendants.
    pub fn remove_children(&self, removed: &Component, options: MutationFlags) {
        for view in self.0.resolver.take_views(removed.id()) {
            let Ok(mut view) = view.try_borrow_mut() else {
                tracing::warn!(model = %removed.id(), "view busy during teardown, skipped");
                continue;
            };
            if let Some(children) = view.children_view() {
                children.stop_listening();
            }
            if let Some(script) = view.script_container() {
                script.remove();
            }
            view.remove();
        }
        tracing::debug!(model = %removed.id(), "views torn down");

        // Detaching the subtree root does not release listeners held below it
        for child in removed.children().models() {
            self.remove_children(&child, options);
        }
    }

    // =========================================================================
    // Handler B: reset
    // =========================================================================

    /// Clear the parent, tear down `previous`, then append `models` in order.
    /// Fires no lifecycle events.
    pub fn reset_children(&self, models: &[Component], previous: &[Component]) {
        tracing::debug!(models = models.len(), previous = previous.len(), "reset");

        self.clear_models(&self.parent_el());
        for model in previous {
            self.remove_children(model, MutationFlags::NONE);
        }
        for model in models {
            self.add_to_collection(model, None);
        }
    }
}
