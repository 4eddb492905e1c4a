//! View Resolver - picks, constructs and caches the View for a model.
//!
//! Views live in a side-table keyed by model and surface (`None` for the host
//! document). A model rendered where it already has a View reuses that View,
//! so repeated renders never stack a second listener on its children.
//! Teardown evicts explicitly through [`ViewResolver::take_views`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::registry::TypeRegistry;
use crate::config::RenderConfig;
use crate::model::Component;
use crate::types::{ModelId, SurfaceId};
use crate::view::{ViewHandle, ViewInit};

struct ResolverInner {
    registry: TypeRegistry,
    views: RefCell<HashMap<ModelId, Vec<(Option<SurfaceId>, ViewHandle)>>>,
}

/// Shared resolver. Every reconciler of one tree holds the same instance.
#[derive(Clone)]
pub struct ViewResolver(Rc<ResolverInner>);

impl Default for ViewResolver {
    fn default() -> Self {
        Self::new(TypeRegistry::with_defaults())
    }
}

impl ViewResolver {
    pub fn new(registry: TypeRegistry) -> Self {
        Self(Rc::new(ResolverInner {
            registry,
            views: RefCell::new(HashMap::new()),
        }))
    }

    /// Fallback table used when a config has no explicit override.
    pub fn registry(&self) -> &TypeRegistry {
        &self.0.registry
    }

    /// Existing View for `model` on the configured surface, or a new one.
    pub fn resolve(&self, model: &Component, config: &RenderConfig) -> ViewHandle {
        let surface = config.surface_id();
        if let Some(view) = self.view_for(model.id(), surface) {
            return view;
        }

        let types = config
            .component_types
            .clone()
            .unwrap_or_else(|| self.0.registry.clone());
        let constructor = types.view_for(model.kind());

        // No borrow held: constructors may resolve nested views.
        let view = constructor(ViewInit {
            model: model.clone(),
            config: config.clone(),
            types,
            resolver: self.clone(),
        });

        self.0
            .views
            .borrow_mut()
            .entry(model.id())
            .or_default()
            .push((surface, view.clone()));
        view
    }

    /// View cached for `(model, surface)`. `None` is the host document.
    pub fn view_for(&self, model: ModelId, surface: Option<SurfaceId>) -> Option<ViewHandle> {
        self.0.views.borrow().get(&model).and_then(|views| {
            views
                .iter()
                .find(|(s, _)| *s == surface)
                .map(|(_, view)| view.clone())
        })
    }

    /// Every View of `model`, across surfaces.
    pub fn views_of(&self, model: ModelId) -> Vec<ViewHandle> {
        self.0
            .views
            .borrow()
            .get(&model)
            .map(|views| views.iter().map(|(_, view)| view.clone()).collect())
            .unwrap_or_default()
    }

    /// Evict and return every View of `model`.
    pub fn take_views(&self, model: ModelId) -> Vec<ViewHandle> {
        self.0
            .views
            .borrow_mut()
            .remove(&model)
            .map(|views| views.into_iter().map(|(_, view)| view).collect())
            .unwrap_or_default()
    }

    /// Total number of live Views.
    pub fn view_count(&self) -> usize {
        self.0.views.borrow().values().map(Vec::len).sum()
    }

    /// Drop every cached View.
    pub fn clear(&self) {
        let views = std::mem::take(&mut *self.0.views.borrow_mut());
        drop(views);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Frame;
    use crate::view::ComponentView;
    use std::cell::Cell;

    #[test]
    fn test_reuses_view_per_surface() {
        let resolver = ViewResolver::default();
        let config = RenderConfig::new().with_surface(Frame::new());
        let model = Component::new("default");

        let first = resolver.resolve(&model, &config);
        let second = resolver.resolve(&model, &config);
        assert!(Rc::ptr_eq(&first, &second), "same surface reuses the view");

        let other = RenderConfig::new().with_surface(Frame::new());
        let third = resolver.resolve(&model, &other);
        assert!(!Rc::ptr_eq(&first, &third), "another surface gets its own view");
        assert_eq!(resolver.views_of(model.id()).len(), 2);
    }

    #[test]
    fn test_host_views_are_reused() {
        let resolver = ViewResolver::default();
        let model = Component::new("default");

        let first = resolver.resolve(&model, &RenderConfig::new());
        let second = resolver.resolve(&model, &RenderConfig::new());
        assert!(Rc::ptr_eq(&first, &second), "host keeps one view per model");
        assert_eq!(resolver.view_count(), 1);
        assert!(resolver.view_for(model.id(), None).is_some());
    }

    #[test]
    fn test_override_table_takes_precedence() {
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let types = TypeRegistry::new().with_type("card", move |init| {
            hits_clone.set(hits_clone.get() + 1);
            ComponentView::create(init)
        });

        let resolver = ViewResolver::default();
        let config = RenderConfig::new().with_component_types(types);
        resolver.resolve(&Component::new("card"), &config);
        resolver.resolve(&Component::new("card"), &RenderConfig::new());

        assert_eq!(hits.get(), 1, "only the override table knows 'card'");
    }

    #[test]
    fn test_take_views_evicts() {
        let resolver = ViewResolver::default();
        let config = RenderConfig::new().with_surface(Frame::new());
        let model = Component::new("default");
        resolver.resolve(&model, &config);

        assert_eq!(resolver.view_count(), 1);
        assert_eq!(resolver.take_views(model.id()).len(), 1);
        assert_eq!(resolver.view_count(), 0);
        assert!(resolver.take_views(model.id()).is_empty());
    }
}
