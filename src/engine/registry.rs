//! Type Registry - ordered `type` tag → view constructor table.
//!
//! Resolution is a first-match scan: registration order matters, and a later
//! registration for an already registered tag is unreachable.

use std::rc::Rc;

use crate::view::{ComponentView, TextNodeView, ViewConstructor, ViewHandle, ViewInit};

/// One `(type, view)` registration.
#[derive(Clone)]
pub struct TypeEntry {
    pub id: String,
    pub view: ViewConstructor,
}

impl std::fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEntry").field("id", &self.id).finish()
    }
}

/// Immutable, cheaply clonable registration table.
#[derive(Clone, Default, Debug)]
pub struct TypeRegistry {
    entries: Rc<Vec<TypeEntry>>,
}

impl TypeRegistry {
    /// An empty table: every type renders with the default view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in types (`textnode`).
    pub fn with_defaults() -> Self {
        Self::new().with_type("textnode", |init| TextNodeView::create(init))
    }

    /// Copy of this table with `(id, view)` appended.
    pub fn with_type(mut self, id: &str, view: impl Fn(ViewInit) -> ViewHandle + 'static) -> Self {
        Rc::make_mut(&mut self.entries).push(TypeEntry {
            id: id.to_string(),
            view: Rc::new(view),
        });
        self
    }

    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Constructor for `kind`, or the default view.
    pub fn view_for(&self, kind: &str) -> ViewConstructor {
        match resolve(&self.entries, kind) {
            Some(entry) => entry.view.clone(),
            None => default_view(),
        }
    }
}

/// First entry whose id equals `kind`.
pub fn resolve<'a>(entries: &'a [TypeEntry], kind: &str) -> Option<&'a TypeEntry> {
    entries.iter().find(|entry| entry.id == kind)
}

/// Constructor used when no registration matches.
pub fn default_view() -> ViewConstructor {
    Rc::new(ComponentView::create)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(init: ViewInit) -> ViewHandle {
        ComponentView::create(init)
    }

    #[test]
    fn test_first_match_wins() {
        let registry = TypeRegistry::new()
            .with_type("image", plain)
            .with_type("link", plain)
            .with_type("image", plain);

        let found = resolve(registry.entries(), "image").map(|e| e.view.clone());
        let first = registry.entries()[0].view.clone();
        let second = registry.entries()[2].view.clone();

        assert!(found.as_ref().is_some_and(|v| Rc::ptr_eq(v, &first)));
        assert!(!found.as_ref().is_some_and(|v| Rc::ptr_eq(v, &second)));
    }

    #[test]
    fn test_unknown_type_has_no_entry() {
        let registry = TypeRegistry::with_defaults();
        assert!(resolve(registry.entries(), "map").is_none());
        assert!(resolve(registry.entries(), "textnode").is_some());
        assert!(resolve(registry.entries(), "TEXTNODE").is_none(), "match is exact");
    }

    #[test]
    fn test_with_type_does_not_mutate_clones() {
        let base = TypeRegistry::with_defaults();
        let extended = base.clone().with_type("link", plain);
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
    }
}
