//! Component collection - ordered children with mutation notifications.
//!
//! Collection order is render order. Every mutation notifies listeners
//! synchronously, after the backing vector is updated, so handlers always
//! observe the post-mutation state.
//!
//! Listeners are dispatched from a snapshot with no borrow held, which lets a
//! handler mutate the same collection again (re-entrancy).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::component::Component;
use crate::types::MutationFlags;

// =============================================================================
// Events
// =============================================================================

/// Notification emitted after a collection mutation.
#[derive(Debug, Clone)]
pub enum CollectionEvent {
    /// `model` was inserted.
    Add {
        model: Component,
        options: MutationFlags,
    },
    /// `model` was removed from position `index`.
    Remove {
        model: Component,
        index: usize,
        options: MutationFlags,
    },
    /// The whole collection was replaced.
    Reset {
        models: Vec<Component>,
        previous: Vec<Component>,
    },
}

/// Collection listener.
pub type CollectionListener = Rc<dyn Fn(&CollectionEvent)>;

/// Handle used to unsubscribe a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

// =============================================================================
// Collection
// =============================================================================

#[derive(Default)]
struct CollectionInner {
    models: RefCell<Vec<Component>>,
    listeners: RefCell<Vec<(ListenerId, CollectionListener)>>,
    next_listener: Cell<usize>,
}

/// Shared handle to an ordered component collection.
#[derive(Clone, Default)]
pub struct ComponentCollection(Rc<CollectionInner>);

impl fmt::Debug for ComponentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.models.borrow().iter()).finish()
    }
}

impl PartialEq for ComponentCollection {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl ComponentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_models(models: impl IntoIterator<Item = Component>) -> Self {
        let collection = Self::new();
        collection.0.models.borrow_mut().extend(models);
        collection
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn len(&self) -> usize {
        self.0.models.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.models.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Component> {
        self.0.models.borrow().get(index).cloned()
    }

    pub fn index_of(&self, model: &Component) -> Option<usize> {
        self.0.models.borrow().iter().position(|m| m == model)
    }

    pub fn contains(&self, model: &Component) -> bool {
        self.index_of(model).is_some()
    }

    /// Snapshot of the models in order.
    pub fn models(&self) -> Vec<Component> {
        self.0.models.borrow().clone()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append `model`. Returns false if it is already present.
    pub fn add(&self, model: Component, options: MutationFlags) -> bool {
        let at = self.len();
        self.add_at(model, at, options)
    }

    /// Insert `model` at `index` (clamped to the length).
    ///
    /// Adding a model that is already present is ignored and returns false.
    pub fn add_at(&self, model: Component, index: usize, options: MutationFlags) -> bool {
        {
            let mut models = self.0.models.borrow_mut();
            if models.contains(&model) {
                return false;
            }
            let at = index.min(models.len());
            models.insert(at, model.clone());
        }
        if !options.is_silent() {
            self.emit(&CollectionEvent::Add { model, options });
        }
        true
    }

    /// Remove `model`. Returns its former index.
    pub fn remove(&self, model: &Component, options: MutationFlags) -> Option<usize> {
        let index = {
            let mut models = self.0.models.borrow_mut();
            let index = models.iter().position(|m| m == model)?;
            models.remove(index);
            index
        };
        if !options.is_silent() {
            self.emit(&CollectionEvent::Remove {
                model: model.clone(),
                index,
                options,
            });
        }
        Some(index)
    }

    /// Replace every model. Duplicate entries in `models` are dropped.
    pub fn reset(&self, models: impl IntoIterator<Item = Component>, options: MutationFlags) {
        let mut next: Vec<Component> = Vec::new();
        for model in models {
            if !next.contains(&model) {
                next.push(model);
            }
        }
        let previous = std::mem::replace(&mut *self.0.models.borrow_mut(), next.clone());
        if !options.is_silent() {
            self.emit(&CollectionEvent::Reset {
                models: next,
                previous,
            });
        }
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Subscribe to every mutation notification.
    pub fn on(&self, listener: impl Fn(&CollectionEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.0.next_listener.get());
        self.0.next_listener.set(id.0 + 1);
        self.0.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Unsubscribe. Returns false if the listener was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.0.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.0.listeners.borrow().len()
    }

    fn emit(&self, event: &CollectionEvent) {
        let listeners: Vec<(ListenerId, CollectionListener)> = self.0.listeners.borrow().clone();
        for (id, listener) in listeners {
            // A previous listener may have unsubscribed this one.
            let still_registered = self.0.listeners.borrow().iter().any(|(lid, _)| *lid == id);
            if still_registered {
                listener(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(c: &ComponentCollection) -> Vec<String> {
        c.models().iter().map(|m| m.kind().to_string()).collect()
    }

    #[test]
    fn test_add_and_order() {
        let coll = ComponentCollection::new();
        let a = Component::new("a");
        let b = Component::new("b");
        let c = Component::new("c");

        assert!(coll.add(a.clone(), MutationFlags::NONE));
        assert!(coll.add(c.clone(), MutationFlags::NONE));
        assert!(coll.add_at(b.clone(), 1, MutationFlags::NONE));
        assert!(!coll.add(a.clone(), MutationFlags::NONE), "duplicates are ignored");

        assert_eq!(kinds(&coll), vec!["a", "b", "c"]);
        assert_eq!(coll.index_of(&b), Some(1));
        assert_eq!(coll.len(), 3);
    }

    #[test]
    fn test_add_at_clamps_index() {
        let coll = ComponentCollection::new();
        coll.add_at(Component::new("a"), 10, MutationFlags::NONE);
        assert_eq!(kinds(&coll), vec!["a"]);
    }

    #[test]
    fn test_events_see_post_mutation_state() {
        let coll = ComponentCollection::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let coll_clone = coll.clone();

        coll.on(move |event| {
            let entry = match event {
                CollectionEvent::Add { model, .. } => {
                    format!("add {} at {:?}", model.kind(), coll_clone.index_of(model))
                }
                CollectionEvent::Remove { model, index, .. } => {
                    format!("remove {} from {} len {}", model.kind(), index, coll_clone.len())
                }
                CollectionEvent::Reset { models, previous } => {
                    format!("reset {} <- {}", models.len(), previous.len())
                }
            };
            seen_clone.borrow_mut().push(entry);
        });

        let a = Component::new("a");
        coll.add(a.clone(), MutationFlags::NONE);
        coll.add_at(Component::new("b"), 0, MutationFlags::NONE);
        coll.remove(&a, MutationFlags::NONE);
        coll.reset(vec![Component::new("x"), Component::new("y")], MutationFlags::NONE);

        assert_eq!(
            *seen.borrow(),
            vec![
                "add a at Some(0)",
                "add b at Some(0)",
                "remove a from 1 len 1",
                "reset 2 <- 1",
            ]
        );
    }

    #[test]
    fn test_silent_mutations() {
        let coll = ComponentCollection::new();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        coll.on(move |_| count_clone.set(count_clone.get() + 1));

        let a = Component::new("a");
        coll.add(a.clone(), MutationFlags::SILENT);
        coll.remove(&a, MutationFlags::SILENT);
        coll.reset(vec![a], MutationFlags::SILENT);

        assert_eq!(count.get(), 0);
        assert_eq!(coll.len(), 1);
    }

    #[test]
    fn test_off_and_reentrant_mutation() {
        let coll = ComponentCollection::new();
        let coll_clone = coll.clone();
        let id = coll.on(move |event| {
            // Re-entrant: adding "a" triggers appending "after-a"
            if let CollectionEvent::Add { model, .. } = event {
                if model.kind() == "a" {
                    coll_clone.add(Component::new("after-a"), MutationFlags::NONE);
                }
            }
        });

        coll.add(Component::new("a"), MutationFlags::NONE);
        assert_eq!(kinds(&coll), vec!["a", "after-a"]);

        assert!(coll.off(id));
        assert!(!coll.off(id));
        assert_eq!(coll.listener_count(), 0);
    }

    #[test]
    fn test_remove_missing_returns_none() {
        let coll = ComponentCollection::new();
        assert_eq!(coll.remove(&Component::new("a"), MutationFlags::NONE), None);
    }
}
