//! Event bus - lifecycle notifications and the render-fault sink.
//!
//! # API
//!
//! - `on(name, handler)` - Subscribe to a named event (returns cleanup)
//! - `trigger(name, model)` - Notify subscribers of `name`
//! - `on_error(handler)` - Subscribe to render faults (returns cleanup)
//! - `log_error(fault)` - Report a render fault
//! - `last_fault()` - Reactive read of the most recent fault
//!
//! # Example
//!
//! ```ignore
//! use frame_components::events::{EventBus, COMPONENT_ADD};
//!
//! let bus = EventBus::new();
//! let cleanup = bus.on(COMPONENT_ADD, |model| {
//!     println!("added {}", model.id());
//! });
//! cleanup();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use crate::error::RenderFault;
use crate::model::Component;
use crate::types::Cleanup;

/// Fired once per model of a non-temporary insertion, pre-order.
pub const COMPONENT_ADD: &str = "component:add";

/// Handler for a named component event.
pub type EventHandler = Rc<dyn Fn(&Component)>;

/// Handler for render faults.
pub type ErrorHandler = Rc<dyn Fn(&RenderFault)>;

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    handlers: HashMap<String, Vec<(usize, EventHandler)>>,
    error_handlers: Vec<(usize, ErrorHandler)>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            error_handlers: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

struct EventBusInner {
    registry: RefCell<HandlerRegistry>,
    error_count: Cell<usize>,
    last_fault: Signal<Option<RenderFault>>,
}

/// Shared event bus. Clones refer to the same bus.
#[derive(Clone)]
pub struct EventBus(Rc<EventBusInner>);

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self(Rc::new(EventBusInner {
            registry: RefCell::new(HandlerRegistry::new()),
            error_count: Cell::new(0),
            last_fault: signal(None),
        }))
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribe to `name`. Returns cleanup function.
    pub fn on<F>(&self, name: &str, handler: F) -> Cleanup
    where
        F: Fn(&Component) + 'static,
    {
        let name = name.to_string();
        let id = {
            let mut reg = self.0.registry.borrow_mut();
            let id = reg.next_id();
            reg.handlers
                .entry(name.clone())
                .or_default()
                .push((id, Rc::new(handler)));
            id
        };

        let bus: Weak<EventBusInner> = Rc::downgrade(&self.0);
        Box::new(move || {
            let Some(bus) = bus.upgrade() else { return };
            let mut reg = bus.registry.borrow_mut();
            if let Some(handlers) = reg.handlers.get_mut(&name) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.handlers.remove(&name);
                }
            }
        })
    }

    /// Subscribe to render faults. Returns cleanup function.
    pub fn on_error<F>(&self, handler: F) -> Cleanup
    where
        F: Fn(&RenderFault) + 'static,
    {
        let id = {
            let mut reg = self.0.registry.borrow_mut();
            let id = reg.next_id();
            reg.error_handlers.push((id, Rc::new(handler)));
            id
        };

        let bus: Weak<EventBusInner> = Rc::downgrade(&self.0);
        Box::new(move || {
            if let Some(bus) = bus.upgrade() {
                bus.registry
                    .borrow_mut()
                    .error_handlers
                    .retain(|(handler_id, _)| *handler_id != id);
            }
        })
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Notify every subscriber of `name`.
    pub fn trigger(&self, name: &str, model: &Component) {
        // Snapshot so handlers may subscribe or trigger re-entrantly
        let handlers: Vec<EventHandler> = self
            .0
            .registry
            .borrow()
            .handlers
            .get(name)
            .map(|hs| hs.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        for handler in handlers {
            handler(model);
        }
    }

    /// Report a render fault.
    pub fn log_error(&self, fault: &RenderFault) {
        tracing::error!(model = %fault.model(), error = %fault, "render fault");

        self.0.error_count.set(self.0.error_count.get() + 1);
        self.0.last_fault.set(Some(fault.clone()));

        let handlers: Vec<ErrorHandler> = self
            .0
            .registry
            .borrow()
            .error_handlers
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(fault);
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Faults reported so far.
    pub fn error_count(&self) -> usize {
        self.0.error_count.get()
    }

    /// Most recent fault. Creates a reactive dependency inside effects.
    pub fn last_fault(&self) -> Option<RenderFault> {
        self.0.last_fault.get()
    }

    pub fn handler_count(&self, name: &str) -> usize {
        self.0
            .registry
            .borrow()
            .handlers
            .get(name)
            .map_or(0, Vec::len)
    }
}
