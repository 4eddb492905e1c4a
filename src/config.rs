//! Rendering configuration shared by a reconciler and every nested one.
//!
//! Construct with struct literal syntax or the `with_*` builders:
//! ```ignore
//! let config = RenderConfig {
//!     events: Some(bus.clone()),
//!     ..Default::default()
//! }
//! .with_surface(Frame::new());
//! ```

use std::rc::Rc;

use crate::dom::{host_document, Document};
use crate::engine::TypeRegistry;
use crate::events::EventBus;
use crate::surface::SandboxContext;
use crate::types::SurfaceId;

/// Immutable per-reconciler rendering configuration.
#[derive(Clone, Default)]
pub struct RenderConfig {
    /// Active surface. `None` renders into the host document.
    pub surface: Option<Rc<dyn SandboxContext>>,
    /// Lifecycle notifications and the render-fault sink.
    pub events: Option<EventBus>,
    /// Explicit type table. Falls back to the resolver's registry.
    pub component_types: Option<TypeRegistry>,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(self, surface: impl SandboxContext + 'static) -> Self {
        self.with_shared_surface(Rc::new(surface))
    }

    pub fn with_shared_surface(mut self, surface: Rc<dyn SandboxContext>) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_component_types(mut self, types: TypeRegistry) -> Self {
        self.component_types = Some(types);
        self
    }

    pub fn surface_id(&self) -> Option<SurfaceId> {
        self.surface.as_ref().map(|s| s.id())
    }

    /// The surface document when reachable, otherwise the host document.
    pub fn document(&self) -> Document {
        self.surface
            .as_ref()
            .and_then(|s| s.document())
            .unwrap_or_else(host_document)
    }
}

impl std::fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderConfig")
            .field("surface", &self.surface_id())
            .field("events", &self.events.is_some())
            .field("component_types", &self.component_types.as_ref().map(TypeRegistry::len))
            .finish()
    }
}
