//! # frame-components
//!
//! Keeps a live node tree in sync with an ordered collection of component
//! models, optionally inside a sandboxed frame with its own document and
//! custom element registry.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! scope-based cleanup and fault signals.
//!
//! ## Architecture
//!
//! ```text
//! ComponentCollection ──add/remove/reset──▶ Reconciler ──▶ parent Node
//!                                              │
//!                                   ViewResolver (type table + views)
//!                                              │
//!                                 ComponentView ──▶ nested Reconciler
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Ids, mutation flags, cleanup functions
//! - [`dom`] - Minimal node tree and documents
//! - [`surface`] - Sandboxed frames and custom element registries
//! - [`model`] - Components and their collections
//! - [`events`] - Editor event bus (`component:add`, render faults)
//! - [`config`] - Render configuration shared down a tree
//! - [`engine`] - Type dispatch, view side-table, node factory
//! - [`view`] - The `View` trait and the built-in views
//! - [`reconciler`] - Collection to node-tree reconciliation

pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod events;
pub mod model;
pub mod reconciler;
pub mod surface;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use types::*;

pub use config::RenderConfig;

pub use dom::{host_document, Document, Node, NodeKind};

pub use engine::{
    element_is_web_component, NodeFactory, TypeEntry, TypeRegistry, ViewResolver,
};

pub use error::{DomError, ReconcileError, RenderFault};

pub use events::{EventBus, COMPONENT_ADD};

pub use model::{CollectionEvent, Component, ComponentCollection, ListenerId};

pub use reconciler::{insert_at, trigger_add, Reconciler, ReconcilerProps};

pub use surface::{CustomElementConstructor, CustomElementRegistry, Frame, SandboxContext, Window};

pub use view::{ComponentView, TextNodeView, View, ViewConstructor, ViewHandle, ViewInit};
