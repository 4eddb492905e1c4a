//! Engine - type dispatch, view resolution and node creation.
//!
//! - Registry: ordered `type` → view constructor table, first match wins
//! - Resolver: builds or reuses the View for a (model, surface) pair
//! - Factory: creates nodes through a custom element constructor, the
//!   surface document, or the host document

mod factory;
mod registry;
mod resolver;

pub use factory::{element_is_web_component, NodeFactory};
pub use registry::{default_view, resolve, TypeEntry, TypeRegistry};
pub use resolver::ViewResolver;
