//! Component models.
//!
//! - [`Component`] - one node of the document's component tree
//! - [`ComponentCollection`] - ordered children emitting `add`/`remove`/`reset`

mod collection;
mod component;

pub use collection::{CollectionEvent, CollectionListener, ComponentCollection, ListenerId};
pub use component::{Component, DEFAULT_TAG, DEFAULT_TYPE};
