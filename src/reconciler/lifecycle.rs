//! Lifecycle propagation for inserted subtrees.

use crate::events::{EventBus, COMPONENT_ADD};
use crate::model::Component;

/// Fire `component:add` for `model` then each descendant, pre-order.
///
/// Children are read at the point of use, so a handler that mutates a child
/// collection affects which descendants are visited next.
pub fn trigger_add(events: &EventBus, model: &Component) {
    events.trigger(COMPONENT_ADD, model);
    for child in model.children().models() {
        trigger_add(events, &child);
    }
}
