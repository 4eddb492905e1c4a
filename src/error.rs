//! Error types.
//!
//! Render faults are recovered locally by the reconciler (placeholder node +
//! error sink). `ReconcileError` marks caller contract violations.

use thiserror::Error;

use crate::types::ModelId;

/// Errors raised by live node tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("'{0}' is not a valid attribute name")]
    InvalidAttributeName(String),

    #[error("the new child is an ancestor of the parent")]
    HierarchyRequest,

    #[error("the reference node is not a child of this node")]
    NotAChild,

    #[error("only element, fragment and text nodes can hold content")]
    NotAContainer,
}

/// A failure while rendering a single model into a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderFault {
    #[error("failed to render {model} (type '{kind}'): {source}")]
    Dom {
        model: ModelId,
        kind: String,
        #[source]
        source: DomError,
    },

    #[error("failed to render {model} (type '{kind}'): {message}")]
    View {
        model: ModelId,
        kind: String,
        message: String,
    },
}

impl RenderFault {
    /// Model whose render failed.
    pub fn model(&self) -> ModelId {
        match self {
            Self::Dom { model, .. } | Self::View { model, .. } => *model,
        }
    }
}

/// Contract violations on the reconciler's mutation handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("model {0} is not present in the reconciled collection")]
    ModelNotInCollection(ModelId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fault_display() {
        let fault = RenderFault::Dom {
            model: ModelId(7),
            kind: "link".into(),
            source: DomError::InvalidAttributeName("1bad".into()),
        };
        assert_eq!(
            fault.to_string(),
            "failed to render c7 (type 'link'): '1bad' is not a valid attribute name"
        );
        assert_eq!(fault.model(), ModelId(7));
    }
}
