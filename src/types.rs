//! Core types for frame-components.
//!
//! Identity handles and mutation flags that flow between the model layer,
//! the reconciler and the live node tree.

use std::cell::Cell;
use std::fmt;

// =============================================================================
// Identity
// =============================================================================

thread_local! {
    /// Counter for model identities.
    static NEXT_MODEL_ID: Cell<u64> = const { Cell::new(1) };

    /// Counter for node identities.
    static NEXT_NODE_ID: Cell<u64> = const { Cell::new(1) };

    /// Counter for surface and document identities.
    static NEXT_SURFACE_ID: Cell<u64> = const { Cell::new(1) };
}

fn bump(counter: &'static std::thread::LocalKey<Cell<u64>>) -> u64 {
    counter.with(|c| {
        let id = c.get();
        c.set(id + 1);
        id
    })
}

/// Unique identity of a component model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub u64);

impl ModelId {
    /// Allocate a fresh model identity.
    pub fn next() -> Self {
        Self(bump(&NEXT_MODEL_ID))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Unique identity of a live node. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn next() -> Self {
        Self(bump(&NEXT_NODE_ID))
    }
}

/// Identity of a rendering surface (an isolated frame).
///
/// The host document is not a surface: code that renders without a sandbox
/// carries `Option<SurfaceId>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    pub fn next() -> Self {
        Self(bump(&NEXT_SURFACE_ID))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame{}", self.0)
    }
}

/// Identity of a document. Frames and the host document each own one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

impl DocumentId {
    /// The host document.
    pub const HOST: Self = Self(0);

    pub fn next() -> Self {
        Self(bump(&NEXT_SURFACE_ID))
    }

    pub fn is_host(&self) -> bool {
        *self == Self::HOST
    }
}

// =============================================================================
// Mutation flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Options attached to a collection mutation.
    ///
    /// Combine with bitwise OR: `MutationFlags::TEMPORARY | MutationFlags::SILENT`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct MutationFlags: u8 {
        const NONE = 0;
        /// Speculative insertion (drag preview ghosts). No lifecycle events.
        const TEMPORARY = 1 << 0;
        /// Mutate the collection without notifying listeners.
        const SILENT = 1 << 1;
    }
}

impl MutationFlags {
    #[inline]
    pub fn is_temporary(&self) -> bool {
        self.contains(Self::TEMPORARY)
    }

    #[inline]
    pub fn is_silent(&self) -> bool {
        self.contains(Self::SILENT)
    }
}

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by subscriptions.
///
/// Call this to stop listening and release whatever the subscription holds.
pub type Cleanup = Box<dyn FnOnce()>;
